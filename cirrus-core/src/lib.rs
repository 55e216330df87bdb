//! Cirrus Core
//!
//! Core types shared by the Cirrus provider crates.
//!
//! This crate contains:
//! - Domain types: API-level entities (operations, log sinks, topics, persistent volumes)
//! - DTOs: resource configuration and computed state exchanged with the resource handlers

pub mod domain;
pub mod dto;
