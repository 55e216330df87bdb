//! Core domain types
//!
//! This module contains the structures exchanged with the cloud APIs.
//! They mirror the JSON payloads of each API and are shared between the
//! HTTP clients (which move them over the wire), the waiter (which observes
//! operations) and the resource handlers (which map them to state).

pub mod logging;
pub mod operation;
pub mod pubsub;
pub mod volume;
