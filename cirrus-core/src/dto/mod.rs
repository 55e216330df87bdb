//! Data Transfer Objects for the resource handlers
//!
//! Each resource has a configuration DTO (what the user declared) and a state
//! DTO (configuration plus the attributes computed by the API). Handlers take
//! the former and return the latter.

pub mod sink;
pub mod topic;
pub mod volume;
