//! Cirrus Waiter
//!
//! Waits for long-running cloud operations. A mutating call hands back an
//! operation; the poller re-fetches it until its status reaches DONE, then
//! reports success or the errors the operation carried.
//!
//! # Example
//!
//! ```no_run
//! use cirrus_client::GoogleClient;
//! use cirrus_waiter::{DEFAULT_OPERATION_TIMEOUT, wait_zone};
//!
//! # async fn run(op: cirrus_core::domain::operation::Operation) -> anyhow::Result<()> {
//! let client = GoogleClient::new().with_token("ya29.token");
//! let done = wait_zone(
//!     &client,
//!     "my-project",
//!     "us-central1-a",
//!     &op,
//!     "instance to create",
//!     DEFAULT_OPERATION_TIMEOUT,
//! )
//! .await?;
//! println!("{} finished", done.name);
//! # Ok(())
//! # }
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod lookup;
pub mod poller;

pub use compute::{
    ComputeOperationLookup, DEFAULT_OPERATION_TIMEOUT, wait_for_operation, wait_global, wait_region,
    wait_zone,
};
pub use config::PollConfig;
pub use error::{LookupError, OperationFailure, Result, WaitError};
pub use lookup::{FnLookup, OperationLookup, lookup_fn};
pub use poller::{OperationPoller, PollState};
