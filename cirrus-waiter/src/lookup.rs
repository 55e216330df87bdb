//! Status lookups
//!
//! The poller never knows which API it is talking to. It is handed an
//! [`OperationLookup`] that fetches the latest snapshot of one operation.

use async_trait::async_trait;
use cirrus_core::domain::operation::Operation;
use std::future::Future;

use crate::error::LookupError;

/// Fetches the current state of a single operation
#[async_trait]
pub trait OperationLookup: Send + Sync {
    /// Fetch the latest snapshot of the operation
    async fn lookup(&self) -> Result<Operation, LookupError>;

    /// Human readable description used in logs
    fn describe(&self) -> String {
        "operation".to_string()
    }
}

#[async_trait]
impl<T: OperationLookup + ?Sized> OperationLookup for Box<T> {
    async fn lookup(&self) -> Result<Operation, LookupError> {
        (**self).lookup().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Lookup backed by an async closure
pub struct FnLookup<F> {
    fetch: F,
    label: String,
}

/// Wraps an async closure into an [`OperationLookup`]
///
/// # Example
/// ```
/// use cirrus_core::domain::operation::Operation;
/// use cirrus_waiter::{LookupError, lookup_fn};
///
/// let lookup = lookup_fn(|| async {
///     Ok::<_, LookupError>(Operation {
///         name: "op-1".to_string(),
///         status: "DONE".to_string(),
///         ..Default::default()
///     })
/// });
/// ```
pub fn lookup_fn<F, Fut>(fetch: F) -> FnLookup<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Operation, LookupError>> + Send,
{
    FnLookup {
        fetch,
        label: "operation".to_string(),
    }
}

impl<F> FnLookup<F> {
    /// Sets the label returned by `describe`
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[async_trait]
impl<F, Fut> OperationLookup for FnLookup<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Operation, LookupError>> + Send,
{
    async fn lookup(&self) -> Result<Operation, LookupError> {
        (self.fetch)().await
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
