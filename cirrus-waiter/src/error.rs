//! Error types for the waiter

use cirrus_core::domain::operation::{Operation, OperationErrorEntry, OperationStatus};
use std::time::Duration;
use thiserror::Error;

/// Error returned by a status lookup, whatever backend it talks to
pub type LookupError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for waits
pub type Result<T> = std::result::Result<T, WaitError>;

/// Why a wait did not end in success
#[derive(Debug, Error)]
pub enum WaitError {
    /// The status lookup itself failed; not retried
    #[error("Error waiting for {activity}: {source}")]
    Lookup {
        activity: String,
        #[source]
        source: LookupError,
    },

    /// The operation finished and reported errors
    #[error(transparent)]
    OperationFailed(#[from] OperationFailure),

    /// The deadline passed before the operation finished
    #[error(
        "Error waiting for {activity}: timeout while waiting for state to become '{}' (last state: '{last_status}', timeout: {timeout:?})",
        OperationStatus::TARGET
    )]
    Timeout {
        activity: String,
        last_status: String,
        timeout: Duration,
    },

    /// The backend reported a status outside the known set
    #[error(
        "Error waiting for {activity}: unexpected state '{status}', wanted target '{}'",
        OperationStatus::TARGET
    )]
    UnexpectedStatus { activity: String, status: String },

    /// The caller cancelled the wait
    #[error("Error waiting for {activity}: wait cancelled")]
    Cancelled { activity: String },
}

impl WaitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The remote failure, if the operation itself failed
    pub fn failure(&self) -> Option<&OperationFailure> {
        match self {
            Self::OperationFailed(failure) => Some(failure),
            _ => None,
        }
    }

    /// The lookup error, if the status endpoint could not be reached
    pub fn lookup_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Lookup { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Errors reported by a finished operation
///
/// Renders as every entry's message followed by a newline, in the order the
/// backend returned them.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.message())]
pub struct OperationFailure {
    pub operation: String,
    pub errors: Vec<OperationErrorEntry>,
}

impl OperationFailure {
    /// Extracts the failure of a finished operation; `None` when it succeeded
    pub fn from_operation(op: &Operation) -> Option<Self> {
        if !op.has_failed() {
            return None;
        }

        Some(Self {
            operation: op.name.clone(),
            errors: op.error_entries().to_vec(),
        })
    }

    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}\n", e.message))
            .collect()
    }
}
