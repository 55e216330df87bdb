//! Error types for the resource handlers

use cirrus_client::ClientError;
use cirrus_core::dto::volume::VolumeConversionError;
use std::fmt;
use thiserror::Error;

/// Result type alias for resource handlers
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Step of the resource lifecycle an API call belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Get,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Create => "creating",
            Action::Get => "getting",
            Action::Update => "updating",
            Action::Delete => "deleting",
        };
        f.write_str(verb)
    }
}

/// Errors raised by resource handlers
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The backing API call failed
    #[error("Error {action} {kind} {name}: {source}")]
    Api {
        action: Action,
        kind: &'static str,
        name: String,
        #[source]
        source: ClientError,
    },

    /// The declared configuration cannot be sent as is
    #[error("Invalid {kind} {name}: {source}")]
    Invalid {
        kind: &'static str,
        name: String,
        #[source]
        source: VolumeConversionError,
    },

    /// An attribute that cannot change in place was changed
    #[error("Changing {field} of {kind} {name} requires replacing it")]
    RequiresReplacement {
        kind: &'static str,
        name: String,
        field: &'static str,
    },
}

impl ResourceError {
    pub(crate) fn api(
        action: Action,
        kind: &'static str,
        name: impl Into<String>,
    ) -> impl FnOnce(ClientError) -> Self {
        let name = name.into();
        move |source| Self::Api {
            action,
            kind,
            name,
            source,
        }
    }

    /// Whether the remote object does not exist (anymore)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { source, .. } if source.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = ResourceError::api(Action::Create, "sink", "audit")(ClientError::api_error(
            403,
            "permission denied",
        ));

        assert_eq!(
            err.to_string(),
            "Error creating sink audit: API error (status 403): permission denied"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found() {
        let err = ResourceError::api(Action::Get, "topic", "projects/p/topics/t")(
            ClientError::api_error(404, "not found"),
        );
        assert!(err.is_not_found());
    }
}
