//! Error types for the Cirrus clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling a cloud API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error body returned by the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Kubernetes client failed before the API server answered
    #[error("Kubernetes request failed: {0}")]
    Kube(#[source] kube::Error),
}

impl From<kube::Error> for ClientError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) => Self::ApiError {
                status: response.code,
                message: response.message,
            },
            other => Self::Kube(other),
        }
    }
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
