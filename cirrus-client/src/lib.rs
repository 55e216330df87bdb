//! Cirrus HTTP Clients
//!
//! Thin, typed HTTP clients for the cloud APIs the Cirrus resources talk to.
//!
//! - [`GoogleClient`]: compute operations, logging sinks and Pub/Sub topics
//! - [`KubeClient`]: Kubernetes persistent volumes
//!
//! Authentication is not handled here: callers hand over a bearer token they
//! obtained elsewhere.
//!
//! # Example
//!
//! ```no_run
//! use cirrus_client::GoogleClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GoogleClient::new().with_token("ya29.token");
//!
//!     let op = client
//!         .get_zone_operation("my-project", "us-central1-a", "operation-123")
//!         .await?;
//!
//!     println!("{} is {}", op.name, op.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod compute;
mod kube;
mod logging;
mod pubsub;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use kube::KubeClient;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Default compute API base URL
pub const COMPUTE_URL: &str = "https://www.googleapis.com/compute/beta";
/// Default logging API base URL
pub const LOGGING_URL: &str = "https://logging.googleapis.com/v1beta3";
/// Default Pub/Sub API base URL
pub const PUBSUB_URL: &str = "https://pubsub.googleapis.com/v1";

/// Base URLs of the Google APIs, overridable for emulators and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub compute: String,
    pub logging: String,
    pub pubsub: String,
}

impl Endpoints {
    /// Serves every API from the same base URL
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = trim(base_url.into());
        Self {
            compute: base_url.clone(),
            logging: base_url.clone(),
            pubsub: base_url,
        }
    }

    fn normalized(self) -> Self {
        Self {
            compute: trim(self.compute),
            logging: trim(self.logging),
            pubsub: trim(self.pubsub),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            compute: COMPUTE_URL.to_string(),
            logging: LOGGING_URL.to_string(),
            pubsub: PUBSUB_URL.to_string(),
        }
    }
}

fn trim(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// HTTP client for the Google Cloud APIs
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    endpoints: Endpoints,
    /// OAuth2 access token sent as a bearer token
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl GoogleClient {
    /// Create a client against the public Google endpoints
    pub fn new() -> Self {
        Self::with_endpoints(Endpoints::default())
    }

    /// Create a client against custom endpoints
    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self::with_client(endpoints, Client::new())
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use cirrus_client::{Endpoints, GoogleClient};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GoogleClient::with_client(Endpoints::default(), http_client);
    /// ```
    pub fn with_client(endpoints: Endpoints, client: Client) -> Self {
        Self {
            endpoints: endpoints.normalized(),
            token: None,
            client,
        }
    }

    /// Attach an OAuth2 access token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the configured endpoints
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl Default for GoogleClient {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Handle an API response and deserialize JSON
///
/// Checks the status code and returns an appropriate error if the request
/// failed, or deserializes the response body if successful.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Handle an API response whose body is irrelevant (e.g., DELETE operations)
pub(crate) async fn handle_empty_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    Ok(())
}

/// Reject empty path segments before they turn into a different URL
pub(crate) fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} cannot be empty", what)));
    }
    Ok(())
}

/// Appends `segments` to `base`, percent-encoding each one
///
/// A `/`, `?` or `#` inside a segment stays part of that segment.
pub(crate) fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| ClientError::InvalidRequest(format!("invalid base URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidRequest(format!("base URL cannot take a path: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_public_endpoints() {
        let client = GoogleClient::new();
        assert_eq!(client.endpoints().compute, COMPUTE_URL);
        assert_eq!(client.endpoints().pubsub, PUBSUB_URL);
    }

    #[test]
    fn test_endpoints_trim_trailing_slash() {
        let client = GoogleClient::with_endpoints(Endpoints {
            compute: "http://localhost:8080/compute/".to_string(),
            logging: "http://localhost:8080/".to_string(),
            pubsub: "http://localhost:8085".to_string(),
        });
        assert_eq!(client.endpoints().compute, "http://localhost:8080/compute");
        assert_eq!(client.endpoints().logging, "http://localhost:8080");
    }

    #[test]
    fn test_single_endpoint() {
        let endpoints = Endpoints::single("http://localhost:9000/");
        assert_eq!(endpoints.compute, "http://localhost:9000");
        assert_eq!(endpoints.logging, endpoints.pubsub);
    }

    #[test]
    fn test_endpoint_url_escapes_segments() {
        let url = endpoint_url("http://localhost:9000/compute/beta", &["projects", "a/b?c#d"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/compute/beta/projects/a%2Fb%3Fc%23d"
        );

        let url = endpoint_url("http://localhost:9000", &["projects", "p"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/projects/p");
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        assert!(matches!(
            endpoint_url("not a url", &["projects"]),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_require() {
        assert!(require("op-1", "operation name").is_ok());
        assert!(matches!(
            require(" ", "operation name"),
            Err(ClientError::InvalidRequest(_))
        ));
    }
}
