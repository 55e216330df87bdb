//! Configuration module
//!
//! Connection settings shared by every command.

use anyhow::{Context, Result, bail};
use cirrus_client::{Endpoints, GoogleClient, KubeClient};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Cloud project, required by the Google commands
    pub project: Option<String>,
    /// OAuth2 access token for the Google APIs
    pub token: Option<String>,
    pub compute_url: String,
    pub logging_url: String,
    pub pubsub_url: String,
    /// Kubernetes API server URL, kubeconfig or in-cluster config when unset
    pub kube_url: Option<String>,
}

impl Config {
    /// The configured project, or an error telling how to set it
    pub fn project(&self) -> Result<&str> {
        match self.project.as_deref() {
            Some(project) if !project.trim().is_empty() => Ok(project),
            _ => bail!("No project configured: pass --project or set GOOGLE_PROJECT"),
        }
    }

    pub fn google_client(&self) -> GoogleClient {
        let client = GoogleClient::with_endpoints(Endpoints {
            compute: self.compute_url.clone(),
            logging: self.logging_url.clone(),
            pubsub: self.pubsub_url.clone(),
        });

        match &self.token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    pub async fn kube_client(&self) -> Result<KubeClient> {
        let client = match &self.kube_url {
            Some(url) => KubeClient::from_url(url)?,
            None => KubeClient::try_default()
                .await
                .context("Failed to load Kubernetes configuration")?,
        };
        Ok(client)
    }
}
