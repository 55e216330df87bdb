//! Kubernetes API client
//!
//! Only the persistent volume endpoints of the core/v1 group are covered.
//! Connection details (kubeconfig, in-cluster service account, cluster CA)
//! are resolved by `kube`.

use cirrus_core::domain::volume::PersistentVolume;
use kube::api::{Api, DeleteParams, PostParams};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::require;

/// Persistent volume client for a Kubernetes cluster
#[derive(Clone)]
pub struct KubeClient {
    volumes: Api<PersistentVolume>,
}

impl KubeClient {
    /// Wrap an existing `kube` client
    pub fn new(client: kube::Client) -> Self {
        Self {
            volumes: Api::all(client),
        }
    }

    /// Connect using the local kubeconfig or the in-cluster service account
    pub async fn try_default() -> Result<Self> {
        let client = kube::Client::try_default().await?;
        Ok(Self::new(client))
    }

    /// Connect to an API server URL without credentials (e.g. `kubectl proxy`)
    pub fn from_url(url: &str) -> Result<Self> {
        let cluster_url = url.parse().map_err(|e| {
            ClientError::InvalidRequest(format!("invalid Kubernetes API URL '{}': {}", url, e))
        })?;
        let client = kube::Client::try_from(kube::Config::new(cluster_url))?;
        Ok(Self::new(client))
    }

    // =============================================================================
    // Persistent Volumes
    // =============================================================================

    /// Create a persistent volume
    pub async fn create_persistent_volume(&self, pv: &PersistentVolume) -> Result<PersistentVolume> {
        debug!(
            "creating persistent volume {}",
            pv.metadata.name.as_deref().unwrap_or_default()
        );
        Ok(self.volumes.create(&PostParams::default(), pv).await?)
    }

    /// Get a persistent volume by name
    pub async fn get_persistent_volume(&self, name: &str) -> Result<PersistentVolume> {
        require(name, "persistent volume name")?;
        Ok(self.volumes.get(name).await?)
    }

    /// Replace a persistent volume
    pub async fn replace_persistent_volume(
        &self,
        name: &str,
        pv: &PersistentVolume,
    ) -> Result<PersistentVolume> {
        require(name, "persistent volume name")?;
        debug!("replacing persistent volume {}", name);
        Ok(self.volumes.replace(name, &PostParams::default(), pv).await?)
    }

    /// Delete a persistent volume by name
    pub async fn delete_persistent_volume(&self, name: &str) -> Result<()> {
        require(name, "persistent volume name")?;
        debug!("deleting persistent volume {}", name);
        self.volumes.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}

impl std::fmt::Debug for KubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClient").finish_non_exhaustive()
    }
}
