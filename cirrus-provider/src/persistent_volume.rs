//! Kubernetes persistent volume resource
//!
//! Volumes are cluster scoped, so the name is the only identity. Create and
//! update both finish with a read, which flattens the object the cluster
//! stored back into a [`VolumeConfig`].

use cirrus_core::dto::volume::{VolumeConfig, VolumeState};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::VolumeApi;
use crate::error::{Action, ResourceError, Result};

const KIND: &str = "persistent volume";

/// Handler for persistent volumes of one cluster
pub struct PersistentVolumeResource {
    api: Arc<dyn VolumeApi>,
}

impl PersistentVolumeResource {
    pub fn new(api: Arc<dyn VolumeApi>) -> Self {
        Self { api }
    }

    /// Validate, create, then read the volume back
    pub async fn create(&self, config: &VolumeConfig) -> Result<VolumeState> {
        validate(config)?;

        debug!("Creating {} {} ({})", KIND, config.name, config.source.kind());
        self.api
            .create_volume(&config.to_persistent_volume())
            .await
            .map_err(ResourceError::api(Action::Create, KIND, &config.name))?;

        info!("Persistent volume created: {}", config.name);
        self.read(&config.name).await
    }

    /// Read a volume by name
    pub async fn read(&self, name: &str) -> Result<VolumeState> {
        let pv = self
            .api
            .get_volume(name)
            .await
            .map_err(ResourceError::api(Action::Get, KIND, name))?;

        VolumeState::from_persistent_volume(&pv).map_err(|source| ResourceError::Invalid {
            kind: KIND,
            name: name.to_string(),
            source,
        })
    }

    /// Replace the volume with the planned configuration, then read it back
    pub async fn update(&self, prior: &VolumeConfig, planned: &VolumeConfig) -> Result<VolumeState> {
        if let Some(field) = requires_replacement(prior, planned) {
            return Err(ResourceError::RequiresReplacement {
                kind: KIND,
                name: prior.name.clone(),
                field,
            });
        }
        validate(planned)?;

        self.api
            .replace_volume(&planned.name, &planned.to_persistent_volume())
            .await
            .map_err(ResourceError::api(Action::Update, KIND, &planned.name))?;

        info!("Persistent volume updated: {}", planned.name);
        self.read(&planned.name).await
    }

    /// Delete a volume by name
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.api
            .delete_volume(name)
            .await
            .map_err(ResourceError::api(Action::Delete, KIND, name))?;

        info!("Persistent volume deleted: {}", name);
        Ok(())
    }
}

fn validate(config: &VolumeConfig) -> Result<()> {
    config.validate().map_err(|source| ResourceError::Invalid {
        kind: KIND,
        name: config.name.clone(),
        source,
    })
}

/// A renamed volume is a different volume
pub fn requires_replacement(prior: &VolumeConfig, planned: &VolumeConfig) -> Option<&'static str> {
    (prior.name != planned.name).then_some("name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cirrus_client::ClientError;
    use cirrus_core::domain::volume::{
        AccessMode, PersistentVolume, PersistentVolumeStatus, ReclaimPolicy,
    };
    use cirrus_core::dto::volume::{GcePersistentDisk, Nfs, VolumeConversionError, VolumeSource};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    /// Stores volumes by name and marks them Available, like a cluster would
    #[derive(Default)]
    struct FakeCluster {
        volumes: Mutex<HashMap<String, PersistentVolume>>,
        replaced: Mutex<Vec<String>>,
    }

    impl FakeCluster {
        fn store(&self, pv: &PersistentVolume) -> PersistentVolume {
            let mut stored = pv.clone();
            stored.status = Some(PersistentVolumeStatus {
                phase: Some("Available".to_string()),
                ..Default::default()
            });
            let name = stored.metadata.name.clone().unwrap_or_default();
            self.volumes.lock().unwrap().insert(name, stored.clone());
            stored
        }
    }

    #[async_trait]
    impl VolumeApi for FakeCluster {
        async fn create_volume(&self, pv: &PersistentVolume) -> cirrus_client::Result<PersistentVolume> {
            Ok(self.store(pv))
        }

        async fn get_volume(&self, name: &str) -> cirrus_client::Result<PersistentVolume> {
            self.volumes
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .ok_or_else(|| ClientError::api_error(404, "not found"))
        }

        async fn replace_volume(
            &self,
            name: &str,
            pv: &PersistentVolume,
        ) -> cirrus_client::Result<PersistentVolume> {
            self.replaced.lock().unwrap().push(name.to_string());
            Ok(self.store(pv))
        }

        async fn delete_volume(&self, name: &str) -> cirrus_client::Result<()> {
            self.volumes
                .lock()
                .unwrap()
                .remove(name)
                .map(|_| ())
                .ok_or_else(|| ClientError::api_error(404, "not found"))
        }
    }

    fn nfs() -> VolumeConfig {
        VolumeConfig {
            name: "shared".to_string(),
            labels: BTreeMap::from([("team".to_string(), "data".to_string())]),
            capacity: BTreeMap::from([("storage".to_string(), "10Gi".to_string())]),
            source: VolumeSource::Nfs(Nfs {
                server: "10.0.0.5".to_string(),
                path: "/exports".to_string(),
                read_only: false,
            }),
            access_modes: vec![AccessMode::ReadWriteMany],
            claim_ref: None,
            reclaim_policy: ReclaimPolicy::Retain,
        }
    }

    #[tokio::test]
    async fn test_create_reads_back_config() {
        let resource = PersistentVolumeResource::new(Arc::new(FakeCluster::default()));

        let state = resource.create(&nfs()).await.unwrap();

        assert_eq!(state.id, "shared");
        assert_eq!(state.config, nfs());
        assert_eq!(state.phase.as_deref(), Some("Available"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_create() {
        let cluster = Arc::new(FakeCluster::default());
        let resource = PersistentVolumeResource::new(cluster.clone());

        let mut config = nfs();
        config.name = " ".to_string();
        let err = resource.create(&config).await.unwrap_err();

        assert!(matches!(
            err,
            ResourceError::Invalid {
                source: VolumeConversionError::MissingName,
                ..
            }
        ));
        assert!(cluster.volumes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_then_reads() {
        let cluster = Arc::new(FakeCluster::default());
        let resource = PersistentVolumeResource::new(cluster.clone());
        resource.create(&nfs()).await.unwrap();

        let mut planned = nfs();
        planned.source = VolumeSource::GcePersistentDisk(GcePersistentDisk {
            pd_name: "disk-1".to_string(),
            fs_type: Some("ext4".to_string()),
            partition: None,
            read_only: true,
        });
        planned.reclaim_policy = ReclaimPolicy::Delete;

        let state = resource.update(&nfs(), &planned).await.unwrap();

        assert_eq!(state.config, planned);
        assert_eq!(*cluster.replaced.lock().unwrap(), vec!["shared".to_string()]);
    }

    #[tokio::test]
    async fn test_rename_requires_replacement() {
        let resource = PersistentVolumeResource::new(Arc::new(FakeCluster::default()));

        let mut planned = nfs();
        planned.name = "shared-v2".to_string();
        let err = resource.update(&nfs(), &planned).await.unwrap_err();

        assert!(matches!(
            err,
            ResourceError::RequiresReplacement { field: "name", .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_volume() {
        let resource = PersistentVolumeResource::new(Arc::new(FakeCluster::default()));

        let err = resource.delete("ghost").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(
            err.to_string()
                .starts_with("Error deleting persistent volume ghost: ")
        );
    }
}
