//! Persistent volume DTOs

mod source;

pub use source::{
    AwsElasticBlockStore, CephFs, Cinder, Fc, Flocker, GcePersistentDisk, Glusterfs, HostPath,
    Iscsi, Nfs, Rbd, VolumeSource,
};

use k8s_openapi::api::core::v1::{ObjectReference, PersistentVolume, PersistentVolumeSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::volume::{AccessMode, ReclaimPolicy};

/// Errors raised while mapping between a configuration and the API object
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VolumeConversionError {
    #[error("persistent volume has no name")]
    MissingName,

    #[error("persistent volume has no spec")]
    MissingSpec,

    #[error("persistent volume has no volume source")]
    MissingSource,

    #[error("persistent volume has more than one volume source: {}", .0.join(", "))]
    MultipleSources(Vec<&'static str>),

    #[error("invalid persistent volume field '{field}': {message}")]
    InvalidField { field: &'static str, message: String },
}

/// Declared configuration of a persistent volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Cluster-wide volume name; changing it requires a new volume
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Resource quantities, e.g. `storage = "10Gi"`
    #[serde(default)]
    pub capacity: BTreeMap<String, String>,
    pub source: VolumeSource,
    #[serde(default)]
    pub access_modes: Vec<AccessMode>,
    #[serde(default)]
    pub claim_ref: Option<ClaimRef>,
    pub reclaim_policy: ReclaimPolicy,
}

/// Binding to a persistent volume claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub resource_version: String,
    #[serde(default)]
    pub field_path: Option<String>,
}

impl From<&ClaimRef> for ObjectReference {
    fn from(claim: &ClaimRef) -> Self {
        ObjectReference {
            kind: non_empty(&claim.kind),
            namespace: non_empty(&claim.namespace),
            name: non_empty(&claim.name),
            uid: non_empty(&claim.uid),
            api_version: non_empty(&claim.api_version),
            resource_version: non_empty(&claim.resource_version),
            field_path: claim.field_path.clone(),
        }
    }
}

impl From<&ObjectReference> for ClaimRef {
    fn from(reference: &ObjectReference) -> Self {
        ClaimRef {
            kind: reference.kind.clone().unwrap_or_default(),
            namespace: reference.namespace.clone().unwrap_or_default(),
            name: reference.name.clone().unwrap_or_default(),
            uid: reference.uid.clone().unwrap_or_default(),
            api_version: reference.api_version.clone().unwrap_or_default(),
            resource_version: reference.resource_version.clone().unwrap_or_default(),
            field_path: reference.field_path.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl VolumeConfig {
    /// Checks the fields the type system does not already enforce
    pub fn validate(&self) -> Result<(), VolumeConversionError> {
        if self.name.trim().is_empty() {
            return Err(VolumeConversionError::MissingName);
        }

        for (resource, quantity) in &self.capacity {
            if quantity.trim().is_empty() {
                return Err(VolumeConversionError::InvalidField {
                    field: "capacity",
                    message: format!("quantity for '{}' is empty", resource),
                });
            }
        }

        if let Some(claim) = &self.claim_ref {
            if claim.name.is_empty() || claim.namespace.is_empty() {
                return Err(VolumeConversionError::InvalidField {
                    field: "claim_ref",
                    message: "name and namespace are required".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Builds the API object sent on create and replace
    pub fn to_persistent_volume(&self) -> PersistentVolume {
        let mut spec = PersistentVolumeSpec {
            persistent_volume_reclaim_policy: Some(self.reclaim_policy.as_str().to_string()),
            ..Default::default()
        };

        if !self.capacity.is_empty() {
            spec.capacity = Some(
                self.capacity
                    .iter()
                    .map(|(k, v)| (k.clone(), Quantity(v.clone())))
                    .collect(),
            );
        }

        if !self.access_modes.is_empty() {
            spec.access_modes = Some(
                self.access_modes
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            );
        }

        spec.claim_ref = self.claim_ref.as_ref().map(ObjectReference::from);
        self.source.apply_to(&mut spec);

        PersistentVolume {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                labels: (!self.labels.is_empty()).then(|| self.labels.clone()),
                ..Default::default()
            },
            spec: Some(spec),
            ..Default::default()
        }
    }

    /// Flattens an API object back into a configuration
    pub fn from_persistent_volume(pv: &PersistentVolume) -> Result<Self, VolumeConversionError> {
        let name = pv
            .metadata
            .name
            .clone()
            .ok_or(VolumeConversionError::MissingName)?;
        let spec = pv.spec.as_ref().ok_or(VolumeConversionError::MissingSpec)?;

        let reclaim_policy = match spec.persistent_volume_reclaim_policy.as_deref() {
            Some(policy) => policy
                .parse::<ReclaimPolicy>()
                .map_err(|message| VolumeConversionError::InvalidField {
                    field: "persistent_volume_reclaim_policy",
                    message,
                })?,
            // The API server defaults unset policies to Retain
            None => ReclaimPolicy::Retain,
        };

        let access_modes = spec
            .access_modes
            .iter()
            .flatten()
            .map(|m| {
                m.parse()
                    .map_err(|message| VolumeConversionError::InvalidField {
                        field: "access_modes",
                        message,
                    })
            })
            .collect::<Result<Vec<AccessMode>, _>>()?;

        let capacity = spec
            .capacity
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.0.clone()))
            .collect();

        Ok(Self {
            name,
            labels: pv.metadata.labels.clone().unwrap_or_default(),
            capacity,
            source: VolumeSource::from_spec(spec)?,
            access_modes,
            claim_ref: spec.claim_ref.as_ref().map(ClaimRef::from),
            reclaim_policy,
        })
    }
}

/// Persistent volume state after an API round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeState {
    /// Volumes are cluster-scoped, so the name is the ID
    pub id: String,
    pub config: VolumeConfig,
    /// Lifecycle phase reported by the cluster (Available, Bound, Released, ...)
    pub phase: Option<String>,
}

impl VolumeState {
    pub fn from_persistent_volume(pv: &PersistentVolume) -> Result<Self, VolumeConversionError> {
        let config = VolumeConfig::from_persistent_volume(pv)?;
        Ok(Self {
            id: config.name.clone(),
            phase: pv.status.as_ref().and_then(|s| s.phase.clone()),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nfs_volume() -> VolumeConfig {
        VolumeConfig {
            name: "shared-data".to_string(),
            labels: BTreeMap::from([("tier".to_string(), "storage".to_string())]),
            capacity: BTreeMap::from([("storage".to_string(), "10Gi".to_string())]),
            source: VolumeSource::Nfs(Nfs {
                server: "nfs.internal".to_string(),
                path: "/exports/data".to_string(),
                read_only: false,
            }),
            access_modes: vec![AccessMode::ReadWriteMany],
            claim_ref: None,
            reclaim_policy: ReclaimPolicy::Recycle,
        }
    }

    #[test]
    fn test_to_persistent_volume() {
        let pv = nfs_volume().to_persistent_volume();

        assert_eq!(pv.metadata.name.as_deref(), Some("shared-data"));
        let spec = pv.spec.as_ref().unwrap();
        assert_eq!(spec.persistent_volume_reclaim_policy.as_deref(), Some("Recycle"));
        assert_eq!(
            spec.capacity.as_ref().unwrap().get("storage"),
            Some(&Quantity("10Gi".to_string()))
        );
        assert_eq!(
            spec.access_modes.as_deref(),
            Some(&["ReadWriteMany".to_string()][..])
        );
        assert!(spec.claim_ref.is_none());
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(nfs_volume().to_persistent_volume()).unwrap();
        assert_eq!(json["kind"], "PersistentVolume");
        assert_eq!(json["apiVersion"], "v1");
        assert_eq!(json["spec"]["persistentVolumeReclaimPolicy"], "Recycle");
        assert_eq!(json["spec"]["nfs"]["server"], "nfs.internal");
    }

    #[test]
    fn test_flatten_restores_config() {
        let config = nfs_volume();
        let flattened = VolumeConfig::from_persistent_volume(&config.to_persistent_volume());
        assert_eq!(flattened, Ok(config));
    }

    #[test]
    fn test_claim_ref_mapping() {
        let mut config = nfs_volume();
        config.claim_ref = Some(ClaimRef {
            kind: "PersistentVolumeClaim".to_string(),
            namespace: "default".to_string(),
            name: "data-claim".to_string(),
            ..Default::default()
        });

        let pv = config.to_persistent_volume();
        let reference = pv.spec.as_ref().unwrap().claim_ref.as_ref().unwrap();
        assert_eq!(reference.name.as_deref(), Some("data-claim"));
        assert_eq!(reference.uid, None);
    }

    #[test]
    fn test_missing_reclaim_policy_defaults_to_retain() {
        let mut pv = nfs_volume().to_persistent_volume();
        if let Some(spec) = pv.spec.as_mut() {
            spec.persistent_volume_reclaim_policy = None;
        }

        let config = VolumeConfig::from_persistent_volume(&pv).unwrap();
        assert_eq!(config.reclaim_policy, ReclaimPolicy::Retain);
    }

    #[test]
    fn test_validate() {
        assert!(nfs_volume().validate().is_ok());

        let mut unnamed = nfs_volume();
        unnamed.name = "  ".to_string();
        assert_eq!(unnamed.validate(), Err(VolumeConversionError::MissingName));

        let mut bad_claim = nfs_volume();
        bad_claim.claim_ref = Some(ClaimRef::default());
        assert!(matches!(
            bad_claim.validate(),
            Err(VolumeConversionError::InvalidField { field: "claim_ref", .. })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "name": "pv-host",
            "capacity": {"storage": "1Gi"},
            "source": {"host_path": {"path": "/mnt/data"}},
            "access_modes": ["ReadWriteOnce"],
            "reclaim_policy": "Retain"
        }"#;

        let config: VolumeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.source.kind(), "host_path");
        assert!(config.labels.is_empty());
        assert_eq!(config.access_modes, vec![AccessMode::ReadWriteOnce]);
    }
}
