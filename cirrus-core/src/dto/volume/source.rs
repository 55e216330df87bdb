//! Persistent volume sources
//!
//! A persistent volume is backed by exactly one source. The API models that as
//! a dozen optional fields inlined in `PersistentVolumeSpec`; here it is an enum, so a
//! configuration cannot name two sources at once.

use k8s_openapi::api::core::v1::{
    AWSElasticBlockStoreVolumeSource, CephFSPersistentVolumeSource, CinderPersistentVolumeSource,
    FCVolumeSource, FlockerVolumeSource, GCEPersistentDiskVolumeSource,
    GlusterfsPersistentVolumeSource, HostPathVolumeSource, ISCSIPersistentVolumeSource,
    NFSVolumeSource, PersistentVolumeSpec, RBDPersistentVolumeSource, SecretReference,
};
use serde::{Deserialize, Serialize};

use super::VolumeConversionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSource {
    HostPath(HostPath),
    GcePersistentDisk(GcePersistentDisk),
    AwsElasticBlockStore(AwsElasticBlockStore),
    Nfs(Nfs),
    Iscsi(Iscsi),
    Glusterfs(Glusterfs),
    Rbd(Rbd),
    Cinder(Cinder),
    CephFs(CephFs),
    Flocker(Flocker),
    Fc(Fc),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostPath {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcePersistentDisk {
    pub pd_name: String,
    #[serde(default)]
    pub fs_type: Option<String>,
    #[serde(default)]
    pub partition: Option<i32>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsElasticBlockStore {
    pub volume_id: String,
    #[serde(default)]
    pub fs_type: Option<String>,
    #[serde(default)]
    pub partition: Option<i32>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nfs {
    pub server: String,
    pub path: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Iscsi {
    pub target_portal: String,
    pub iqn: String,
    pub lun: i32,
    #[serde(default)]
    pub iscsi_interface: Option<String>,
    #[serde(default)]
    pub fs_type: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glusterfs {
    pub endpoints: String,
    pub path: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rbd {
    pub monitors: Vec<String>,
    pub image: String,
    #[serde(default)]
    pub fs_type: Option<String>,
    #[serde(default)]
    pub pool: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub keyring: Option<String>,
    /// Name of the secret holding the Ceph key
    #[serde(default)]
    pub secret_ref: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cinder {
    pub volume_id: String,
    #[serde(default)]
    pub fs_type: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CephFs {
    pub monitors: Vec<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub secret_file: Option<String>,
    #[serde(default)]
    pub secret_ref: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flocker {
    pub dataset_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fc {
    pub target_wwns: Vec<String>,
    pub lun: i32,
    #[serde(default)]
    pub fs_type: Option<String>,
    #[serde(default)]
    pub read_only: bool,
}

impl VolumeSource {
    /// Attribute name of the source, as used in configuration files
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HostPath(_) => "host_path",
            Self::GcePersistentDisk(_) => "gce_persistent_disk",
            Self::AwsElasticBlockStore(_) => "aws_elastic_block_store",
            Self::Nfs(_) => "nfs",
            Self::Iscsi(_) => "iscsi",
            Self::Glusterfs(_) => "glusterfs",
            Self::Rbd(_) => "rbd",
            Self::Cinder(_) => "cinder",
            Self::CephFs(_) => "ceph_fs",
            Self::Flocker(_) => "flocker",
            Self::Fc(_) => "fc",
        }
    }

    /// Writes this source into the matching inline field of `spec`
    pub fn apply_to(&self, spec: &mut PersistentVolumeSpec) {
        match self {
            Self::HostPath(s) => {
                spec.host_path = Some(HostPathVolumeSource {
                    path: s.path.clone(),
                    ..Default::default()
                })
            }
            Self::GcePersistentDisk(s) => {
                spec.gce_persistent_disk = Some(GCEPersistentDiskVolumeSource {
                    pd_name: s.pd_name.clone(),
                    fs_type: s.fs_type.clone(),
                    partition: s.partition,
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::AwsElasticBlockStore(s) => {
                spec.aws_elastic_block_store = Some(AWSElasticBlockStoreVolumeSource {
                    volume_id: s.volume_id.clone(),
                    fs_type: s.fs_type.clone(),
                    partition: s.partition,
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::Nfs(s) => {
                spec.nfs = Some(NFSVolumeSource {
                    server: s.server.clone(),
                    path: s.path.clone(),
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::Iscsi(s) => {
                spec.iscsi = Some(ISCSIPersistentVolumeSource {
                    target_portal: s.target_portal.clone(),
                    iqn: s.iqn.clone(),
                    lun: s.lun,
                    iscsi_interface: s.iscsi_interface.clone(),
                    fs_type: s.fs_type.clone(),
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::Glusterfs(s) => {
                spec.glusterfs = Some(GlusterfsPersistentVolumeSource {
                    endpoints: s.endpoints.clone(),
                    path: s.path.clone(),
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::Rbd(s) => {
                spec.rbd = Some(RBDPersistentVolumeSource {
                    monitors: s.monitors.clone(),
                    image: s.image.clone(),
                    fs_type: s.fs_type.clone(),
                    pool: s.pool.clone(),
                    user: s.user.clone(),
                    keyring: s.keyring.clone(),
                    secret_ref: secret_ref(&s.secret_ref),
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::Cinder(s) => {
                spec.cinder = Some(CinderPersistentVolumeSource {
                    volume_id: s.volume_id.clone(),
                    fs_type: s.fs_type.clone(),
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::CephFs(s) => {
                spec.cephfs = Some(CephFSPersistentVolumeSource {
                    monitors: s.monitors.clone(),
                    path: s.path.clone(),
                    user: s.user.clone(),
                    secret_file: s.secret_file.clone(),
                    secret_ref: secret_ref(&s.secret_ref),
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
            Self::Flocker(s) => {
                spec.flocker = Some(FlockerVolumeSource {
                    dataset_name: Some(s.dataset_name.clone()),
                    ..Default::default()
                })
            }
            Self::Fc(s) => {
                spec.fc = Some(FCVolumeSource {
                    target_wwns: Some(s.target_wwns.clone()),
                    lun: Some(s.lun),
                    fs_type: s.fs_type.clone(),
                    read_only: read_only(s.read_only),
                    ..Default::default()
                })
            }
        }
    }

    /// Reads the single source set on `spec`
    pub fn from_spec(spec: &PersistentVolumeSpec) -> Result<Self, VolumeConversionError> {
        let mut found = Vec::new();

        if let Some(s) = &spec.host_path {
            found.push(Self::HostPath(HostPath {
                path: s.path.clone(),
            }));
        }
        if let Some(s) = &spec.gce_persistent_disk {
            found.push(Self::GcePersistentDisk(GcePersistentDisk {
                pd_name: s.pd_name.clone(),
                fs_type: s.fs_type.clone(),
                partition: s.partition,
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.aws_elastic_block_store {
            found.push(Self::AwsElasticBlockStore(AwsElasticBlockStore {
                volume_id: s.volume_id.clone(),
                fs_type: s.fs_type.clone(),
                partition: s.partition,
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.nfs {
            found.push(Self::Nfs(Nfs {
                server: s.server.clone(),
                path: s.path.clone(),
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.iscsi {
            found.push(Self::Iscsi(Iscsi {
                target_portal: s.target_portal.clone(),
                iqn: s.iqn.clone(),
                lun: s.lun,
                iscsi_interface: s.iscsi_interface.clone(),
                fs_type: s.fs_type.clone(),
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.glusterfs {
            found.push(Self::Glusterfs(Glusterfs {
                endpoints: s.endpoints.clone(),
                path: s.path.clone(),
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.rbd {
            found.push(Self::Rbd(Rbd {
                monitors: s.monitors.clone(),
                image: s.image.clone(),
                fs_type: s.fs_type.clone(),
                pool: s.pool.clone(),
                user: s.user.clone(),
                keyring: s.keyring.clone(),
                secret_ref: s.secret_ref.as_ref().and_then(|r| r.name.clone()),
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.cinder {
            found.push(Self::Cinder(Cinder {
                volume_id: s.volume_id.clone(),
                fs_type: s.fs_type.clone(),
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.cephfs {
            found.push(Self::CephFs(CephFs {
                monitors: s.monitors.clone(),
                path: s.path.clone(),
                user: s.user.clone(),
                secret_file: s.secret_file.clone(),
                secret_ref: s.secret_ref.as_ref().and_then(|r| r.name.clone()),
                read_only: s.read_only.unwrap_or(false),
            }));
        }
        if let Some(s) = &spec.flocker {
            found.push(Self::Flocker(Flocker {
                dataset_name: s.dataset_name.clone().unwrap_or_default(),
            }));
        }
        if let Some(s) = &spec.fc {
            found.push(Self::Fc(Fc {
                target_wwns: s.target_wwns.clone().unwrap_or_default(),
                lun: s.lun.unwrap_or_default(),
                fs_type: s.fs_type.clone(),
                read_only: s.read_only.unwrap_or(false),
            }));
        }

        match found.len() {
            0 => Err(VolumeConversionError::MissingSource),
            1 => Ok(found.remove(0)),
            _ => Err(VolumeConversionError::MultipleSources(
                found.iter().map(|s| s.kind()).collect(),
            )),
        }
    }
}

fn read_only(flag: bool) -> Option<bool> {
    flag.then_some(true)
}

fn secret_ref(name: &Option<String>) -> Option<SecretReference> {
    name.as_ref().map(|name| SecretReference {
        name: Some(name.clone()),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfs_source_applies_to_spec() {
        let source = VolumeSource::Nfs(Nfs {
            server: "10.0.0.2".to_string(),
            path: "/exports".to_string(),
            read_only: true,
        });

        let mut spec = PersistentVolumeSpec::default();
        source.apply_to(&mut spec);

        let nfs = spec.nfs.as_ref().unwrap();
        assert_eq!(nfs.server, "10.0.0.2");
        assert_eq!(nfs.read_only, Some(true));
        assert!(spec.host_path.is_none());
        assert_eq!(VolumeSource::from_spec(&spec).unwrap(), source);
    }

    #[test]
    fn test_read_only_false_is_omitted() {
        let mut spec = PersistentVolumeSpec::default();
        VolumeSource::GcePersistentDisk(GcePersistentDisk {
            pd_name: "disk-1".to_string(),
            fs_type: Some("ext4".to_string()),
            partition: None,
            read_only: false,
        })
        .apply_to(&mut spec);

        assert_eq!(spec.gce_persistent_disk.unwrap().read_only, None);
    }

    #[test]
    fn test_rbd_secret_ref_by_name() {
        let source = VolumeSource::Rbd(Rbd {
            monitors: vec!["10.0.0.1:6789".to_string()],
            image: "foo".to_string(),
            fs_type: None,
            pool: Some("kube".to_string()),
            user: Some("admin".to_string()),
            keyring: None,
            secret_ref: Some("ceph-secret".to_string()),
            read_only: false,
        });

        let mut spec = PersistentVolumeSpec::default();
        source.apply_to(&mut spec);

        let rbd = spec.rbd.as_ref().unwrap();
        assert_eq!(
            rbd.secret_ref.as_ref().and_then(|r| r.name.as_deref()),
            Some("ceph-secret")
        );
        assert_eq!(VolumeSource::from_spec(&spec).unwrap(), source);
    }

    #[test]
    fn test_spec_without_source() {
        let err = VolumeSource::from_spec(&PersistentVolumeSpec::default()).unwrap_err();
        assert!(matches!(err, VolumeConversionError::MissingSource));
    }

    #[test]
    fn test_spec_with_two_sources() {
        let mut spec = PersistentVolumeSpec::default();
        VolumeSource::HostPath(HostPath {
            path: "/data".to_string(),
        })
        .apply_to(&mut spec);
        VolumeSource::Flocker(Flocker {
            dataset_name: "ds".to_string(),
        })
        .apply_to(&mut spec);

        match VolumeSource::from_spec(&spec) {
            Err(VolumeConversionError::MultipleSources(kinds)) => {
                assert_eq!(kinds, vec!["host_path", "flocker"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
