//! Kubernetes persistent volume domain types
//!
//! The wire object itself comes from `k8s-openapi`; this module adds the
//! closed value sets the API only documents as strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeSpec, PersistentVolumeStatus};

/// What happens to a released volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReclaimPolicy {
    Retain,
    Recycle,
    Delete,
}

impl ReclaimPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retain => "Retain",
            Self::Recycle => "Recycle",
            Self::Delete => "Delete",
        }
    }
}

impl FromStr for ReclaimPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Retain" => Ok(Self::Retain),
            "Recycle" => Ok(Self::Recycle),
            "Delete" => Ok(Self::Delete),
            other => Err(format!("unknown reclaim policy '{}'", other)),
        }
    }
}

impl fmt::Display for ReclaimPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a volume can be mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
    ReadWriteOncePod,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadWriteOnce => "ReadWriteOnce",
            Self::ReadOnlyMany => "ReadOnlyMany",
            Self::ReadWriteMany => "ReadWriteMany",
            Self::ReadWriteOncePod => "ReadWriteOncePod",
        }
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ReadWriteOnce" => Ok(Self::ReadWriteOnce),
            "ReadOnlyMany" => Ok(Self::ReadOnlyMany),
            "ReadWriteMany" => Ok(Self::ReadWriteMany),
            "ReadWriteOncePod" => Ok(Self::ReadWriteOncePod),
            other => Err(format!("unknown access mode '{}'", other)),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
