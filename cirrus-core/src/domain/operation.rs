//! Compute operation domain types
//!
//! An operation is the compute API's handle on a long-running action
//! (disk creation, instance deletion, ...). Operations live in one of three
//! namespaces and must be looked up in the namespace they were created in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Long-running remote action as reported by the compute API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    /// Raw status code, kept as a string so unknown values survive decoding
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// Zone URL, present on zonal operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Region URL, present on regional operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Outcome, only meaningful once the operation is done
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationErrors>,
}

impl Operation {
    /// Parses the raw status code
    ///
    /// Returns `None` for codes outside the known set.
    pub fn parsed_status(&self) -> Option<OperationStatus> {
        OperationStatus::parse(&self.status)
    }

    /// Error entries reported by a finished operation, in the order the API returned them
    pub fn error_entries(&self) -> &[OperationErrorEntry] {
        self.error
            .as_ref()
            .map(|e| e.errors.as_slice())
            .unwrap_or_default()
    }

    /// Whether the operation finished with at least one error entry
    pub fn has_failed(&self) -> bool {
        !self.error_entries().is_empty()
    }

    /// Infers the scope from the zone/region links on the operation
    ///
    /// Falls back to [`OperationScope::Global`] when neither link is present.
    pub fn scope(&self) -> OperationScope {
        if let Some(zone) = self.zone.as_deref().and_then(last_segment) {
            return OperationScope::Zone(zone.to_string());
        }
        if let Some(region) = self.region.as_deref().and_then(last_segment) {
            return OperationScope::Region(region.to_string());
        }
        OperationScope::Global
    }
}

fn last_segment(link: &str) -> Option<&str> {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

/// Error payload of a finished operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationErrors {
    #[serde(default)]
    pub errors: Vec<OperationErrorEntry>,
}

/// A single error reported by a finished operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationErrorEntry {
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Known operation status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
}

impl OperationStatus {
    /// Codes the poller keeps waiting on
    pub const PENDING_SET: [OperationStatus; 2] = [OperationStatus::Pending, OperationStatus::Running];

    /// The single terminal code
    pub const TARGET: OperationStatus = OperationStatus::Done;

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "RUNNING" => Some(Self::Running),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
        }
    }

    pub fn is_pending(&self) -> bool {
        Self::PENDING_SET.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        *self == Self::TARGET
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Namespace an operation must be looked up in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum OperationScope {
    Global,
    Region(String),
    Zone(String),
}

impl OperationScope {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Region(_) => "region",
            Self::Zone(_) => "zone",
        }
    }

    /// Region or zone name; `None` for global operations
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Region(region) => Some(region),
            Self::Zone(zone) => Some(zone),
        }
    }
}

impl fmt::Display for OperationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(location) => write!(f, "{} {}", self.kind(), location),
            None => f.write_str(self.kind()),
        }
    }
}

/// Everything needed to look an operation up again
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationRef {
    pub project: String,
    pub name: String,
    pub scope: OperationScope,
}

impl OperationRef {
    pub fn new(project: impl Into<String>, name: impl Into<String>, scope: OperationScope) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            scope,
        }
    }

    pub fn global(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(project, name, OperationScope::Global)
    }

    pub fn region(
        project: impl Into<String>,
        region: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(project, name, OperationScope::Region(region.into()))
    }

    pub fn zone(
        project: impl Into<String>,
        zone: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(project, name, OperationScope::Zone(zone.into()))
    }
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, project {})", self.name, self.scope, self.project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(OperationStatus::parse("PENDING"), Some(OperationStatus::Pending));
        assert_eq!(OperationStatus::parse("RUNNING"), Some(OperationStatus::Running));
        assert_eq!(OperationStatus::parse("DONE"), Some(OperationStatus::Done));
        assert_eq!(OperationStatus::parse("done"), None);
        assert_eq!(OperationStatus::parse("ABORTING"), None);
    }

    #[test]
    fn test_status_sets() {
        assert!(OperationStatus::Pending.is_pending());
        assert!(OperationStatus::Running.is_pending());
        assert!(!OperationStatus::Done.is_pending());
        assert!(OperationStatus::Done.is_terminal());
    }

    #[test]
    fn test_deserialize_zone_operation() {
        let json = r#"{
            "kind": "compute#operation",
            "name": "operation-1234",
            "operationType": "insert",
            "status": "DONE",
            "progress": 100,
            "zone": "https://www.googleapis.com/compute/beta/projects/p/zones/us-central1-a",
            "insertTime": "2016-05-10T10:30:00.000-07:00",
            "error": {
                "errors": [
                    {"code": "QUOTA_EXCEEDED", "message": "quota exceeded"},
                    {"code": "RESOURCE_NOT_READY", "location": "disk", "message": "retry later"}
                ]
            }
        }"#;

        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op.name, "operation-1234");
        assert_eq!(op.parsed_status(), Some(OperationStatus::Done));
        assert_eq!(op.progress, Some(100));
        assert!(op.insert_time.is_some());
        assert!(op.has_failed());
        assert_eq!(op.error_entries()[1].location.as_deref(), Some("disk"));
        assert_eq!(op.scope(), OperationScope::Zone("us-central1-a".to_string()));
    }

    #[test]
    fn test_unknown_status_survives_decoding() {
        let op: Operation =
            serde_json::from_str(r#"{"name": "op", "status": "SUSPENDED"}"#).unwrap();
        assert_eq!(op.status, "SUSPENDED");
        assert_eq!(op.parsed_status(), None);
        assert!(!op.has_failed());
    }

    #[test]
    fn test_scope_inference() {
        let regional = Operation {
            region: Some("projects/p/regions/europe-west1".to_string()),
            ..Default::default()
        };
        assert_eq!(regional.scope(), OperationScope::Region("europe-west1".to_string()));
        assert_eq!(Operation::default().scope(), OperationScope::Global);
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(OperationScope::Global.to_string(), "global");
        assert_eq!(
            OperationScope::Zone("us-east1-b".to_string()).to_string(),
            "zone us-east1-b"
        );
        let op_ref = OperationRef::region("proj", "us-east1", "op-1");
        assert_eq!(op_ref.to_string(), "op-1 (region us-east1, project proj)");
    }
}
