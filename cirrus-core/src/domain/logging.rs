//! Logging sink domain types (logging API v1beta3)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sink exporting entries of one log to a destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSink {
    pub name: String,
    /// Export target, e.g. `storage.googleapis.com/my-bucket`
    pub destination: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filter: String,
    /// Export failures recorded by the service; never sent on writes
    #[serde(default, skip_serializing)]
    pub errors: Vec<LogError>,
}

/// An export failure recorded against a sink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogError {
    #[serde(default)]
    pub resource: String,
    /// Nanoseconds since the epoch, encoded as a decimal string on the wire
    #[serde(default)]
    pub time_nanos: String,
    #[serde(default)]
    pub status: Status,
}

impl LogError {
    /// `None` when the wire value is missing or not a number
    pub fn time_nanos(&self) -> Option<i64> {
        self.time_nanos.parse().ok()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time_nanos().map(DateTime::<Utc>::from_timestamp_nanos)
    }
}

/// RPC status attached to a sink error
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}
