//! Logging sink DTOs

use serde::{Deserialize, Serialize};

use crate::domain::logging::{LogError, LogSink};

/// Declared configuration of a logging sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Log the sink is attached to; changing it requires a new sink
    pub log_name: String,
    pub sink_name: String,
    pub destination: String,
    #[serde(default)]
    pub filter: Option<String>,
}

impl SinkConfig {
    /// Resource ID: `{log_name}-{sink_name}`
    pub fn id(&self) -> String {
        format!("{}-{}", self.log_name, self.sink_name)
    }

    /// Request body for create and update calls
    pub fn to_log_sink(&self) -> LogSink {
        LogSink {
            name: self.sink_name.clone(),
            destination: self.destination.clone(),
            filter: self.filter.clone().unwrap_or_default(),
            errors: Vec::new(),
        }
    }
}

/// Logging sink state after an API round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkState {
    pub id: String,
    pub config: SinkConfig,
    pub errors: Vec<SinkErrorState>,
}

impl SinkState {
    pub fn new(config: SinkConfig, sink: &LogSink) -> Self {
        Self {
            id: config.id(),
            errors: sink.errors.iter().map(SinkErrorState::from).collect(),
            config,
        }
    }
}

/// Flattened export error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkErrorState {
    pub resource: String,
    /// Absent when the service sent no readable time
    pub time_nanos: Option<i64>,
    pub status_code: i32,
    pub status_message: String,
    pub status_details: Vec<serde_json::Value>,
}

impl From<&LogError> for SinkErrorState {
    fn from(err: &LogError) -> Self {
        Self {
            resource: err.resource.clone(),
            time_nanos: err.time_nanos(),
            status_code: err.status.code,
            status_message: err.status.message.clone(),
            status_details: err.status.details.clone(),
        }
    }
}
