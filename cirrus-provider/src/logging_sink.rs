//! Logging sink resource
//!
//! A sink exports the entries of one log to a destination (bucket, dataset
//! or topic). The sink is addressed by `(log_name, sink_name)`; its ID is
//! `{log_name}-{sink_name}`.

use cirrus_core::dto::sink::{SinkConfig, SinkState};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::SinkApi;
use crate::error::{Action, ResourceError, Result};

const KIND: &str = "sink";

/// Handler for logging sinks in one project
pub struct LogSinkResource {
    api: Arc<dyn SinkApi>,
    project: String,
}

impl LogSinkResource {
    /// Creates a new handler
    ///
    /// # Arguments
    /// * `api` - Logging sink endpoints
    /// * `project` - Project the sinks live in
    pub fn new(api: Arc<dyn SinkApi>, project: impl Into<String>) -> Self {
        Self {
            api,
            project: project.into(),
        }
    }

    /// Create the sink and record the errors reported back
    pub async fn create(&self, config: SinkConfig) -> Result<SinkState> {
        let sink = self
            .api
            .create_sink(&self.project, &config.log_name, &config.to_log_sink())
            .await
            .map_err(ResourceError::api(Action::Create, KIND, &config.sink_name))?;

        info!("Sink created: {} ({})", config.sink_name, config.id());
        Ok(SinkState::new(config, &sink))
    }

    /// Refresh the state of an existing sink
    pub async fn read(&self, config: SinkConfig) -> Result<SinkState> {
        let sink = self
            .api
            .get_sink(&self.project, &config.log_name, &config.sink_name)
            .await
            .map_err(ResourceError::api(Action::Get, KIND, &config.sink_name))?;

        debug!("Sink {} has {} export error(s)", config.id(), sink.errors.len());
        Ok(SinkState::new(config, &sink))
    }

    /// Update a sink in place
    ///
    /// The sink is addressed by its name in `prior`, so a rename is sent to
    /// the old name with the new name in the body.
    pub async fn update(&self, prior: &SinkConfig, planned: SinkConfig) -> Result<SinkState> {
        if let Some(field) = requires_replacement(prior, &planned) {
            return Err(ResourceError::RequiresReplacement {
                kind: KIND,
                name: prior.sink_name.clone(),
                field,
            });
        }

        let sink = self
            .api
            .update_sink(
                &self.project,
                &planned.log_name,
                &prior.sink_name,
                &planned.to_log_sink(),
            )
            .await
            .map_err(ResourceError::api(Action::Update, KIND, &planned.sink_name))?;

        info!("Sink updated: {} ({})", planned.sink_name, planned.id());
        Ok(SinkState::new(planned, &sink))
    }

    /// Delete the sink
    pub async fn delete(&self, config: &SinkConfig) -> Result<()> {
        self.api
            .delete_sink(&self.project, &config.log_name, &config.sink_name)
            .await
            .map_err(ResourceError::api(Action::Delete, KIND, &config.sink_name))?;

        info!("Sink deleted: {}", config.id());
        Ok(())
    }
}

/// Name of the first attribute whose change forces a new sink, if any
pub fn requires_replacement(prior: &SinkConfig, planned: &SinkConfig) -> Option<&'static str> {
    (prior.log_name != planned.log_name).then_some("log_name")
}
