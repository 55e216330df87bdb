//! Logging sink endpoints

use cirrus_core::domain::logging::LogSink;
use reqwest::Url;

use crate::error::Result;
use crate::{GoogleClient, endpoint_url, handle_empty_response, handle_response, require};

impl GoogleClient {
    // =============================================================================
    // Log Sinks
    // =============================================================================

    fn sinks_url(&self, project: &str, log_name: &str) -> Result<Url> {
        require(project, "project")?;
        require(log_name, "log name")?;

        endpoint_url(
            &self.endpoints.logging,
            &["projects", project, "logs", log_name, "sinks"],
        )
    }

    fn sink_url(&self, project: &str, log_name: &str, sink_name: &str) -> Result<Url> {
        require(project, "project")?;
        require(log_name, "log name")?;
        require(sink_name, "sink name")?;

        endpoint_url(
            &self.endpoints.logging,
            &["projects", project, "logs", log_name, "sinks", sink_name],
        )
    }

    /// Create a sink on a log
    ///
    /// # Arguments
    /// * `project` - Project owning the log
    /// * `log_name` - Log to export from
    /// * `sink` - Sink to create; its `name` becomes the sink ID
    ///
    /// # Returns
    /// The sink as stored by the service
    pub async fn create_sink(&self, project: &str, log_name: &str, sink: &LogSink) -> Result<LogSink> {
        let url = self.sinks_url(project, log_name)?;
        let response = self.authorize(self.client.post(url)).json(sink).send().await?;

        handle_response(response).await
    }

    /// Get a sink by name
    pub async fn get_sink(&self, project: &str, log_name: &str, sink_name: &str) -> Result<LogSink> {
        let url = self.sink_url(project, log_name, sink_name)?;
        let response = self.authorize(self.client.get(url)).send().await?;

        handle_response(response).await
    }

    /// Replace the sink currently called `sink_name`
    ///
    /// The body may carry a different name, which renames the sink.
    pub async fn update_sink(
        &self,
        project: &str,
        log_name: &str,
        sink_name: &str,
        sink: &LogSink,
    ) -> Result<LogSink> {
        let url = self.sink_url(project, log_name, sink_name)?;
        let response = self.authorize(self.client.put(url)).json(sink).send().await?;

        handle_response(response).await
    }

    /// Delete a sink
    pub async fn delete_sink(&self, project: &str, log_name: &str, sink_name: &str) -> Result<()> {
        let url = self.sink_url(project, log_name, sink_name)?;
        let response = self.authorize(self.client.delete(url)).send().await?;

        handle_empty_response(response).await
    }
}
