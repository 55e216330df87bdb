//! API seams
//!
//! Each resource talks to its backend through a narrow trait so handlers can
//! be exercised against in-memory fakes. The real implementations forward to
//! the HTTP clients.

use async_trait::async_trait;
use cirrus_client::{GoogleClient, KubeClient, Result};
use cirrus_core::domain::logging::LogSink;
use cirrus_core::domain::pubsub::Topic;
use cirrus_core::domain::volume::PersistentVolume;

/// Logging sink endpoints
#[async_trait]
pub trait SinkApi: Send + Sync {
    async fn create_sink(&self, project: &str, log_name: &str, sink: &LogSink) -> Result<LogSink>;

    async fn get_sink(&self, project: &str, log_name: &str, sink_name: &str) -> Result<LogSink>;

    /// Updates the sink currently named `sink_name` with `sink`, which may carry a new name
    async fn update_sink(
        &self,
        project: &str,
        log_name: &str,
        sink_name: &str,
        sink: &LogSink,
    ) -> Result<LogSink>;

    async fn delete_sink(&self, project: &str, log_name: &str, sink_name: &str) -> Result<()>;
}

/// Pub/Sub topic endpoints, addressed by fully qualified name
#[async_trait]
pub trait TopicApi: Send + Sync {
    async fn create_topic(&self, name: &str) -> Result<Topic>;

    async fn get_topic(&self, name: &str) -> Result<Topic>;

    async fn delete_topic(&self, name: &str) -> Result<()>;
}

/// Persistent volume endpoints
#[async_trait]
pub trait VolumeApi: Send + Sync {
    async fn create_volume(&self, pv: &PersistentVolume) -> Result<PersistentVolume>;

    async fn get_volume(&self, name: &str) -> Result<PersistentVolume>;

    async fn replace_volume(&self, name: &str, pv: &PersistentVolume) -> Result<PersistentVolume>;

    async fn delete_volume(&self, name: &str) -> Result<()>;
}

#[async_trait]
impl SinkApi for GoogleClient {
    async fn create_sink(&self, project: &str, log_name: &str, sink: &LogSink) -> Result<LogSink> {
        GoogleClient::create_sink(self, project, log_name, sink).await
    }

    async fn get_sink(&self, project: &str, log_name: &str, sink_name: &str) -> Result<LogSink> {
        GoogleClient::get_sink(self, project, log_name, sink_name).await
    }

    async fn update_sink(
        &self,
        project: &str,
        log_name: &str,
        sink_name: &str,
        sink: &LogSink,
    ) -> Result<LogSink> {
        GoogleClient::update_sink(self, project, log_name, sink_name, sink).await
    }

    async fn delete_sink(&self, project: &str, log_name: &str, sink_name: &str) -> Result<()> {
        GoogleClient::delete_sink(self, project, log_name, sink_name).await
    }
}

#[async_trait]
impl TopicApi for GoogleClient {
    async fn create_topic(&self, name: &str) -> Result<Topic> {
        GoogleClient::create_topic(self, name).await
    }

    async fn get_topic(&self, name: &str) -> Result<Topic> {
        GoogleClient::get_topic(self, name).await
    }

    async fn delete_topic(&self, name: &str) -> Result<()> {
        GoogleClient::delete_topic(self, name).await
    }
}

#[async_trait]
impl VolumeApi for KubeClient {
    async fn create_volume(&self, pv: &PersistentVolume) -> Result<PersistentVolume> {
        self.create_persistent_volume(pv).await
    }

    async fn get_volume(&self, name: &str) -> Result<PersistentVolume> {
        self.get_persistent_volume(name).await
    }

    async fn replace_volume(&self, name: &str, pv: &PersistentVolume) -> Result<PersistentVolume> {
        self.replace_persistent_volume(name, pv).await
    }

    async fn delete_volume(&self, name: &str) -> Result<()> {
        self.delete_persistent_volume(name).await
    }
}
