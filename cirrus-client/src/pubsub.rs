//! Pub/Sub topic endpoints

use cirrus_core::domain::pubsub::Topic;
use reqwest::Url;

use crate::error::Result;
use crate::{GoogleClient, endpoint_url, handle_empty_response, handle_response, require};

impl GoogleClient {
    // =============================================================================
    // Topics
    // =============================================================================

    /// Each `/`-separated part of the fully qualified name is escaped on its own
    fn topic_url(&self, name: &str) -> Result<Url> {
        let segments: Vec<&str> = name.split('/').collect();
        endpoint_url(&self.endpoints.pubsub, &segments)
    }

    /// Create a topic
    ///
    /// # Arguments
    /// * `name` - Fully qualified topic name (`projects/{project}/topics/{topic}`)
    pub async fn create_topic(&self, name: &str) -> Result<Topic> {
        require(name, "topic name")?;

        let url = self.topic_url(name)?;
        let body = Topic {
            name: name.to_string(),
        };
        let response = self.authorize(self.client.put(url)).json(&body).send().await?;

        handle_response(response).await
    }

    /// Get a topic by its fully qualified name
    pub async fn get_topic(&self, name: &str) -> Result<Topic> {
        require(name, "topic name")?;

        let url = self.topic_url(name)?;
        let response = self.authorize(self.client.get(url)).send().await?;

        handle_response(response).await
    }

    /// Delete a topic by its fully qualified name
    pub async fn delete_topic(&self, name: &str) -> Result<()> {
        require(name, "topic name")?;

        let url = self.topic_url(name)?;
        let response = self.authorize(self.client.delete(url)).send().await?;

        handle_empty_response(response).await
    }
}
