//! Pub/Sub topic resource

use cirrus_core::domain::pubsub::topic_path;
use cirrus_core::dto::topic::{TopicConfig, TopicState};
use std::sync::Arc;
use tracing::info;

use crate::api::TopicApi;
use crate::error::{Action, ResourceError, Result};

const KIND: &str = "topic";

/// Handler for Pub/Sub topics in one project
pub struct TopicResource {
    api: Arc<dyn TopicApi>,
    project: String,
}

impl TopicResource {
    pub fn new(api: Arc<dyn TopicApi>, project: impl Into<String>) -> Self {
        Self {
            api,
            project: project.into(),
        }
    }

    /// Fully qualified name of a topic: `projects/{project}/topics/{name}`
    pub fn full_name(&self, config: &TopicConfig) -> String {
        topic_path(&self.project, &config.name)
    }

    /// Create the topic, then read it back
    pub async fn create(&self, config: &TopicConfig) -> Result<TopicState> {
        let name = self.full_name(config);
        self.api
            .create_topic(&name)
            .await
            .map_err(ResourceError::api(Action::Create, KIND, &name))?;

        info!("Topic created: {}", name);
        self.read(config).await
    }

    /// Read the topic; the state ID is the name returned by the API
    pub async fn read(&self, config: &TopicConfig) -> Result<TopicState> {
        let name = self.full_name(config);
        let topic = self
            .api
            .get_topic(&name)
            .await
            .map_err(ResourceError::api(Action::Get, KIND, &name))?;

        Ok(TopicState::from(&topic))
    }

    /// Delete the topic and clear the state ID
    pub async fn delete(&self, config: &TopicConfig, state: &mut TopicState) -> Result<()> {
        let name = self.full_name(config);
        self.api
            .delete_topic(&name)
            .await
            .map_err(ResourceError::api(Action::Delete, KIND, &name))?;

        state.id.clear();
        info!("Topic deleted: {}", name);
        Ok(())
    }
}

/// Topics cannot be updated; any name change forces a new topic
pub fn requires_replacement(prior: &TopicConfig, planned: &TopicConfig) -> Option<&'static str> {
    (prior.name != planned.name).then_some("name")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cirrus_client::ClientError;
    use cirrus_core::domain::pubsub::Topic;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTopics {
        topics: Mutex<BTreeSet<String>>,
    }

    #[async_trait]
    impl TopicApi for FakeTopics {
        async fn create_topic(&self, name: &str) -> cirrus_client::Result<Topic> {
            if !self.topics.lock().unwrap().insert(name.to_string()) {
                return Err(ClientError::api_error(409, "already exists"));
            }
            Ok(Topic {
                name: name.to_string(),
            })
        }

        async fn get_topic(&self, name: &str) -> cirrus_client::Result<Topic> {
            if self.topics.lock().unwrap().contains(name) {
                Ok(Topic {
                    name: name.to_string(),
                })
            } else {
                Err(ClientError::api_error(404, "not found"))
            }
        }

        async fn delete_topic(&self, name: &str) -> cirrus_client::Result<()> {
            if self.topics.lock().unwrap().remove(name) {
                Ok(())
            } else {
                Err(ClientError::api_error(404, "not found"))
            }
        }
    }

    fn events() -> TopicConfig {
        TopicConfig {
            name: "events".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_reads_back_full_name() {
        let resource = TopicResource::new(Arc::new(FakeTopics::default()), "proj");

        let state = resource.create(&events()).await.unwrap();

        assert_eq!(state.id, "projects/proj/topics/events");
        assert_eq!(state.name, "projects/proj/topics/events");
    }

    #[tokio::test]
    async fn test_create_conflict_names_topic() {
        let resource = TopicResource::new(Arc::new(FakeTopics::default()), "proj");
        resource.create(&events()).await.unwrap();

        let err = resource.create(&events()).await.unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Error creating topic projects/proj/topics/events: ")
        );
    }

    #[tokio::test]
    async fn test_delete_clears_id() {
        let resource = TopicResource::new(Arc::new(FakeTopics::default()), "proj");
        let mut state = resource.create(&events()).await.unwrap();

        resource.delete(&events(), &mut state).await.unwrap();

        assert!(state.id.is_empty());
        assert!(resource.read(&events()).await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_name_change_requires_replacement() {
        let renamed = TopicConfig {
            name: "audit".to_string(),
        };
        assert_eq!(requires_replacement(&events(), &renamed), Some("name"));
        assert_eq!(requires_replacement(&events(), &events()), None);
    }
}
