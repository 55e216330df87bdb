//! Pub/Sub topic DTOs

use serde::{Deserialize, Serialize};

use crate::domain::pubsub::Topic;

/// Declared configuration of a topic; the name cannot change in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    pub name: String,
}

/// Topic state; `id` is the fully qualified topic name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicState {
    pub id: String,
    pub name: String,
}

impl From<&Topic> for TopicState {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.name.clone(),
            name: topic.name.clone(),
        }
    }
}
