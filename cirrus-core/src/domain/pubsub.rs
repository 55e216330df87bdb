//! Pub/Sub topic domain types (Pub/Sub API v1)

use serde::{Deserialize, Serialize};

/// A Pub/Sub topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Fully qualified name: `projects/{project}/topics/{topic}`
    pub name: String,
}

/// Formats the fully qualified topic name
pub fn topic_path(project: &str, name: &str) -> String {
    format!("projects/{}/topics/{}", project, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_path() {
        assert_eq!(topic_path("my-project", "events"), "projects/my-project/topics/events");
    }
}
