//! Cirrus Resource Handlers
//!
//! Create/read/update/delete handlers that turn declared configuration into
//! API calls:
//!
//! - [`LogSinkResource`]: logging sinks
//! - [`TopicResource`]: Pub/Sub topics
//! - [`PersistentVolumeResource`]: Kubernetes persistent volumes
//!
//! Handlers receive their API explicitly, as a trait object from [`api`].
//! [`cirrus_client::GoogleClient`] and [`cirrus_client::KubeClient`] implement
//! those traits.

pub mod api;
pub mod error;
pub mod logging_sink;
pub mod persistent_volume;
pub mod pubsub_topic;

pub use api::{SinkApi, TopicApi, VolumeApi};
pub use error::{Action, ResourceError, Result};
pub use logging_sink::LogSinkResource;
pub use persistent_volume::PersistentVolumeResource;
pub use pubsub_topic::TopicResource;
