//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod operation;
mod sink;
mod topic;
mod volume;

pub use operation::OperationCommands;
pub use sink::SinkCommands;
pub use topic::TopicCommands;
pub use volume::VolumeCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compute operations
    Operation {
        #[command(subcommand)]
        command: OperationCommands,
    },
    /// Logging sinks
    Sink {
        #[command(subcommand)]
        command: SinkCommands,
    },
    /// Pub/Sub topics
    Topic {
        #[command(subcommand)]
        command: TopicCommands,
    },
    /// Kubernetes persistent volumes
    Volume {
        #[command(subcommand)]
        command: VolumeCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Operation { command } => {
            operation::handle_operation_command(command, config).await
        }
        Commands::Sink { command } => sink::handle_sink_command(command, config).await,
        Commands::Topic { command } => topic::handle_topic_command(command, config).await,
        Commands::Volume { command } => volume::handle_volume_command(command, config).await,
    }
}
