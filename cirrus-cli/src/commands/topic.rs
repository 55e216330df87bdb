//! Topic command handlers

use anyhow::Result;
use cirrus_core::dto::topic::{TopicConfig, TopicState};
use cirrus_provider::TopicResource;
use clap::Subcommand;
use colored::*;
use std::sync::Arc;

use crate::config::Config;

/// Topic subcommands
#[derive(Subcommand)]
pub enum TopicCommands {
    /// Create a topic
    Create {
        /// Short topic name
        name: String,
    },
    /// Show a topic
    Get {
        /// Short topic name
        name: String,
    },
    /// Delete a topic
    Delete {
        /// Short topic name
        name: String,
    },
}

/// Handle topic commands
///
/// # Arguments
/// * `command` - The topic command to execute
/// * `config` - The CLI configuration
pub async fn handle_topic_command(command: TopicCommands, config: &Config) -> Result<()> {
    let resource = TopicResource::new(Arc::new(config.google_client()), config.project()?);

    match command {
        TopicCommands::Create { name } => {
            let state = resource.create(&TopicConfig { name }).await?;
            println!("{} {}", "✓ Topic created:".green().bold(), state.id);
        }
        TopicCommands::Get { name } => {
            let state = resource.read(&TopicConfig { name }).await?;
            println!("{}", state.id.bold());
        }
        TopicCommands::Delete { name } => {
            let config = TopicConfig { name };
            let full_name = resource.full_name(&config);
            let mut state = TopicState {
                id: full_name.clone(),
                name: full_name,
            };
            resource.delete(&config, &mut state).await?;
            println!("{} {}", "✓ Topic deleted:".green().bold(), state.name);
        }
    }

    Ok(())
}
