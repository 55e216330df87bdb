//! Sink command handlers
//!
//! Creates, inspects, updates and deletes logging sinks.

use anyhow::Result;
use cirrus_core::dto::sink::{SinkConfig, SinkState};
use cirrus_provider::LogSinkResource;
use clap::{Args, Subcommand};
use colored::*;
use std::sync::Arc;

use crate::config::Config;

/// Arguments addressing an existing sink
#[derive(Debug, Clone, Args)]
pub struct SinkTarget {
    /// Log the sink exports
    #[arg(long)]
    log_name: String,

    /// Sink name
    #[arg(long)]
    sink_name: String,
}

/// Full sink definition
#[derive(Debug, Clone, Args)]
pub struct SinkDefinition {
    #[command(flatten)]
    target: SinkTarget,

    /// Export destination, e.g. storage.googleapis.com/my-bucket
    #[arg(long)]
    destination: String,

    /// Advanced logs filter selecting the exported entries
    #[arg(long)]
    filter: Option<String>,
}

impl SinkDefinition {
    fn into_config(self) -> SinkConfig {
        SinkConfig {
            log_name: self.target.log_name,
            sink_name: self.target.sink_name,
            destination: self.destination,
            filter: self.filter,
        }
    }
}

impl SinkTarget {
    fn into_config(self) -> SinkConfig {
        SinkConfig {
            log_name: self.log_name,
            sink_name: self.sink_name,
            destination: String::new(),
            filter: None,
        }
    }
}

/// Sink subcommands
#[derive(Subcommand)]
pub enum SinkCommands {
    /// Create a sink
    Create {
        #[command(flatten)]
        sink: SinkDefinition,
    },
    /// Show a sink and its export errors
    Get {
        #[command(flatten)]
        target: SinkTarget,
    },
    /// Update a sink, optionally renaming it
    Update {
        #[command(flatten)]
        sink: SinkDefinition,

        /// Current name of the sink when renaming it to --sink-name
        #[arg(long)]
        previous_sink_name: Option<String>,
    },
    /// Delete a sink
    Delete {
        #[command(flatten)]
        target: SinkTarget,
    },
}

/// Handle sink commands
///
/// # Arguments
/// * `command` - The sink command to execute
/// * `config` - The CLI configuration
pub async fn handle_sink_command(command: SinkCommands, config: &Config) -> Result<()> {
    let resource = LogSinkResource::new(Arc::new(config.google_client()), config.project()?);

    match command {
        SinkCommands::Create { sink } => {
            let state = resource.create(sink.into_config()).await?;
            println!("{}", "✓ Sink created".green().bold());
            print_sink(&state);
        }
        SinkCommands::Get { target } => {
            let state = resource.read(target.into_config()).await?;
            print_sink(&state);
        }
        SinkCommands::Update {
            sink,
            previous_sink_name,
        } => {
            let planned = sink.into_config();
            let prior = SinkConfig {
                sink_name: previous_sink_name.unwrap_or_else(|| planned.sink_name.clone()),
                ..planned.clone()
            };
            let state = resource.update(&prior, planned).await?;
            println!("{}", "✓ Sink updated".green().bold());
            print_sink(&state);
        }
        SinkCommands::Delete { target } => {
            let config = target.into_config();
            resource.delete(&config).await?;
            println!("{} {}", "✓ Sink deleted:".green().bold(), config.id());
        }
    }

    Ok(())
}

/// Print sink details
fn print_sink(state: &SinkState) {
    println!("  ID:           {}", state.id.bold());
    println!("  Log:          {}", state.config.log_name);
    println!("  Sink:         {}", state.config.sink_name);
    if !state.config.destination.is_empty() {
        println!("  Destination:  {}", state.config.destination);
    }
    if let Some(filter) = &state.config.filter {
        println!("  Filter:       {}", filter.dimmed());
    }

    if state.errors.is_empty() {
        println!("  Errors:       {}", "none".green());
        return;
    }

    println!("  Errors:");
    for err in &state.errors {
        println!(
            "    {} {} ({}): {}",
            "▸".red(),
            err.resource,
            err.status_code,
            err.status_message
        );
    }
}
