//! Operation command handlers
//!
//! Looks up compute operations and waits for them to finish.

use anyhow::{Context, Result, bail};
use cirrus_client::GoogleClient;
use cirrus_core::domain::operation::{Operation, OperationRef, OperationStatus};
use cirrus_waiter::{DEFAULT_OPERATION_TIMEOUT, PollConfig, WaitError, wait_for_operation};
use clap::{Args, Subcommand, ValueEnum};
use colored::*;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;

/// Namespace an operation lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    Global,
    Region,
    Zone,
}

/// Arguments identifying an operation
#[derive(Debug, Args)]
pub struct OperationTarget {
    /// Operation name
    name: String,

    /// Scope of the operation
    #[arg(long, value_enum, default_value_t = ScopeArg::Global)]
    scope: ScopeArg,

    /// Region or zone, required for regional and zonal operations
    #[arg(long)]
    location: Option<String>,
}

/// Operation subcommands
#[derive(Subcommand)]
pub enum OperationCommands {
    /// Show the current state of an operation
    Get {
        #[command(flatten)]
        target: OperationTarget,
    },
    /// Wait until an operation is done
    Wait {
        #[command(flatten)]
        target: OperationTarget,

        /// Give up after this many seconds
        #[arg(long, default_value_t = DEFAULT_OPERATION_TIMEOUT.as_secs())]
        timeout: u64,

        /// Check every N seconds instead of backing off
        #[arg(long)]
        interval: Option<u64>,

        /// What is being waited for, used in error messages
        #[arg(long, default_value = "operation to complete")]
        activity: String,
    },
}

/// Handle operation commands
///
/// # Arguments
/// * `command` - The operation command to execute
/// * `config` - The CLI configuration
pub async fn handle_operation_command(command: OperationCommands, config: &Config) -> Result<()> {
    let client = config.google_client();
    let project = config.project()?;

    match command {
        OperationCommands::Get { target } => {
            let op_ref = operation_ref(project, target)?;
            get_operation(&client, &op_ref).await
        }
        OperationCommands::Wait {
            target,
            timeout,
            interval,
            activity,
        } => {
            let op_ref = operation_ref(project, target)?;
            let poll = poll_config(timeout, interval)?;

            wait_operation(&client, &op_ref, &activity, poll).await
        }
    }
}

/// Compute policy for `--timeout`, with the initial delay shortened to fit it
fn poll_config(timeout: u64, interval: Option<u64>) -> Result<PollConfig> {
    if timeout == 0 {
        bail!("--timeout must be at least 1 second");
    }

    let mut poll = PollConfig::compute(Duration::from_secs(timeout))
        .capped_delay()
        .from_env()?;
    if let Some(secs) = interval {
        poll = poll.with_interval(Duration::from_secs(secs));
    }
    poll.validate().context("Invalid poll configuration")?;

    Ok(poll)
}

fn operation_ref(project: &str, target: OperationTarget) -> Result<OperationRef> {
    let location = match (target.scope, target.location) {
        (ScopeArg::Global, _) => None,
        (_, Some(location)) if !location.trim().is_empty() => Some(location),
        (scope, _) => bail!("--location is required for {:?} operations", scope),
    };

    Ok(match (target.scope, location) {
        (ScopeArg::Region, Some(region)) => OperationRef::region(project, region, target.name),
        (ScopeArg::Zone, Some(zone)) => OperationRef::zone(project, zone, target.name),
        _ => OperationRef::global(project, target.name),
    })
}

/// Fetch and display a single operation
async fn get_operation(client: &GoogleClient, op_ref: &OperationRef) -> Result<()> {
    let op = client
        .get_operation(op_ref)
        .await
        .with_context(|| format!("Failed to get operation {}", op_ref))?;

    print_operation(&op);
    Ok(())
}

/// Wait for an operation, stopping early on Ctrl-C
async fn wait_operation(
    client: &GoogleClient,
    op_ref: &OperationRef,
    activity: &str,
    poll: PollConfig,
) -> Result<()> {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    debug!("Polling {} with {:?}", op_ref, poll);
    println!(
        "{} {}",
        "Waiting for".dimmed(),
        op_ref.to_string().bold()
    );

    match wait_for_operation(client, op_ref, activity, poll, Some(token)).await {
        Ok(op) => {
            println!("{}", "✓ Operation completed".green().bold());
            println!();
            print_operation(&op);
            Ok(())
        }
        Err(WaitError::OperationFailed(failure)) => {
            println!("{}", format!("✗ Operation {} failed:", failure.operation).red().bold());
            for entry in &failure.errors {
                println!("  {} {}", entry.code.yellow(), entry.message);
            }
            bail!("{} failed: {}", activity, failure.message().trim_end())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print operation details
fn print_operation(op: &Operation) {
    println!("{}", format!("Operation {}", op.name).bold());
    println!("  Status:       {}", colorize_status(&op.status));
    println!("  Scope:        {}", op.scope());
    if let Some(kind) = &op.operation_type {
        println!("  Type:         {}", kind);
    }
    if let Some(target) = &op.target_link {
        println!("  Target:       {}", target.dimmed());
    }
    if let Some(progress) = op.progress {
        println!("  Progress:     {}%", progress);
    }
    if let Some(message) = &op.status_message {
        println!("  Message:      {}", message);
    }
    for (label, time) in [
        ("Inserted", op.insert_time),
        ("Started", op.start_time),
        ("Ended", op.end_time),
    ] {
        if let Some(time) = time {
            println!(
                "  {:<13} {}",
                format!("{}:", label),
                time.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
            );
        }
    }
    for entry in op.error_entries() {
        println!("  {} {}: {}", "Error".red(), entry.code, entry.message);
    }
}

/// Colorize an operation status for display
fn colorize_status(status: &str) -> ColoredString {
    match OperationStatus::parse(status) {
        Some(OperationStatus::Done) => status.green(),
        Some(OperationStatus::Running) => status.cyan(),
        Some(OperationStatus::Pending) => status.yellow(),
        None => status.red(),
    }
}
