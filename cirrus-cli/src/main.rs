//! Cirrus CLI
//!
//! Command-line interface for waiting on cloud operations and managing
//! logging sinks, Pub/Sub topics and Kubernetes persistent volumes.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cirrus_client::{COMPUTE_URL, LOGGING_URL, PUBSUB_URL};
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cirrus")]
#[command(about = "Cloud operation waiter and resource CLI", long_about = None)]
struct Cli {
    /// Google Cloud project
    #[arg(long, global = true, env = "GOOGLE_PROJECT")]
    project: Option<String>,

    /// OAuth2 access token for the Google APIs
    #[arg(long, global = true, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Compute API base URL
    #[arg(long, global = true, env = "CIRRUS_COMPUTE_URL", default_value = COMPUTE_URL)]
    compute_url: String,

    /// Logging API base URL
    #[arg(long, global = true, env = "CIRRUS_LOGGING_URL", default_value = LOGGING_URL)]
    logging_url: String,

    /// Pub/Sub API base URL
    #[arg(long, global = true, env = "CIRRUS_PUBSUB_URL", default_value = PUBSUB_URL)]
    pubsub_url: String,

    /// Kubernetes API server URL, e.g. a `kubectl proxy` (defaults to kubeconfig)
    #[arg(long, global = true, env = "KUBE_API_URL")]
    kube_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cirrus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        project: cli.project,
        token: cli.token,
        compute_url: cli.compute_url,
        logging_url: cli.logging_url,
        pubsub_url: cli.pubsub_url,
        kube_url: cli.kube_url,
    };

    handle_command(cli.command, &config).await
}
