//! Volume command handlers
//!
//! Manages Kubernetes persistent volumes from JSON definitions.

use anyhow::{Context, Result};
use cirrus_core::dto::volume::{VolumeConfig, VolumeState};
use cirrus_provider::PersistentVolumeResource;
use clap::Subcommand;
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;

/// Volume subcommands
#[derive(Subcommand)]
pub enum VolumeCommands {
    /// Create a volume from a JSON definition
    Create {
        /// Path to the volume definition
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Replace a volume with a JSON definition
    Update {
        /// Path to the volume definition
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show a volume
    Get {
        /// Volume name
        name: String,
    },
    /// Delete a volume
    Delete {
        /// Volume name
        name: String,
    },
}

/// Handle volume commands
///
/// # Arguments
/// * `command` - The volume command to execute
/// * `config` - The CLI configuration
pub async fn handle_volume_command(command: VolumeCommands, config: &Config) -> Result<()> {
    let resource = PersistentVolumeResource::new(Arc::new(config.kube_client().await?));

    match command {
        VolumeCommands::Create { file } => {
            let volume = load_volume(&file)?;
            let state = resource.create(&volume).await?;
            println!("{}", "✓ Persistent volume created".green().bold());
            print_volume(&state);
        }
        VolumeCommands::Update { file } => {
            let planned = load_volume(&file)?;
            let prior = resource
                .read(&planned.name)
                .await
                .context("Volume must exist before it can be updated")?;
            let state = resource.update(&prior.config, &planned).await?;
            println!("{}", "✓ Persistent volume updated".green().bold());
            print_volume(&state);
        }
        VolumeCommands::Get { name } => {
            let state = resource.read(&name).await?;
            print_volume(&state);
        }
        VolumeCommands::Delete { name } => {
            resource.delete(&name).await?;
            println!("{} {}", "✓ Persistent volume deleted:".green().bold(), name);
        }
    }

    Ok(())
}

/// Read a volume definition from disk
fn load_volume(path: &Path) -> Result<VolumeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read volume definition: {}", path.display()))?;

    parse_volume(&content)
        .with_context(|| format!("Failed to parse volume definition: {}", path.display()))
}

fn parse_volume(content: &str) -> Result<VolumeConfig> {
    Ok(serde_json::from_str(content)?)
}

/// Print volume details
fn print_volume(state: &VolumeState) {
    let volume = &state.config;

    println!("  Name:         {}", state.id.bold());
    println!(
        "  Phase:        {}",
        match state.phase.as_deref() {
            Some(phase @ ("Bound" | "Available")) => phase.green(),
            Some(phase) => phase.yellow(),
            None => "unknown".dimmed(),
        }
    );
    println!("  Source:       {}", volume.source.kind());
    println!("  Reclaim:      {}", volume.reclaim_policy);
    for (resource, quantity) in &volume.capacity {
        println!("  Capacity:     {} = {}", resource, quantity);
    }
    if !volume.access_modes.is_empty() {
        let modes: Vec<&str> = volume.access_modes.iter().map(|m| m.as_str()).collect();
        println!("  Access:       {}", modes.join(", "));
    }
    if let Some(claim) = &volume.claim_ref {
        println!("  Claim:        {}/{}", claim.namespace, claim.name);
    }
    for (key, value) in &volume.labels {
        println!("  Label:        {}={}", key.dimmed(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirrus_core::domain::volume::ReclaimPolicy;

    #[test]
    fn test_parse_volume_definition() {
        let volume = parse_volume(
            r#"{
                "name": "pv-host",
                "capacity": {"storage": "1Gi"},
                "source": {"host_path": {"path": "/mnt/data"}},
                "access_modes": ["ReadWriteOnce"],
                "reclaim_policy": "Delete"
            }"#,
        )
        .unwrap();

        assert_eq!(volume.name, "pv-host");
        assert_eq!(volume.source.kind(), "host_path");
        assert_eq!(volume.reclaim_policy, ReclaimPolicy::Delete);
    }

    #[test]
    fn test_parse_rejects_unknown_source() {
        let result = parse_volume(
            r#"{"name": "pv", "source": {"tmpfs": {}}, "reclaim_policy": "Retain"}"#,
        );
        assert!(result.is_err());
    }
}
