//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppPaths};
use crate::commands;

/// Keeps the pods on this device in line with the desired state
#[derive(Parser)]
#[command(
    name = "edge-agent",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Directory holding the persisted device configuration
    #[arg(
        long,
        global = true,
        env = "EDGE_AGENT_DATA_DIR",
        default_value = "/var/lib/edge-agent"
    )]
    pub data_dir: PathBuf,

    /// Directory holding agent settings and workload manifests
    #[arg(
        long,
        global = true,
        env = "EDGE_AGENT_CONFIG_DIR",
        default_value = "/etc/edge-agent"
    )]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the reconciliation loop until interrupted
    Run(commands::run::RunArgs),

    /// Apply a desired-state document once
    Apply(commands::apply::ApplyArgs),

    /// Print the current desired-state document
    Show,

    /// Print the workloads known to the container runtime
    Status,

    /// Delete the persisted device configuration
    Deregister,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be built or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            data_dir,
            config_dir,
            command,
        } = self;
        let ctx = AppContext::new(&AppPaths {
            data_dir,
            config_dir,
        })
        .await?;
        match command {
            Command::Run(args) => commands::run::run(&ctx, &args).await,
            Command::Apply(args) => commands::apply::run(&ctx, &args).await,
            Command::Show => commands::inspect::show(&ctx),
            Command::Status => commands::inspect::status(&ctx).await,
            Command::Deregister => ctx.config.deregister().await,
        }
    }
}
