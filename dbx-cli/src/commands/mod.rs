//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod model;
mod workspace;

pub use job::JobCommands;
pub use model::ModelCommands;
pub use workspace::WorkspaceCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Workspace folders and notebooks
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
    /// Job runs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Model registry
    Model {
        #[command(subcommand)]
        command: ModelCommands,
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
        Commands::Workspace { command } => {
            workspace::handle_workspace_command(command, config).await
        }
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Model { command } => model::handle_model_command(command, config).await,
    }
}
