//! dbx CLI
//!
//! Command-line interface for deploying notebooks, running jobs and promoting
//! models on a hosted notebook workspace.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dbx")]
#[command(about = "Notebook workspace automation CLI", long_about = None)]
struct Cli {
    /// Workspace URL
    #[arg(
        long,
        global = true,
        env = "DATABRICKS_HOST",
        aliases = ["dbx-org-url", "dbx_org_url"]
    )]
    host: Option<String>,

    /// Personal access token
    #[arg(
        long,
        global = true,
        env = "DATABRICKS_TOKEN",
        aliases = ["dbx-token", "dbx_token"],
        hide_env_values = true
    )]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dbx=info,dbx_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_args(cli.host, cli.token)?;

    handle_command(cli.command, &config).await
}
