//! Model command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use dbx_core::promotion::PromotionDecision;

use crate::config::Config;

/// Model subcommands
#[derive(Subcommand)]
pub enum ModelCommands {
    /// Promote the newest version to Production if its metric beats the current one
    Promote {
        /// Registered model name
        #[arg(default_value = "classifier")]
        name: String,

        /// Run metric to compare; higher is better
        #[arg(short, long, default_value = "acc")]
        metric: String,
    },
}

/// Handle model commands
///
/// # Arguments
/// * `command` - The model command to execute
/// * `config` - The CLI configuration
pub async fn handle_model_command(command: ModelCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        ModelCommands::Promote { name, metric } => {
            let decision = client
                .promote_model(&name, &metric)
                .await
                .with_context(|| format!("Promoting model {} failed", name))?;
            print_decision(&name, &metric, &decision);
            Ok(())
        }
    }
}

fn print_decision(name: &str, metric: &str, decision: &PromotionDecision) {
    match decision {
        PromotionDecision::PromoteFirst { version } => {
            println!(
                "{} No {} version was in production; version {} promoted",
                "✓".green(),
                name.bold(),
                version.version.cyan()
            );
        }
        PromotionDecision::Replace {
            archive,
            promote,
            production_metric,
            latest_metric,
        } => {
            println!(
                "{} {} version {} ({} {}) replaces version {} ({} {}), which is archived",
                "✓".green(),
                name.bold(),
                promote.version.cyan(),
                metric,
                latest_metric,
                archive.version.dimmed(),
                metric,
                production_metric
            );
        }
        PromotionDecision::Keep {
            production,
            production_metric: Some(production_metric),
            latest_metric: Some(latest_metric),
        } => {
            println!(
                "{} {} version {} stays in production ({} {} vs latest {})",
                "▸".cyan(),
                name.bold(),
                production.version.cyan(),
                metric,
                production_metric,
                latest_metric
            );
        }
        PromotionDecision::Keep { production, .. } => {
            println!(
                "{} {} version {} is already the newest and stays in production",
                "▸".cyan(),
                name.bold(),
                production.version.cyan()
            );
        }
    }
}
