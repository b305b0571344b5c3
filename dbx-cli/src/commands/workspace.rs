//! Workspace command handlers
//!
//! Handles notebook deployment and the individual workspace object
//! operations it is built from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use dbx_client::{SyncPlan, WorkspaceClient};
use dbx_core::domain::workspace::NotebookLanguage;

use crate::config::Config;

/// Workspace subcommands
#[derive(Subcommand)]
pub enum WorkspaceCommands {
    /// Replace a workspace folder with the notebooks of a local directory
    Sync {
        /// Local directory holding notebook sources
        #[arg(short, long, visible_alias = "path-to-source", alias = "path_to_source")]
        source: PathBuf,

        /// Workspace folder to replace, e.g. /Development/notebooks
        #[arg(short, long, visible_alias = "path-to-target", alias = "path_to_target")]
        target: String,

        /// Print the plan without touching the workspace
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a directory (and missing parents)
    Mkdirs {
        /// Workspace path
        path: String,
    },
    /// Delete a notebook or directory
    Delete {
        /// Workspace path
        path: String,

        /// Fail instead of deleting a non-empty directory
        #[arg(long)]
        no_recursive: bool,
    },
    /// Import a single notebook source file
    Import {
        /// Local notebook file
        file: PathBuf,

        /// Workspace path of the notebook
        path: String,

        /// Notebook language; inferred from the file extension by default
        #[arg(short, long)]
        language: Option<NotebookLanguage>,
    },
}

/// Handle workspace commands
///
/// # Arguments
/// * `command` - The workspace command to execute
/// * `config` - The CLI configuration
pub async fn handle_workspace_command(command: WorkspaceCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        WorkspaceCommands::Sync {
            source,
            target,
            dry_run,
        } => sync(&client, &source, &target, dry_run).await,
        WorkspaceCommands::Mkdirs { path } => {
            client
                .make_directory(&path)
                .await
                .with_context(|| format!("Creating directory {} failed", path))?;
            println!("{} Created {}", "✓".green(), path.cyan());
            Ok(())
        }
        WorkspaceCommands::Delete { path, no_recursive } => {
            client
                .delete_object(&path, !no_recursive)
                .await
                .with_context(|| format!("Deleting {} failed", path))?;
            println!("{} Deleted {}", "✓".green(), path.cyan());
            Ok(())
        }
        WorkspaceCommands::Import {
            file,
            path,
            language,
        } => import(&client, &file, &path, language).await,
    }
}

/// Deploy a local notebook tree
async fn sync(client: &WorkspaceClient, source: &Path, target: &str, dry_run: bool) -> Result<()> {
    let plan = SyncPlan::scan(source, target)
        .with_context(|| format!("Failed to scan {}", source.display()))?;

    print_plan(&plan);

    if dry_run {
        println!("{}", "Dry run: workspace left untouched.".yellow());
        return Ok(());
    }

    let report = plan
        .execute(client)
        .await
        .with_context(|| format!("Deploying notebooks to {} failed", plan.target))?;

    println!(
        "{} Deployed {} notebook(s) in {} folder(s) to {}",
        "✓".green(),
        report.notebooks_imported,
        report.directories_created,
        plan.target.cyan()
    );
    if report.files_skipped > 0 {
        println!(
            "{}",
            format!("  {} non-notebook file(s) skipped", report.files_skipped).dimmed()
        );
    }

    Ok(())
}

/// Import one notebook file
async fn import(
    client: &WorkspaceClient,
    file: &Path,
    path: &str,
    language: Option<NotebookLanguage>,
) -> Result<()> {
    let language = match language {
        Some(language) => language,
        None => file
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(NotebookLanguage::from_extension)
            .with_context(|| {
                format!(
                    "Cannot infer notebook language of {}; pass --language",
                    file.display()
                )
            })?,
    };

    let source = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    client
        .import_source(path, &source, language)
        .await
        .with_context(|| format!("Importing {} to {} failed", file.display(), path))?;

    println!(
        "{} Imported {} as {} ({})",
        "✓".green(),
        file.display(),
        path.cyan(),
        language
    );
    Ok(())
}

/// Print what a deployment is about to do
fn print_plan(plan: &SyncPlan) {
    println!("{}", format!("Deployment plan for {}:", plan.target).bold());
    println!("  {} {} (recursive)", "delete".red(), plan.target);
    for dir in &plan.directories {
        println!("  {} {}", "mkdirs".cyan(), dir);
    }
    for notebook in &plan.notebooks {
        println!(
            "  {} {} {} {}",
            "import".green(),
            notebook.local_path.display().to_string().dimmed(),
            "→".dimmed(),
            notebook.workspace_path
        );
    }
    println!();
}
