//! Job command handlers
//!
//! Handles triggering job runs, waiting for them and showing their state.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use dbx_client::{PollOptions, WorkspaceClient};
use dbx_core::domain::run::{Run, RunLifeCycleState, RunResultState};

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Trigger a job run and wait for it to finish
    Run {
        /// Job ID
        #[arg(
            required_unless_present = "job_id_flag",
            conflicts_with = "job_id_flag"
        )]
        job_id: Option<i64>,

        /// Job ID, given as a flag
        #[arg(long = "job-id", alias = "job_id", value_name = "JOB_ID")]
        job_id_flag: Option<i64>,

        /// Notebook parameters as key=value pairs (e.g., train_type=CT_pipeline)
        #[arg(short, long, value_parser = parse_key_val)]
        param: Vec<(String, String)>,

        /// Return right after the run is triggered
        #[arg(long)]
        no_wait: bool,

        /// Seconds between two status checks
        #[arg(long, default_value = "5", value_parser = parse_seconds)]
        poll_interval: Duration,

        /// Give up waiting after this many seconds
        #[arg(long, value_parser = parse_seconds)]
        timeout: Option<Duration>,
    },
    /// Show the state of a run
    Status {
        /// Run ID
        run_id: i64,

        /// Print the run as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse a single key=value pair
fn parse_key_val(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid KEY=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Parse a positive number of seconds
fn parse_seconds(s: &str) -> Result<Duration> {
    let secs: u64 = s
        .parse()
        .with_context(|| format!("invalid number of seconds: `{}`", s))?;
    if secs == 0 {
        bail!("must be greater than 0");
    }
    Ok(Duration::from_secs(secs))
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        JobCommands::Run {
            job_id,
            job_id_flag,
            param,
            no_wait,
            poll_interval,
            timeout,
        } => {
            let job_id = job_id
                .or(job_id_flag)
                .context("a job ID is required")?;
            let options = PollOptions {
                interval: poll_interval,
                timeout,
            };
            run_job(&client, job_id, param.into_iter().collect(), no_wait, &options).await
        }
        JobCommands::Status { run_id, json } => show_run(&client, run_id, json).await,
    }
}

/// Trigger a run and optionally wait for its outcome
async fn run_job(
    client: &WorkspaceClient,
    job_id: i64,
    params: HashMap<String, String>,
    no_wait: bool,
    options: &PollOptions,
) -> Result<()> {
    let started = client
        .run_now(job_id, params)
        .await
        .with_context(|| format!("Error initiating job {}", job_id))?;

    println!(
        "{} Started run {} of job {}",
        "▸".cyan(),
        started.run_id.to_string().bold(),
        job_id
    );

    if no_wait {
        return Ok(());
    }

    let run = client
        .wait_for_run(started.run_id, options)
        .await
        .with_context(|| format!("Error getting status of run {}", started.run_id))?;

    print_run_details(&run);

    if !run.succeeded() {
        bail!(
            "Run {} finished as {} ({})",
            run.run_id,
            run.state.life_cycle_state,
            run.state
                .result_state
                .as_ref()
                .map(|r| r.as_str())
                .unwrap_or("no result")
        );
    }

    Ok(())
}

/// Fetch and display a run
async fn show_run(client: &WorkspaceClient, run_id: i64, json: bool) -> Result<()> {
    let run = client
        .get_run(run_id)
        .await
        .with_context(|| format!("Error getting status of run {}", run_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        print_run_details(&run);
    }

    Ok(())
}

/// Print detailed run information
fn print_run_details(run: &Run) {
    println!("{}", "Run Details:".bold());
    println!("  ID:        {}", run.run_id.to_string().cyan());
    if let Some(job_id) = run.job_id {
        println!("  Job ID:    {}", job_id.to_string().dimmed());
    }
    println!(
        "  State:     {}",
        colorize_life_cycle(&run.state.life_cycle_state)
    );
    if let Some(result) = &run.state.result_state {
        println!("  Result:    {}", colorize_result(result));
    }

    if let Some(started) = run.started_at() {
        println!("  Started:   {}", started.format("%Y-%m-%d %H:%M:%S"));

        if let Some(ended) = run.ended_at() {
            println!("  Ended:     {}", ended.format("%Y-%m-%d %H:%M:%S"));
            let duration = ended.signed_duration_since(started);
            println!("  Duration:  {}s", duration.num_seconds());
        }
    }

    if let Some(url) = &run.run_page_url {
        println!("  URL:       {}", url.dimmed());
    }

    if !run.state.state_message.is_empty() {
        println!("\n{}", "Message:".bold());
        println!("{}", run.state.state_message);
    }
}

/// Colorize a life-cycle state for display
fn colorize_life_cycle(state: &RunLifeCycleState) -> ColoredString {
    let text = state.as_str();
    match state {
        RunLifeCycleState::Pending | RunLifeCycleState::Queued | RunLifeCycleState::Blocked => {
            text.yellow()
        }
        RunLifeCycleState::Running
        | RunLifeCycleState::Terminating
        | RunLifeCycleState::WaitingForRetry => text.cyan(),
        RunLifeCycleState::Terminated => text.green(),
        RunLifeCycleState::Skipped => text.dimmed(),
        RunLifeCycleState::InternalError => text.red(),
        RunLifeCycleState::Unknown(_) => text.normal(),
    }
}

/// Colorize a result state for display
fn colorize_result(result: &RunResultState) -> ColoredString {
    let text = result.as_str();
    match result {
        RunResultState::Success => text.green(),
        RunResultState::Canceled | RunResultState::Excluded => text.dimmed(),
        RunResultState::SuccessWithFailures => text.yellow(),
        RunResultState::Unknown(_) => text.normal(),
        _ => text.red(),
    }
}
