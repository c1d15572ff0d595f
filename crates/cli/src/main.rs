//! pylint-checks CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse inputs**: read the action inputs (`INPUT_*` variables or flags)
//!    and validate them into a [`publisher::RunConfig`].
//! 2. **Wire observability**: configure `tracing-subscriber` (text or JSON on
//!    stderr) and, when requested, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: create the [`github::GithubClient`] and
//!    resolve the [`publisher::RunContext`] from the event payload.
//! 4. **Run and report**: call [`publisher::publish`], then write the
//!    `result` step output and exit non-zero on a fatal error.

mod config;
mod telemetry;
mod workflow;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use github::GithubClient;
use publisher::{publish, PublishError, PublishReport, PublishResult, RunContext, Timestamp};
use tracing::{error, warn};

use crate::config::Cli;
use crate::workflow::Workflow;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            e.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return reject_arguments(&e),
    };
    let telemetry = telemetry::init(cli.log_format);

    let report = execute(&cli).await;

    let mut workflow = Workflow::new(std::io::stdout(), cli.output_file.clone());
    workflow.report(&report.result)?;
    telemetry.shutdown();

    Ok(if report.result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Reports an argument clap could not parse as a failed run, so the `result`
/// output is still set.
fn reject_arguments(err: &clap::Error) -> anyhow::Result<ExitCode> {
    eprint!("{}", err.render());
    let rendered = err.to_string();
    let reason = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");

    let output_file = std::env::var_os("GITHUB_OUTPUT")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let mut workflow = Workflow::new(std::io::stdout(), output_file);
    workflow.report(&PublishResult::Failure(reason.to_string()))?;
    Ok(ExitCode::FAILURE)
}

async fn execute(cli: &Cli) -> PublishReport {
    let config = match cli.run_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid inputs");
            return PublishReport::failed(&e);
        }
    };

    let client = match GithubClient::new(cli.api_url.as_str(), config.repo_token.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            let e = PublishError::configuration(e.to_string());
            error!(error = %e, "Could not create the GitHub client");
            return PublishReport::failed(&e);
        }
    };

    let context = resolve_context(cli.event_path.as_deref());
    publish(&client, &config, &context, Timestamp::now()).await
}

/// Reads the event payload, if any. A missing or unreadable payload only
/// disables the fallback comment.
fn resolve_context(event_path: Option<&Path>) -> RunContext {
    let Some(path) = event_path else {
        return RunContext::default();
    };
    match std::fs::read_to_string(path) {
        Ok(payload) => RunContext::from_event_payload(&payload),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read the event payload");
            RunContext::default()
        }
    }
}
