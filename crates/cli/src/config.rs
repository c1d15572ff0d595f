//! Action inputs.
//!
//! GitHub Actions hands inputs to the step as `INPUT_<NAME>` environment
//! variables; each one can also be given as a flag for local runs. Every input
//! is parsed as an optional string so that missing or malformed values are
//! reported through the run's own failure path instead of clap's usage error.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use github::DEFAULT_API_URL;
use publisher::{
    CommitSha, PublishError, Repository, RepositoryName, RepositoryOwner, RunConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "pylint-checks",
    about = "Publish a Pylint JSON report as a GitHub check run",
    version
)]
pub struct Cli {
    /// Path to the Pylint JSON report
    #[arg(long, env = "INPUT_LINT-FILE")]
    pub lint_file: Option<String>,

    /// Exit code Pylint returned (0 = success)
    #[arg(long, env = "INPUT_PYLINT-RESULT-CODE", allow_hyphen_values = true)]
    pub pylint_result_code: Option<String>,

    /// Commit SHA the check run is attached to
    #[arg(long, env = "INPUT_HEAD-SHA")]
    pub head_sha: Option<String>,

    /// Token used to call the GitHub API
    #[arg(long, env = "INPUT_REPO-TOKEN", hide_env_values = true)]
    pub repo_token: Option<String>,

    /// Repository owner (defaults to the owner in GITHUB_REPOSITORY)
    #[arg(long, env = "INPUT_REPO-OWNER")]
    pub repo_owner: Option<String>,

    /// Repository name (defaults to the name in GITHUB_REPOSITORY)
    #[arg(long, env = "INPUT_REPO-NAME")]
    pub repo_name: Option<String>,

    /// Repository running the workflow, as `owner/name`
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Webhook payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// File that step outputs are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Log line format
    #[arg(
        long,
        env = "PYLINT_CHECKS_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}

/// Trims an input and treats an empty value as absent.
fn input(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn missing(name: &str) -> PublishError {
    PublishError::configuration(format!("Input required and not supplied: {name}"))
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, PublishError> {
    input(value).ok_or_else(|| missing(name))
}

/// Parses an exit code the way a numeric coercion would: `+1`, `1.0` and
/// `1e0` are all `1`. Fractions, infinities and `NaN` are rejected.
fn parse_result_code(code: &str) -> Option<i32> {
    let value = code.parse::<f64>().ok()?;
    let integral = value.is_finite() && value.fract() == 0.0;
    let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
    (integral && in_range).then_some(value as i32)
}

impl Cli {
    /// Validates the inputs into a [`RunConfig`].
    pub fn run_config(&self) -> Result<RunConfig, PublishError> {
        let lint_file = PathBuf::from(required(&self.lint_file, "lint-file")?);

        let code = required(&self.pylint_result_code, "pylint-result-code")?;
        let pylint_result_code = parse_result_code(code).ok_or_else(|| {
            PublishError::configuration(
                "Input does not contain a valid integer: pylint-result-code",
            )
        })?;

        let head_sha = required(&self.head_sha, "head-sha")?;
        let head_sha = CommitSha::new(head_sha).ok_or_else(|| missing("head-sha"))?;

        Ok(RunConfig {
            lint_file,
            pylint_result_code,
            head_sha,
            repo_token: input(&self.repo_token).map(str::to_string),
            repository: self.target_repository()?,
        })
    }

    /// Resolves the repository from `repo-owner`/`repo-name`, filling gaps from
    /// `GITHUB_REPOSITORY`.
    fn target_repository(&self) -> Result<Repository, PublishError> {
        let (default_owner, default_name) = match input(&self.repository) {
            Some(full) => match full.split_once('/') {
                Some((owner, name)) => (Some(owner), Some(name)),
                None => (None, None),
            },
            None => (None, None),
        };

        let owner = input(&self.repo_owner)
            .or(default_owner)
            .and_then(RepositoryOwner::new)
            .ok_or_else(|| missing("repo-owner"))?;
        let name = input(&self.repo_name)
            .or(default_name)
            .and_then(RepositoryName::new)
            .ok_or_else(|| missing("repo-name"))?;

        Ok(Repository::new(owner, name))
    }
}
