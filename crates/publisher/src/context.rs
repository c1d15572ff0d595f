//! Per-run inputs: the validated configuration and the workflow context.

use std::path::PathBuf;

use serde::Deserialize;

use crate::{CommitSha, IssueNumber, Repository};

/// Validated configuration for one run. Read once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Location of the Pylint JSON report.
    pub lint_file: PathBuf,
    /// Exit code Pylint returned; drives the check conclusion.
    pub pylint_result_code: i32,
    /// Commit the check run is attached to.
    pub head_sha: CommitSha,
    /// Token used to authenticate against the platform. Absent tokens are
    /// sent as anonymous requests and fail at the platform.
    pub repo_token: Option<String>,
    pub repository: Repository,
}

/// Context of the workflow run that invoked the publisher.
///
/// The issue number is only needed by the fallback comment. When it is
/// `None` (e.g. a `push` event) the fallback is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunContext {
    pub issue_number: Option<IssueNumber>,
}

#[derive(Debug, Deserialize)]
struct Numbered {
    number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    issue: Option<Numbered>,
    pull_request: Option<Numbered>,
    number: Option<u64>,
}

impl RunContext {
    pub fn new(issue_number: Option<IssueNumber>) -> Self {
        Self { issue_number }
    }

    /// Resolves the issue or pull request number from a webhook event payload.
    ///
    /// Looks at `issue.number`, then `pull_request.number`, then a top-level
    /// `number`. Payloads that are not JSON objects resolve to no number.
    pub fn from_event_payload(payload: &str) -> Self {
        let event: EventPayload = match serde_json::from_str(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(error = %e, "Event payload carries no issue context");
                return Self::default();
            }
        };

        let number = event
            .issue
            .and_then(|i| i.number)
            .or_else(|| event.pull_request.and_then(|p| p.number))
            .or(event.number);

        Self {
            issue_number: number.and_then(IssueNumber::new),
        }
    }
}
