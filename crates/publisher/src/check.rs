//! Check-run policy: the annotation ceiling, titles and summaries, and the
//! request body submitted to the Checks API.

use serde::Serialize;

use crate::{Annotation, CheckStatus, CommitSha, Conclusion, Timestamp};

/// Name the check run is published under.
pub const CHECK_NAME: &str = "pylint";

/// Most annotations the Checks API accepts in a single request.
pub const MAX_ANNOTATIONS: usize = 50;

/// Title and summary used when the linter exited cleanly.
pub const SUCCESS_TEXT: &str = "No issues have been found!";

/// Title and summary used when the linter exited with a non-zero code.
pub const FAILURE_TEXT: &str = "Pylint has some suggestions!";

/// Appended to the failure summary when annotations were dropped.
pub const TRUNCATION_WARNING: &str =
    "\n:warning: Pylint annotations have been limited to 50 due to api limitations.";

// ---------------------------------------------------------------------------
// Truncation
// ---------------------------------------------------------------------------

/// Annotations after the ceiling has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedAnnotations {
    pub annotations: Vec<Annotation>,
    /// `true` when at least one annotation was dropped.
    pub truncated: bool,
}

/// Keeps the first [`MAX_ANNOTATIONS`] annotations, in order.
pub fn truncate_annotations(mut annotations: Vec<Annotation>) -> CappedAnnotations {
    let truncated = annotations.len() > MAX_ANNOTATIONS;
    if truncated {
        tracing::warn!(
            total = annotations.len(),
            limit = MAX_ANNOTATIONS,
            "Number of annotations is greater than {MAX_ANNOTATIONS}, only the first {MAX_ANNOTATIONS} will be displayed."
        );
        annotations.truncate(MAX_ANNOTATIONS);
    }
    CappedAnnotations {
        annotations,
        truncated,
    }
}

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

/// The `output` object of a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    pub annotations: Vec<Annotation>,
}

impl CheckRunOutput {
    /// Builds the output for `conclusion`. The truncation warning only ever
    /// appears in a failure summary.
    pub fn new(conclusion: Conclusion, capped: CappedAnnotations) -> Self {
        let (title, summary) = match conclusion {
            Conclusion::Success => (SUCCESS_TEXT.to_string(), SUCCESS_TEXT.to_string()),
            Conclusion::Failure => {
                let mut summary = FAILURE_TEXT.to_string();
                if capped.truncated {
                    summary.push_str(TRUNCATION_WARNING);
                }
                (FAILURE_TEXT.to_string(), summary)
            }
        };
        Self {
            title,
            summary,
            annotations: capped.annotations,
        }
    }
}

/// Body of `POST /repos/{owner}/{repo}/check-runs`.
///
/// Owner and repository travel in the URL, so they are not part of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRunRequest {
    pub name: String,
    pub head_sha: CommitSha,
    pub completed_at: Timestamp,
    pub conclusion: Conclusion,
    pub status: CheckStatus,
    pub output: CheckRunOutput,
}

impl CheckRunRequest {
    /// Builds a completed `pylint` check run.
    pub fn completed(
        head_sha: CommitSha,
        conclusion: Conclusion,
        output: CheckRunOutput,
        completed_at: Timestamp,
    ) -> Self {
        Self {
            name: CHECK_NAME.to_string(),
            head_sha,
            completed_at,
            conclusion,
            status: CheckStatus::Completed,
            output,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.output.annotations
    }
}
