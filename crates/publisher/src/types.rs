//! Shared value types for the publisher domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the vocabulary of the Checks API (`annotation_level`, `conclusion`,
//! `status`) and the outcome of a run.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Checks API vocabulary
// ---------------------------------------------------------------------------

/// Level of a single check-run annotation.
///
/// These are the only three values the Checks API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Failure,
}

impl AnnotationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AnnotationLevel::Notice => "notice",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Failure => "failure",
        }
    }
}

impl std::fmt::Display for AnnotationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// Overall verdict of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
}

impl Conclusion {
    /// Derives the verdict from the linter's exit code.
    ///
    /// Only the exit code matters: a zero exit with findings is still a
    /// success, and a non-zero exit with no findings is still a failure.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            Conclusion::Success
        } else {
            Conclusion::Failure
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
        }
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// Lifecycle status of a check run. This tool only ever submits finished runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Completed,
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// Coarse result of one run, surfaced to the workflow as the `result` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishResult {
    /// Report parsed and mapped; delivery is best-effort from here on.
    Success,
    /// A fatal error occurred before the annotations were mapped.
    Failure(String),
}

impl PublishResult {
    /// Returns the literal written to the `result` output.
    pub fn output_value(&self) -> &'static str {
        match self {
            PublishResult::Success => "Success",
            PublishResult::Failure(_) => "Failure",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PublishResult::Success)
    }
}

// ---------------------------------------------------------------------------

/// How the annotations reached the platform once mapping succeeded.
///
/// None of these variants affects [`PublishResult`]; they exist for logging
/// and for asserting on the fallback path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The check run was created; carries the HTTP status of the response.
    CheckRun { status: u16 },
    /// The check run failed and the fallback comment was posted.
    Comment,
    /// The check run failed and so did the fallback comment.
    CommentFailed { reason: String },
    /// The check run failed and no issue or pull request was available to
    /// comment on.
    CommentSkipped,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly. Serialises as an ISO-8601 string with millisecond precision and a
/// `Z` suffix, the form the Checks API documents for `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
