//! Core domain for pylint-checks.
//!
//! This crate turns a Pylint JSON report into a GitHub check run and owns the
//! policy around it: how findings become annotations, how many annotations a
//! run may carry, what the conclusion is, and what happens when the platform
//! refuses the check run. Infrastructure crates implement [`ChecksApi`]; they
//! never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** The only I/O here is the single read
//! of the report file. Network access is reached exclusively through
//! [`ChecksApi`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`CommitSha`, `RepositoryOwner`, `IssueNumber`, etc.) |
//! | [`types`] | Checks API vocabulary, run outcome types, `Timestamp` |
//! | [`errors`] | Fatal (`PublishError`) and recoverable (`PlatformError`) errors |
//! | [`report`] | Pylint report model and loader |
//! | [`annotation`] | Severity classifier and annotation mapper |
//! | [`check`] | Annotation ceiling, titles/summaries, check-run request body |
//! | [`comment`] | Fallback comment formatting |
//! | [`context`] | `RunConfig` and `RunContext` |
//! | [`ports`] | The `ChecksApi` port |
//! | [`publish`] | The run orchestrator |

pub mod annotation;
pub mod check;
pub mod comment;
pub mod context;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod publish;
pub mod report;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use annotation::{classify, map_issues, Annotation};
pub use check::{
    truncate_annotations, CappedAnnotations, CheckRunOutput, CheckRunRequest, CHECK_NAME,
    FAILURE_TEXT, MAX_ANNOTATIONS, SUCCESS_TEXT, TRUNCATION_WARNING,
};
pub use comment::{format_annotation, format_comment};
pub use context::{RunConfig, RunContext};
pub use errors::{PlatformError, PublishError};
pub use identifiers::{
    CommitSha, FilePath, IssueNumber, Repository, RepositoryName, RepositoryOwner,
};
pub use ports::ChecksApi;
pub use publish::{prepare, publish, PublishReport, RunStage};
pub use report::{load_report, parse_report, IssueRecord, LintReport, MessageType};
pub use types::{AnnotationLevel, CheckStatus, Conclusion, Delivery, PublishResult, Timestamp};
