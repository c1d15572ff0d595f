//! Port traits implemented by infrastructure crates.
//!
//! The orchestrator only ever talks to the hosting platform through
//! [`ChecksApi`]; the `github` crate supplies the REST implementation and
//! tests supply in-memory fakes.

use async_trait::async_trait;

use crate::{CheckRunRequest, IssueNumber, PlatformError, Repository};

/// The two platform calls a run may make.
#[async_trait]
pub trait ChecksApi: Send + Sync {
    /// Creates a check run on `repository`.
    ///
    /// Returns the HTTP status of the successful response.
    async fn create_check_run(
        &self,
        repository: &Repository,
        request: &CheckRunRequest,
    ) -> Result<u16, PlatformError>;

    /// Posts `body` as a comment on an issue or pull request.
    async fn create_issue_comment(
        &self,
        repository: &Repository,
        issue: IssueNumber,
        body: &str,
    ) -> Result<(), PlatformError>;
}
