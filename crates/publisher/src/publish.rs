//! The run orchestrator.
//!
//! A run moves through [`RunStage`]s in order:
//!
//! ```text
//! Init ──► Parsed ──► Mapped ──► Submitted(check run | fallback) ──► Done
//!   │         │
//!   └─────────┴──► Failure   (fatal, no network call made)
//! ```
//!
//! Everything up to `Mapped` is fallible and fatal. From `Mapped` onwards no
//! error escapes: a rejected check run routes to the fallback comment, and a
//! rejected or impossible comment still ends the run as a success.

use tracing::{debug, error, info, instrument, warn};

use crate::{
    check::truncate_annotations, format_comment, load_report, map_issues, CheckRunOutput,
    CheckRunRequest, ChecksApi, Conclusion, Delivery, PublishError, PublishResult, RunConfig,
    RunContext, Timestamp,
};

/// Stage a run has reached. Used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Init,
    Parsed,
    Mapped,
    Submitted,
    Done,
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub result: PublishResult,
    /// `None` when the run failed before any platform call.
    pub delivery: Option<Delivery>,
}

impl PublishReport {
    /// Report for a run that stopped on a fatal error.
    pub fn failed(err: &PublishError) -> Self {
        Self {
            result: PublishResult::Failure(err.to_string()),
            delivery: None,
        }
    }

    fn delivered(delivery: Delivery) -> Self {
        Self {
            result: PublishResult::Success,
            delivery: Some(delivery),
        }
    }
}

/// Runs the whole publish flow for one report.
///
/// `completed_at` is stamped on the check run; callers pass
/// [`Timestamp::now`] in production.
#[instrument(
    skip_all,
    fields(repository = %config.repository, head_sha = %config.head_sha)
)]
pub async fn publish<A>(
    api: &A,
    config: &RunConfig,
    context: &RunContext,
    completed_at: Timestamp,
) -> PublishReport
where
    A: ChecksApi + ?Sized,
{
    let request = match prepare(config, completed_at) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Publishing aborted");
            return PublishReport::failed(&e);
        }
    };

    let delivery = submit(api, config, context, &request).await;
    debug!(stage = ?RunStage::Submitted, ?delivery, "Annotations submitted");
    debug!(stage = ?RunStage::Done, "Run finished");
    PublishReport::delivered(delivery)
}

/// `Init → Mapped`: reads the report and builds the check-run request.
pub fn prepare(
    config: &RunConfig,
    completed_at: Timestamp,
) -> Result<CheckRunRequest, PublishError> {
    debug!(stage = ?RunStage::Init, lint_file = %config.lint_file.display());
    let report = load_report(&config.lint_file)?;
    debug!(stage = ?RunStage::Parsed, messages = report.len());

    let annotations = map_issues(&report.messages);
    info!("number of annotations: {}", annotations.len());
    let capped = truncate_annotations(annotations);

    let conclusion = Conclusion::from_exit_code(config.pylint_result_code);
    info!("conclusion of linting: {conclusion}");
    debug!(stage = ?RunStage::Mapped, truncated = capped.truncated);

    Ok(CheckRunRequest::completed(
        config.head_sha.clone(),
        conclusion,
        CheckRunOutput::new(conclusion, capped),
        completed_at,
    ))
}

/// `Mapped → Submitted`: creates the check run, falling back to a comment.
async fn submit<A>(
    api: &A,
    config: &RunConfig,
    context: &RunContext,
    request: &CheckRunRequest,
) -> Delivery
where
    A: ChecksApi + ?Sized,
{
    let check_error = match api.create_check_run(&config.repository, request).await {
        Ok(status) => {
            debug!("response from checks create: {status}");
            return Delivery::CheckRun { status };
        }
        Err(e) => e,
    };
    warn!(error = %check_error, "Check run could not be created, falling back to a comment");

    let Some(issue) = context.issue_number else {
        warn!("No issue or pull request in the run context, skipping the fallback comment");
        return Delivery::CommentSkipped;
    };

    let body = format_comment(request.annotations());
    match api
        .create_issue_comment(&config.repository, issue, &body)
        .await
    {
        Ok(()) => {
            info!(issue = %issue, "Posted annotations as a comment");
            Delivery::Comment
        }
        Err(e) => {
            warn!(issue = %issue, error = %e, "Fallback comment could not be posted");
            Delivery::CommentFailed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        AnnotationLevel, CommitSha, IssueNumber, PlatformError, Repository, RepositoryName,
        RepositoryOwner, TRUNCATION_WARNING,
    };

    #[derive(Debug, Clone)]
    enum Call {
        CheckRun(CheckRunRequest),
        Comment { issue: IssueNumber, body: String },
    }

    /// In-memory `ChecksApi` that records calls and fails on demand.
    #[derive(Default)]
    struct FakeApi {
        fail_check_run: bool,
        fail_comment: bool,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeApi {
        fn failing_check_run() -> Self {
            Self {
                fail_check_run: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn check_runs(&self) -> Vec<CheckRunRequest> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::CheckRun(r) => Some(r),
                    Call::Comment { .. } => None,
                })
                .collect()
        }

        fn rejected(endpoint: &str) -> PlatformError {
            PlatformError::Rejected {
                endpoint: endpoint.to_string(),
                status: 403,
                message: "Resource not accessible by integration".into(),
            }
        }
    }

    #[async_trait]
    impl ChecksApi for FakeApi {
        async fn create_check_run(
            &self,
            _repository: &Repository,
            request: &CheckRunRequest,
        ) -> Result<u16, PlatformError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::CheckRun(request.clone()));
            if self.fail_check_run {
                Err(Self::rejected("check-runs"))
            } else {
                Ok(201)
            }
        }

        async fn create_issue_comment(
            &self,
            _repository: &Repository,
            issue: IssueNumber,
            body: &str,
        ) -> Result<(), PlatformError> {
            self.calls.lock().unwrap().push(Call::Comment {
                issue,
                body: body.to_string(),
            });
            if self.fail_comment {
                Err(Self::rejected("comments"))
            } else {
                Ok(())
            }
        }
    }

    fn message(i: usize, kind: &str) -> String {
        format!(
            r#"{{"type": "{kind}", "line": {line}, "column": 4, "path": "pkg/m{i}.py", "message": "msg {i}"}}"#,
            line = i + 1
        )
    }

    fn report_file(count: usize) -> tempfile::NamedTempFile {
        let messages: Vec<_> = (0..count).map(|i| message(i, "warning")).collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"messages": [{}]}}"#, messages.join(",")).unwrap();
        file
    }

    fn config(lint_file: PathBuf, code: i32) -> RunConfig {
        RunConfig {
            lint_file,
            pylint_result_code: code,
            head_sha: CommitSha::new("abc123").unwrap(),
            repo_token: Some("token".into()),
            repository: Repository::new(
                RepositoryOwner::new("repoBoss").unwrap(),
                RepositoryName::new("myRepo").unwrap(),
            ),
        }
    }

    fn pr_context() -> RunContext {
        RunContext::new(IssueNumber::new(5))
    }

    async fn run(api: &FakeApi, config: RunConfig, context: RunContext) -> PublishReport {
        publish(api, &config, &context, Timestamp::now()).await
    }

    /// Log sink shared between a test and its thread-local subscriber.
    #[derive(Clone, Default)]
    struct Logs(Arc<Mutex<Vec<u8>>>);

    impl Write for Logs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Logs {
        fn capture(&self) -> tracing::subscriber::DefaultGuard {
            let sink = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .with_writer(move || sink.clone())
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn twelve_findings_with_failing_exit_code() {
        let file = report_file(12);
        let api = FakeApi::default();

        let report = run(&api, config(file.path().into(), 1), pr_context()).await;

        assert_eq!(report.result, PublishResult::Success);
        assert_eq!(report.delivery, Some(Delivery::CheckRun { status: 201 }));
        let runs = api.check_runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].conclusion, Conclusion::Failure);
        assert_eq!(runs[0].head_sha.as_str(), "abc123");
        assert_eq!(runs[0].annotations().len(), 12);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn empty_report_with_clean_exit_code() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"messages": []}}"#).unwrap();
        let api = FakeApi::default();

        let report = run(&api, config(file.path().into(), 0), pr_context()).await;

        assert!(report.result.is_success());
        let runs = api.check_runs();
        assert_eq!(runs[0].conclusion, Conclusion::Success);
        assert!(runs[0].annotations().is_empty());
    }

    #[tokio::test]
    async fn clean_exit_code_with_findings_still_succeeds() {
        let file = report_file(12);
        let api = FakeApi::default();

        run(&api, config(file.path().into(), 0), pr_context()).await;

        let runs = api.check_runs();
        assert_eq!(runs[0].conclusion, Conclusion::Success);
        assert_eq!(runs[0].output.title, "No issues have been found!");
        assert_eq!(runs[0].annotations().len(), 12);
    }

    #[tokio::test]
    async fn hundred_findings_are_capped_at_fifty() {
        let file = report_file(100);
        let api = FakeApi::default();

        run(&api, config(file.path().into(), 2), pr_context()).await;

        let run = &api.check_runs()[0];
        assert_eq!(run.annotations().len(), 50);
        assert_eq!(run.annotations()[0].message, "msg 0");
        assert_eq!(run.annotations()[49].message, "msg 49");
        assert!(run.output.summary.ends_with(TRUNCATION_WARNING));
    }

    #[tokio::test]
    async fn severities_flow_through_to_the_check_run() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"messages": [{}, {}, {}, {}]}}"#,
            message(0, "convention"),
            message(1, "error"),
            message(2, "warning"),
            message(3, "refactor")
        )
        .unwrap();
        let api = FakeApi::default();

        run(&api, config(file.path().into(), 1), pr_context()).await;

        let levels: Vec<_> = api.check_runs()[0]
            .annotations()
            .iter()
            .map(|a| a.annotation_level)
            .collect();
        assert_eq!(
            levels,
            vec![
                AnnotationLevel::Notice,
                AnnotationLevel::Failure,
                AnnotationLevel::Warning,
                AnnotationLevel::Notice,
            ]
        );
    }

    #[tokio::test]
    async fn rejected_check_run_falls_back_to_comment() {
        let file = report_file(2);
        let api = FakeApi::failing_check_run();

        let report = run(&api, config(file.path().into(), 1), pr_context()).await;

        assert_eq!(report.result, PublishResult::Success);
        assert_eq!(report.delivery, Some(Delivery::Comment));
        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        match &calls[1] {
            Call::Comment { issue, body } => {
                assert_eq!(issue.as_u64(), 5);
                assert_eq!(
                    body,
                    ":warning: warning pkg/m0.py:1:4 msg 0\n:warning: warning pkg/m1.py:2:4 msg 1"
                );
            }
            other => panic!("expected a comment, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_comment_is_swallowed() {
        let file = report_file(2);
        let api = FakeApi {
            fail_check_run: true,
            fail_comment: true,
            ..FakeApi::default()
        };

        let report = run(&api, config(file.path().into(), 1), pr_context()).await;

        assert_eq!(report.result, PublishResult::Success);
        assert!(matches!(
            report.delivery,
            Some(Delivery::CommentFailed { .. })
        ));
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn fallback_is_skipped_without_an_issue_number() {
        let file = report_file(2);
        let api = FakeApi::failing_check_run();

        let report = run(&api, config(file.path().into(), 1), RunContext::default()).await;

        assert_eq!(report.result, PublishResult::Success);
        assert_eq!(report.delivery, Some(Delivery::CommentSkipped));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn every_delivery_path_reaches_the_submitted_stage() {
        let file = report_file(2);
        let apis = [
            (FakeApi::default(), pr_context()),
            (FakeApi::failing_check_run(), pr_context()),
            (FakeApi::failing_check_run(), RunContext::default()),
            (
                FakeApi {
                    fail_check_run: true,
                    fail_comment: true,
                    ..FakeApi::default()
                },
                pr_context(),
            ),
        ];

        for (api, context) in apis {
            let logs = Logs::default();
            let report = {
                let _guard = logs.capture();
                run(&api, config(file.path().into(), 1), context).await
            };

            let text = logs.text();
            assert!(
                text.contains("stage=Submitted"),
                "{:?}: {text}",
                report.delivery
            );
            assert!(text.contains("stage=Done"), "{text}");
        }
    }

    #[tokio::test]
    async fn unreadable_report_fails_without_network_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let api = FakeApi::default();

        let report = run(&api, config(path.clone(), 1), pr_context()).await;

        let expected = load_report(&path).unwrap_err().to_string();
        assert_eq!(report.result, PublishResult::Failure(expected));
        assert_eq!(report.delivery, None);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_report_fails_without_network_calls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"msgs": []}}"#).unwrap();
        let api = FakeApi::default();

        let report = run(&api, config(file.path().into(), 0), pr_context()).await;

        match report.result {
            PublishResult::Failure(reason) => {
                assert!(reason.starts_with("Failed to parse lint report"), "{reason}");
            }
            PublishResult::Success => panic!("malformed report must fail the run"),
        }
        assert!(api.calls().is_empty());
    }

    #[test]
    fn multi_line_findings_lose_their_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"messages": [
                {{"type": "error", "line": 3, "endLine": 8, "column": 1, "endColumn": 2, "path": "a.py", "message": "m"}},
                {{"type": "error", "line": 3, "endLine": 3, "column": 1, "endColumn": 2, "path": "a.py", "message": "m"}}
            ]}}"#
        )
        .unwrap();

        let request = prepare(&config(file.path().into(), 1), Timestamp::now()).unwrap();

        let annotations = request.annotations();
        assert_eq!(annotations[0].start_column, None);
        assert_eq!(annotations[0].end_column, None);
        assert_eq!(annotations[1].start_column, Some(1));
        assert_eq!(annotations[1].end_column, Some(2));
    }
}
