use async_trait::async_trait;
use publisher::{CheckRunRequest, ChecksApi, IssueNumber, PlatformError, Repository};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Base URL of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("pylint-checks/", env!("CARGO_PKG_VERSION"));

/// Errors raised while constructing a [`GithubClient`].
#[derive(Debug, Error)]
pub enum GithubClientError {
    #[error("Repository token contains characters not allowed in an HTTP header")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to build the HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// GitHub REST client scoped to one API base URL and one token.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Error body GitHub returns on 4xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl GithubClient {
    /// Creates a client for `api_url` (e.g. [`DEFAULT_API_URL`] or a GitHub
    /// Enterprise `https://host/api/v3`).
    ///
    /// An absent or empty token produces unauthenticated requests.
    pub fn new(
        api_url: impl Into<String>,
        token: Option<&str>,
    ) -> Result<Self, GithubClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// POSTs `body` as JSON to `path` and returns the status of a 2xx response.
    async fn post_json<B>(&self, path: &str, body: &B) -> Result<u16, PlatformError>
    where
        B: Serialize + ?Sized,
    {
        let endpoint = format!("POST {path}");
        let response = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| PlatformError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        debug!(%endpoint, status = status.as_u16(), "GitHub responded");
        if status.is_success() {
            return Ok(status.as_u16());
        }

        let text = response
            .text()
            .await
            .map_err(|e| PlatformError::InvalidResponse {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Err(PlatformError::Rejected {
            endpoint,
            status: status.as_u16(),
            message: error_message(&text, status),
        })
    }
}

/// Extracts GitHub's `message` (plus validation `errors`, if any) from an
/// error body, falling back to the raw text or the status reason.
fn error_message(text: &str, status: reqwest::StatusCode) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            message,
            errors: Some(errors),
        }) => format!("{message} {errors}"),
        Ok(ErrorBody { message, .. }) => message,
        Err(_) if !text.trim().is_empty() => text.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

#[async_trait]
impl ChecksApi for GithubClient {
    #[instrument(skip_all, fields(repository = %repository, head_sha = %request.head_sha))]
    async fn create_check_run(
        &self,
        repository: &Repository,
        request: &CheckRunRequest,
    ) -> Result<u16, PlatformError> {
        let path = format!("/repos/{}/{}/check-runs", repository.owner, repository.name);
        self.post_json(&path, request).await
    }

    #[instrument(skip_all, fields(repository = %repository, issue = %issue))]
    async fn create_issue_comment(
        &self,
        repository: &Repository,
        issue: IssueNumber,
        body: &str,
    ) -> Result<(), PlatformError> {
        let path = format!(
            "/repos/{}/{}/issues/{}/comments",
            repository.owner, repository.name, issue
        );
        self.post_json(&path, &CommentBody { body }).await?;
        Ok(())
    }
}
