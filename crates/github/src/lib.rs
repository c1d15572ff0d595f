//! pylint-checks GitHub infrastructure adapter.
//!
//! Implements the [`publisher::ChecksApi`] port against the GitHub REST API
//! using [`reqwest`]:
//!
//! | Port method | Endpoint |
//! |-------------|----------|
//! | `create_check_run` | `POST /repos/{owner}/{repo}/check-runs` |
//! | `create_issue_comment` | `POST /repos/{owner}/{repo}/issues/{number}/comments` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Headers,
//! authentication, URL layout, and the translation of HTTP failures into
//! [`publisher::PlatformError`] live here; the [`publisher`] crate never sees
//! them.
//!
//! Each call is made exactly once. There is no retry or back-off and no
//! timeout beyond the `reqwest` defaults.

mod client;

pub use client::{GithubClient, GithubClientError, DEFAULT_API_URL};
