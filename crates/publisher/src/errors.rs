//! Error types for the publisher domain.
//!
//! The two enums mirror the two tiers a run distinguishes:
//!
//! - [`PublishError`] halts the run before any annotation is mapped. Its
//!   `Display` text becomes the run's failure reason verbatim.
//! - [`PlatformError`] is produced by a [`crate::ChecksApi`] implementation.
//!   The orchestrator logs it and moves on to the fallback path; it never
//!   changes the run's result.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

/// Errors that end a run with [`crate::PublishResult::Failure`].
#[derive(Debug, Error)]
pub enum PublishError {
    /// An input was missing or malformed.
    ///
    /// The message is reported as-is, so it is phrased for the workflow log
    /// (e.g. `"Input required and not supplied: lint-file"`).
    #[error("{message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The report file could not be read.
    #[error("Failed to read lint report '{}': {source}", path.display())]
    ReadReport {
        /// Path that was requested.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report content is not a Pylint JSON report.
    #[error("Failed to parse lint report: {source}")]
    ParseReport {
        #[source]
        source: serde_json::Error,
    },
}

impl PublishError {
    /// Shorthand for [`PublishError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        PublishError::Configuration {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Recoverable errors
// ---------------------------------------------------------------------------

/// Failure of a single call against the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("Request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// The platform answered with a non-success status.
    ///
    /// `message` is the platform's own error text when the body carried one.
    #[error("{endpoint} rejected the request with status {status}: {message}")]
    Rejected {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// The request could not be built or the response could not be read.
    #[error("Invalid exchange with {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },
}
