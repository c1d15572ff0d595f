//! Pylint JSON report model and loader.
//!
//! The report is the object form `{ "messages": [ ... ] }`. Each message is
//! deserialised into an [`IssueRecord`]; fields the publisher does not use are
//! ignored.

use std::path::Path;

use serde::Deserialize;

use crate::{FilePath, PublishError};

/// Pylint's message category, as found in the `type` field.
///
/// Unknown strings and a missing field both land on [`MessageType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Convention,
    Refactor,
    Warning,
    Error,
    Fatal,
    Info,
    #[default]
    #[serde(other)]
    Other,
}

/// One finding emitted by the linter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueRecord {
    /// Repository-relative file path.
    pub path: FilePath,

    /// First line of the finding (1-based).
    pub line: u32,

    /// Last line of the finding, when the linter knows it.
    #[serde(rename = "endLine", default)]
    pub end_line: Option<u32>,

    /// Column of the finding (0-based in Pylint output).
    #[serde(default)]
    pub column: Option<u32>,

    #[serde(rename = "endColumn", default)]
    pub end_column: Option<u32>,

    #[serde(rename = "type", default)]
    pub message_type: MessageType,

    /// Symbolic name of the check, e.g. `unused-import`.
    #[serde(default)]
    pub symbol: Option<String>,

    /// Message code, e.g. `W0611`.
    #[serde(rename = "message-id", default)]
    pub message_id: Option<String>,

    pub message: String,
}

/// A parsed lint report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LintReport {
    pub messages: Vec<IssueRecord>,
}

impl LintReport {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Parses report text.
pub fn parse_report(content: &str) -> Result<LintReport, PublishError> {
    serde_json::from_str(content).map_err(|source| PublishError::ParseReport { source })
}

/// Reads and parses the report at `path`.
pub fn load_report(path: &Path) -> Result<LintReport, PublishError> {
    let content = std::fs::read_to_string(path).map_err(|source| PublishError::ReadReport {
        path: path.to_path_buf(),
        source,
    })?;
    parse_report(&content)
}
