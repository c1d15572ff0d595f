//! Mapping from linter findings to check-run annotations.

use serde::Serialize;

use crate::{AnnotationLevel, FilePath, IssueRecord, MessageType};

/// One check-run annotation, serialised in the shape the Checks API expects.
///
/// Columns are only ever set on single-line spans; the API rejects
/// `start_column`/`end_column` when `start_line != end_line`. They are set
/// together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub path: FilePath,
    pub start_line: u32,
    pub end_line: u32,
    pub annotation_level: AnnotationLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl Annotation {
    /// Builds the annotation for a single finding.
    pub fn from_issue(issue: &IssueRecord) -> Self {
        let start_line = issue.line;
        let end_line = issue.end_line.unwrap_or(start_line);

        let (start_column, end_column) = match issue.column {
            Some(column) if start_line == end_line => {
                (Some(column), Some(issue.end_column.unwrap_or(column)))
            }
            _ => (None, None),
        };

        Self {
            path: issue.path.clone(),
            start_line,
            end_line,
            annotation_level: classify(issue.message_type),
            message: issue.message.clone(),
            start_column,
            end_column,
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }
}

/// Maps a Pylint message type onto an annotation level.
///
/// Only `convention`, `warning` and `error` have dedicated levels. Everything
/// else, `fatal` included, is reported as a notice.
pub fn classify(message_type: MessageType) -> AnnotationLevel {
    match message_type {
        MessageType::Convention => AnnotationLevel::Notice,
        MessageType::Warning => AnnotationLevel::Warning,
        MessageType::Error => AnnotationLevel::Failure,
        _ => AnnotationLevel::Notice,
    }
}

/// Maps every finding, preserving report order.
pub fn map_issues(issues: &[IssueRecord]) -> Vec<Annotation> {
    issues.iter().map(Annotation::from_issue).collect()
}
