//! Fallback comment body, used when the check run cannot be created.

use crate::{Annotation, AnnotationLevel};

fn marker(level: AnnotationLevel) -> &'static str {
    match level {
        AnnotationLevel::Notice => ":information_source: notice",
        AnnotationLevel::Warning => ":warning: warning",
        AnnotationLevel::Failure => ":x: failure",
    }
}

/// Renders one annotation as `{marker} {path}:{line}[:{column}] {message}`.
pub fn format_annotation(annotation: &Annotation) -> String {
    let location = match annotation.start_column {
        Some(column) => format!("{}:{}:{}", annotation.path, annotation.start_line, column),
        None => format!("{}:{}", annotation.path, annotation.start_line),
    };
    format!(
        "{} {} {}",
        marker(annotation.annotation_level),
        location,
        annotation.message
    )
}

/// Renders every annotation, one per line.
pub fn format_comment(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(format_annotation)
        .collect::<Vec<_>>()
        .join("\n")
}
