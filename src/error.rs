//! Error types for the content pipeline
//!
//! Every pipeline failure names the offending source file. A load pass is
//! all-or-nothing: the first error aborts the pass, so a serving collection
//! never contains partially-processed documents.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single violated front-matter field, with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised while loading, validating, or compiling content
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source file could not be read from disk
    #[error("failed to read {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Front matter failed schema validation; all violations are listed
    #[error("invalid front matter in {} [{}]", .path.display(), format_violations(.violations))]
    Schema {
        path: PathBuf,
        violations: Vec<FieldViolation>,
    },

    /// The document body could not be compiled to HTML
    #[error("failed to compile {}: {message}", .path.display())]
    Compile { path: PathBuf, message: String },

    /// Two source files derive the same public path
    #[error("duplicate post path {slug:?}: {} and {}", .first.display(), .second.display())]
    DuplicatePath {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_violation() {
        let err = PipelineError::Schema {
            path: PathBuf::from("content/posts/bad.mdx"),
            violations: vec![
                FieldViolation::new("title", "missing required field"),
                FieldViolation::new("date", "not a valid ISO-8601 datetime"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("title: missing required field"));
        assert!(msg.contains("date: not a valid ISO-8601 datetime"));
        assert!(msg.contains("bad.mdx"));
    }
}
