//! Review comments produced by a review run.

use super::ReviewId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewSeverity {
    /// Informational note; no action required.
    Info,
    /// Something worth confirming before shipping.
    Warning,
    /// A defect that should block the change.
    Error,
}

impl ReviewSeverity {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ReviewSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comment from a review run.
///
/// `file_path` should correspond to a change's path for the comment to stay
/// meaningful, but that correspondence is not enforced on write; comments
/// whose path loses its last change are pruned when the change is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    id: ReviewId,
    file_path: String,
    severity: ReviewSeverity,
    message: String,
    suggestion: Option<String>,
    line: Option<u32>,
    resolved: bool,
}

impl ReviewComment {
    /// Creates an unresolved comment with a fresh identifier.
    #[must_use]
    pub fn new(
        file_path: impl Into<String>,
        severity: ReviewSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            file_path: file_path.into(),
            severity,
            message: message.into(),
            suggestion: None,
            line: None,
            resolved: false,
        }
    }

    /// Attaches a suggested remediation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Anchors the comment to a line number.
    #[must_use]
    pub const fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the file path the comment refers to.
    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Returns the comment severity.
    #[must_use]
    pub const fn severity(&self) -> ReviewSeverity {
        self.severity
    }

    /// Returns the comment body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the suggested remediation, if any.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Returns the anchored line number, if any.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        self.line
    }

    /// Returns whether the operator has resolved the comment.
    #[must_use]
    pub const fn resolved(&self) -> bool {
        self.resolved
    }

    /// Flips the resolved flag (operator action).
    pub fn toggle_resolved(&mut self) {
        self.resolved = !self.resolved;
    }
}
