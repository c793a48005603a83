//! Code changes and the partial-update payload used by operator edits.

use super::{ChangeId, ParseCodeChangeStatusError, PlanStepId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default `before` block for manually added changes.
const DEFAULT_BEFORE: &str = "// original code snippet";

/// Default `after` block for manually added changes.
const DEFAULT_AFTER: &str = "// proposed update";

/// Readiness status of a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeChangeStatus {
    /// The change is still being drafted.
    Draft,
    /// The change is ready for review.
    Ready,
    /// The change is currently under review.
    InReview,
}

impl CodeChangeStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::InReview => "in-review",
        }
    }
}

impl fmt::Display for CodeChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CodeChangeStatus {
    type Error = ParseCodeChangeStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "ready" => Ok(Self::Ready),
            "in-review" => Ok(Self::InReview),
            _ => Err(ParseCodeChangeStatusError(value.to_owned())),
        }
    }
}

/// A proposed edit to one file region.
///
/// `file_path` doubles as the de-duplication key for generation merges:
/// a generation pass never introduces a change whose path already exists in
/// the task. Manual adds are exempt from that rule. `before` captures the
/// pre-edit state for display and is treated as read-only once created;
/// `after` remains editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChange {
    id: ChangeId,
    file_path: String,
    summary: String,
    rationale: String,
    before: String,
    after: String,
    status: CodeChangeStatus,
    related_plan_step_ids: Vec<PlanStepId>,
}

impl CodeChange {
    /// Creates a fresh `Draft` change with placeholder code blocks.
    #[must_use]
    pub fn new(
        file_path: impl Into<String>,
        summary: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: ChangeId::new(),
            file_path: file_path.into(),
            summary: summary.into(),
            rationale: rationale.into(),
            before: DEFAULT_BEFORE.to_owned(),
            after: DEFAULT_AFTER.to_owned(),
            status: CodeChangeStatus::Draft,
            related_plan_step_ids: Vec::new(),
        }
    }

    /// Sets the pre-edit code block.
    #[must_use]
    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = before.into();
        self
    }

    /// Sets the proposed code block.
    #[must_use]
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = after.into();
        self
    }

    /// Sets the readiness status.
    #[must_use]
    pub fn with_status(mut self, status: CodeChangeStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the plan steps this change implements.
    #[must_use]
    pub fn with_related_plan_steps(mut self, ids: impl IntoIterator<Item = PlanStepId>) -> Self {
        self.related_plan_step_ids = ids.into_iter().collect();
        self
    }

    /// Returns the change identifier.
    #[must_use]
    pub const fn id(&self) -> ChangeId {
        self.id
    }

    /// Returns the file path this change targets.
    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Returns the one-line summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the rationale behind the change.
    #[must_use]
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Returns the pre-edit code block.
    #[must_use]
    pub fn before(&self) -> &str {
        &self.before
    }

    /// Returns the proposed code block.
    #[must_use]
    pub fn after(&self) -> &str {
        &self.after
    }

    /// Returns the readiness status.
    #[must_use]
    pub const fn status(&self) -> CodeChangeStatus {
        self.status
    }

    /// Returns the plan steps this change implements.
    #[must_use]
    pub fn related_plan_step_ids(&self) -> &[PlanStepId] {
        &self.related_plan_step_ids
    }

    /// Sets the readiness status (operator action).
    pub fn set_status(&mut self, status: CodeChangeStatus) {
        self.status = status;
    }

    /// Merges the given partial fields into this change.
    ///
    /// The identifier is never patchable; absent fields are left untouched.
    pub fn apply(&mut self, patch: ChangePatch) {
        let ChangePatch {
            file_path,
            summary,
            rationale,
            before,
            after,
            status,
            related_plan_step_ids,
        } = patch;

        if let Some(value) = file_path {
            self.file_path = value;
        }
        if let Some(value) = summary {
            self.summary = value;
        }
        if let Some(value) = rationale {
            self.rationale = value;
        }
        if let Some(value) = before {
            self.before = value;
        }
        if let Some(value) = after {
            self.after = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = related_plan_step_ids {
            self.related_plan_step_ids = value;
        }
    }
}

/// Partial update payload for a [`CodeChange`].
///
/// Every field is optional; only present fields are applied. There is no
/// way to patch the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePatch {
    file_path: Option<String>,
    summary: Option<String>,
    rationale: Option<String>,
    before: Option<String>,
    after: Option<String>,
    status: Option<CodeChangeStatus>,
    related_plan_step_ids: Option<Vec<PlanStepId>>,
}

impl ChangePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patches the target file path.
    #[must_use]
    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    /// Patches the one-line summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Patches the rationale.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Patches the pre-edit code block.
    #[must_use]
    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    /// Patches the proposed code block.
    #[must_use]
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Patches the readiness status.
    #[must_use]
    pub fn with_status(mut self, status: CodeChangeStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Patches the related plan step references.
    #[must_use]
    pub fn with_related_plan_steps(mut self, ids: impl IntoIterator<Item = PlanStepId>) -> Self {
        self.related_plan_step_ids = Some(ids.into_iter().collect());
        self
    }
}
