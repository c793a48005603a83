//! Plan steps and their operator-driven status lifecycle.

use super::{ParsePlanStepStatusError, PlanStepId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress status of a plan step.
///
/// Mutated only by explicit operator action; a generator assigns `Todo` at
/// creation and never touches the status afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStepStatus {
    /// The step has not been started.
    Todo,
    /// The step is actively being worked.
    InProgress,
    /// The step is complete.
    Done,
}

impl PlanStepStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PlanStepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PlanStepStatus {
    type Error = ParsePlanStepStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParsePlanStepStatusError(value.to_owned())),
        }
    }
}

/// A single ordered step of the task plan.
///
/// Order within [`super::Task::plan`] is significant: it is the execution
/// order the generator proposed. `blocked_by` is purely advisory; nothing
/// stops a blocked step from being marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    id: PlanStepId,
    title: String,
    detail: String,
    status: PlanStepStatus,
    blocked_by: Option<PlanStepId>,
}

impl PlanStep {
    /// Creates a fresh `Todo` step with a new identifier.
    #[must_use]
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id: PlanStepId::new(),
            title: title.into(),
            detail: detail.into(),
            status: PlanStepStatus::Todo,
            blocked_by: None,
        }
    }

    /// Marks this step as advisorily blocked by another step.
    #[must_use]
    pub const fn with_blocked_by(mut self, step_id: PlanStepId) -> Self {
        self.blocked_by = Some(step_id);
        self
    }

    /// Returns the step identifier.
    #[must_use]
    pub const fn id(&self) -> PlanStepId {
        self.id
    }

    /// Returns the step title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the step rationale/description.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Returns the current progress status.
    #[must_use]
    pub const fn status(&self) -> PlanStepStatus {
        self.status
    }

    /// Returns the advisory blocking reference, if any.
    #[must_use]
    pub const fn blocked_by(&self) -> Option<PlanStepId> {
        self.blocked_by
    }

    /// Sets the progress status (operator action).
    pub fn set_status(&mut self, status: PlanStepStatus) {
        self.status = status;
    }
}
