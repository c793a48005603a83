//! Task aggregate root and the generation merge rules.

use super::{
    ChangeId, ChangePatch, CodeChange, CodeChangeStatus, PlanStep, PlanStepId, PlanStepStatus,
    ReviewComment, ReviewId, TaskId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The unit of work moving through planning, implementation, and review.
///
/// The aggregate keeps its three artefact sequences mutually consistent.
/// Replanning invalidates changes and reviews, and a successful seed
/// invalidates reviews; removing a change prunes the reviews it strands.
/// All mutation goes through methods on this type so those rules live in
/// one effect-free place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    prompt: String,
    plan: Vec<PlanStep>,
    changes: Vec<CodeChange>,
    reviews: Vec<ReviewComment>,
    created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task with the given plan and no changes or reviews.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        prompt: impl Into<String>,
        plan: Vec<PlanStep>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            prompt: prompt.into(),
            plan,
            changes: Vec::new(),
            reviews: Vec::new(),
            created_at: clock.utc(),
        }
    }

    /// Creates the demo task a fresh workspace opens with.
    ///
    /// The starter plan gives the operator something to orient against
    /// before the first generation call replaces it.
    #[must_use]
    pub fn starter(clock: &impl Clock) -> Self {
        let plan = vec![
            PlanStep::new(
                "Inspect repository layout",
                "Review the existing project structure to identify affected modules and touchpoints.",
            ),
            PlanStep::new(
                "Draft execution plan",
                "Outline the implementation strategy, covering planning, editing, and review flows.",
            ),
            PlanStep::new(
                "Build the workspace surfaces",
                "Create the planning board, code change editor, and review feedback surfaces.",
            ),
        ];
        Self::new(
            "Scaffold the assistant workspace",
            "Build an AI-assisted workspace that plans, implements, and reviews every change. \
             Tasks break complex changes into ordered steps and precise edits across files, \
             while reviews provide incremental feedback to catch regressions early.",
            plan,
            clock,
        )
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the canonical prompt the current plan was generated from.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns the ordered plan steps.
    #[must_use]
    pub fn plan(&self) -> &[PlanStep] {
        &self.plan
    }

    /// Returns the code changes in creation order.
    #[must_use]
    pub fn changes(&self) -> &[CodeChange] {
        &self.changes
    }

    /// Returns the review comments in generation order.
    #[must_use]
    pub fn reviews(&self) -> &[ReviewComment] {
        &self.reviews
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the prompt and plan wholesale, clearing changes and reviews.
    ///
    /// A changed plan invalidates the implementation and review built
    /// against the old plan, so both downstream sequences are discarded
    /// regardless of their contents.
    pub fn apply_plan(&mut self, prompt: impl Into<String>, plan: Vec<PlanStep>) {
        self.prompt = prompt.into();
        self.plan = plan;
        self.changes.clear();
        self.reviews.clear();
    }

    /// Sets the status of the matching plan step.
    ///
    /// Returns `false` when no step has the given id; callers treat that as
    /// a stale reference and ignore it.
    pub fn set_plan_step_status(&mut self, step_id: PlanStepId, status: PlanStepStatus) -> bool {
        match self.plan.iter_mut().find(|step| step.id() == step_id) {
            Some(step) => {
                step.set_status(status);
                true
            }
            None => false,
        }
    }

    /// Merges a generated change batch into the task.
    ///
    /// When the task has no changes yet, the generated set is adopted
    /// outright. Otherwise only generated changes whose `file_path` is not
    /// already present are appended; colliding paths are dropped so the
    /// existing, possibly operator-edited, change wins. Reviews are cleared
    /// after any seed because they may no longer match the code.
    ///
    /// Returns how many generated changes were kept.
    pub fn merge_sketch(&mut self, generated: Vec<CodeChange>) -> usize {
        let appended = if self.changes.is_empty() {
            let count = generated.len();
            self.changes = generated;
            count
        } else {
            let existing_paths: HashSet<String> = self
                .changes
                .iter()
                .map(|change| change.file_path().to_owned())
                .collect();
            let mut count = 0;
            for change in generated {
                if existing_paths.contains(change.file_path()) {
                    continue;
                }
                self.changes.push(change);
                count += 1;
            }
            count
        };
        self.reviews.clear();
        appended
    }

    /// Appends a manually created change.
    ///
    /// Manual adds are exempt from the `file_path` de-duplication rule that
    /// generation merges enforce: an operator may knowingly stack several
    /// changes on one path.
    pub fn add_change(&mut self, change: CodeChange) {
        self.changes.push(change);
    }

    /// Merges partial fields into the matching change.
    ///
    /// Returns `false` when no change has the given id.
    pub fn patch_change(&mut self, change_id: ChangeId, patch: ChangePatch) -> bool {
        match self.changes.iter_mut().find(|change| change.id() == change_id) {
            Some(change) => {
                change.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Marks every change `Ready` and clears reviews.
    ///
    /// Idempotent: changes already `Ready` are untouched. A newly readied
    /// batch invalidates prior feedback.
    pub fn mark_all_changes_ready(&mut self) {
        for change in &mut self.changes {
            change.set_status(CodeChangeStatus::Ready);
        }
        self.reviews.clear();
    }

    /// Removes the matching change and prunes stranded reviews.
    ///
    /// Reviews are filtered against the surviving set of file paths, so a
    /// comment on a path that still has another change stays put.
    ///
    /// Returns `false` when no change has the given id.
    pub fn remove_change(&mut self, change_id: ChangeId) -> bool {
        let before_len = self.changes.len();
        self.changes.retain(|change| change.id() != change_id);
        if self.changes.len() == before_len {
            return false;
        }

        let surviving_paths: HashSet<String> = self
            .changes
            .iter()
            .map(|change| change.file_path().to_owned())
            .collect();
        self.reviews
            .retain(|review| surviving_paths.contains(review.file_path()));
        true
    }

    /// Replaces the review sequence wholesale.
    ///
    /// A review run never merges incrementally; the new batch is the whole
    /// truth.
    pub fn replace_reviews(&mut self, reviews: Vec<ReviewComment>) {
        self.reviews = reviews;
    }

    /// Flips the resolved flag on the matching review.
    ///
    /// Returns `false` when no review has the given id.
    pub fn toggle_review_resolved(&mut self, review_id: ReviewId) -> bool {
        match self.reviews.iter_mut().find(|review| review.id() == review_id) {
            Some(review) => {
                review.toggle_resolved();
                true
            }
            None => false,
        }
    }
}
