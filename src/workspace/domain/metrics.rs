//! Read-only projections of task progress for display.

use super::{CodeChangeStatus, PlanStepStatus, Task};
use serde::Serialize;

/// Weight of plan completion in the confidence score.
const PLAN_WEIGHT: f64 = 0.40;

/// Weight of change readiness in the confidence score.
const CHANGE_WEIGHT: f64 = 0.35;

/// Weight of review clearance in the confidence score.
const REVIEW_WEIGHT: f64 = 0.25;

/// Plan step counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanProgress {
    total: usize,
    done: usize,
    in_progress: usize,
}

impl PlanProgress {
    /// Returns the number of plan steps.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of steps marked done.
    #[must_use]
    pub const fn done(&self) -> usize {
        self.done
    }

    /// Returns the number of steps currently in progress.
    #[must_use]
    pub const fn in_progress(&self) -> usize {
        self.in_progress
    }
}

/// Code change counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeProgress {
    total: usize,
    ready: usize,
}

impl ChangeProgress {
    /// Returns the number of changes.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of changes marked ready.
    #[must_use]
    pub const fn ready(&self) -> usize {
        self.ready
    }
}

/// Review comment counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewProgress {
    total: usize,
    resolved: usize,
}

impl ReviewProgress {
    /// Returns the number of review comments.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of resolved comments.
    #[must_use]
    pub const fn resolved(&self) -> usize {
        self.resolved
    }
}

/// Derived task progress metrics.
///
/// Pure projection over a [`Task`] snapshot; holds no state of its own.
/// Ratios are always in `[0, 1]` and the confidence score is an integer in
/// `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkspaceMetrics {
    plan: PlanProgress,
    changes: ChangeProgress,
    reviews: ReviewProgress,
}

impl WorkspaceMetrics {
    /// Computes metrics for the given task snapshot.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        let plan = PlanProgress {
            total: task.plan().len(),
            done: task
                .plan()
                .iter()
                .filter(|step| step.status() == PlanStepStatus::Done)
                .count(),
            in_progress: task
                .plan()
                .iter()
                .filter(|step| step.status() == PlanStepStatus::InProgress)
                .count(),
        };
        let changes = ChangeProgress {
            total: task.changes().len(),
            ready: task
                .changes()
                .iter()
                .filter(|change| change.status() == CodeChangeStatus::Ready)
                .count(),
        };
        let reviews = ReviewProgress {
            total: task.reviews().len(),
            resolved: task
                .reviews()
                .iter()
                .filter(|review| review.resolved())
                .count(),
        };
        Self {
            plan,
            changes,
            reviews,
        }
    }

    /// Returns the plan step counters.
    #[must_use]
    pub const fn plan(&self) -> PlanProgress {
        self.plan
    }

    /// Returns the code change counters.
    #[must_use]
    pub const fn changes(&self) -> ChangeProgress {
        self.changes
    }

    /// Returns the review comment counters.
    #[must_use]
    pub const fn reviews(&self) -> ReviewProgress {
        self.reviews
    }

    /// Returns the fraction of plan steps marked done, or 0 with no steps.
    #[must_use]
    pub fn plan_completion(&self) -> f64 {
        ratio(self.plan.done, self.plan.total)
    }

    /// Returns the fraction of changes marked ready, or 0 with no changes.
    #[must_use]
    pub fn change_readiness(&self) -> f64 {
        ratio(self.changes.ready, self.changes.total)
    }

    /// Returns the fraction of reviews resolved.
    ///
    /// With zero reviews the clearance depends on whether anything is
    /// awaiting review: no reviews and no changes means there is nothing to
    /// clear (1); no reviews while changes exist means feedback is still
    /// outstanding (0).
    #[must_use]
    pub fn review_clearance(&self) -> f64 {
        if self.reviews.total == 0 {
            if self.changes.total == 0 {
                return 1.0;
            }
            return 0.0;
        }
        ratio(self.reviews.resolved, self.reviews.total)
    }

    /// Returns the weighted confidence score, an integer in `[0, 100]`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the weighted ratio is clamped to [0, 1] before the narrowing cast"
    )]
    pub fn confidence(&self) -> u8 {
        let weighted = PLAN_WEIGHT * self.plan_completion()
            + CHANGE_WEIGHT * self.change_readiness()
            + REVIEW_WEIGHT * self.review_clearance();
        (weighted.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Returns `numerator / denominator`, or 0 for an empty denominator.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "display-oriented ratios over small counts tolerate f64 rounding"
)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
