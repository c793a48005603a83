//! Deterministic in-process generation backend.
//!
//! Produces plausible plans, sketches, and review feedback without any
//! network or process call, so the workspace stays fully usable offline
//! and tests get stable output shapes.

use async_trait::async_trait;

use crate::workspace::domain::{
    CodeChange, CodeChangeStatus, PlanStep, PlanStepId, ProviderId, ReviewComment, ReviewSeverity,
};
use crate::workspace::ports::{
    Generated, GenerationGateway, GenerationResult, ImplementationSeedOptions,
    PlanGenerationOptions, PlanTone, ReviewRunOptions, ReviewStrictness,
};

/// Deterministic local generation backend.
#[derive(Debug, Clone)]
pub struct LocalGenerator {
    provider: ProviderId,
}

impl LocalGenerator {
    /// Default provider token for the local backend.
    pub const PROVIDER: &'static str = "local";

    /// Creates a local generator with the default provider token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: ProviderId::new(Self::PROVIDER),
        }
    }

    /// Returns the provider identity this backend answers with.
    #[must_use]
    pub const fn provider(&self) -> &ProviderId {
        &self.provider
    }
}

impl Default for LocalGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationGateway for LocalGenerator {
    async fn request_plan(
        &self,
        options: PlanGenerationOptions,
    ) -> GenerationResult<Generated<Vec<PlanStep>>> {
        let focus_list = if options.focus_areas().is_empty() {
            "core workspace flows".to_owned()
        } else {
            options.focus_areas().join(", ")
        };
        let detail_prefix = match options.tone() {
            PlanTone::Detailed => "Detail",
            PlanTone::Succinct => "Outline",
        };
        let testing_line = if options.emphasize_tests() {
            "Include test impact for each change and ensure review captures regressions."
        } else {
            "Call out the testing strategy and manual validation anchors."
        };

        let steps = vec![
            PlanStep::new(
                "Clarify success metrics",
                format!(
                    "{detail_prefix} the desired outcomes of the task: {} and decide how \
                     success will be measured ({focus_list}).",
                    sentence_case(options.prompt()),
                ),
            ),
            PlanStep::new(
                "Map the work to surfaces",
                format!(
                    "{detail_prefix} how planning, implementation, and review interactions \
                     reach the operator. Identify the components and shared state that need \
                     to collaborate.",
                ),
            ),
            PlanStep::new(
                "Implement guided execution",
                format!(
                    "Describe the edits required to support the task: planning board, change \
                     tracking, and workspace telemetry. Focus on {focus_list}.",
                ),
            ),
            PlanStep::new(
                "Enable continuous reviews",
                format!(
                    "{detail_prefix} the review loop with incremental feedback and action \
                     tracking. {testing_line}",
                ),
            ),
        ];

        Ok(Generated::new(steps, self.provider.clone()))
    }

    async fn request_implementation_sketch(
        &self,
        plan: &[PlanStep],
        options: ImplementationSeedOptions,
    ) -> GenerationResult<Generated<Vec<CodeChange>>> {
        if plan.is_empty() {
            return Ok(Generated::new(Vec::new(), self.provider.clone()));
        }

        let related: Vec<PlanStepId> = match options.related_plan_step_ids() {
            Some(ids) => ids.to_vec(),
            None => plan.iter().map(PlanStep::id).collect(),
        };

        let changes = vec![
            CodeChange::new(
                "src/planning/board.rs",
                "Wire plan generation controls into the planning surface",
                "Expose plan prompts, allow editing focus areas, and persist generated steps \
                 with status toggles.",
            )
            .with_before(
                "// The planning board renders static plan steps.\n\
                 // Needs controls for plan generation and status editing.\n",
            )
            .with_after(
                "// Sketch for the reworked board:\n\
                 // collect the prompt and focus areas,\n\
                 // invoke the plan intent,\n\
                 // render steps with editable statuses.\n",
            )
            .with_related_plan_steps(window(&related, 0, 2)),
            CodeChange::new(
                "src/implementation/composer.rs",
                "Add a multi-file change composer with diff preview",
                "Provide editors for the before and after blocks, linked to plan steps and \
                 ready states for review.",
            )
            .with_before(
                "// The composer shows an empty state only.\n\
                 // Needs change cards, editable summaries, and status transitions.\n",
            )
            .with_after(
                "// Sketch for the change composer:\n\
                 // map over the task changes,\n\
                 // show editable metadata and diff blocks,\n\
                 // include a status menu and related plan steps.\n",
            )
            .with_related_plan_steps(window(&related, 1, 2)),
            CodeChange::new(
                "src/review/feedback.rs",
                "Surface incremental review feedback tiles",
                "Show review comments, allow resolving items, and capture follow-up actions \
                 with severity tags.",
            )
            .with_before(
                "// The feedback panel only shows a flat list.\n\
                 // Needs a review trigger, severity filtering, and resolve controls.\n",
            )
            .with_after(
                "// Sketch for the feedback panel:\n\
                 // trigger the review intent,\n\
                 // group comments by severity,\n\
                 // allow resolve and unresolve actions.\n",
            )
            .with_related_plan_steps(window(&related, 2, usize::MAX)),
        ];

        Ok(Generated::new(changes, self.provider.clone()))
    }

    async fn request_review_comments(
        &self,
        changes: &[CodeChange],
        options: ReviewRunOptions,
    ) -> GenerationResult<Generated<Vec<ReviewComment>>> {
        if changes.is_empty() {
            return Ok(Generated::new(Vec::new(), self.provider.clone()));
        }

        let strict = options.strictness() == ReviewStrictness::Paranoid;
        let mut comments = Vec::new();

        for change in changes {
            if change.status() != CodeChangeStatus::Ready {
                comments.push(
                    ReviewComment::new(
                        change.file_path(),
                        ReviewSeverity::Warning,
                        "Change is not marked as ready. Confirm the reasoning is complete or \
                         flip the status before requesting review.",
                    )
                    .with_suggestion(format!(
                        "Update the status on {} to `ready` once manual checks pass.",
                        change.file_path(),
                    )),
                );
            }

            if strict {
                comments.push(
                    ReviewComment::new(
                        change.file_path(),
                        ReviewSeverity::Error,
                        "Strict pass: ensure automated tests cover the new behaviour and \
                         record validation notes alongside the change.",
                    )
                    .with_suggestion(
                        "Add a plan step for test coverage or include test diffs in this \
                         change.",
                    ),
                );
            } else {
                comments.push(ReviewComment::new(
                    change.file_path(),
                    ReviewSeverity::Info,
                    "Double-check the rationale ties back to the originating plan steps for \
                     traceability.",
                ));
            }
        }

        Ok(Generated::new(comments, self.provider.clone()))
    }
}

/// Uppercases the first character of the prompt for splicing mid-sentence.
fn sentence_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns a non-panicking window of the related step identifiers.
fn window(ids: &[PlanStepId], skip: usize, take: usize) -> Vec<PlanStepId> {
    ids.iter().copied().skip(skip).take(take).collect()
}
