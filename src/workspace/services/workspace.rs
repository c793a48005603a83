//! Stateful orchestration service for the task workspace.

use std::sync::Arc;

use mockable::Clock;
use tokio::sync::RwLock;

use crate::workspace::domain::{
    ChangeId, ChangePatch, CodeChange, CodeChangeStatus, PlanStepId, PlanStepStatus, ProviderId,
    ReviewId, Stage, StageState, StageTracker, Task, WorkspaceMetrics,
};
use crate::workspace::ports::{
    Generated, GenerationGateway, ImplementationSeedOptions, PlanGenerationOptions,
    ReviewRunOptions,
};

/// Request payload for manually adding a code change.
///
/// Omitted code blocks fall back to placeholder text and the related plan
/// step set defaults to empty. Manual adds are exempt from the file-path
/// de-duplication applied to generation merges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualChangeRequest {
    file_path: String,
    summary: String,
    rationale: String,
    before: Option<String>,
    after: Option<String>,
    related_plan_step_ids: Vec<PlanStepId>,
}

impl ManualChangeRequest {
    /// Creates a request with the required change fields.
    #[must_use]
    pub fn new(
        file_path: impl Into<String>,
        summary: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            summary: summary.into(),
            rationale: rationale.into(),
            before: None,
            after: None,
            related_plan_step_ids: Vec::new(),
        }
    }

    /// Sets the pre-edit code block.
    #[must_use]
    pub fn with_before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    /// Sets the proposed code block.
    #[must_use]
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    /// Sets the plan steps the change implements.
    #[must_use]
    pub fn with_related_plan_steps(mut self, ids: impl IntoIterator<Item = PlanStepId>) -> Self {
        self.related_plan_step_ids = ids.into_iter().collect();
        self
    }
}

/// Combined task and stage tracker state owned by the service.
#[derive(Debug, Clone)]
struct WorkspaceState {
    task: Task,
    tracker: StageTracker,
}

/// Workspace orchestration service.
///
/// Owns the [`Task`] and its [`StageTracker`] and exposes every operator
/// intent. Intents never fail at the call boundary: generation failures
/// settle into the affected stage's `Error` state and stale references are
/// ignored. Each intent returns the post-intent task snapshot.
///
/// Mutations serialize on an internal lock, but the lock is not held
/// across gateway calls: the operator can keep editing while a generation
/// call is in flight, and overlapping calls against the same stage resolve
/// last-write-wins.
#[derive(Clone)]
pub struct WorkspaceService<G, C>
where
    G: GenerationGateway,
    C: Clock + Send + Sync,
{
    gateway: Arc<G>,
    clock: Arc<C>,
    default_provider: ProviderId,
    state: Arc<RwLock<WorkspaceState>>,
}

impl<G, C> WorkspaceService<G, C>
where
    G: GenerationGateway,
    C: Clock + Send + Sync,
{
    /// Creates a workspace with a starter task and idle stage tracking.
    #[must_use]
    pub fn new(gateway: Arc<G>, clock: Arc<C>, default_provider: ProviderId) -> Self {
        let task = Task::starter(&*clock);
        let tracker = StageTracker::new(default_provider.clone());
        Self {
            gateway,
            clock,
            default_provider,
            state: Arc::new(RwLock::new(WorkspaceState { task, tracker })),
        }
    }

    /// Returns a snapshot of the current task.
    pub async fn task(&self) -> Task {
        self.state.read().await.task.clone()
    }

    /// Returns a snapshot of the stage tracker.
    pub async fn tracker(&self) -> StageTracker {
        self.state.read().await.tracker.clone()
    }

    /// Returns a snapshot of one stage's lifecycle record.
    pub async fn stage(&self, stage: Stage) -> StageState {
        self.state.read().await.tracker.stage(stage).clone()
    }

    /// Returns derived progress metrics for the current task.
    pub async fn metrics(&self) -> WorkspaceMetrics {
        WorkspaceMetrics::for_task(&self.state.read().await.task)
    }

    /// Generates or regenerates the plan from the given options.
    ///
    /// On success the options' prompt becomes the task's canonical prompt,
    /// the plan is replaced wholesale, and all changes and reviews are
    /// cleared. On failure the task is untouched and the planning stage
    /// records the cause.
    pub async fn regenerate_plan(&self, options: PlanGenerationOptions) -> Task {
        let prompt = options.prompt().to_owned();
        {
            let mut state = self.state.write().await;
            state.tracker.begin(Stage::Planning, "Generating plan");
        }

        tracing::info!("requesting plan generation");
        match self.gateway.request_plan(options).await {
            Ok(generated) => {
                let Generated {
                    payload: steps,
                    provider,
                    note,
                    warning,
                } = generated;
                let message = note.unwrap_or_else(|| {
                    format!("Plan updated with {}.", count_noun(steps.len(), "step"))
                });
                let mut state = self.state.write().await;
                state.task.apply_plan(prompt, steps);
                state
                    .tracker
                    .succeed(Stage::Planning, provider, message, warning, &*self.clock);
                tracing::info!(steps = state.task.plan().len(), "plan regenerated");
                state.task.clone()
            }
            Err(error) => {
                tracing::error!(%error, "plan generation failed");
                let mut state = self.state.write().await;
                state
                    .tracker
                    .fail(Stage::Planning, error.to_string(), &*self.clock);
                state.task.clone()
            }
        }
    }

    /// Sets the status of one plan step; a stale id is ignored.
    pub async fn update_plan_step_status(
        &self,
        step_id: PlanStepId,
        status: PlanStepStatus,
    ) -> Task {
        let mut state = self.state.write().await;
        if !state.task.set_plan_step_status(step_id, status) {
            tracing::debug!(%step_id, "ignoring status update for unknown plan step");
        }
        state.task.clone()
    }

    /// Seeds code changes from the current plan.
    ///
    /// An empty plan short-circuits to an empty successful seed without
    /// invoking the backend. Otherwise the generated batch merges under
    /// the file-path rule: existing changes always win, colliding paths
    /// are dropped, and reviews are cleared after any successful seed.
    pub async fn seed_implementation(&self, options: ImplementationSeedOptions) -> Task {
        let plan = {
            let mut state = self.state.write().await;
            if state.task.plan().is_empty() {
                let provider = state.tracker.stage(Stage::Implementation).provider().clone();
                state.task.merge_sketch(Vec::new());
                state.tracker.succeed(
                    Stage::Implementation,
                    provider,
                    "No plan steps to implement; nothing was seeded.",
                    None,
                    &*self.clock,
                );
                tracing::debug!("implementation seed short-circuited on an empty plan");
                return state.task.clone();
            }
            state
                .tracker
                .begin(Stage::Implementation, "Sketching implementation");
            state.task.plan().to_vec()
        };

        tracing::info!(plan_steps = plan.len(), "requesting implementation sketch");
        match self
            .gateway
            .request_implementation_sketch(&plan, options)
            .await
        {
            Ok(generated) => {
                let Generated {
                    payload: changes,
                    provider,
                    note,
                    warning,
                } = generated;
                let message = note.unwrap_or_else(|| {
                    format!("Seeded {}.", count_noun(changes.len(), "change"))
                });
                let mut state = self.state.write().await;
                let appended = state.task.merge_sketch(changes);
                state.tracker.succeed(
                    Stage::Implementation,
                    provider,
                    message,
                    warning,
                    &*self.clock,
                );
                tracing::info!(appended, "implementation sketch merged");
                state.task.clone()
            }
            Err(error) => {
                tracing::error!(%error, "implementation seeding failed");
                let mut state = self.state.write().await;
                state
                    .tracker
                    .fail(Stage::Implementation, error.to_string(), &*self.clock);
                state.task.clone()
            }
        }
    }

    /// Appends a manually created draft change; no gateway call is made.
    pub async fn add_manual_change(&self, request: ManualChangeRequest) -> Task {
        let ManualChangeRequest {
            file_path,
            summary,
            rationale,
            before,
            after,
            related_plan_step_ids,
        } = request;

        let mut change = CodeChange::new(file_path, summary, rationale);
        if let Some(block) = before {
            change = change.with_before(block);
        }
        if let Some(block) = after {
            change = change.with_after(block);
        }
        if !related_plan_step_ids.is_empty() {
            change = change.with_related_plan_steps(related_plan_step_ids);
        }

        let mut state = self.state.write().await;
        state.task.add_change(change);
        state.task.clone()
    }

    /// Merges partial fields into one change; a stale id is ignored.
    pub async fn update_change(&self, change_id: ChangeId, patch: ChangePatch) -> Task {
        let mut state = self.state.write().await;
        if !state.task.patch_change(change_id, patch) {
            tracing::debug!(%change_id, "ignoring update for unknown change");
        }
        state.task.clone()
    }

    /// Sets one change's readiness status; a stale id is ignored.
    pub async fn update_change_status(
        &self,
        change_id: ChangeId,
        status: CodeChangeStatus,
    ) -> Task {
        self.update_change(change_id, ChangePatch::new().with_status(status))
            .await
    }

    /// Marks every change ready, clears reviews, and settles the review
    /// stage back to idle with an informative message.
    ///
    /// The stage settles to idle rather than error because no call was
    /// attempted; readying the batch is a prerequisite reset for the next
    /// review run.
    pub async fn mark_all_changes_ready(&self) -> Task {
        let mut state = self.state.write().await;
        state.task.mark_all_changes_ready();
        state.tracker.settle_idle(
            Stage::Review,
            "All changes marked ready for review.",
            &*self.clock,
        );
        state.task.clone()
    }

    /// Removes one change and prunes reviews stranded by it; a stale id is
    /// ignored.
    pub async fn remove_change(&self, change_id: ChangeId) -> Task {
        let mut state = self.state.write().await;
        if !state.task.remove_change(change_id) {
            tracing::debug!(%change_id, "ignoring removal of unknown change");
        }
        state.task.clone()
    }

    /// Runs a review over the current changes.
    ///
    /// An empty change set short-circuits to an empty successful review
    /// without invoking the backend. On success the review sequence is
    /// replaced wholesale; on failure it is untouched and the review stage
    /// records the cause.
    pub async fn run_review(&self, options: ReviewRunOptions) -> Task {
        let changes = {
            let mut state = self.state.write().await;
            if state.task.changes().is_empty() {
                let provider = state.tracker.stage(Stage::Review).provider().clone();
                state.task.replace_reviews(Vec::new());
                state.tracker.succeed(
                    Stage::Review,
                    provider,
                    "No changes to review.",
                    None,
                    &*self.clock,
                );
                tracing::debug!("review run short-circuited on an empty change set");
                return state.task.clone();
            }
            state
                .tracker
                .begin(Stage::Review, "Requesting review feedback");
            state.task.changes().to_vec()
        };

        tracing::info!(changes = changes.len(), "requesting review comments");
        match self.gateway.request_review_comments(&changes, options).await {
            Ok(generated) => {
                let Generated {
                    payload: reviews,
                    provider,
                    note,
                    warning,
                } = generated;
                let message = note.unwrap_or_else(|| {
                    format!(
                        "Received {}.",
                        count_noun(reviews.len(), "review item")
                    )
                });
                let mut state = self.state.write().await;
                state.task.replace_reviews(reviews);
                state
                    .tracker
                    .succeed(Stage::Review, provider, message, warning, &*self.clock);
                tracing::info!(reviews = state.task.reviews().len(), "review applied");
                state.task.clone()
            }
            Err(error) => {
                tracing::error!(%error, "review run failed");
                let mut state = self.state.write().await;
                state
                    .tracker
                    .fail(Stage::Review, error.to_string(), &*self.clock);
                state.task.clone()
            }
        }
    }

    /// Flips the resolved flag on one review; a stale id is ignored.
    pub async fn toggle_review_resolved(&self, review_id: ReviewId) -> Task {
        let mut state = self.state.write().await;
        if !state.task.toggle_review_resolved(review_id) {
            tracing::debug!(%review_id, "ignoring toggle for unknown review");
        }
        state.task.clone()
    }

    /// Discards the workspace, restoring a starter task and idle stages
    /// for the default provider.
    pub async fn clear_workspace(&self) -> Task {
        let mut state = self.state.write().await;
        state.task = Task::starter(&*self.clock);
        state.tracker.reset(self.default_provider.clone());
        tracing::info!("workspace cleared");
        state.task.clone()
    }
}

/// Formats a count with a naively pluralized noun.
fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
