//! Generation gateway port for plan, implementation, and review producers.

use crate::workspace::domain::{CodeChange, PlanStep, PlanStepId, ProviderId, ReviewComment};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for generation gateway operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Contract for the three external generation producers.
///
/// Implementations guarantee complete, well-formed results or a
/// [`GenerationError`]; there is no partial application. Produced plan
/// steps start `todo` with fresh identifiers. Empty upstream input (no
/// plan for a sketch, no changes for a review) short-circuits to an empty
/// successful result without any backend work.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Produces a plan for the given prompt and emphasis options.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the backend cannot deliver a
    /// contract-shaped plan.
    async fn request_plan(
        &self,
        options: PlanGenerationOptions,
    ) -> GenerationResult<Generated<Vec<PlanStep>>>;

    /// Sketches code changes implementing the given plan.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the backend cannot deliver a
    /// contract-shaped change set.
    async fn request_implementation_sketch(
        &self,
        plan: &[PlanStep],
        options: ImplementationSeedOptions,
    ) -> GenerationResult<Generated<Vec<CodeChange>>>;

    /// Reviews the given changes and produces comments.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the backend cannot deliver a
    /// contract-shaped review batch.
    async fn request_review_comments(
        &self,
        changes: &[CodeChange],
        options: ReviewRunOptions,
    ) -> GenerationResult<Generated<Vec<ReviewComment>>>;
}

/// A complete generation result with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated<T> {
    /// Payload produced by the backend.
    pub payload: T,
    /// Identity of the backend that answered.
    pub provider: ProviderId,
    /// Optional success narrative supplied by the backend.
    pub note: Option<String>,
    /// Optional degradation notice (e.g. a fallback path was taken).
    pub warning: Option<String>,
}

impl<T> Generated<T> {
    /// Creates a result with no note or warning.
    #[must_use]
    pub const fn new(payload: T, provider: ProviderId) -> Self {
        Self {
            payload,
            provider,
            note: None,
            warning: None,
        }
    }

    /// Attaches a success narrative.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attaches a degradation notice.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }
}

/// Errors returned by generation gateway implementations.
///
/// Every variant carries a human-readable cause; the orchestrator records
/// it on the failing stage and leaves the task untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// The backend could not be reached or refused the call.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The backend answered with output violating the gateway contract.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The backend did not answer in time.
    #[error("generation timed out: {0}")]
    Timeout(String),
}

/// Requested verbosity of generated plan details.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTone {
    /// Terse outlines.
    #[default]
    Succinct,
    /// Expanded rationale per step.
    Detailed,
}

impl PlanTone {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succinct => "succinct",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for PlanTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a plan generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanGenerationOptions {
    prompt: String,
    focus_areas: Vec<String>,
    emphasize_tests: bool,
    tone: PlanTone,
}

impl PlanGenerationOptions {
    /// Creates options for the given prompt with succinct tone, no focus
    /// areas, and no test emphasis.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            focus_areas: Vec::new(),
            emphasize_tests: false,
            tone: PlanTone::default(),
        }
    }

    /// Sets the focus areas the plan should concentrate on.
    #[must_use]
    pub fn with_focus_areas(mut self, areas: impl IntoIterator<Item = String>) -> Self {
        self.focus_areas = areas.into_iter().collect();
        self
    }

    /// Sets whether the plan should emphasize test impact.
    #[must_use]
    pub const fn with_emphasize_tests(mut self, emphasize: bool) -> Self {
        self.emphasize_tests = emphasize;
        self
    }

    /// Sets the requested tone.
    #[must_use]
    pub const fn with_tone(mut self, tone: PlanTone) -> Self {
        self.tone = tone;
        self
    }

    /// Returns the generation prompt.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Returns the focus areas.
    #[must_use]
    pub fn focus_areas(&self) -> &[String] {
        &self.focus_areas
    }

    /// Returns whether test impact should be emphasized.
    #[must_use]
    pub const fn emphasize_tests(&self) -> bool {
        self.emphasize_tests
    }

    /// Returns the requested tone.
    #[must_use]
    pub const fn tone(&self) -> PlanTone {
        self.tone
    }
}

/// Options for an implementation sketch call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementationSeedOptions {
    related_plan_step_ids: Option<Vec<PlanStepId>>,
}

impl ImplementationSeedOptions {
    /// Creates options that let the generator pick related plan steps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts generated changes to the given plan steps.
    #[must_use]
    pub fn with_related_plan_steps(mut self, ids: impl IntoIterator<Item = PlanStepId>) -> Self {
        self.related_plan_step_ids = Some(ids.into_iter().collect());
        self
    }

    /// Returns the restricted plan step set, if any.
    #[must_use]
    pub fn related_plan_step_ids(&self) -> Option<&[PlanStepId]> {
        self.related_plan_step_ids.as_deref()
    }
}

/// Strictness of a review run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStrictness {
    /// Proportionate feedback.
    #[default]
    Balanced,
    /// Flag every change with blocking feedback.
    Paranoid,
}

impl ReviewStrictness {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Paranoid => "paranoid",
        }
    }
}

impl fmt::Display for ReviewStrictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a review run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewRunOptions {
    strictness: ReviewStrictness,
}

impl ReviewRunOptions {
    /// Creates options with balanced strictness.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the review strictness.
    #[must_use]
    pub const fn with_strictness(mut self, strictness: ReviewStrictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Returns the review strictness.
    #[must_use]
    pub const fn strictness(&self) -> ReviewStrictness {
        self.strictness
    }
}
