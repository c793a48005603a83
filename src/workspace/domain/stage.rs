//! Per-stage generation call lifecycle tracking.

use super::{ParseStageError, ProviderId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A phase of the task lifecycle with its own generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Producing or reworking the plan.
    Planning,
    /// Sketching code changes from the plan.
    Implementation,
    /// Reviewing the current changes.
    Review,
}

impl Stage {
    /// All stages in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Planning, Self::Implementation, Self::Review];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Implementation => "implementation",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "planning" => Ok(Self::Planning),
            "implementation" => Ok(Self::Implementation),
            "review" => Ok(Self::Review),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

/// Lifecycle phase of a stage's generation call.
///
/// `Idle → Loading → {Success, Error}`; either terminal phase may re-enter
/// `Loading` when a new call starts. There is no cancelled phase: an
/// abandoned call simply never settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePhase {
    /// No call has run since the last reset.
    Idle,
    /// A call is in flight.
    Loading,
    /// The last call completed and its result was applied.
    Success,
    /// The last call failed; the task was left untouched.
    Error,
}

impl StagePhase {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for StagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call lifecycle record for one stage.
///
/// The text fields are mutually informative. `error` is populated only in
/// the `Error` phase; `warning` flags a degraded provider path taken
/// during an otherwise successful call; `message` carries the
/// idle/in-flight/success narrative. `updated_at` reflects the last
/// settled transition and is never stamped while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageState {
    phase: StagePhase,
    provider: ProviderId,
    message: Option<String>,
    warning: Option<String>,
    error: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl StageState {
    fn idle(provider: ProviderId) -> Self {
        let message = format!("Idle ({provider})");
        Self {
            phase: StagePhase::Idle,
            provider,
            message: Some(message),
            warning: None,
            error: None,
            updated_at: None,
        }
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> StagePhase {
        self.phase
    }

    /// Returns the provider that produced (or is producing) the result.
    #[must_use]
    pub const fn provider(&self) -> &ProviderId {
        &self.provider
    }

    /// Returns the idle/in-flight/success narrative, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the degraded-path notice, if any.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Returns the failure cause, if the stage is in the `Error` phase.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the timestamp of the last settled transition.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Lifecycle records for all three stages plus the current provider.
///
/// The transition logic is written once and parameterized by [`Stage`];
/// the three records only differ by which slot they occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTracker {
    provider: ProviderId,
    planning: StageState,
    implementation: StageState,
    review: StageState,
}

impl StageTracker {
    /// Creates a tracker with all stages idle for the given provider.
    #[must_use]
    pub fn new(provider: ProviderId) -> Self {
        Self {
            planning: StageState::idle(provider.clone()),
            implementation: StageState::idle(provider.clone()),
            review: StageState::idle(provider.clone()),
            provider,
        }
    }

    /// Returns the provider of the most recent successful call, or the
    /// provider the tracker was reset with.
    #[must_use]
    pub const fn provider(&self) -> &ProviderId {
        &self.provider
    }

    /// Returns the record for the given stage.
    #[must_use]
    pub const fn stage(&self, stage: Stage) -> &StageState {
        match stage {
            Stage::Planning => &self.planning,
            Stage::Implementation => &self.implementation,
            Stage::Review => &self.review,
        }
    }

    fn slot_mut(&mut self, stage: Stage) -> &mut StageState {
        match stage {
            Stage::Planning => &mut self.planning,
            Stage::Implementation => &mut self.implementation,
            Stage::Review => &mut self.review,
        }
    }

    /// Transitions the stage to `Loading` with an in-flight message.
    ///
    /// Clears any previous warning or error; the provider and `updated_at`
    /// still reflect the last settled call.
    pub fn begin(&mut self, stage: Stage, message: impl Into<String>) {
        let slot = self.slot_mut(stage);
        slot.phase = StagePhase::Loading;
        slot.message = Some(message.into());
        slot.warning = None;
        slot.error = None;
    }

    /// Transitions the stage to `Success`, adopting the answering provider.
    pub fn succeed(
        &mut self,
        stage: Stage,
        provider: ProviderId,
        message: impl Into<String>,
        warning: Option<String>,
        clock: &impl Clock,
    ) {
        let timestamp = clock.utc();
        let slot = self.slot_mut(stage);
        slot.phase = StagePhase::Success;
        slot.provider = provider.clone();
        slot.message = Some(message.into());
        slot.warning = warning;
        slot.error = None;
        slot.updated_at = Some(timestamp);
        self.provider = provider;
    }

    /// Transitions the stage to `Error`, keeping the prior provider.
    pub fn fail(&mut self, stage: Stage, error: impl Into<String>, clock: &impl Clock) {
        let timestamp = clock.utc();
        let slot = self.slot_mut(stage);
        slot.phase = StagePhase::Error;
        slot.error = Some(error.into());
        slot.message = None;
        slot.updated_at = Some(timestamp);
    }

    /// Settles the stage back to `Idle` with an informative message.
    ///
    /// Used when an operator action pre-empts a stage without any call
    /// being attempted (e.g. marking all changes ready resets the review
    /// stage); not a failure, so the timestamp is still stamped.
    pub fn settle_idle(&mut self, stage: Stage, message: impl Into<String>, clock: &impl Clock) {
        let timestamp = clock.utc();
        let slot = self.slot_mut(stage);
        slot.phase = StagePhase::Idle;
        slot.message = Some(message.into());
        slot.warning = None;
        slot.error = None;
        slot.updated_at = Some(timestamp);
    }

    /// Reinitializes every stage to `Idle` for the given provider.
    pub fn reset(&mut self, provider: ProviderId) {
        *self = Self::new(provider);
    }
}
