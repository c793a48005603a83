//! Provider fallback decorator for generation gateways.

use async_trait::async_trait;

use crate::workspace::domain::{CodeChange, PlanStep, ReviewComment};
use crate::workspace::ports::{
    Generated, GenerationError, GenerationGateway, GenerationResult, ImplementationSeedOptions,
    PlanGenerationOptions, ReviewRunOptions,
};

/// Gateway decorator that serves failed primary calls from a secondary
/// backend.
///
/// A successful fallback carries the secondary's provider identity and a
/// warning naming the primary failure, so the stage tracker can surface
/// the degraded path. When both backends fail the primary failure is
/// reported as the cause.
#[derive(Debug, Clone)]
pub struct FallbackGateway<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackGateway<P, S>
where
    P: GenerationGateway,
    S: GenerationGateway,
{
    /// Creates a decorator over the given primary and secondary backends.
    #[must_use]
    pub const fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl<P, S> GenerationGateway for FallbackGateway<P, S>
where
    P: GenerationGateway,
    S: GenerationGateway,
{
    async fn request_plan(
        &self,
        options: PlanGenerationOptions,
    ) -> GenerationResult<Generated<Vec<PlanStep>>> {
        match self.primary.request_plan(options.clone()).await {
            Ok(result) => Ok(result),
            Err(primary_error) => {
                tracing::warn!(error = %primary_error, "primary plan provider failed; trying fallback");
                match self.secondary.request_plan(options).await {
                    Ok(result) => Ok(annotate(result, &primary_error)),
                    Err(fallback_error) => {
                        tracing::error!(error = %fallback_error, "fallback plan provider failed as well");
                        Err(primary_error)
                    }
                }
            }
        }
    }

    async fn request_implementation_sketch(
        &self,
        plan: &[PlanStep],
        options: ImplementationSeedOptions,
    ) -> GenerationResult<Generated<Vec<CodeChange>>> {
        match self
            .primary
            .request_implementation_sketch(plan, options.clone())
            .await
        {
            Ok(result) => Ok(result),
            Err(primary_error) => {
                tracing::warn!(error = %primary_error, "primary sketch provider failed; trying fallback");
                match self.secondary.request_implementation_sketch(plan, options).await {
                    Ok(result) => Ok(annotate(result, &primary_error)),
                    Err(fallback_error) => {
                        tracing::error!(error = %fallback_error, "fallback sketch provider failed as well");
                        Err(primary_error)
                    }
                }
            }
        }
    }

    async fn request_review_comments(
        &self,
        changes: &[CodeChange],
        options: ReviewRunOptions,
    ) -> GenerationResult<Generated<Vec<ReviewComment>>> {
        match self.primary.request_review_comments(changes, options).await {
            Ok(result) => Ok(result),
            Err(primary_error) => {
                tracing::warn!(error = %primary_error, "primary review provider failed; trying fallback");
                match self.secondary.request_review_comments(changes, options).await {
                    Ok(result) => Ok(annotate(result, &primary_error)),
                    Err(fallback_error) => {
                        tracing::error!(error = %fallback_error, "fallback review provider failed as well");
                        Err(primary_error)
                    }
                }
            }
        }
    }
}

/// Stamps a fallback-served result with the degradation warning.
fn annotate<T>(result: Generated<T>, primary_error: &GenerationError) -> Generated<T> {
    let provider = result.provider.clone();
    result.with_warning(format!(
        "Primary provider failed ({primary_error}); served by {provider}.",
    ))
}
