//! Shared fixtures and fakes for workspace flow tests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;

use atelier::workspace::adapters::LocalGenerator;
use atelier::workspace::domain::{CodeChange, CodeChangeStatus, PlanStep, ProviderId, ReviewComment};
use atelier::workspace::ports::{
    Generated, GenerationError, GenerationGateway, GenerationResult, ImplementationSeedOptions,
    PlanGenerationOptions, ReviewRunOptions,
};
use atelier::workspace::services::WorkspaceService;

/// Builds a workspace service over the deterministic local generator.
pub fn local_service() -> WorkspaceService<LocalGenerator, DefaultClock> {
    WorkspaceService::new(
        Arc::new(LocalGenerator::new()),
        Arc::new(DefaultClock),
        ProviderId::new("local"),
    )
}

/// Builds a workspace service over an arbitrary gateway.
pub fn service_over<G: GenerationGateway>(gateway: G) -> WorkspaceService<G, DefaultClock> {
    WorkspaceService::new(
        Arc::new(gateway),
        Arc::new(DefaultClock),
        ProviderId::new("local"),
    )
}

/// Plan options used by the lifecycle scenarios.
pub fn plan_options() -> PlanGenerationOptions {
    PlanGenerationOptions::new("Add logging")
        .with_focus_areas(vec!["observability".to_owned()])
        .with_emphasize_tests(true)
}

/// Asserts every change in the slice carries the expected status.
///
/// # Errors
///
/// Returns an error naming the first change whose status differs.
pub fn ensure_all_statuses(
    changes: &[CodeChange],
    expected: CodeChangeStatus,
) -> Result<(), eyre::Report> {
    for change in changes {
        eyre::ensure!(
            change.status() == expected,
            "change {} has status {}, expected {}",
            change.file_path(),
            change.status(),
            expected
        );
    }
    Ok(())
}

/// Gateway that fails every call with an outage.
pub struct OutageGateway;

#[async_trait]
impl GenerationGateway for OutageGateway {
    async fn request_plan(
        &self,
        _options: PlanGenerationOptions,
    ) -> GenerationResult<Generated<Vec<PlanStep>>> {
        Err(GenerationError::ProviderUnavailable(
            "upstream generation service is unreachable".to_owned(),
        ))
    }

    async fn request_implementation_sketch(
        &self,
        _plan: &[PlanStep],
        _options: ImplementationSeedOptions,
    ) -> GenerationResult<Generated<Vec<CodeChange>>> {
        Err(GenerationError::ProviderUnavailable(
            "upstream generation service is unreachable".to_owned(),
        ))
    }

    async fn request_review_comments(
        &self,
        _changes: &[CodeChange],
        _options: ReviewRunOptions,
    ) -> GenerationResult<Generated<Vec<ReviewComment>>> {
        Err(GenerationError::ProviderUnavailable(
            "upstream generation service is unreachable".to_owned(),
        ))
    }
}
