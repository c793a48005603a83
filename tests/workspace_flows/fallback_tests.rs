//! Integration tests for the provider fallback decorator.

use rstest::rstest;

use atelier::workspace::adapters::{FallbackGateway, LocalGenerator};
use atelier::workspace::domain::{Stage, StagePhase};

use super::helpers::{plan_options, service_over, OutageGateway};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fallback_serves_the_plan_with_a_degradation_warning() {
    let gateway = FallbackGateway::new(OutageGateway, LocalGenerator::new());
    let service = service_over(gateway);

    let task = service.regenerate_plan(plan_options()).await;

    assert_eq!(task.plan().len(), 4);
    let stage = service.stage(Stage::Planning).await;
    assert_eq!(stage.phase(), StagePhase::Success);
    assert_eq!(stage.provider().as_str(), "local");
    assert!(
        stage
            .warning()
            .is_some_and(|warning| warning.contains("Primary provider failed"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn double_outage_surfaces_the_primary_cause() {
    let gateway = FallbackGateway::new(OutageGateway, OutageGateway);
    let service = service_over(gateway);
    let before = service.task().await;

    let after = service.regenerate_plan(plan_options()).await;

    assert_eq!(after, before);
    let stage = service.stage(Stage::Planning).await;
    assert_eq!(stage.phase(), StagePhase::Error);
    assert!(
        stage
            .error()
            .is_some_and(|cause| cause.contains("unreachable"))
    );
}
