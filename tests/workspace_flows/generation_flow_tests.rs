//! Integration tests for the plan, seed, and review lifecycles.

use std::collections::HashSet;

use rstest::rstest;
use uuid::Uuid;

use atelier::workspace::domain::{
    CodeChangeStatus, PlanStepStatus, ReviewSeverity, Stage, StagePhase,
};
use atelier::workspace::ports::{
    ImplementationSeedOptions, ReviewRunOptions, ReviewStrictness,
};

use super::helpers::{ensure_all_statuses, local_service, plan_options, service_over, OutageGateway};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_task_plan_regeneration_scenario() {
    let service = local_service();

    let task = service.regenerate_plan(plan_options()).await;

    assert_eq!(task.prompt(), "Add logging");
    assert_eq!(task.plan().len(), 4);
    assert!(
        task.plan()
            .iter()
            .all(|step| step.status() == PlanStepStatus::Todo)
    );
    assert!(task.changes().is_empty());
    assert!(task.reviews().is_empty());
    assert_eq!(service.stage(Stage::Planning).await.phase(), StagePhase::Success);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeding_links_draft_changes_to_plan_steps() {
    let service = local_service();
    let planned = service.regenerate_plan(plan_options()).await;
    let plan_ids: HashSet<Uuid> = planned
        .plan()
        .iter()
        .map(|step| step.id().into_inner())
        .collect();

    let task = service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;

    assert_eq!(task.changes().len(), 3);
    ensure_all_statuses(task.changes(), CodeChangeStatus::Draft)
        .expect("seeded changes should start as drafts");
    for change in task.changes() {
        assert!(
            change
                .related_plan_step_ids()
                .iter()
                .all(|id| plan_ids.contains(id.as_ref()))
        );
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paranoid_review_yields_an_error_per_change() {
    let service = local_service();
    service.regenerate_plan(plan_options()).await;
    service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;
    let readied = service.mark_all_changes_ready().await;
    assert_eq!(readied.changes().len(), 3);

    let task = service
        .run_review(ReviewRunOptions::new().with_strictness(ReviewStrictness::Paranoid))
        .await;

    assert!(task.reviews().len() >= task.changes().len());
    for change in task.changes() {
        assert!(task.reviews().iter().any(|comment| {
            comment.file_path() == change.file_path()
                && comment.severity() == ReviewSeverity::Error
        }));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replanning_invalidates_downstream_artifacts() {
    let service = local_service();
    service.regenerate_plan(plan_options()).await;
    service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;
    let reviewed = service.run_review(ReviewRunOptions::new()).await;
    assert!(!reviewed.changes().is_empty());
    assert!(!reviewed.reviews().is_empty());

    let task = service.regenerate_plan(plan_options()).await;

    assert_eq!(task.plan().len(), 4);
    assert!(task.changes().is_empty());
    assert!(task.reviews().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_plan_call_settles_the_stage_and_preserves_the_plan() {
    let service = service_over(OutageGateway);
    let before = service.task().await;

    let after = service.regenerate_plan(plan_options()).await;

    assert_eq!(after.plan(), before.plan());
    let stage = service.stage(Stage::Planning).await;
    assert_eq!(stage.phase(), StagePhase::Error);
    assert!(stage.error().is_some_and(|cause| !cause.is_empty()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn identifiers_stay_unique_across_interleaved_intents() {
    let service = local_service();
    service.regenerate_plan(plan_options()).await;
    service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;
    // A second seed exercises the dedup merge path.
    service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;
    let task = service
        .run_review(ReviewRunOptions::new().with_strictness(ReviewStrictness::Paranoid))
        .await;

    let step_ids: HashSet<Uuid> = task
        .plan()
        .iter()
        .map(|step| step.id().into_inner())
        .collect();
    let change_ids: HashSet<Uuid> = task
        .changes()
        .iter()
        .map(|change| change.id().into_inner())
        .collect();
    let review_ids: HashSet<Uuid> = task
        .reviews()
        .iter()
        .map(|comment| comment.id().into_inner())
        .collect();

    assert_eq!(step_ids.len(), task.plan().len());
    assert_eq!(change_ids.len(), task.changes().len());
    assert_eq!(review_ids.len(), task.reviews().len());
}
