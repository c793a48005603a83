//! Integration tests for operator edits and their merge rules.

use rstest::rstest;

use atelier::workspace::domain::{ChangePatch, CodeChangeStatus, Stage, StagePhase};
use atelier::workspace::ports::{ImplementationSeedOptions, ReviewRunOptions};
use atelier::workspace::services::ManualChangeRequest;

use super::helpers::{ensure_all_statuses, local_service, plan_options};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manual_changes_may_stack_on_one_path() {
    let service = local_service();

    service
        .add_manual_change(ManualChangeRequest::new(
            "src/config.rs",
            "First pass",
            "Split the loader.",
        ))
        .await;
    let task = service
        .add_manual_change(ManualChangeRequest::new(
            "src/config.rs",
            "Second pass",
            "Tighten the validation.",
        ))
        .await;

    assert_eq!(task.changes().len(), 2);
    assert!(
        task.changes()
            .iter()
            .all(|change| change.file_path() == "src/config.rs")
    );
    assert!(
        task.changes()
            .iter()
            .all(|change| change.status() == CodeChangeStatus::Draft)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manual_change_defaults_placeholder_blocks() {
    let service = local_service();

    let task = service
        .add_manual_change(ManualChangeRequest::new(
            "src/logging.rs",
            "Introduce structured logging",
            "Replace ad-hoc prints.",
        ))
        .await;

    let change = task.changes().first().expect("manual change");
    assert!(!change.before().is_empty());
    assert!(!change.after().is_empty());
    assert!(change.related_plan_step_ids().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_change_patches_only_given_fields() {
    let service = local_service();
    let task = service
        .add_manual_change(
            ManualChangeRequest::new("src/logging.rs", "Introduce logging", "Replace prints.")
                .with_after("// new logging setup\n"),
        )
        .await;
    let change_id = task.changes().first().expect("manual change").id();

    let updated = service
        .update_change(change_id, ChangePatch::new().with_summary("Adopt tracing"))
        .await;

    let change = updated.changes().first().expect("manual change");
    assert_eq!(change.summary(), "Adopt tracing");
    assert_eq!(change.rationale(), "Replace prints.");
    assert_eq!(change.after(), "// new logging setup\n");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_all_ready_scenario_resets_the_review_stage() {
    let service = local_service();
    let task = service
        .add_manual_change(ManualChangeRequest::new("src/a.rs", "Edit a", "Why a."))
        .await;
    let change_id = task.changes().first().expect("change").id();
    service
        .update_change_status(change_id, CodeChangeStatus::Ready)
        .await;
    service
        .add_manual_change(ManualChangeRequest::new("src/b.rs", "Edit b", "Why b."))
        .await;

    let readied = service.mark_all_changes_ready().await;

    ensure_all_statuses(readied.changes(), CodeChangeStatus::Ready)
        .expect("every change should be ready");
    assert!(readied.reviews().is_empty());
    let stage = service.stage(Stage::Review).await;
    assert_eq!(stage.phase(), StagePhase::Idle);
    assert!(stage.error().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_change_prunes_its_reviews() {
    let service = local_service();
    service.regenerate_plan(plan_options()).await;
    service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;
    let reviewed = service.run_review(ReviewRunOptions::new()).await;
    let doomed = reviewed.changes().first().expect("seeded change");
    let doomed_id = doomed.id();
    let doomed_path = doomed.file_path().to_owned();
    assert!(
        reviewed
            .reviews()
            .iter()
            .any(|comment| comment.file_path() == doomed_path)
    );

    let task = service.remove_change(doomed_id).await;

    assert_eq!(task.changes().len(), 2);
    assert!(
        task.reviews()
            .iter()
            .all(|comment| comment.file_path() != doomed_path)
    );
    assert!(!task.reviews().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn toggling_review_resolution_round_trips() {
    let service = local_service();
    service.regenerate_plan(plan_options()).await;
    service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;
    let reviewed = service.run_review(ReviewRunOptions::new()).await;
    let review_id = reviewed.reviews().first().expect("review").id();

    let resolved = service.toggle_review_resolved(review_id).await;
    assert!(
        resolved
            .reviews()
            .first()
            .expect("review")
            .resolved()
    );

    let unresolved = service.toggle_review_resolved(review_id).await;
    assert!(
        !unresolved
            .reviews()
            .first()
            .expect("review")
            .resolved()
    );
}
