//! Integration tests for derived metrics across a task lifecycle.

use rstest::rstest;

use atelier::workspace::domain::{PlanStepId, PlanStepStatus};
use atelier::workspace::ports::{ImplementationSeedOptions, ReviewRunOptions};

use super::helpers::{local_service, plan_options};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn confidence_progresses_through_the_lifecycle() {
    let service = local_service();

    // Fresh starter task: nothing done, nothing to clear.
    let opening = service.metrics().await;
    assert_eq!(opening.confidence(), 25);

    // Plan regenerated, all steps completed.
    let planned = service.regenerate_plan(plan_options()).await;
    let step_ids: Vec<PlanStepId> = planned.plan().iter().map(|step| step.id()).collect();
    for step_id in step_ids {
        service
            .update_plan_step_status(step_id, PlanStepStatus::Done)
            .await;
    }
    assert_eq!(service.metrics().await.confidence(), 65);

    // Draft changes seeded: readiness drops in, clearance falls to zero.
    service
        .seed_implementation(ImplementationSeedOptions::new())
        .await;
    assert_eq!(service.metrics().await.confidence(), 40);

    // Everything readied for review.
    service.mark_all_changes_ready().await;
    assert_eq!(service.metrics().await.confidence(), 75);

    // Feedback received but unresolved.
    let reviewed = service.run_review(ReviewRunOptions::new()).await;
    assert_eq!(service.metrics().await.confidence(), 75);

    // Every comment resolved.
    for comment in reviewed.reviews() {
        service.toggle_review_resolved(comment.id()).await;
    }
    assert_eq!(service.metrics().await.confidence(), 100);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ratios_stay_in_bounds_at_every_step() {
    let service = local_service();

    let checkpoints = [
        service.metrics().await,
        {
            service.regenerate_plan(plan_options()).await;
            service.metrics().await
        },
        {
            service
                .seed_implementation(ImplementationSeedOptions::new())
                .await;
            service.metrics().await
        },
        {
            service.run_review(ReviewRunOptions::new()).await;
            service.metrics().await
        },
        {
            service.clear_workspace().await;
            service.metrics().await
        },
    ];

    for metrics in checkpoints {
        for ratio in [
            metrics.plan_completion(),
            metrics.change_readiness(),
            metrics.review_clearance(),
        ] {
            assert!((0.0..=1.0).contains(&ratio));
        }
        assert!(metrics.confidence() <= 100);
    }
}
