use proptest::prelude::*;
use verdant_core::{
    action_available, ProgressStatus, StepKind, ValidationError, VerdantError, WorkflowAction,
};
use verdant_test_utils::fixtures;
use verdant_test_utils::generators::arb_monotonic_workflow;
use verdant_test_utils::{DeliverySource, WorkflowBuilder};

fn action_for(kind: StepKind, query: &str) -> WorkflowAction {
    match kind {
        StepKind::ShareRequirement => WorkflowAction::SubmitRequirement {
            query: query.to_string(),
            instructions: String::new(),
        },
        StepKind::AcceptWork => WorkflowAction::DownloadPackage,
        StepKind::SubmitResult => WorkflowAction::UploadResult,
    }
}

#[test]
fn builtin_workflow_submit_is_closed_after_completion() {
    let source = fixtures::builtin_source();
    let workflow = source.workflow_steps("DP-2025-001").expect("labelling workflow");
    let before = workflow.clone();

    let err = workflow
        .perform(1, &action_for(StepKind::ShareRequirement, "SELECT 1"))
        .unwrap_err();
    assert!(matches!(
        err,
        VerdantError::Validation(ValidationError::ActionNotPermitted { .. })
    ));

    let receipt = workflow
        .perform(2, &WorkflowAction::DownloadPackage)
        .expect("download on running step");
    assert_eq!(receipt.step_id, 2);
    assert_eq!(workflow, &before);
}

#[test]
fn upload_on_upcoming_step_is_rejected() {
    let source = fixtures::builtin_source();
    let workflow = source.workflow_steps("DP-2025-001").expect("labelling workflow");
    assert!(workflow.perform(3, &WorkflowAction::UploadResult).is_err());
}

#[test]
fn workflow_builder_output_validates() {
    let workflow = WorkflowBuilder::new(2, "Shapefile Correction")
        .counters(10, 10, 0, 10)
        .step("Share", StepKind::ShareRequirement, "PM", ProgressStatus::Completed)
        .step("Accept", StepKind::AcceptWork, "GIS", ProgressStatus::Upcoming)
        .build();
    assert!(workflow.validate().is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_perform_follows_gating_and_never_mutates(
        workflow in arb_monotonic_workflow(),
        step_index in 0usize..3,
        query in prop::sample::select(vec!["", "   ", "SELECT feeder_id FROM feeders"]),
    ) {
        let before = workflow.clone();
        let step = &workflow.steps[step_index];
        let result = workflow.perform(step.id, &action_for(step.kind, query));

        let available = action_available(step.kind, step.status);
        let blank = step.kind == StepKind::ShareRequirement && query.trim().is_empty();
        prop_assert_eq!(result.is_ok(), available && !blank);
        if available && blank {
            let is_empty_query = matches!(
                result,
                Err(VerdantError::Validation(ValidationError::EmptyRequiredField { .. }))
            );
            prop_assert!(is_empty_query);
        }
        prop_assert_eq!(&workflow, &before);
    }

    #[test]
    fn prop_at_most_one_running_step(workflow in arb_monotonic_workflow()) {
        let running = workflow
            .steps
            .iter()
            .filter(|s| s.status == ProgressStatus::Running)
            .count();
        prop_assert!(running <= 1);
        prop_assert_eq!(
            workflow.next_action_step().is_some(),
            running == 1
        );
    }
}
