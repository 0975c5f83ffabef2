//! Workflow step tracker
//!
//! Gating for the actions a stage workflow offers. Actions are simulated:
//! a permitted action yields a receipt for the user, nothing is recorded,
//! and reading the workflow again returns exactly what was there before.

use crate::{
    EntityKind, ProgressStatus, StageWorkflow, StepId, StepKind, ValidationError, VerdantError,
    VerdantResult, WorkflowStepRecord,
};

/// An action a user can take on a workflow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    SubmitRequirement { query: String, instructions: String },
    DownloadPackage,
    UploadResult,
}

impl WorkflowAction {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowAction::SubmitRequirement { .. } => "submit requirement",
            WorkflowAction::DownloadPackage => "download package",
            WorkflowAction::UploadResult => "upload result",
        }
    }

    /// The step kind this action belongs to.
    pub fn step_kind(&self) -> StepKind {
        match self {
            WorkflowAction::SubmitRequirement { .. } => StepKind::ShareRequirement,
            WorkflowAction::DownloadPackage => StepKind::AcceptWork,
            WorkflowAction::UploadResult => StepKind::SubmitResult,
        }
    }
}

/// Whether a step of `kind` in `status` presents its action.
pub fn action_available(kind: StepKind, status: ProgressStatus) -> bool {
    match kind {
        StepKind::ShareRequirement | StepKind::AcceptWork => status == ProgressStatus::Running,
        StepKind::SubmitResult => status != ProgressStatus::Upcoming,
    }
}

/// Confirmation shown after a permitted action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReceipt {
    pub step_id: StepId,
    pub message: String,
}

/// Which step, if any, is expanded in the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepExpansion(Option<StepId>);

impl StepExpansion {
    pub fn expanded(&self) -> Option<StepId> {
        self.0
    }

    pub fn is_expanded(&self, step_id: StepId) -> bool {
        self.0 == Some(step_id)
    }

    /// Expand `step_id`, or collapse it if it is already expanded.
    pub fn toggle(&mut self, step_id: StepId) {
        self.0 = if self.0 == Some(step_id) {
            None
        } else {
            Some(step_id)
        };
    }

    pub fn collapse(&mut self) {
        self.0 = None;
    }
}

impl StageWorkflow {
    pub fn step(&self, step_id: StepId) -> Option<&WorkflowStepRecord> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// The running step whose action the UI should highlight.
    pub fn next_action_step(&self) -> Option<&WorkflowStepRecord> {
        self.steps
            .iter()
            .find(|s| s.status == ProgressStatus::Running)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == ProgressStatus::Completed)
            .count()
    }

    /// Check that steps are ordered by id and their statuses are monotonic:
    /// completed steps, then at most one running step, then upcoming steps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut previous: Option<&WorkflowStepRecord> = None;
        for step in &self.steps {
            if let Some(prev) = previous {
                if step.id <= prev.id {
                    return Err(ValidationError::InvalidValue {
                        field: "steps".to_string(),
                        reason: format!("step {} is listed after step {}", step.id, prev.id),
                    });
                }
                let regressed = step.status.rank() < prev.status.rank();
                let second_running = prev.status == ProgressStatus::Running
                    && step.status == ProgressStatus::Running;
                if regressed || second_running {
                    return Err(ValidationError::NonMonotonicSteps {
                        step_id: step.id,
                        status: step.status,
                    });
                }
            }
            if step.payload.is_some() && step.status != ProgressStatus::Completed {
                return Err(ValidationError::InvalidValue {
                    field: "payload".to_string(),
                    reason: format!("step {} has a payload but is not completed", step.id),
                });
            }
            previous = Some(step);
        }
        Ok(())
    }

    /// Attempt `action` on `step_id`.
    ///
    /// Rejected when the step does not exist, offers a different action, or
    /// is in a status where its action is not presented. Submitting a
    /// requirement additionally needs non-blank query text.
    pub fn perform(&self, step_id: StepId, action: &WorkflowAction) -> VerdantResult<ActionReceipt> {
        let step = self
            .step(step_id)
            .ok_or_else(|| VerdantError::not_found(EntityKind::WorkflowStep, step_id.to_string()))?;

        if step.kind != action.step_kind() {
            return Err(ValidationError::ActionMismatch {
                action: action.name().to_string(),
                step_id,
                step_name: step.name.clone(),
            }
            .into());
        }
        if !action_available(step.kind, step.status) {
            return Err(ValidationError::ActionNotPermitted {
                action: action.name().to_string(),
                step_id,
                status: step.status,
            }
            .into());
        }

        let message = match action {
            WorkflowAction::SubmitRequirement { query, .. } => {
                if query.trim().is_empty() {
                    return Err(ValidationError::EmptyRequiredField {
                        field: "query".to_string(),
                    }
                    .into());
                }
                match self.steps.iter().find(|s| s.id > step_id) {
                    Some(next) => format!(
                        "Requirement submitted successfully! Notification sent to {} team.",
                        next.authorized_role
                    ),
                    None => "Requirement submitted successfully!".to_string(),
                }
            }
            WorkflowAction::DownloadPackage => format!(
                "Downloading data package... ({} units released)",
                self.units_released
            ),
            WorkflowAction::UploadResult => {
                "Result uploaded successfully! Validation passed.".to_string()
            }
        };

        Ok(ActionReceipt { step_id, message })
    }
}
