//! Error types for Verdant operations

use crate::{EntityKind, ProgressStatus, StepId};
use thiserror::Error;

/// Lookup errors. Raised only by the `require_*` helpers; plain lookups
/// return `Option` so views can render a not-found fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    EmptyRequiredField { field: String },

    #[error("'{action}' is not available on step {step_id} while it is {status}")]
    ActionNotPermitted {
        action: String,
        step_id: StepId,
        status: ProgressStatus,
    },

    #[error("'{action}' does not apply to step {step_id} ({step_name})")]
    ActionMismatch {
        action: String,
        step_id: StepId,
        step_name: String,
    },

    #[error("Workflow step {step_id} is {status} after an earlier step that is not completed")]
    NonMonotonicSteps { step_id: StepId, status: ProgressStatus },

    #[error("Stage catalog is not contiguous: expected id {expected}, found {found}")]
    CatalogNotContiguous { expected: u32, found: u32 },

    #[error("Delivery {delivery_id} references unknown customer {customer_id}")]
    UnknownCustomer {
        delivery_id: String,
        customer_id: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Master error type for all Verdant errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerdantError {
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl VerdantError {
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        VerdantError::Lookup(LookupError::NotFound {
            entity,
            id: id.into(),
        })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, VerdantError::Lookup(LookupError::NotFound { .. }))
    }
}

/// Result type alias for Verdant operations.
pub type VerdantResult<T> = Result<T, VerdantError>;
