//! Core entity structures

use crate::{
    derive_stage_progress, CalendarDate, CustomerId, DeliveryId, DeliveryStatus, NetworkType,
    ProgressStatus, StageId, StepId, StepKind, Timestamp, UnitCount, ValidationError,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// STAGES
// ============================================================================

/// One phase of the delivery pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDefinition {
    pub id: StageId,
    pub name: String,
    pub short_name: String,
    pub description: String,
}

/// Ordered stage definitions. Ids are exactly `0..len`, so position and id
/// always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StageDefinition>", into = "Vec<StageDefinition>")]
pub struct StageCatalog {
    stages: Vec<StageDefinition>,
}

impl StageCatalog {
    /// Build a catalog, rejecting gaps or out-of-order ids.
    pub fn new(stages: Vec<StageDefinition>) -> Result<Self, ValidationError> {
        for (expected, stage) in stages.iter().enumerate() {
            let expected = expected as StageId;
            if stage.id != expected {
                return Err(ValidationError::CatalogNotContiguous {
                    expected,
                    found: stage.id,
                });
            }
        }
        Ok(Self { stages })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, id: StageId) -> Option<&StageDefinition> {
        self.stages.get(id as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StageDefinition> {
        self.stages.iter()
    }

    pub fn definitions(&self) -> &[StageDefinition] {
        &self.stages
    }

    /// The cursor value that marks every stage as completed.
    pub fn past_last_index(&self) -> i64 {
        self.stages.len() as i64
    }
}

impl TryFrom<Vec<StageDefinition>> for StageCatalog {
    type Error = ValidationError;

    fn try_from(stages: Vec<StageDefinition>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl From<StageCatalog> for Vec<StageDefinition> {
    fn from(catalog: StageCatalog) -> Self {
        catalog.stages
    }
}

impl<'a> IntoIterator for &'a StageCatalog {
    type Item = &'a StageDefinition;
    type IntoIter = std::slice::Iter<'a, StageDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

/// Derived progress of one stage for one delivery record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgress {
    pub stage_id: StageId,
    pub status: ProgressStatus,
    pub units_processed: UnitCount,
    pub units_total: UnitCount,
}

// ============================================================================
// CUSTOMERS AND DELIVERIES
// ============================================================================

/// A utility customer under contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub industry: String,
    pub hq_country: String,
    pub hq_state: String,
    /// Annual recurring revenue in whole currency units.
    pub arr: u64,
    pub contract_id: String,
    pub contract_start_date: CalendarDate,
    pub contract_end_date: CalendarDate,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_role: String,
}

/// One phase of work delivered to a customer.
///
/// Per-stage progress is not stored; call [`DeliveryRecord::stages`] to
/// project it from the stage cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub id: DeliveryId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub contract_id: String,
    pub delivery_year: i32,
    pub phase_number: u32,
    #[serde(alias = "feederCount")]
    pub unit_count: UnitCount,
    pub network_type: NetworkType,
    pub start_date: CalendarDate,
    pub estimated_delivery_date: CalendarDate,
    #[serde(alias = "currentStage")]
    pub current_stage_index: StageId,
    pub current_stage_name: String,
    /// ETA of the current stage; `None` once the pipeline is finished.
    #[serde(default)]
    pub stage_eta: Option<CalendarDate>,
    pub status: DeliveryStatus,
    /// Cursor fed to the progress projection when it differs from
    /// `current_stage_index` (finished records use the catalog length).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_cursor: Option<i64>,
}

impl DeliveryRecord {
    pub fn stage_cursor(&self) -> i64 {
        self.stage_cursor
            .unwrap_or(i64::from(self.current_stage_index))
    }

    /// Project per-stage progress against `catalog`.
    pub fn stages(&self, catalog: &StageCatalog) -> Vec<StageProgress> {
        derive_stage_progress(catalog, self.stage_cursor(), self.unit_count)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// ============================================================================
// WORKFLOWS
// ============================================================================

/// Free-form inputs captured when a step was completed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// One ordered sub-task of a stage workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStepRecord {
    pub id: StepId,
    pub name: String,
    pub kind: StepKind,
    pub authorized_role: String,
    pub description: String,
    pub status: ProgressStatus,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub completed_by: Option<String>,
    /// Only present on completed steps.
    #[serde(default)]
    pub payload: Option<StepPayload>,
}

/// The dedicated workflow of one stage of one delivery record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageWorkflow {
    pub stage_id: StageId,
    pub stage_name: String,
    // The four counters are independent inputs with no arithmetic relation.
    pub units_in_scope: UnitCount,
    pub units_released: UnitCount,
    pub units_already_processed: UnitCount,
    pub units_remaining: UnitCount,
    pub steps: Vec<WorkflowStepRecord>,
}

// ============================================================================
// AUDIT
// ============================================================================

/// Immutable record of a past event on a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: Timestamp,
    pub user: String,
    pub role: String,
    pub action: String,
    pub details: String,
    pub stage: String,
}
