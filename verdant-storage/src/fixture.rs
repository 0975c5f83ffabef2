//! Fixture data set and its load-time validation.

use crate::SourceResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use verdant_core::{
    AuditLogEntry, CustomerRecord, DeliveryId, DeliveryRecord, StageCatalog, StageWorkflow,
    ValidationError,
};

/// The fixture shipped with the binary.
pub const BUILTIN_FIXTURE: &str = include_str!("../fixtures/builtin.json");

/// Everything a data source serves, in its on-disk shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureData {
    pub stages: StageCatalog,
    pub customers: Vec<CustomerRecord>,
    pub deliveries: Vec<DeliveryRecord>,
    #[serde(default)]
    pub workflows: BTreeMap<DeliveryId, StageWorkflow>,
    #[serde(default)]
    pub audit_logs: BTreeMap<DeliveryId, Vec<AuditLogEntry>>,
}

impl FixtureData {
    pub fn from_json(json: &str) -> SourceResult<Self> {
        let data: FixtureData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Check cross-record consistency.
    ///
    /// Catalog contiguity is already enforced when the catalog deserializes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut customer_ids = HashSet::new();
        for customer in &self.customers {
            if !customer_ids.insert(customer.id.as_str()) {
                return Err(duplicate("customers", &customer.id));
            }
        }

        let stage_count = self.stages.len();
        let mut delivery_ids = HashSet::new();
        for delivery in &self.deliveries {
            if !delivery_ids.insert(delivery.id.as_str()) {
                return Err(duplicate("deliveries", &delivery.id));
            }
            if !customer_ids.contains(delivery.customer_id.as_str()) {
                return Err(ValidationError::UnknownCustomer {
                    delivery_id: delivery.id.clone(),
                    customer_id: delivery.customer_id.clone(),
                });
            }
            if delivery.current_stage_index as usize >= stage_count {
                return Err(ValidationError::InvalidValue {
                    field: "currentStageIndex".to_string(),
                    reason: format!(
                        "{} points at stage {} but the catalog has {} stages",
                        delivery.id, delivery.current_stage_index, stage_count
                    ),
                });
            }
        }

        for (delivery_id, workflow) in &self.workflows {
            if !delivery_ids.contains(delivery_id.as_str()) {
                return Err(unknown_delivery("workflows", delivery_id));
            }
            if self.stages.get(workflow.stage_id).is_none() {
                return Err(ValidationError::InvalidValue {
                    field: "stageId".to_string(),
                    reason: format!(
                        "workflow for {} references unknown stage {}",
                        delivery_id, workflow.stage_id
                    ),
                });
            }
            workflow.validate()?;
        }

        for delivery_id in self.audit_logs.keys() {
            if !delivery_ids.contains(delivery_id.as_str()) {
                return Err(unknown_delivery("auditLogs", delivery_id));
            }
        }

        Ok(())
    }
}

fn duplicate(field: &str, id: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        reason: format!("duplicate id {id}"),
    }
}

fn unknown_delivery(field: &str, id: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        reason: format!("unknown delivery {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_core::ProgressStatus;

    fn builtin() -> FixtureData {
        FixtureData::from_json(BUILTIN_FIXTURE).unwrap()
    }

    #[test]
    fn builtin_fixture_is_valid() {
        let data = builtin();
        assert_eq!(data.stages.len(), 9);
        assert_eq!(data.customers.len(), 5);
        assert_eq!(data.deliveries.len(), 9);
        assert_eq!(data.workflows.len(), 1);
        assert_eq!(data.audit_logs["DP-2025-001"].len(), 8);
    }

    #[test]
    fn unknown_customer_is_rejected() {
        let mut data = builtin();
        data.deliveries[0].customer_id = "cust-999".to_string();
        assert!(matches!(
            data.validate(),
            Err(ValidationError::UnknownCustomer { .. })
        ));
    }

    #[test]
    fn non_monotonic_workflow_is_rejected() {
        let mut data = builtin();
        if let Some(workflow) = data.workflows.get_mut("DP-2025-001") {
            workflow.steps[1].status = ProgressStatus::Upcoming;
            workflow.steps[2].status = ProgressStatus::Running;
            workflow.steps[0].status = ProgressStatus::Running;
            workflow.steps[0].payload = None;
        }
        assert!(matches!(
            data.validate(),
            Err(ValidationError::NonMonotonicSteps { step_id: 3, .. })
        ));
    }

    #[test]
    fn duplicate_delivery_is_rejected() {
        let mut data = builtin();
        let copy = data.deliveries[0].clone();
        data.deliveries.push(copy);
        assert!(matches!(
            data.validate(),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn stage_index_outside_catalog_is_rejected() {
        let mut data = builtin();
        data.deliveries[0].current_stage_index = 9;
        assert!(data.validate().is_err());
    }

    #[test]
    fn gapped_catalog_fails_to_parse() {
        let json = BUILTIN_FIXTURE.replacen("\"id\": 8,", "\"id\": 80,", 1);
        assert!(FixtureData::from_json(&json).is_err());
    }
}
