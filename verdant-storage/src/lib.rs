//! Verdant Storage - Data Source Layer
//!
//! The `DeliverySource` trait is the only way the dashboard reads delivery
//! data. `InMemorySource` serves a validated fixture, either the one built
//! into the binary or a JSON file in the same shape.

mod error;
mod fixture;

pub use error::{SourceError, SourceResult};
pub use fixture::{FixtureData, BUILTIN_FIXTURE};

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use verdant_core::{
    AuditLogEntry, CustomerRecord, DeliveryRecord, EntityKind, Partition, StageCatalog,
    StageWorkflow, VerdantError, VerdantResult,
};

// ============================================================================
// DATA SOURCE TRAIT
// ============================================================================

/// Read-only access to stages, customers, deliveries, workflows and audit
/// logs. Lookups for unknown ids return `None` or an empty list.
pub trait DeliverySource: Send + Sync {
    fn stage_catalog(&self) -> &StageCatalog;

    fn customers(&self) -> &[CustomerRecord];

    fn customer_by_id(&self, customer_id: &str) -> Option<&CustomerRecord>;

    /// All delivery records in fixture order.
    fn deliveries(&self) -> &[DeliveryRecord];

    fn delivery_by_id(&self, delivery_id: &str) -> Option<&DeliveryRecord>;

    fn deliveries_by_customer(&self, customer_id: &str) -> Vec<&DeliveryRecord>;

    /// Dedicated workflow of the delivery's tracked stage, if it has one.
    fn workflow_steps(&self, delivery_id: &str) -> Option<&StageWorkflow>;

    /// Audit trail for a delivery, newest first.
    fn audit_logs(&self, delivery_id: &str) -> Vec<&AuditLogEntry>;

    /// Records whose aggregate status is not completed.
    fn running_records(&self) -> Vec<&DeliveryRecord> {
        Partition::Running.select(self.deliveries())
    }

    fn past_records(&self) -> Vec<&DeliveryRecord> {
        Partition::Past.select(self.deliveries())
    }

    fn require_customer(&self, customer_id: &str) -> VerdantResult<&CustomerRecord> {
        self.customer_by_id(customer_id)
            .ok_or_else(|| VerdantError::not_found(EntityKind::Customer, customer_id))
    }

    fn require_delivery(&self, delivery_id: &str) -> VerdantResult<&DeliveryRecord> {
        self.delivery_by_id(delivery_id)
            .ok_or_else(|| VerdantError::not_found(EntityKind::Delivery, delivery_id))
    }
}

// ============================================================================
// IN-MEMORY SOURCE
// ============================================================================

/// Fixture-backed source. Cloning shares the same data.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    data: Arc<FixtureData>,
}

impl InMemorySource {
    /// Build a source from already-parsed data, validating it first.
    pub fn new(mut data: FixtureData) -> SourceResult<Self> {
        data.validate()?;
        for entries in data.audit_logs.values_mut() {
            // Stable, so equal timestamps keep fixture order.
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
        info!(
            stages = data.stages.len(),
            customers = data.customers.len(),
            deliveries = data.deliveries.len(),
            workflows = data.workflows.len(),
            "Loaded delivery fixture"
        );
        Ok(Self {
            data: Arc::new(data),
        })
    }

    /// The fixture compiled into the binary.
    pub fn builtin() -> SourceResult<Self> {
        Self::from_json_str(BUILTIN_FIXTURE)
    }

    pub fn from_json_str(json: &str) -> SourceResult<Self> {
        Self::new(FixtureData::from_json(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading delivery fixture");
        let json = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }
}

impl DeliverySource for InMemorySource {
    fn stage_catalog(&self) -> &StageCatalog {
        &self.data.stages
    }

    fn customers(&self) -> &[CustomerRecord] {
        &self.data.customers
    }

    fn customer_by_id(&self, customer_id: &str) -> Option<&CustomerRecord> {
        let found = self.data.customers.iter().find(|c| c.id == customer_id);
        debug!(customer_id, found = found.is_some(), "Customer lookup");
        found
    }

    fn deliveries(&self) -> &[DeliveryRecord] {
        &self.data.deliveries
    }

    fn delivery_by_id(&self, delivery_id: &str) -> Option<&DeliveryRecord> {
        let found = self.data.deliveries.iter().find(|d| d.id == delivery_id);
        debug!(delivery_id, found = found.is_some(), "Delivery lookup");
        found
    }

    fn deliveries_by_customer(&self, customer_id: &str) -> Vec<&DeliveryRecord> {
        self.data
            .deliveries
            .iter()
            .filter(|d| d.customer_id == customer_id)
            .collect()
    }

    fn workflow_steps(&self, delivery_id: &str) -> Option<&StageWorkflow> {
        self.data.workflows.get(delivery_id)
    }

    fn audit_logs(&self, delivery_id: &str) -> Vec<&AuditLogEntry> {
        self.data
            .audit_logs
            .get(delivery_id)
            .map(|entries| entries.iter().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_core::{DeliveryStatus, ProgressStatus};

    fn source() -> InMemorySource {
        InMemorySource::builtin().unwrap()
    }

    #[test]
    fn running_records_exclude_completed() {
        let source = source();
        let running = source.running_records();
        assert_eq!(running.len(), 6);
        assert!(running
            .iter()
            .all(|r| r.status != DeliveryStatus::Completed));
        assert_eq!(source.past_records().len(), 3);
    }

    #[test]
    fn lookups_return_none_for_unknown_ids() {
        let source = source();
        assert!(source.customer_by_id("cust-999").is_none());
        assert!(source.delivery_by_id("DP-2099-001").is_none());
        assert!(source.workflow_steps("DP-2025-002").is_none());
        assert!(source.audit_logs("DP-2025-002").is_empty());
        assert!(source.deliveries_by_customer("cust-999").is_empty());
    }

    #[test]
    fn require_helpers_raise_not_found() {
        let source = source();
        let err = source.require_delivery("DP-2099-001").unwrap_err();
        assert!(err.is_not_found());
        assert!(source.require_customer("cust-001").is_ok());
    }

    #[test]
    fn deliveries_by_customer_keeps_fixture_order() {
        let source = source();
        let ids: Vec<&str> = source
            .deliveries_by_customer("cust-001")
            .iter()
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(ids, vec!["DP-2025-001", "DP-2025-002", "DP-2024-001"]);
    }

    #[test]
    fn audit_logs_are_newest_first() {
        let source = source();
        let logs = source.audit_logs("DP-2025-001");
        assert_eq!(logs.len(), 8);
        assert_eq!(logs[0].id, "log-004");
        assert_eq!(logs[7].id, "log-008");
        assert!(logs.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[test]
    fn completed_record_projects_every_stage_completed() {
        let source = source();
        let record = source.delivery_by_id("DP-2024-001").unwrap();
        assert_eq!(record.current_stage_index, 8);
        let stages = record.stages(source.stage_catalog());
        assert!(stages
            .iter()
            .all(|s| s.status == ProgressStatus::Completed && s.units_processed == 50));
    }

    #[test]
    fn labelling_record_projects_running_stage() {
        let source = source();
        let record = source.delivery_by_id("DP-2025-001").unwrap();
        let stages = record.stages(source.stage_catalog());
        assert_eq!(stages[6].status, ProgressStatus::Running);
        assert_eq!(stages[6].units_processed, 31);
    }

    #[test]
    fn labelling_workflow_has_three_steps() {
        let source = source();
        let workflow = source.workflow_steps("DP-2025-001").unwrap();
        assert_eq!(workflow.stage_id, 6);
        assert_eq!(workflow.steps.len(), 3);
        assert_eq!(workflow.next_action_step().map(|s| s.id), Some(2));
        assert!(workflow.steps[0].payload.is_some());
    }

    #[test]
    fn clones_share_data() {
        let a = source();
        let b = a.clone();
        assert!(std::ptr::eq(a.data(), b.data()));
    }
}
