//! Verdant Test Utilities
//!
//! Centralized test infrastructure for the Verdant workspace:
//! - Proptest generators for entity types and queries
//! - Builders for delivery records and workflows
//! - Fixtures for common scenarios
//! - Custom assertions for projection and error shapes

// Re-export the fixture-backed source from its crate
pub use verdant_storage::{DeliverySource, FixtureData, InMemorySource};

// Re-export core types for convenience
pub use verdant_core::{
    derive_stage_progress, running_units, AuditLogEntry, CalendarDate, CustomerRecord,
    DeliveryRecord, DeliveryStatus, EntityKind, Facet, LookupError, NetworkType, ProgressStatus,
    RecordQuery, SortDirection, SortKey, SortState, StageCatalog, StageDefinition, StageId,
    StageProgress, StageWorkflow, StepId, StepKind, StepPayload, Timestamp, UnitCount,
    ValidationError, VerdantError, VerdantResult, WorkflowStepRecord,
};

use chrono::NaiveDate;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating Verdant entity types.

    use super::*;
    use proptest::prelude::*;

    /// Customer names used by generated records. Small on purpose so facet
    /// filters hit more than one record.
    pub const CUSTOMER_NAMES: &[&str] = &[
        "Pacific Power",
        "Midwest Grid Corp",
        "Southeast Energy",
        "Northern Utilities",
        "Great Plains Electric",
    ];

    // === Enum Generators ===

    pub fn arb_progress_status() -> impl Strategy<Value = ProgressStatus> {
        prop_oneof![
            Just(ProgressStatus::Completed),
            Just(ProgressStatus::Running),
            Just(ProgressStatus::Upcoming),
        ]
    }

    pub fn arb_delivery_status() -> impl Strategy<Value = DeliveryStatus> {
        prop_oneof![
            Just(DeliveryStatus::Running),
            Just(DeliveryStatus::Delayed),
            Just(DeliveryStatus::Completed),
        ]
    }

    pub fn arb_network_type() -> impl Strategy<Value = NetworkType> {
        prop_oneof![
            Just(NetworkType::DistributionOnly),
            Just(NetworkType::TransmissionOnly),
            Just(NetworkType::Both),
        ]
    }

    pub fn arb_step_kind() -> impl Strategy<Value = StepKind> {
        prop_oneof![
            Just(StepKind::ShareRequirement),
            Just(StepKind::AcceptWork),
            Just(StepKind::SubmitResult),
        ]
    }

    pub fn arb_sort_key() -> impl Strategy<Value = SortKey> {
        prop::sample::select(SortKey::all().to_vec())
    }

    // === Value Generators ===

    /// Dates between 2020 and 2030.
    pub fn arb_calendar_date() -> impl Strategy<Value = CalendarDate> {
        (0i64..3650).prop_map(|offset| {
            fixtures::date(2020, 1, 1) + chrono::Duration::days(offset)
        })
    }

    /// Contiguous catalog with `1..=max_len` stages.
    pub fn arb_stage_catalog(max_len: u32) -> impl Strategy<Value = StageCatalog> {
        (1..=max_len.max(1)).prop_map(fixtures::stage_catalog)
    }

    /// A delivery record whose stage index is valid for a catalog of
    /// `catalog_len` stages.
    pub fn arb_delivery_record(catalog_len: u32) -> impl Strategy<Value = DeliveryRecord> {
        let last_stage = catalog_len.max(1) - 1;
        (
            1u32..1000,
            prop::sample::select(CUSTOMER_NAMES.to_vec()),
            2020i32..2030,
            1u32..6,
            0u32..500,
            arb_network_type(),
            arb_calendar_date(),
            0..=last_stage,
            arb_delivery_status(),
        )
            .prop_map(
                |(serial, customer, year, phase, units, network, start, stage, status)| {
                    DeliveryRecordBuilder::new(format!("DP-{year}-{serial:03}"))
                        .customer(customer)
                        .year(year)
                        .phase(phase)
                        .units(units)
                        .network(network)
                        .dates(start, start + chrono::Duration::days(180))
                        .stage(stage, format!("Stage {stage}"))
                        .status(status)
                        .build()
                },
            )
    }

    /// Up to `max` records against a shared catalog length.
    pub fn arb_delivery_records(
        catalog_len: u32,
        max: usize,
    ) -> impl Strategy<Value = Vec<DeliveryRecord>> {
        prop::collection::vec(arb_delivery_record(catalog_len), 0..=max)
    }

    /// Search text drawn from fragments that occur in generated records.
    pub fn arb_search_text() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            prop::sample::select(vec!["pac", "GRID", "dp-202", "cnt", "energy", "zzz"])
                .prop_map(|s| Some(s.to_string())),
        ]
    }

    pub fn arb_record_query() -> impl Strategy<Value = RecordQuery> {
        let customer = prop_oneof![
            Just(Facet::All),
            prop::sample::select(CUSTOMER_NAMES.to_vec()).prop_map(|c| Facet::Only(c.to_string())),
        ];
        let status = prop_oneof![
            Just(Facet::All),
            arb_delivery_status().prop_map(Facet::Only),
        ];
        let sort = prop_oneof![
            Just(SortState::default()),
            (arb_sort_key(), any::<bool>()).prop_map(|(key, desc)| {
                let direction = if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                SortState::by(key, direction)
            }),
        ];
        (arb_search_text(), customer, status, sort).prop_map(
            |(search_text, customer, status, sort)| RecordQuery {
                search_text,
                customer,
                stage: Facet::All,
                status,
                sort,
            },
        )
    }

    /// A three-step workflow whose statuses obey the monotonic ordering,
    /// parameterized by how many steps are completed and whether the next
    /// one is running.
    pub fn arb_monotonic_workflow() -> impl Strategy<Value = StageWorkflow> {
        (0usize..=3, any::<bool>()).prop_map(|(completed, running)| {
            let status_at = |index: usize| {
                if index < completed {
                    ProgressStatus::Completed
                } else if index == completed && running {
                    ProgressStatus::Running
                } else {
                    ProgressStatus::Upcoming
                }
            };
            fixtures::labelling_workflow_with([status_at(0), status_at(1), status_at(2)])
        })
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Builder for delivery records with sensible defaults.
#[derive(Debug, Clone)]
pub struct DeliveryRecordBuilder {
    record: DeliveryRecord,
}

impl DeliveryRecordBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            record: DeliveryRecord {
                contract_id: format!("CNT-{id}"),
                id,
                customer_id: "cust-001".to_string(),
                customer_name: "Pacific Power".to_string(),
                delivery_year: 2025,
                phase_number: 1,
                unit_count: 45,
                network_type: NetworkType::DistributionOnly,
                start_date: fixtures::date(2025, 1, 10),
                estimated_delivery_date: fixtures::date(2025, 6, 30),
                current_stage_index: 0,
                current_stage_name: "Project Setup".to_string(),
                stage_eta: None,
                status: DeliveryStatus::Running,
                stage_cursor: None,
            },
        }
    }

    /// Set the customer name; the id is derived from it.
    pub fn customer(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.record.customer_id = format!("cust-{}", name.to_lowercase().replace(' ', "-"));
        self.record.customer_name = name;
        self
    }

    pub fn customer_id(mut self, id: impl Into<String>) -> Self {
        self.record.customer_id = id.into();
        self
    }

    pub fn contract(mut self, contract_id: impl Into<String>) -> Self {
        self.record.contract_id = contract_id.into();
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.record.delivery_year = year;
        self
    }

    pub fn phase(mut self, phase: u32) -> Self {
        self.record.phase_number = phase;
        self
    }

    pub fn units(mut self, units: UnitCount) -> Self {
        self.record.unit_count = units;
        self
    }

    pub fn network(mut self, network: NetworkType) -> Self {
        self.record.network_type = network;
        self
    }

    pub fn dates(mut self, start: CalendarDate, estimated_delivery: CalendarDate) -> Self {
        self.record.start_date = start;
        self.record.estimated_delivery_date = estimated_delivery;
        self
    }

    pub fn stage(mut self, index: StageId, name: impl Into<String>) -> Self {
        self.record.current_stage_index = index;
        self.record.current_stage_name = name.into();
        self
    }

    pub fn eta(mut self, eta: CalendarDate) -> Self {
        self.record.stage_eta = Some(eta);
        self
    }

    pub fn status(mut self, status: DeliveryStatus) -> Self {
        self.record.status = status;
        self
    }

    /// Override the cursor fed to the progress projection.
    pub fn cursor(mut self, cursor: i64) -> Self {
        self.record.stage_cursor = Some(cursor);
        self
    }

    pub fn build(self) -> DeliveryRecord {
        self.record
    }
}

/// Builder for stage workflows. Step ids are assigned in insertion order
/// starting at 1.
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    workflow: StageWorkflow,
}

impl WorkflowBuilder {
    pub fn new(stage_id: StageId, stage_name: impl Into<String>) -> Self {
        Self {
            workflow: StageWorkflow {
                stage_id,
                stage_name: stage_name.into(),
                units_in_scope: 0,
                units_released: 0,
                units_already_processed: 0,
                units_remaining: 0,
                steps: Vec::new(),
            },
        }
    }

    pub fn counters(
        mut self,
        in_scope: UnitCount,
        released: UnitCount,
        processed: UnitCount,
        remaining: UnitCount,
    ) -> Self {
        self.workflow.units_in_scope = in_scope;
        self.workflow.units_released = released;
        self.workflow.units_already_processed = processed;
        self.workflow.units_remaining = remaining;
        self
    }

    pub fn step(
        mut self,
        name: impl Into<String>,
        kind: StepKind,
        role: impl Into<String>,
        status: ProgressStatus,
    ) -> Self {
        let id = self.workflow.steps.len() as StepId + 1;
        self.workflow.steps.push(WorkflowStepRecord {
            id,
            name: name.into(),
            kind,
            authorized_role: role.into(),
            description: String::new(),
            status,
            completed_at: None,
            completed_by: None,
            payload: None,
        });
        self
    }

    /// Mark the last added step completed with a payload.
    pub fn completed_with(
        mut self,
        by: impl Into<String>,
        at: Timestamp,
        payload: StepPayload,
    ) -> Self {
        if let Some(step) = self.workflow.steps.last_mut() {
            step.status = ProgressStatus::Completed;
            step.completed_by = Some(by.into());
            step.completed_at = Some(at);
            step.payload = Some(payload);
        }
        self
    }

    pub fn build(self) -> StageWorkflow {
        self.workflow
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common testing scenarios.

    use super::*;

    /// Calendar date from known-good components.
    #[track_caller]
    pub fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    /// Contiguous catalog with `len` generic stages.
    pub fn stage_catalog(len: u32) -> StageCatalog {
        let stages = (0..len)
            .map(|id| StageDefinition {
                id,
                name: format!("Stage {id}"),
                short_name: format!("S{id}"),
                description: format!("Generated stage {id}"),
            })
            .collect();
        StageCatalog::new(stages).expect("generated catalog is contiguous")
    }

    /// The built-in fixture source.
    pub fn builtin_source() -> InMemorySource {
        InMemorySource::builtin().expect("built-in fixture loads")
    }

    /// The nine-stage catalog of the built-in fixture.
    pub fn builtin_catalog() -> StageCatalog {
        builtin_source().stage_catalog().clone()
    }

    /// Share / accept / submit workflow on stage 6 with the given statuses.
    pub fn labelling_workflow_with(statuses: [ProgressStatus; 3]) -> StageWorkflow {
        let mut workflow = WorkflowBuilder::new(6, "Span Labelling")
            .counters(45, 32, 18, 14)
            .step(
                "Share Requirement",
                StepKind::ShareRequirement,
                "PM / Project Analyst",
                statuses[0],
            )
            .step(
                "Accept Labelling Work",
                StepKind::AcceptWork,
                "GIS",
                statuses[1],
            )
            .step(
                "Submit Labelled Shapefile",
                StepKind::SubmitResult,
                "GIS",
                statuses[2],
            )
            .build();
        if statuses[0] == ProgressStatus::Completed {
            workflow.steps[0].payload = Some(StepPayload {
                query: Some("SELECT feeder_id FROM feeders".to_string()),
                instructions: None,
            });
        }
        workflow
    }

    /// The built-in fixture as JSON, with `edit` applied to the parsed value.
    pub fn builtin_json_with(edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value: serde_json::Value =
            serde_json::from_str(verdant_storage::BUILTIN_FIXTURE).expect("fixture is JSON");
        edit(&mut value);
        value.to_string()
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for Verdant-specific validation.

    use super::*;

    /// Assert a projection matches the cursor rule for `(len, cursor, total)`.
    #[track_caller]
    pub fn assert_projection_shape(stages: &[StageProgress], len: usize, cursor: i64, total: UnitCount) {
        assert_eq!(stages.len(), len, "projection length must equal catalog length");
        for (position, stage) in stages.iter().enumerate() {
            assert_eq!(stage.stage_id as usize, position, "stage ids must follow positions");
            assert_eq!(stage.units_total, total);
            let id = position as i64;
            let (status, processed) = if id < cursor {
                (ProgressStatus::Completed, total)
            } else if id == cursor {
                (ProgressStatus::Running, running_units(total))
            } else {
                (ProgressStatus::Upcoming, 0)
            };
            assert_eq!(stage.status, status, "status of stage {position}");
            assert_eq!(stage.units_processed, processed, "units of stage {position}");
        }
    }

    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &VerdantResult<T>, entity: EntityKind) {
        match result {
            Err(VerdantError::Lookup(LookupError::NotFound { entity: e, .. })) => {
                assert_eq!(*e, entity, "Wrong entity in NotFound error");
            }
            other => panic!("Expected NotFound for {entity}, got: {other:?}"),
        }
    }

    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &VerdantResult<T>) {
        match result {
            Err(VerdantError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {other:?}"),
        }
    }

    /// Assert every record in `subset` also appears in `superset`, in the same
    /// relative order.
    #[track_caller]
    pub fn assert_subsequence(subset: &[&DeliveryRecord], superset: &[DeliveryRecord]) {
        let mut rest = superset.iter();
        for record in subset {
            assert!(
                rest.any(|candidate| std::ptr::eq(candidate, *record)),
                "{} is missing or out of order",
                record.id
            );
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_builder_defaults_are_running() {
        let record = DeliveryRecordBuilder::new("DP-1").build();
        assert_eq!(record.status, DeliveryStatus::Running);
        assert_eq!(record.contract_id, "CNT-DP-1");
        assert_eq!(record.stage_cursor(), 0);
    }

    #[test]
    fn test_workflow_builder_numbers_steps() {
        let workflow = WorkflowBuilder::new(2, "Shapefile Correction")
            .step("a", StepKind::ShareRequirement, "PM", ProgressStatus::Running)
            .step("b", StepKind::AcceptWork, "GIS", ProgressStatus::Upcoming)
            .build();
        let ids: Vec<StepId> = workflow.steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(workflow.validate().is_ok());
    }

    #[test]
    fn test_builtin_catalog_has_nine_stages() {
        assert_eq!(fixtures::builtin_catalog().len(), 9);
    }

    #[test]
    fn test_assert_projection_shape_accepts_projection() {
        let catalog = fixtures::stage_catalog(9);
        let stages = derive_stage_progress(&catalog, 6, 45);
        assertions::assert_projection_shape(&stages, 9, 6, 45);
    }

    #[test]
    #[should_panic]
    fn test_assert_projection_shape_rejects_wrong_cursor() {
        let catalog = fixtures::stage_catalog(9);
        let stages = derive_stage_progress(&catalog, 5, 45);
        assertions::assert_projection_shape(&stages, 9, 6, 45);
    }

    proptest! {
        #[test]
        fn prop_generated_records_fit_catalog(record in generators::arb_delivery_record(9)) {
            prop_assert!(record.current_stage_index < 9);
            prop_assert!(generators::CUSTOMER_NAMES.contains(&record.customer_name.as_str()));
        }

        #[test]
        fn prop_generated_workflows_are_monotonic(workflow in generators::arb_monotonic_workflow()) {
            prop_assert!(workflow.validate().is_ok());
        }
    }
}
