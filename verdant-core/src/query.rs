//! Record query layer
//!
//! Filtering and single-key sorting over delivery records, plus the small
//! roll-ups the dashboard shows above its tables. Everything here operates
//! on borrowed records and returns new sequences; inputs are never mutated.

use crate::{CustomerRecord, DeliveryRecord, DeliveryStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sentinel accepted wherever a facet value is parsed from user input.
pub const FACET_ALL: &str = "all";

// ============================================================================
// FACETS AND SORTING
// ============================================================================

/// Exact-match facet. `All` disables filtering on that facet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facet<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Facet<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }
}

impl Facet<String> {
    /// Parse a facet from a picker value; `"all"` and empty mean no filter.
    pub fn from_input(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(FACET_ALL) {
            Facet::All
        } else {
            Facet::Only(trimmed.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => f.write_str("All"),
            Facet::Only(value) => write!(f, "{value}"),
        }
    }
}

/// Sortable delivery record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    CustomerName,
    DeliveryYear,
    PhaseNumber,
    UnitCount,
    ContractId,
    StartDate,
    EstimatedDeliveryDate,
    CurrentStageName,
    Status,
}

impl SortKey {
    pub fn all() -> &'static [SortKey] {
        &[
            SortKey::Id,
            SortKey::CustomerName,
            SortKey::DeliveryYear,
            SortKey::PhaseNumber,
            SortKey::UnitCount,
            SortKey::ContractId,
            SortKey::StartDate,
            SortKey::EstimatedDeliveryDate,
            SortKey::CurrentStageName,
            SortKey::Status,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Id => "Phase ID",
            SortKey::CustomerName => "Customer",
            SortKey::DeliveryYear => "Year",
            SortKey::PhaseNumber => "Phase",
            SortKey::UnitCount => "Feeders",
            SortKey::ContractId => "Contract",
            SortKey::StartDate => "Start",
            SortKey::EstimatedDeliveryDate => "Est. Delivery",
            SortKey::CurrentStageName => "Current Stage",
            SortKey::Status => "Status",
        }
    }

    fn compare(&self, a: &DeliveryRecord, b: &DeliveryRecord) -> Ordering {
        match self {
            SortKey::Id => cmp_text(&a.id, &b.id),
            SortKey::CustomerName => cmp_text(&a.customer_name, &b.customer_name),
            SortKey::DeliveryYear => a.delivery_year.cmp(&b.delivery_year),
            SortKey::PhaseNumber => a.phase_number.cmp(&b.phase_number),
            SortKey::UnitCount => a.unit_count.cmp(&b.unit_count),
            SortKey::ContractId => cmp_text(&a.contract_id, &b.contract_id),
            SortKey::StartDate => a.start_date.cmp(&b.start_date),
            SortKey::EstimatedDeliveryDate => {
                a.estimated_delivery_date.cmp(&b.estimated_delivery_date)
            }
            SortKey::CurrentStageName => cmp_text(&a.current_stage_name, &b.current_stage_name),
            SortKey::Status => cmp_text(a.status.as_str(), b.status.as_str()),
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Active sort. No key means input order is preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Select `key`: the active key flips direction, a new key starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// Filter and sort criteria for a list of delivery records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive substring over id, customer name and contract id.
    pub search_text: Option<String>,
    /// Exact match on customer name.
    pub customer: Facet<String>,
    /// Exact match on current stage name.
    pub stage: Facet<String>,
    pub status: Facet<DeliveryStatus>,
    pub sort: SortState,
}

impl RecordQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &DeliveryRecord) -> bool {
        self.matches_text(record)
            && self.customer.matches(&record.customer_name)
            && self.stage.matches(&record.current_stage_name)
            && self.status.matches(&record.status)
    }

    fn matches_text(&self, record: &DeliveryRecord) -> bool {
        let term = match self.search_text.as_deref() {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };
        [&record.id, &record.customer_name, &record.contract_id]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// True when no filter and no sort is active.
    pub fn is_noop(&self) -> bool {
        self.search_text.as_deref().map_or(true, str::is_empty)
            && self.customer.is_all()
            && self.stage.is_all()
            && self.status.is_all()
            && self.sort.key.is_none()
    }
}

/// Filter then stably sort `records`.
pub fn query<'a, I>(records: I, criteria: &RecordQuery) -> Vec<&'a DeliveryRecord>
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    let mut result: Vec<&DeliveryRecord> = records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect();

    if let Some(key) = criteria.sort.key {
        let direction = criteria.sort.direction;
        result.sort_by(|a, b| {
            let ordering = key.compare(a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
    result
}

// ============================================================================
// PARTITIONS AND ROLL-UPS
// ============================================================================

/// The two top-level lists. Queries always run inside one partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Partition {
    #[default]
    Running,
    Past,
}

impl Partition {
    pub fn contains(&self, record: &DeliveryRecord) -> bool {
        match self {
            Partition::Running => record.status != DeliveryStatus::Completed,
            Partition::Past => record.status == DeliveryStatus::Completed,
        }
    }

    pub fn select<'a, I>(&self, records: I) -> Vec<&'a DeliveryRecord>
    where
        I: IntoIterator<Item = &'a DeliveryRecord>,
    {
        records.into_iter().filter(|r| self.contains(r)).collect()
    }

    pub fn toggled(self) -> Self {
        match self {
            Partition::Running => Partition::Past,
            Partition::Past => Partition::Running,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Partition::Running => "Running",
            Partition::Past => "Past",
        }
    }
}

/// Distinct facet values in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetOptions {
    pub customers: Vec<String>,
    pub stages: Vec<String>,
}

impl FacetOptions {
    pub fn collect<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DeliveryRecord>,
    {
        let mut options = Self::default();
        for record in records {
            if !options.customers.contains(&record.customer_name) {
                options.customers.push(record.customer_name.clone());
            }
            if !options.stages.contains(&record.current_stage_name) {
                options.stages.push(record.current_stage_name.clone());
            }
        }
        options
    }
}

/// Headline counters shown above the dashboard tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardMetrics {
    pub total_active: usize,
    pub on_track: usize,
    pub delayed: usize,
    pub completed: usize,
}

impl DashboardMetrics {
    pub fn from_partitions(running: &[&DeliveryRecord], past: &[&DeliveryRecord]) -> Self {
        Self {
            total_active: running.len(),
            on_track: running
                .iter()
                .filter(|r| r.status == DeliveryStatus::Running)
                .count(),
            delayed: running
                .iter()
                .filter(|r| r.status == DeliveryStatus::Delayed)
                .count(),
            completed: past.len(),
        }
    }
}

/// Roll-up of one customer's delivery phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CustomerSummary {
    pub running: usize,
    pub completed: usize,
    pub total_units: u64,
    pub total_phases: usize,
}

impl CustomerSummary {
    pub fn for_deliveries<'a, I>(deliveries: I) -> Self
    where
        I: IntoIterator<Item = &'a DeliveryRecord>,
    {
        deliveries
            .into_iter()
            .fold(Self::default(), |mut summary, delivery| {
                if Partition::Past.contains(delivery) {
                    summary.completed += 1;
                } else {
                    summary.running += 1;
                }
                summary.total_units += u64::from(delivery.unit_count);
                summary.total_phases += 1;
                summary
            })
    }
}

/// Sum of units across records, widened to avoid overflow.
pub fn total_units<'a, I>(records: I) -> u64
where
    I: IntoIterator<Item = &'a DeliveryRecord>,
{
    records
        .into_iter()
        .map(|r| u64::from(r.unit_count))
        .sum()
}

/// Customers sorted by name, for the sidebar list.
pub fn customers_by_name(customers: &[CustomerRecord]) -> Vec<&CustomerRecord> {
    let mut sorted: Vec<&CustomerRecord> = customers.iter().collect();
    sorted.sort_by(|a, b| cmp_text(&a.name, &b.name));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NetworkType;
    use chrono::NaiveDate;

    fn record(id: &str, customer: &str, units: u32, status: DeliveryStatus) -> DeliveryRecord {
        DeliveryRecord {
            id: id.to_string(),
            customer_id: customer.to_lowercase().replace(' ', "-"),
            customer_name: customer.to_string(),
            contract_id: format!("CNT-{}", id),
            delivery_year: 2025,
            phase_number: 1,
            unit_count: units,
            network_type: NetworkType::DistributionOnly,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            estimated_delivery_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            current_stage_index: 2,
            current_stage_name: "Shapefile Correction".to_string(),
            stage_eta: None,
            status,
            stage_cursor: None,
        }
    }

    fn sample() -> Vec<DeliveryRecord> {
        vec![
            record("DP-1", "Pacific Power", 45, DeliveryStatus::Running),
            record("DP-2", "Midwest Grid Corp", 68, DeliveryStatus::Delayed),
            record("DP-3", "pacific power", 12, DeliveryStatus::Completed),
            record("DP-4", "Southeast Energy", 30, DeliveryStatus::Running),
        ]
    }

    fn ids(records: &[&DeliveryRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn empty_query_preserves_order() {
        let records = sample();
        let result = query(&records, &RecordQuery::default());
        assert_eq!(ids(&result), vec!["DP-1", "DP-2", "DP-3", "DP-4"]);
    }

    #[test]
    fn search_is_case_insensitive_over_three_fields() {
        let records = sample();
        let result = query(&records, &RecordQuery::search("PAC"));
        assert_eq!(ids(&result), vec!["DP-1", "DP-3"]);

        let by_contract = query(&records, &RecordQuery::search("cnt-dp-4"));
        assert_eq!(ids(&by_contract), vec!["DP-4"]);
    }

    #[test]
    fn facets_compose_with_and() {
        let records = sample();
        let criteria = RecordQuery {
            customer: Facet::Only("Pacific Power".to_string()),
            status: Facet::Only(DeliveryStatus::Running),
            ..RecordQuery::default()
        };
        assert_eq!(ids(&query(&records, &criteria)), vec!["DP-1"]);
    }

    #[test]
    fn customer_facet_is_exact_match() {
        let records = sample();
        let criteria = RecordQuery {
            customer: Facet::Only("pacific power".to_string()),
            ..RecordQuery::default()
        };
        assert_eq!(ids(&query(&records, &criteria)), vec!["DP-3"]);
    }

    #[test]
    fn facet_from_input_understands_all() {
        assert_eq!(Facet::from_input("all"), Facet::All);
        assert_eq!(Facet::from_input("  "), Facet::All);
        assert_eq!(
            Facet::from_input("Analytics"),
            Facet::Only("Analytics".to_string())
        );
    }

    #[test]
    fn text_sort_ignores_case() {
        let records = sample();
        let criteria = RecordQuery {
            sort: SortState::by(SortKey::CustomerName, SortDirection::Asc),
            ..RecordQuery::default()
        };
        // "Pacific Power" and "pacific power" compare equal and keep input order.
        assert_eq!(
            ids(&query(&records, &criteria)),
            vec!["DP-2", "DP-1", "DP-3", "DP-4"]
        );
    }

    #[test]
    fn toggle_flips_active_key_and_resets_new_key() {
        let mut sort = SortState::default();
        sort.toggle(SortKey::UnitCount);
        assert_eq!(sort, SortState::by(SortKey::UnitCount, SortDirection::Asc));
        sort.toggle(SortKey::UnitCount);
        assert_eq!(sort, SortState::by(SortKey::UnitCount, SortDirection::Desc));
        sort.toggle(SortKey::Id);
        assert_eq!(sort, SortState::by(SortKey::Id, SortDirection::Asc));
    }

    #[test]
    fn partitions_split_on_completed() {
        let records = sample();
        let running = Partition::Running.select(&records);
        let past = Partition::Past.select(&records);
        assert_eq!(ids(&running), vec!["DP-1", "DP-2", "DP-4"]);
        assert_eq!(ids(&past), vec!["DP-3"]);

        let metrics = DashboardMetrics::from_partitions(&running, &past);
        assert_eq!(
            metrics,
            DashboardMetrics {
                total_active: 3,
                on_track: 2,
                delayed: 1,
                completed: 1
            }
        );
    }

    #[test]
    fn facet_options_keep_first_seen_order() {
        let records = sample();
        let options = FacetOptions::collect(&records);
        assert_eq!(
            options.customers,
            vec![
                "Pacific Power",
                "Midwest Grid Corp",
                "pacific power",
                "Southeast Energy"
            ]
        );
        assert_eq!(options.stages, vec!["Shapefile Correction"]);
    }

    #[test]
    fn customer_summary_counts_units_and_phases() {
        let records = sample();
        let summary = CustomerSummary::for_deliveries(&records);
        assert_eq!(summary.running, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.total_units, 155);
        assert_eq!(summary.total_phases, 4);
        assert_eq!(total_units(&records), 155);
    }
}
