//! Enum types for Verdant entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// STATUS ENUMS
// ============================================================================

/// Derived status of a single stage or workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Completed,
    Running,
    Upcoming,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::Completed => "completed",
            ProgressStatus::Running => "running",
            ProgressStatus::Upcoming => "upcoming",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgressStatus::Completed => "Completed",
            ProgressStatus::Running => "Running",
            ProgressStatus::Upcoming => "Upcoming",
        }
    }

    /// Position in the monotonic ordering Completed < Running < Upcoming.
    pub fn rank(&self) -> u8 {
        match self {
            ProgressStatus::Completed => 0,
            ProgressStatus::Running => 1,
            ProgressStatus::Upcoming => 2,
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProgressStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "completed" => Ok(ProgressStatus::Completed),
            "running" => Ok(ProgressStatus::Running),
            "upcoming" => Ok(ProgressStatus::Upcoming),
            _ => Err(StatusParseError::new("progress status", s)),
        }
    }
}

/// Aggregate business status of a delivery record.
///
/// Supplied by the data source; never derived from the stage cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Running,
    Delayed,
    Completed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Running => "running",
            DeliveryStatus::Delayed => "delayed",
            DeliveryStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Running => "Running",
            DeliveryStatus::Delayed => "Delayed",
            DeliveryStatus::Completed => "Completed",
        }
    }

    pub fn all() -> &'static [DeliveryStatus] {
        &[
            DeliveryStatus::Running,
            DeliveryStatus::Delayed,
            DeliveryStatus::Completed,
        ]
    }

    /// Whether the record belongs to the running partition.
    pub fn is_active(&self) -> bool {
        !matches!(self, DeliveryStatus::Completed)
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeliveryStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Ok(DeliveryStatus::Running),
            "delayed" => Ok(DeliveryStatus::Delayed),
            "completed" => Ok(DeliveryStatus::Completed),
            _ => Err(StatusParseError::new("delivery status", s)),
        }
    }
}

// ============================================================================
// DOMAIN ENUMS
// ============================================================================

/// Entity type discriminator for lookups and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Customer,
    Delivery,
    Stage,
    Workflow,
    WorkflowStep,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Customer => "customer",
            EntityKind::Delivery => "delivery phase",
            EntityKind::Stage => "stage",
            EntityKind::Workflow => "workflow",
            EntityKind::WorkflowStep => "workflow step",
        };
        f.write_str(name)
    }
}

/// Which part of the electrical network a delivery covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    /// Distribution only
    #[serde(rename = "Dx-only")]
    DistributionOnly,
    /// Transmission only
    #[serde(rename = "Tx-only")]
    TransmissionOnly,
    #[serde(rename = "Both Dx/Tx")]
    Both,
}

impl NetworkType {
    pub fn label(&self) -> &'static str {
        match self {
            NetworkType::DistributionOnly => "Dx-only",
            NetworkType::TransmissionOnly => "Tx-only",
            NetworkType::Both => "Both Dx/Tx",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NetworkType {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dx-only" | "dx" => Ok(NetworkType::DistributionOnly),
            "tx-only" | "tx" => Ok(NetworkType::TransmissionOnly),
            "both dx/tx" | "both" => Ok(NetworkType::Both),
            _ => Err(StatusParseError::new("network type", s)),
        }
    }
}

/// The kind of work a workflow step represents. Selects the action it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Define scope and release data to the downstream team.
    ShareRequirement,
    /// Download the released package and start work.
    AcceptWork,
    /// Upload the finished result.
    SubmitResult,
}

impl StepKind {
    pub fn action_label(&self) -> &'static str {
        match self {
            StepKind::ShareRequirement => "Submit Requirement",
            StepKind::AcceptWork => "Download Package",
            StepKind::SubmitResult => "Upload Result",
        }
    }
}

/// Error when parsing an invalid enum string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusParseError {
    pub kind: &'static str,
    pub value: String,
}

impl StatusParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for StatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for StatusParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_status_round_trips_through_str() {
        for status in DeliveryStatus::all() {
            assert_eq!(status.as_str().parse::<DeliveryStatus>(), Ok(*status));
        }
    }

    #[test]
    fn status_parsing_ignores_case() {
        assert_eq!("Running".parse::<ProgressStatus>(), Ok(ProgressStatus::Running));
        assert_eq!(" DELAYED ".parse::<DeliveryStatus>(), Ok(DeliveryStatus::Delayed));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "paused".parse::<DeliveryStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid delivery status: paused");
    }

    #[test]
    fn network_type_uses_display_labels_on_the_wire() {
        let json = serde_json::to_string(&NetworkType::Both).unwrap();
        assert_eq!(json, "\"Both Dx/Tx\"");
        let parsed: NetworkType = serde_json::from_str("\"Dx-only\"").unwrap();
        assert_eq!(parsed, NetworkType::DistributionOnly);
    }

    #[test]
    fn progress_rank_orders_statuses() {
        assert!(ProgressStatus::Completed.rank() < ProgressStatus::Running.rank());
        assert!(ProgressStatus::Running.rank() < ProgressStatus::Upcoming.rank());
    }
}
