//! Identity and time types for Verdant entities

use chrono::{DateTime, NaiveDate, Utc};

/// Customer identifier (e.g. `cust-001`).
pub type CustomerId = String;

/// Delivery record identifier (e.g. `DP-2025-001`).
pub type DeliveryId = String;

/// Ordinal id of a pipeline stage. Stage ids are contiguous from zero.
pub type StageId = u32;

/// Ordinal id of a workflow step within its workflow.
pub type StepId = u32;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Calendar date without a time component.
pub type CalendarDate = NaiveDate;

/// Count of pipeline work units (feeders).
pub type UnitCount = u32;
