//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod input;
pub mod metric;
pub mod progress;
pub mod status;

pub use detail::DetailPanel;
pub use filter::{FilterBar, FilterOption};
pub use input::TextInput;
pub use metric::MetricCard;
pub use progress::ProgressBar;
pub use status::StatusBadge;
