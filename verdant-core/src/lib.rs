//! Verdant Core - Delivery Pipeline Types
//!
//! Entity types, the stage progress projection, the record query layer and
//! workflow action gating. Everything here is pure and synchronous; data
//! access lives in `verdant-storage` and presentation in `verdant-tui`.

mod entities;
mod enums;
mod error;
mod format;
mod identity;
mod progress;
mod query;
mod workflow;

pub use entities::*;
pub use enums::*;
pub use error::*;
pub use format::*;
pub use identity::*;
pub use progress::*;
pub use query::*;
pub use workflow::*;

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn catalog(len: u32) -> StageCatalog {
        let stages = (0..len)
            .map(|id| StageDefinition {
                id,
                name: format!("Stage {id}"),
                short_name: format!("S{id}"),
                description: String::new(),
            })
            .collect();
        StageCatalog::new(stages).unwrap()
    }

    // ========================================================================
    // Projection shape: one entry per stage, ids in catalog order
    // ========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_projection_has_one_entry_per_stage(
            len in 0u32..20,
            cursor in -5i64..25,
            total in 0u32..10_000,
        ) {
            let catalog = catalog(len);
            let stages = derive_stage_progress(&catalog, cursor, total);
            prop_assert_eq!(stages.len(), len as usize);
            for (i, stage) in stages.iter().enumerate() {
                prop_assert_eq!(stage.stage_id as usize, i);
                prop_assert_eq!(stage.units_total, total);
                prop_assert!(stage.units_processed <= total);
            }
        }

        /// For an in-range cursor k: k completed, one running, the rest upcoming.
        #[test]
        fn prop_in_range_cursor_splits_pipeline(
            (len, k) in (1u32..20).prop_flat_map(|len| (Just(len), 0..len)),
            total in 0u32..10_000,
        ) {
            let stages = derive_stage_progress(&catalog(len), i64::from(k), total);
            let progress = PipelineProgress::from_stages(&stages);
            prop_assert_eq!(progress.completed, k as usize);
            prop_assert_eq!(progress.running, Some(k));
            prop_assert_eq!(stages[k as usize].units_processed, running_units(total));
            let upcoming = stages
                .iter()
                .filter(|s| s.status == ProgressStatus::Upcoming && s.units_processed == 0)
                .count();
            prop_assert_eq!(upcoming, (len - k - 1) as usize);
        }

        #[test]
        fn prop_running_units_matches_float_floor(total in 0u32..1_000_000) {
            let expected = (f64::from(total) * 0.7).floor() as u32;
            // 0.7 is inexact in binary; allow the float side to land one below.
            let actual = running_units(total);
            prop_assert!(actual == expected || actual == expected + 1);
            prop_assert_eq!(actual, total * 7 / 10);
        }

        #[test]
        fn prop_sort_toggle_flips_or_resets(first in 0usize..10, second in 0usize..10) {
            let keys = SortKey::all();
            let mut state = SortState::default();
            state.toggle(keys[first]);
            prop_assert_eq!(state.direction, SortDirection::Asc);
            state.toggle(keys[second]);
            if first == second {
                prop_assert_eq!(state.direction, SortDirection::Desc);
            } else {
                prop_assert_eq!(state.direction, SortDirection::Asc);
            }
            prop_assert_eq!(state.key, Some(keys[second]));
        }
    }
}
