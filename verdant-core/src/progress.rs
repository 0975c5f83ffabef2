//! Stage progress projection.
//!
//! A delivery record carries a single stage cursor. Everything the UI shows
//! about individual stages is projected from that cursor on demand, so the
//! cursor and the per-stage view can never disagree.

use crate::{ProgressStatus, StageCatalog, StageId, StageProgress, UnitCount};

/// Share of units reported as processed on the running stage, in tenths.
const RUNNING_SHARE_TENTHS: u64 = 7;

/// Project per-stage status and unit counts from a stage cursor.
///
/// Stages before the cursor are completed with every unit processed, the
/// stage at the cursor is running with `floor(0.7 * unit_total)` processed,
/// and later stages are upcoming with nothing processed. A negative cursor
/// leaves every stage upcoming; a cursor at or past the end of the catalog
/// marks every stage completed.
pub fn derive_stage_progress(
    catalog: &StageCatalog,
    current_stage_index: i64,
    unit_total: UnitCount,
) -> Vec<StageProgress> {
    catalog
        .iter()
        .map(|stage| {
            let id = i64::from(stage.id);
            let (status, units_processed) = if id < current_stage_index {
                (ProgressStatus::Completed, unit_total)
            } else if id == current_stage_index {
                (ProgressStatus::Running, running_units(unit_total))
            } else {
                (ProgressStatus::Upcoming, 0)
            };
            StageProgress {
                stage_id: stage.id,
                status,
                units_processed,
                units_total: unit_total,
            }
        })
        .collect()
}

/// `floor(0.7 * total)` in exact integer arithmetic.
pub fn running_units(total: UnitCount) -> UnitCount {
    // 7 * u32::MAX / 10 < u32::MAX, so the narrowing cannot truncate.
    (u64::from(total) * RUNNING_SHARE_TENTHS / 10) as UnitCount
}

/// Roll-up of a stage projection, used by the pipeline gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineProgress {
    pub completed: usize,
    pub running: Option<StageId>,
    pub total: usize,
}

impl PipelineProgress {
    pub fn from_stages(stages: &[StageProgress]) -> Self {
        let completed = stages
            .iter()
            .filter(|s| s.status == ProgressStatus::Completed)
            .count();
        let running = stages
            .iter()
            .find(|s| s.status == ProgressStatus::Running)
            .map(|s| s.stage_id);
        Self {
            completed,
            running,
            total: stages.len(),
        }
    }

    /// Fraction of stages completed, in `[0.0, 1.0]`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StageDefinition;

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

    #[test]
    fn labelling_example_projects_expected_counts() {
        let stages = derive_stage_progress(&catalog(9), 6, 45);
        assert_eq!(stages.len(), 9);
        for stage in &stages[..6] {
            assert_eq!(stage.status, ProgressStatus::Completed);
            assert_eq!(stage.units_processed, 45);
        }
        assert_eq!(stages[6].status, ProgressStatus::Running);
        assert_eq!(stages[6].units_processed, 31);
        for stage in &stages[7..] {
            assert_eq!(stage.status, ProgressStatus::Upcoming);
            assert_eq!(stage.units_processed, 0);
        }
        assert!(stages.iter().all(|s| s.units_total == 45));
    }

    #[test]
    fn cursor_past_end_completes_everything() {
        let stages = derive_stage_progress(&catalog(9), 9, 50);
        assert!(stages
            .iter()
            .all(|s| s.status == ProgressStatus::Completed && s.units_processed == 50));
        assert!(PipelineProgress::from_stages(&stages).is_finished());
    }

    #[test]
    fn negative_cursor_leaves_everything_upcoming() {
        let stages = derive_stage_progress(&catalog(5), -1, 20);
        assert!(stages
            .iter()
            .all(|s| s.status == ProgressStatus::Upcoming && s.units_processed == 0));
        assert_eq!(PipelineProgress::from_stages(&stages).running, None);
    }

    #[test]
    fn zero_units_processes_nothing() {
        let stages = derive_stage_progress(&catalog(4), 2, 0);
        assert!(stages.iter().all(|s| s.units_processed == 0));
    }

    #[test]
    fn running_units_floors() {
        assert_eq!(running_units(45), 31);
        assert_eq!(running_units(10), 7);
        assert_eq!(running_units(1), 0);
        assert_eq!(running_units(u32::MAX), 3_006_477_106);
    }

    #[test]
    fn empty_catalog_has_zero_ratio() {
        let progress = PipelineProgress::from_stages(&[]);
        assert_eq!(progress.ratio(), 0.0);
        assert!(!progress.is_finished());
    }
}
