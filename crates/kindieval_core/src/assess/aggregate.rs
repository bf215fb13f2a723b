//! Status tallies over finalized assessments.
//!
//! # Invariants
//! - Counting is order-independent and total; empty input yields zeros.
//! - `completion_rate` is `0.0` when no records exist.
//! - Age-band rows attribute an assessment to its child's own age band.

use crate::model::assessment::{Assessment, AssessmentStatus};
use crate::model::child::{Child, ChildId};
use crate::model::target::AgeBand;
use log::warn;
use serde::Serialize;
use std::collections::HashMap;

/// Per-status record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub achieved: u32,
    pub not_achieved: u32,
    pub needs_support: u32,
}

impl StatusTally {
    pub fn record(&mut self, status: AssessmentStatus) {
        match status {
            AssessmentStatus::Achieved => self.achieved += 1,
            AssessmentStatus::NotAchieved => self.not_achieved += 1,
            AssessmentStatus::NeedsSupport => self.needs_support += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.achieved + self.not_achieved + self.needs_support
    }

    pub fn count(&self, status: AssessmentStatus) -> u32 {
        match status {
            AssessmentStatus::Achieved => self.achieved,
            AssessmentStatus::NotAchieved => self.not_achieved,
            AssessmentStatus::NeedsSupport => self.needs_support,
        }
    }

    /// Share of achieved records in `[0.0, 1.0]`; `0.0` for an empty tally.
    pub fn completion_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.achieved) / f64::from(total)
    }

    /// Completion rate as a rounded whole percentage.
    pub fn completion_percent(&self) -> u32 {
        // Bounded to 0..=100 by construction.
        (self.completion_rate() * 100.0).round() as u32
    }
}

/// Counts every record of every assessment by status.
pub fn aggregate(assessments: &[Assessment]) -> StatusTally {
    let mut tally = StatusTally::default();
    for record in assessments.iter().flat_map(|assessment| &assessment.records) {
        tally.record(record.status);
    }
    tally
}

/// Chart row for one age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBandProgress {
    pub age_band: AgeBand,
    /// Achieved records.
    pub reached: u32,
    /// Not achieved plus needs-support records.
    pub pending: u32,
}

/// Tallies records per age band, one row per band in display order.
///
/// Assessments for children missing from `children` are skipped.
pub fn aggregate_by_age_band(
    assessments: &[Assessment],
    children: &[Child],
) -> Vec<AgeBandProgress> {
    let bands: HashMap<ChildId, AgeBand> = children
        .iter()
        .map(|child| (child.id, child.age_band))
        .collect();
    let mut rows: Vec<AgeBandProgress> = AgeBand::ALL
        .into_iter()
        .map(|age_band| AgeBandProgress {
            age_band,
            reached: 0,
            pending: 0,
        })
        .collect();

    for assessment in assessments {
        let Some(band) = bands.get(&assessment.child_id) else {
            warn!(
                "event=aggregate_age_band module=assess status=skipped reason=unknown_child assessment_id={}",
                assessment.id
            );
            continue;
        };
        let Some(row) = rows.iter_mut().find(|row| row.age_band == *band) else {
            continue;
        };
        for record in &assessment.records {
            if record.status == AssessmentStatus::Achieved {
                row.reached += 1;
            } else {
                row.pending += 1;
            }
        }
    }

    rows
}

/// Percent of applicable targets already marked during authoring.
pub fn authoring_progress(recorded: usize, applicable: usize) -> u32 {
    if applicable == 0 {
        return 0;
    }
    let percent = ((recorded as f64 / applicable as f64) * 100.0).round() as u32;
    percent.min(100)
}

#[cfg(test)]
mod tests {
    use super::{aggregate, aggregate_by_age_band, authoring_progress, StatusTally};
    use crate::model::assessment::{Assessment, AssessmentRecord, AssessmentStatus};
    use crate::model::child::Child;
    use crate::model::target::AgeBand;
    use uuid::Uuid;

    fn assessment_for(child: Uuid, statuses: &[AssessmentStatus]) -> Assessment {
        let records = statuses
            .iter()
            .map(|status| AssessmentRecord::new(Uuid::new_v4(), *status))
            .collect();
        Assessment::new(child, "Cô Lan", records, None).unwrap()
    }

    #[test]
    fn empty_input_yields_zero_tally_and_rate() {
        let tally = aggregate(&[]);
        assert_eq!(tally, StatusTally::default());
        assert_eq!(tally.completion_rate(), 0.0);
        assert_eq!(tally.completion_percent(), 0);
    }

    #[test]
    fn totals_match_record_count_in_any_order() {
        use AssessmentStatus::*;
        let child = Uuid::new_v4();
        let mut assessments = vec![
            assessment_for(child, &[Achieved, Achieved, NotAchieved]),
            assessment_for(child, &[NeedsSupport]),
        ];
        let tally = aggregate(&assessments);
        assert_eq!(
            tally,
            StatusTally {
                achieved: 2,
                not_achieved: 1,
                needs_support: 1,
            }
        );
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.completion_rate(), 0.5);
        assert_eq!(tally.completion_percent(), 50);

        assessments.reverse();
        assert_eq!(aggregate(&assessments), tally);
    }

    #[test]
    fn completion_percent_rounds_to_nearest() {
        let tally = StatusTally {
            achieved: 2,
            not_achieved: 1,
            needs_support: 0,
        };
        assert_eq!(tally.completion_percent(), 67);
        assert_eq!(tally.count(AssessmentStatus::NotAchieved), 1);
    }

    #[test]
    fn age_band_rows_follow_the_childs_band() {
        use AssessmentStatus::*;
        let older = Child::new("Bảo", "2018-11-05", "Lá 1", AgeBand::Age5To6, "Cô Minh").unwrap();
        let younger =
            Child::new("An", "2020-05-12", "Mầm 1", AgeBand::Age3To4, "Cô Lan").unwrap();
        let assessments = vec![
            assessment_for(older.id, &[Achieved, NeedsSupport]),
            assessment_for(younger.id, &[Achieved]),
            assessment_for(older.id, &[NotAchieved]),
            assessment_for(Uuid::new_v4(), &[Achieved]),
        ];

        let rows = aggregate_by_age_band(&assessments, &[older, younger]);
        assert_eq!(rows.len(), AgeBand::ALL.len());
        let row = |band| rows.iter().find(|row| row.age_band == band).unwrap();
        assert_eq!((row(AgeBand::Age5To6).reached, row(AgeBand::Age5To6).pending), (1, 2));
        assert_eq!((row(AgeBand::Age3To4).reached, row(AgeBand::Age3To4).pending), (1, 0));
        assert_eq!(row(AgeBand::Infant3To12Months).reached, 0);
    }

    #[test]
    fn authoring_progress_handles_empty_checklist() {
        assert_eq!(authoring_progress(0, 0), 0);
        assert_eq!(authoring_progress(1, 3), 33);
        assert_eq!(authoring_progress(2, 3), 67);
        assert_eq!(authoring_progress(4, 4), 100);
    }
}
