//! Finalized assessment use-case service.
//!
//! # Responsibility
//! - Persist submitted assessments and read them back newest-first.
//! - Compute dashboard figures from the stored history.
//!
//! # Invariants
//! - Stored assessments are never edited.
//! - Dashboard figures are derived on demand and never cached.

use crate::assess::aggregate::{aggregate, aggregate_by_age_band, AgeBandProgress, StatusTally};
use crate::model::assessment::{Assessment, AssessmentId};
use crate::model::child::{Child, ChildId};
use crate::repo::assessment_repo::AssessmentRepository;
use crate::repo::RepoResult;
use log::info;
use serde::Serialize;

/// Dashboard figures over all stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub assessment_count: usize,
    pub tally: StatusTally,
    /// Rounded share of achieved records.
    pub completion_percent: u32,
    /// One row per age band in display order.
    pub by_age_band: Vec<AgeBandProgress>,
}

impl DashboardSnapshot {
    pub fn from_assessments(assessments: &[Assessment], children: &[Child]) -> Self {
        let tally = aggregate(assessments);
        Self {
            assessment_count: assessments.len(),
            completion_percent: tally.completion_percent(),
            tally,
            by_age_band: aggregate_by_age_band(assessments, children),
        }
    }
}

pub struct AssessmentService<R: AssessmentRepository> {
    repo: R,
}

impl<R: AssessmentRepository> AssessmentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores one finalized assessment.
    pub fn record(&self, assessment: &Assessment) -> RepoResult<AssessmentId> {
        let id = self.repo.create_assessment(assessment)?;
        info!(
            "event=assessment_store module=assessment status=ok assessment_id={} records={}",
            id,
            assessment.records.len()
        );
        Ok(id)
    }

    pub fn get(&self, id: AssessmentId) -> RepoResult<Option<Assessment>> {
        self.repo.get_assessment(id)
    }

    /// All assessments, newest first.
    pub fn list(&self) -> RepoResult<Vec<Assessment>> {
        self.repo.list_assessments()
    }

    pub fn list_for_child(&self, child_id: ChildId) -> RepoResult<Vec<Assessment>> {
        self.repo.list_assessments_for_child(child_id)
    }

    pub fn dashboard(&self, children: &[Child]) -> RepoResult<DashboardSnapshot> {
        let assessments = self.repo.list_assessments()?;
        Ok(DashboardSnapshot::from_assessments(&assessments, children))
    }
}
