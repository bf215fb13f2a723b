//! Two-step assessment authoring workflow.
//!
//! # Responsibility
//! - Track the child, evaluator and per-target records while a teacher fills
//!   in a checklist.
//! - Turn a complete draft into one immutable [`Assessment`].
//!
//! # Invariants
//! - `SelectingSubject -> RecordingTargets` requires a child and a non-blank
//!   evaluator name. Cancelling back is always allowed.
//! - One record per target; later edits overwrite earlier ones in place.
//! - Submission needs a child, an evaluator and at least one record, and
//!   never fails because of the summary provider.

use crate::assess::aggregate::authoring_progress;
use crate::assess::filter::{domain_counts, filter_targets};
use crate::model::assessment::{
    Assessment, AssessmentRecord, AssessmentStatus, AssessmentValidationError,
};
use crate::model::child::Child;
use crate::model::target::{Domain, Target, TargetId};
use crate::summary::{generate_summary, SummaryProvider};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Current wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    SelectingSubject,
    RecordingTargets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    NoChildSelected,
    BlankEvaluator,
    NoRecords,
    /// Action not available in the current step.
    WrongStep(SessionStep),
    Assessment(AssessmentValidationError),
}

impl Display for WorkflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoChildSelected => write!(f, "no child selected"),
            Self::BlankEvaluator => write!(f, "evaluator name must not be blank"),
            Self::NoRecords => write!(f, "no target has been marked yet"),
            Self::WrongStep(step) => write!(f, "action not allowed while in {step:?}"),
            Self::Assessment(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorkflowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Assessment(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AssessmentValidationError> for WorkflowError {
    fn from(value: AssessmentValidationError) -> Self {
        Self::Assessment(value)
    }
}

/// Authoring state for one assessment.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    step: SessionStep,
    child: Option<Child>,
    evaluator_name: String,
    domain_filter: Option<Domain>,
    records: Vec<AssessmentRecord>,
}

impl AssessmentSession {
    /// Starts in `SelectingSubject` with a pre-filled evaluator name.
    pub fn new(evaluator_name: impl Into<String>) -> Self {
        Self {
            step: SessionStep::SelectingSubject,
            child: None,
            evaluator_name: evaluator_name.into(),
            domain_filter: None,
            records: Vec::new(),
        }
    }

    pub fn step(&self) -> SessionStep {
        self.step
    }

    pub fn child(&self) -> Option<&Child> {
        self.child.as_ref()
    }

    pub fn evaluator_name(&self) -> &str {
        &self.evaluator_name
    }

    pub fn domain_filter(&self) -> Option<Domain> {
        self.domain_filter
    }

    /// Records in the order targets were first marked.
    pub fn records(&self) -> &[AssessmentRecord] {
        &self.records
    }

    pub fn record_for(&self, target_id: TargetId) -> Option<&AssessmentRecord> {
        self.records
            .iter()
            .find(|record| record.target_id == target_id)
    }

    pub fn select_child(&mut self, child: Child) -> Result<(), WorkflowError> {
        self.require_step(SessionStep::SelectingSubject)?;
        self.child = Some(child);
        Ok(())
    }

    pub fn set_evaluator_name(&mut self, name: impl Into<String>) -> Result<(), WorkflowError> {
        self.require_step(SessionStep::SelectingSubject)?;
        self.evaluator_name = name.into();
        Ok(())
    }

    pub fn can_advance(&self) -> bool {
        self.step == SessionStep::SelectingSubject && self.check_subject().is_ok()
    }

    /// Moves to `RecordingTargets`.
    pub fn advance(&mut self) -> Result<(), WorkflowError> {
        self.require_step(SessionStep::SelectingSubject)?;
        self.check_subject()?;
        self.step = SessionStep::RecordingTargets;
        Ok(())
    }

    /// Returns to `SelectingSubject`, discarding marked records and the
    /// domain filter.
    pub fn cancel(&mut self) {
        self.step = SessionStep::SelectingSubject;
        self.domain_filter = None;
        self.records.clear();
    }

    /// `None` shows all domains.
    pub fn set_domain_filter(&mut self, domain: Option<Domain>) {
        self.domain_filter = domain;
    }

    /// Sets the status for a target, keeping any existing note.
    pub fn set_status(
        &mut self,
        target_id: TargetId,
        status: AssessmentStatus,
    ) -> Result<(), WorkflowError> {
        self.require_step(SessionStep::RecordingTargets)?;
        match self.record_mut(target_id) {
            Some(record) => record.status = status,
            None => self.records.push(AssessmentRecord::new(target_id, status)),
        }
        Ok(())
    }

    /// Sets the note for a target.
    ///
    /// A target without a record gets one with status `NotAchieved`. An empty
    /// note clears it.
    pub fn set_note(
        &mut self,
        target_id: TargetId,
        note: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        self.require_step(SessionStep::RecordingTargets)?;
        let note: String = note.into();
        let note = Some(note).filter(|note| !note.is_empty());
        match self.record_mut(target_id) {
            Some(record) => record.note = note,
            None => self.records.push(AssessmentRecord {
                target_id,
                status: AssessmentStatus::NotAchieved,
                note,
            }),
        }
        Ok(())
    }

    /// Checklist for the selected child under the current domain filter.
    pub fn visible_targets<'a>(&self, catalog: &'a [Target]) -> Vec<&'a Target> {
        match &self.child {
            Some(child) => filter_targets(catalog, child.age_band, self.domain_filter),
            None => Vec::new(),
        }
    }

    /// Per-domain tab counts for the selected child's age band.
    pub fn domain_tabs(&self, catalog: &[Target]) -> Vec<(Domain, usize)> {
        match &self.child {
            Some(child) => domain_counts(catalog, child.age_band),
            None => Vec::new(),
        }
    }

    /// Percent of the child's applicable targets already marked.
    pub fn progress(&self, catalog: &[Target]) -> u32 {
        let applicable = match &self.child {
            Some(child) => filter_targets(catalog, child.age_band, None).len(),
            None => 0,
        };
        authoring_progress(self.records.len(), applicable)
    }

    pub fn can_submit(&self) -> bool {
        self.check_submittable().is_ok()
    }

    /// Builds the assessment without changing the session.
    ///
    /// The summary provider is awaited once; its failure only swaps in the
    /// fallback text.
    pub async fn build_assessment(
        &self,
        provider: &dyn SummaryProvider,
        catalog: &[Target],
    ) -> Result<Assessment, WorkflowError> {
        let child = self.check_submittable()?;
        let summary = generate_summary(provider, Some(child.name.as_str()), &self.records, catalog)
            .await
            .into_text();
        let assessment = Assessment::new(
            child.id,
            &self.evaluator_name,
            self.records.clone(),
            Some(summary),
        )?;
        info!(
            "event=assessment_submit module=workflow status=ok assessment_id={} records={}",
            assessment.id,
            assessment.records.len()
        );
        Ok(assessment)
    }

    /// Resets to a fresh `SelectingSubject` step, keeping the evaluator name.
    pub fn finish(&mut self) {
        self.cancel();
        self.child = None;
    }

    /// Builds the assessment and resets the session on success.
    pub async fn submit(
        &mut self,
        provider: &dyn SummaryProvider,
        catalog: &[Target],
    ) -> Result<Assessment, WorkflowError> {
        let assessment = self.build_assessment(provider, catalog).await?;
        self.finish();
        Ok(assessment)
    }

    fn require_step(&self, expected: SessionStep) -> Result<(), WorkflowError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WorkflowError::WrongStep(self.step))
        }
    }

    fn check_subject(&self) -> Result<&Child, WorkflowError> {
        let child = self.child.as_ref().ok_or(WorkflowError::NoChildSelected)?;
        if self.evaluator_name.trim().is_empty() {
            return Err(WorkflowError::BlankEvaluator);
        }
        Ok(child)
    }

    fn check_submittable(&self) -> Result<&Child, WorkflowError> {
        let child = self.check_subject()?;
        if self.records.is_empty() {
            return Err(WorkflowError::NoRecords);
        }
        Ok(child)
    }

    fn record_mut(&mut self, target_id: TargetId) -> Option<&mut AssessmentRecord> {
        self.records
            .iter_mut()
            .find(|record| record.target_id == target_id)
    }
}
