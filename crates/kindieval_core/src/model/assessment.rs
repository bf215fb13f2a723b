//! Assessment records and finalized assessments.
//!
//! # Responsibility
//! - Define the three-valued outcome recorded per target.
//! - Define the immutable bundle produced by one submission.
//!
//! # Invariants
//! - Within one assessment every `target_id` appears at most once.
//! - `id` and `assessed_at` are assigned once, at construction.
//! - A finalized assessment carries at least one record.

use crate::model::child::ChildId;
use crate::model::target::TargetId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub type AssessmentId = Uuid;

/// Outcome recorded for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Achieved,
    NotAchieved,
    NeedsSupport,
}

impl AssessmentStatus {
    pub const ALL: [AssessmentStatus; 3] = [
        AssessmentStatus::Achieved,
        AssessmentStatus::NotAchieved,
        AssessmentStatus::NeedsSupport,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Achieved => "Đạt",
            Self::NotAchieved => "Chưa đạt",
            Self::NeedsSupport => "Cần hỗ trợ",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Achieved => "achieved",
            Self::NotAchieved => "not_achieved",
            Self::NeedsSupport => "needs_support",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl Display for AssessmentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One target's recorded outcome within an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub target_id: TargetId,
    pub status: AssessmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AssessmentRecord {
    pub fn new(target_id: TargetId, status: AssessmentStatus) -> Self {
        Self {
            target_id,
            status,
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentValidationError {
    NilId,
    BlankEvaluator,
    NoRecords,
    DuplicateTarget(TargetId),
}

impl Display for AssessmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "assessment id must not be nil"),
            Self::BlankEvaluator => write!(f, "evaluator name must not be blank"),
            Self::NoRecords => write!(f, "assessment must contain at least one record"),
            Self::DuplicateTarget(id) => {
                write!(f, "target {id} recorded more than once in one assessment")
            }
        }
    }
}

impl Error for AssessmentValidationError {}

/// Finalized, timestamped bundle of records for one child by one evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub child_id: ChildId,
    pub evaluator_name: String,
    /// Unix epoch milliseconds.
    pub assessed_at: i64,
    /// Authoring order is preserved.
    pub records: Vec<AssessmentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Assessment {
    /// Finalizes a new assessment, stamping a fresh id and the current time.
    ///
    /// The evaluator name is trimmed.
    pub fn new(
        child_id: ChildId,
        evaluator_name: &str,
        records: Vec<AssessmentRecord>,
        summary: Option<String>,
    ) -> Result<Self, AssessmentValidationError> {
        let assessment = Self {
            id: Uuid::new_v4(),
            child_id,
            evaluator_name: evaluator_name.trim().to_string(),
            assessed_at: now_epoch_ms(),
            records,
            summary,
        };
        assessment.validate()?;
        Ok(assessment)
    }

    pub fn validate(&self) -> Result<(), AssessmentValidationError> {
        if self.id.is_nil() {
            return Err(AssessmentValidationError::NilId);
        }
        if self.evaluator_name.trim().is_empty() {
            return Err(AssessmentValidationError::BlankEvaluator);
        }
        if self.records.is_empty() {
            return Err(AssessmentValidationError::NoRecords);
        }
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.target_id) {
                return Err(AssessmentValidationError::DuplicateTarget(record.target_id));
            }
        }
        Ok(())
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{Assessment, AssessmentRecord, AssessmentStatus, AssessmentValidationError};
    use uuid::Uuid;

    #[test]
    fn new_stamps_identity_and_trims_evaluator() {
        let records = vec![AssessmentRecord::new(Uuid::new_v4(), AssessmentStatus::Achieved)];
        let assessment = Assessment::new(Uuid::new_v4(), "  Cô Lan ", records, None).unwrap();
        assert!(!assessment.id.is_nil());
        assert!(assessment.assessed_at > 0);
        assert_eq!(assessment.evaluator_name, "Cô Lan");
    }

    #[test]
    fn duplicate_targets_are_rejected() {
        let target = Uuid::new_v4();
        let records = vec![
            AssessmentRecord::new(target, AssessmentStatus::Achieved),
            AssessmentRecord::new(target, AssessmentStatus::NeedsSupport),
        ];
        let err = Assessment::new(Uuid::new_v4(), "Cô Lan", records, None).unwrap_err();
        assert_eq!(err, AssessmentValidationError::DuplicateTarget(target));
    }

    #[test]
    fn empty_records_and_blank_evaluator_are_rejected() {
        let err = Assessment::new(Uuid::new_v4(), "Cô Lan", Vec::new(), None).unwrap_err();
        assert_eq!(err, AssessmentValidationError::NoRecords);

        let records = vec![AssessmentRecord::new(Uuid::new_v4(), AssessmentStatus::Achieved)];
        let err = Assessment::new(Uuid::new_v4(), " ", records, None).unwrap_err();
        assert_eq!(err, AssessmentValidationError::BlankEvaluator);
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_value(AssessmentStatus::NeedsSupport).unwrap();
        assert_eq!(json, "needs_support");
        assert_eq!(
            AssessmentStatus::parse("not_achieved"),
            Some(AssessmentStatus::NotAchieved)
        );
    }
}
