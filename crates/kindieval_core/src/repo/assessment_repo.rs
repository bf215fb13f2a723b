//! Assessment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist an assessment and all of its records as one unit.
//! - Load assessments newest first with records in authoring order.
//!
//! # Invariants
//! - An assessment row never exists without its records.
//! - Records keep the `position` they had when the assessment was built.
//! - There is no update path; assessments are immutable once stored.

use super::{is_foreign_key_violation, parse_uuid, RepoError, RepoResult};
use crate::model::assessment::{Assessment, AssessmentId, AssessmentRecord, AssessmentStatus};
use crate::model::child::ChildId;
use rusqlite::{params, Connection, Row};

const ASSESSMENT_SELECT_SQL: &str = "SELECT
    uuid,
    child_uuid,
    evaluator_name,
    assessed_at,
    summary
FROM assessments";

pub trait AssessmentRepository {
    fn create_assessment(&self, assessment: &Assessment) -> RepoResult<AssessmentId>;
    fn get_assessment(&self, id: AssessmentId) -> RepoResult<Option<Assessment>>;
    /// Newest first.
    fn list_assessments(&self) -> RepoResult<Vec<Assessment>>;
    /// Newest first, one child only.
    fn list_assessments_for_child(&self, child_id: ChildId) -> RepoResult<Vec<Assessment>>;
}

pub struct SqliteAssessmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssessmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_assessments(
        &self,
        where_clause: &str,
        bind: &[&dyn rusqlite::ToSql],
    ) -> RepoResult<Vec<Assessment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSESSMENT_SELECT_SQL} {where_clause} ORDER BY assessed_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query(bind)?;
        let mut assessments = Vec::new();
        while let Some(row) = rows.next()? {
            assessments.push(parse_assessment_row(row)?);
        }
        for assessment in &mut assessments {
            assessment.records = self.load_records(assessment.id)?;
            assessment.validate()?;
        }
        Ok(assessments)
    }

    fn load_records(&self, id: AssessmentId) -> RepoResult<Vec<AssessmentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT target_uuid, status, note
             FROM assessment_records
             WHERE assessment_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

impl AssessmentRepository for SqliteAssessmentRepository<'_> {
    fn create_assessment(&self, assessment: &Assessment) -> RepoResult<AssessmentId> {
        assessment.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO assessments (uuid, child_uuid, evaluator_name, assessed_at, summary)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                assessment.id.to_string(),
                assessment.child_id.to_string(),
                assessment.evaluator_name.as_str(),
                assessment.assessed_at,
                assessment.summary.as_deref(),
            ],
        )
        .map_err(|err| map_reference_error(err, "child", assessment.child_id.to_string()))?;

        for (position, record) in assessment.records.iter().enumerate() {
            tx.execute(
                "INSERT INTO assessment_records
                    (assessment_uuid, position, target_uuid, status, note)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    assessment.id.to_string(),
                    position as i64,
                    record.target_id.to_string(),
                    record.status.as_str(),
                    record.note.as_deref(),
                ],
            )
            .map_err(|err| map_reference_error(err, "target", record.target_id.to_string()))?;
        }
        tx.commit()?;

        Ok(assessment.id)
    }

    fn get_assessment(&self, id: AssessmentId) -> RepoResult<Option<Assessment>> {
        let mut found = self.query_assessments("WHERE uuid = ?1", &[&id.to_string()])?;
        Ok(found.pop())
    }

    fn list_assessments(&self) -> RepoResult<Vec<Assessment>> {
        self.query_assessments("", &[])
    }

    fn list_assessments_for_child(&self, child_id: ChildId) -> RepoResult<Vec<Assessment>> {
        self.query_assessments("WHERE child_uuid = ?1", &[&child_id.to_string()])
    }
}

fn map_reference_error(err: rusqlite::Error, entity: &str, id: String) -> RepoError {
    if is_foreign_key_violation(&err) {
        return RepoError::MissingReference(format!("{entity} {id}"));
    }
    err.into()
}

fn parse_assessment_row(row: &Row<'_>) -> RepoResult<Assessment> {
    let uuid_text: String = row.get("uuid")?;
    let child_text: String = row.get("child_uuid")?;
    Ok(Assessment {
        id: parse_uuid(&uuid_text, "assessments.uuid")?,
        child_id: parse_uuid(&child_text, "assessments.child_uuid")?,
        evaluator_name: row.get("evaluator_name")?,
        assessed_at: row.get("assessed_at")?,
        records: Vec::new(),
        summary: row.get("summary")?,
    })
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<AssessmentRecord> {
    let target_text: String = row.get("target_uuid")?;
    let status_text: String = row.get("status")?;
    let status = AssessmentStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in assessment_records.status"
        ))
    })?;
    Ok(AssessmentRecord {
        target_id: parse_uuid(&target_text, "assessment_records.target_uuid")?,
        status,
        note: row.get("note")?,
    })
}
