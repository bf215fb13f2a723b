//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate entities before persistence.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Lookups return `Ok(None)` for absent rows; constraint failures surface as
//!   `DuplicateCode` or `MissingReference` rather than raw SQLite errors.

use crate::db::DbError;
use crate::model::assessment::AssessmentValidationError;
use crate::model::child::ChildValidationError;
use crate::model::target::TargetValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod assessment_repo;
pub mod child_repo;
pub mod target_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all stores.
#[derive(Debug)]
pub enum RepoError {
    InvalidTarget(TargetValidationError),
    InvalidChild(ChildValidationError),
    InvalidAssessment(AssessmentValidationError),
    Db(DbError),
    /// Another target already uses this catalog code.
    DuplicateCode(String),
    /// Written row points at a child or target that does not exist.
    MissingReference(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTarget(err) => write!(f, "{err}"),
            Self::InvalidChild(err) => write!(f, "{err}"),
            Self::InvalidAssessment(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateCode(code) => write!(f, "target code already exists: {code}"),
            Self::MissingReference(details) => write!(f, "missing reference: {details}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTarget(err) => Some(err),
            Self::InvalidChild(err) => Some(err),
            Self::InvalidAssessment(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateCode(_)
            | Self::MissingReference(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<TargetValidationError> for RepoError {
    fn from(value: TargetValidationError) -> Self {
        Self::InvalidTarget(value)
    }
}

impl From<ChildValidationError> for RepoError {
    fn from(value: ChildValidationError) -> Self {
        Self::InvalidChild(value)
    }
}

impl From<AssessmentValidationError> for RepoError {
    fn from(value: AssessmentValidationError) -> Self {
        Self::InvalidAssessment(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    constraint_code(err) == Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
