//! Child roster and staff reference data.
//!
//! # Invariants
//! - `birth_date` is an existing ISO calendar date (`YYYY-MM-DD`).
//! - `name` is never blank.

use crate::model::target::AgeBand;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static BIRTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid birth date regex")
});

pub type ChildId = Uuid;

/// Validation failures for [`Child`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildValidationError {
    NilId,
    BlankName,
    InvalidBirthDate(String),
}

impl Display for ChildValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "child id must not be nil"),
            Self::BlankName => write!(f, "child name must not be blank"),
            Self::InvalidBirthDate(value) => {
                write!(f, "birth date `{value}` is not a YYYY-MM-DD date")
            }
        }
    }
}

impl Error for ChildValidationError {}

/// A child being assessed. Static reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: ChildId,
    pub name: String,
    pub birth_date: String,
    /// Class label, e.g. `Mầm 1`.
    pub class_label: String,
    pub age_band: AgeBand,
    pub teacher: String,
}

impl Child {
    pub fn new(
        name: impl Into<String>,
        birth_date: impl Into<String>,
        class_label: impl Into<String>,
        age_band: AgeBand,
        teacher: impl Into<String>,
    ) -> Result<Self, ChildValidationError> {
        let child = Self {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            birth_date: birth_date.into().trim().to_string(),
            class_label: class_label.into(),
            age_band,
            teacher: teacher.into(),
        };
        child.validate()?;
        Ok(child)
    }

    pub fn validate(&self) -> Result<(), ChildValidationError> {
        if self.id.is_nil() {
            return Err(ChildValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ChildValidationError::BlankName);
        }
        let is_calendar_date = BIRTH_DATE_RE.is_match(&self.birth_date)
            && NaiveDate::parse_from_str(&self.birth_date, "%Y-%m-%d").is_ok();
        if !is_calendar_date {
            return Err(ChildValidationError::InvalidBirthDate(
                self.birth_date.clone(),
            ));
        }
        Ok(())
    }
}

/// Staff role. Only informs which screens a user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
}

impl UserRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "Ban giám hiệu",
            Self::Teacher => "Giáo viên",
        }
    }
}

/// Signed-in staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    /// Teachers see only their own class in the roster.
    pub assigned_class: Option<String>,
}
