//! Assessment target (developmental milestone) model.
//!
//! # Responsibility
//! - Define the closed age-band and domain vocabularies.
//! - Define the catalog entry checked off during an assessment.
//!
//! # Invariants
//! - `age_band` and `domain` are fixed once a target is created.
//! - `code` and `content` are never blank.
//! - `id` is never the nil UUID.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a catalog target.
pub type TargetId = Uuid;

/// Coarse age bracket used to scope which targets apply to a child.
///
/// Declaration order is the display order used by dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Infant3To12Months,
    Infant12To18Months,
    Infant18To24Months,
    Infant24To36Months,
    Age3To4,
    Age4To5,
    Age5To6,
}

impl AgeBand {
    /// All age bands in display order.
    pub const ALL: [AgeBand; 7] = [
        AgeBand::Infant3To12Months,
        AgeBand::Infant12To18Months,
        AgeBand::Infant18To24Months,
        AgeBand::Infant24To36Months,
        AgeBand::Age3To4,
        AgeBand::Age4To5,
        AgeBand::Age5To6,
    ];

    /// User-facing label, e.g. `3-4 tuổi`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Infant3To12Months => "3-12 tháng",
            Self::Infant12To18Months => "12-18 tháng",
            Self::Infant18To24Months => "18-24 tháng",
            Self::Infant24To36Months => "24-36 tháng",
            Self::Age3To4 => "3-4 tuổi",
            Self::Age4To5 => "4-5 tuổi",
            Self::Age5To6 => "5-6 tuổi",
        }
    }

    /// Stable storage id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Infant3To12Months => "infant_3_12",
            Self::Infant12To18Months => "infant_12_18",
            Self::Infant18To24Months => "infant_18_24",
            Self::Infant24To36Months => "infant_24_36",
            Self::Age3To4 => "age_3_4",
            Self::Age4To5 => "age_4_5",
            Self::Age5To6 => "age_5_6",
        }
    }

    /// Parses a storage id produced by [`AgeBand::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.as_str() == value)
    }

    /// Parses a user-facing label (surrounding whitespace ignored).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|band| band.label() == label)
    }
}

impl Display for AgeBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Developmental domain a target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Physical,
    Cognitive,
    Language,
    SocialEmotional,
    Aesthetic,
}

impl Domain {
    /// All domains in catalog order.
    pub const ALL: [Domain; 5] = [
        Domain::Physical,
        Domain::Cognitive,
        Domain::Language,
        Domain::SocialEmotional,
        Domain::Aesthetic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Physical => "Phát triển thể chất",
            Self::Cognitive => "Phát triển nhận thức",
            Self::Language => "Phát triển ngôn ngữ",
            Self::SocialEmotional => "Phát triển tình cảm - Kỹ năng xã hội",
            Self::Aesthetic => "Phát triển thẩm mỹ",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Cognitive => "cognitive",
            Self::Language => "language",
            Self::SocialEmotional => "social_emotional",
            Self::Aesthetic => "aesthetic",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.as_str() == value)
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failures for [`Target`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetValidationError {
    NilId,
    BlankCode,
    BlankContent,
}

impl Display for TargetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "target id must not be nil"),
            Self::BlankCode => write!(f, "target code must not be blank"),
            Self::BlankContent => write!(f, "target content must not be blank"),
        }
    }
}

impl Error for TargetValidationError {}

/// One developmental milestone in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    /// Human-facing catalog code, e.g. `MG.34.TC.1`.
    pub code: String,
    pub age_band: AgeBand,
    pub domain: Domain,
    /// Expected outcome text shown on the checklist.
    pub content: String,
}

impl Target {
    /// Creates a target with a freshly generated id.
    ///
    /// Code and content are trimmed before validation.
    pub fn new(
        code: impl Into<String>,
        age_band: AgeBand,
        domain: Domain,
        content: impl Into<String>,
    ) -> Result<Self, TargetValidationError> {
        Self::with_id(Uuid::new_v4(), code, age_band, domain, content)
    }

    /// Creates a target with a caller-provided id.
    pub fn with_id(
        id: TargetId,
        code: impl Into<String>,
        age_band: AgeBand,
        domain: Domain,
        content: impl Into<String>,
    ) -> Result<Self, TargetValidationError> {
        let target = Self {
            id,
            code: code.into().trim().to_string(),
            age_band,
            domain,
            content: content.into().trim().to_string(),
        };
        target.validate()?;
        Ok(target)
    }

    /// Checks all target invariants.
    pub fn validate(&self) -> Result<(), TargetValidationError> {
        if self.id.is_nil() {
            return Err(TargetValidationError::NilId);
        }
        if self.code.trim().is_empty() {
            return Err(TargetValidationError::BlankCode);
        }
        if self.content.trim().is_empty() {
            return Err(TargetValidationError::BlankContent);
        }
        Ok(())
    }
}
