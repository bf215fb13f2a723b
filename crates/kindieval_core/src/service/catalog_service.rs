//! Target catalog use-case service.
//!
//! # Responsibility
//! - List the catalog and the checklist applicable to an age band.
//! - Add targets from a draft whose domain is pre-filled by the classifier.
//!
//! # Invariants
//! - Targets are appended; catalog order is insertion order.
//! - Classification only seeds the draft's domain. Stored targets are never
//!   reclassified.

use crate::assess::classify::suggest_domain;
use crate::assess::filter::{domain_counts, filter_targets};
use crate::model::target::{AgeBand, Domain, Target, TargetId, TargetValidationError};
use crate::repo::target_repo::{TargetListQuery, TargetRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CatalogError {
    /// Code or content left blank.
    Incomplete(TargetValidationError),
    DuplicateCode(String),
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incomplete(err) => write!(f, "{err}"),
            Self::DuplicateCode(code) => write!(f, "target code already exists: {code}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Incomplete(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::DuplicateCode(_) => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateCode(code) => Self::DuplicateCode(code),
            RepoError::InvalidTarget(err) => Self::Incomplete(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TargetValidationError> for CatalogError {
    fn from(value: TargetValidationError) -> Self {
        Self::Incomplete(value)
    }
}

/// Editable form state for a new catalog target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDraft {
    pub code: String,
    pub age_band: AgeBand,
    pub domain: Domain,
    pub content: String,
}

impl Default for TargetDraft {
    fn default() -> Self {
        Self {
            code: String::new(),
            age_band: AgeBand::Age3To4,
            domain: Domain::Physical,
            content: String::new(),
        }
    }
}

impl TargetDraft {
    /// Replaces the content and re-suggests the domain.
    ///
    /// The current domain is kept when no keyword rule matches.
    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.domain = suggest_domain(&content, self.domain);
        self.content = content;
    }

    /// Whether both code and content are filled in.
    pub fn is_complete(&self) -> bool {
        !self.code.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Catalog service facade over a target repository.
pub struct CatalogService<R: TargetRepository> {
    repo: R,
}

impl<R: TargetRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the catalog, optionally restricted to one age band.
    pub fn list_targets(&self, age_band: Option<AgeBand>) -> RepoResult<Vec<Target>> {
        self.repo.list_targets(&TargetListQuery {
            age_band,
            domain: None,
        })
    }

    pub fn get_target(&self, id: TargetId) -> RepoResult<Option<Target>> {
        self.repo.get_target(id)
    }

    /// Checklist for one age band and optional domain, in catalog order.
    pub fn checklist(&self, age_band: AgeBand, domain: Option<Domain>) -> RepoResult<Vec<Target>> {
        let catalog = self.list_targets(None)?;
        Ok(filter_targets(&catalog, age_band, domain)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Non-empty per-domain counts for one age band.
    pub fn domain_tabs(&self, age_band: AgeBand) -> RepoResult<Vec<(Domain, usize)>> {
        let catalog = self.list_targets(Some(age_band))?;
        Ok(domain_counts(&catalog, age_band))
    }

    /// Validates the draft and appends a new target with a fresh id.
    pub fn add_target(&self, draft: &TargetDraft) -> Result<Target, CatalogError> {
        let target = Target::new(
            draft.code.as_str(),
            draft.age_band,
            draft.domain,
            draft.content.as_str(),
        )?;
        self.repo.create_target(&target)?;
        info!(
            "event=catalog_add module=catalog status=ok target_id={} age_band={} domain={}",
            target.id,
            target.age_band.as_str(),
            target.domain.as_str()
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::TargetDraft;
    use crate::model::target::{AgeBand, Domain};

    #[test]
    fn draft_defaults_match_the_entry_form() {
        let draft = TargetDraft::default();
        assert_eq!(draft.domain, Domain::Physical);
        assert_eq!(draft.age_band, AgeBand::Age3To4);
        assert!(!draft.is_complete());
    }

    #[test]
    fn set_content_updates_domain_only_on_match() {
        let mut draft = TargetDraft::default();
        draft.set_content("Kể lại truyện");
        assert_eq!(draft.domain, Domain::Language);

        draft.set_content("abc");
        assert_eq!(draft.domain, Domain::Language);
        assert_eq!(draft.content, "abc");
    }
}
