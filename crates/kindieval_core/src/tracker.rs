//! Application coordinator.
//!
//! # Responsibility
//! - Own the storage connection and the summary provider.
//! - Expose catalog, roster, authoring and dashboard operations to callers.
//!
//! # Invariants
//! - The tracker is the single owner of catalog, roster and assessment state.
//! - Submitting a session persists exactly one assessment or nothing.

use crate::assess::filter::filter_children;
use crate::config::{load_config, ConfigError, CoreConfig, SummaryConfig};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::init_logging_from_config;
use crate::model::assessment::Assessment;
use crate::model::child::{Child, ChildId, User, UserRole};
use crate::model::target::{AgeBand, Target};
use crate::repo::assessment_repo::SqliteAssessmentRepository;
use crate::repo::child_repo::{ChildRepository, SqliteChildRepository};
use crate::repo::target_repo::{SqliteTargetRepository, TargetRepository};
use crate::repo::RepoError;
use crate::seed::{builtin_children, builtin_targets, builtin_users};
use crate::service::assessment_service::{AssessmentService, DashboardSnapshot};
use crate::service::assessment_session::{AssessmentSession, WorkflowError};
use crate::service::catalog_service::{CatalogError, CatalogService, TargetDraft};
use crate::summary::gemini::GeminiSummaryProvider;
use crate::summary::{DisabledSummaryProvider, SummaryProvider};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug)]
pub enum TrackerError {
    Config(ConfigError),
    /// Logger backend refused to start.
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    Catalog(CatalogError),
    Workflow(WorkflowError),
    UnknownChild(ChildId),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Workflow(err) => write!(f, "{err}"),
            Self::UnknownChild(id) => write!(f, "child not found: {id}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Workflow(err) => Some(err),
            Self::UnknownChild(_) => None,
        }
    }
}

impl From<ConfigError> for TrackerError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for TrackerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for TrackerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CatalogError> for TrackerError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<WorkflowError> for TrackerError {
    fn from(value: WorkflowError) -> Self {
        Self::Workflow(value)
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Counts of rows inserted by [`Tracker::seed_reference_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub targets: usize,
    pub children: usize,
}

pub struct Tracker {
    conn: Connection,
    summary: Box<dyn SummaryProvider>,
    users: Vec<User>,
}

impl Tracker {
    /// Loads the config file, starts file logging when a log directory is
    /// set, then opens the tracker.
    ///
    /// A missing file means defaults: in-memory storage, no file logging and
    /// summaries disabled.
    pub fn from_config_file(path: impl AsRef<Path>) -> TrackerResult<Self> {
        let config = load_config(path)?;
        init_logging_from_config(&config.logging).map_err(TrackerError::Logging)?;
        Self::open(&config)
    }

    /// Opens storage and picks the summary provider from config.
    pub fn open(config: &CoreConfig) -> TrackerResult<Self> {
        let conn = match config.storage.db_path.as_deref() {
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        };
        let summary = summary_provider(&config.summary);
        info!(
            "event=tracker_open module=tracker status=ok storage={} provider={}",
            if config.storage.db_path.is_some() { "file" } else { "memory" },
            summary.name()
        );
        Ok(Self::with_connection(conn, summary))
    }

    /// In-memory tracker with an explicit provider.
    pub fn in_memory(summary: Box<dyn SummaryProvider>) -> TrackerResult<Self> {
        Ok(Self::with_connection(open_db_in_memory()?, summary))
    }

    fn with_connection(conn: Connection, summary: Box<dyn SummaryProvider>) -> Self {
        Self {
            conn,
            summary,
            users: builtin_users(),
        }
    }

    /// Inserts built-in targets whose code is missing, and the demo roster
    /// when no child exists yet.
    pub fn seed_reference_data(&self) -> TrackerResult<SeedReport> {
        let targets = SqliteTargetRepository::new(&self.conn);
        let children = SqliteChildRepository::new(&self.conn);
        let mut report = SeedReport::default();

        for target in builtin_targets() {
            if targets.get_target_by_code(&target.code)?.is_none() {
                targets.create_target(&target)?;
                report.targets += 1;
            }
        }
        if children.list_children()?.is_empty() {
            for child in builtin_children() {
                children.create_child(&child)?;
                report.children += 1;
            }
        }

        info!(
            "event=seed module=tracker status=ok targets={} children={}",
            report.targets, report.children
        );
        Ok(report)
    }

    pub fn summary_provider_name(&self) -> &'static str {
        self.summary.name()
    }

    pub fn catalog_service(&self) -> CatalogService<SqliteTargetRepository<'_>> {
        CatalogService::new(SqliteTargetRepository::new(&self.conn))
    }

    pub fn assessment_service(&self) -> AssessmentService<SqliteAssessmentRepository<'_>> {
        AssessmentService::new(SqliteAssessmentRepository::new(&self.conn))
    }

    /// Whole catalog in insertion order.
    pub fn catalog(&self) -> TrackerResult<Vec<Target>> {
        Ok(self.catalog_service().list_targets(None)?)
    }

    pub fn add_target(&self, draft: &TargetDraft) -> TrackerResult<Target> {
        Ok(self.catalog_service().add_target(draft)?)
    }

    pub fn children(&self) -> TrackerResult<Vec<Child>> {
        Ok(SqliteChildRepository::new(&self.conn).list_children()?)
    }

    pub fn add_child(&self, child: &Child) -> TrackerResult<()> {
        SqliteChildRepository::new(&self.conn).create_child(child)?;
        Ok(())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Children a user may pick from.
    ///
    /// Teachers with an assigned class see that class only.
    pub fn roster_for(&self, user: &User, age_band: Option<AgeBand>) -> TrackerResult<Vec<Child>> {
        let children = self.children()?;
        let class = match user.role {
            UserRole::Teacher => user.assigned_class.as_deref(),
            UserRole::Admin => None,
        };
        Ok(filter_children(&children, age_band, class)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn start_session(&self, evaluator_name: impl Into<String>) -> AssessmentSession {
        AssessmentSession::new(evaluator_name)
    }

    /// Loads the child by id and selects it in the session.
    pub fn select_child(
        &self,
        session: &mut AssessmentSession,
        child_id: ChildId,
    ) -> TrackerResult<()> {
        let child = SqliteChildRepository::new(&self.conn)
            .get_child(child_id)?
            .ok_or(TrackerError::UnknownChild(child_id))?;
        session.select_child(child)?;
        Ok(())
    }

    /// Finalizes the session, stores the assessment and resets the session.
    ///
    /// The session is left untouched when building or storing fails.
    pub async fn submit(&self, session: &mut AssessmentSession) -> TrackerResult<Assessment> {
        let catalog = self.catalog()?;
        let assessment = session
            .build_assessment(self.summary.as_ref(), &catalog)
            .await?;
        self.assessment_service().record(&assessment)?;
        session.finish();
        Ok(assessment)
    }

    /// All assessments, newest first.
    pub fn assessments(&self) -> TrackerResult<Vec<Assessment>> {
        Ok(self.assessment_service().list()?)
    }

    pub fn dashboard(&self) -> TrackerResult<DashboardSnapshot> {
        let children = self.children()?;
        Ok(self.assessment_service().dashboard(&children)?)
    }
}

fn summary_provider(config: &SummaryConfig) -> Box<dyn SummaryProvider> {
    if !config.enabled {
        return Box::new(DisabledSummaryProvider);
    }
    match GeminiSummaryProvider::from_config(config) {
        Ok(provider) => Box::new(provider),
        Err(err) => {
            warn!(
                "event=tracker_open module=tracker status=degraded provider=disabled error_code={}",
                err.kind()
            );
            Box::new(DisabledSummaryProvider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{summary_provider, Tracker};
    use crate::config::{load_config, ConfigError, CoreConfig, SummaryConfig};

    #[test]
    fn enabled_summary_without_key_degrades_to_disabled() {
        let config = SummaryConfig {
            enabled: true,
            api_key: None,
            ..SummaryConfig::default()
        };
        assert_eq!(summary_provider(&config).name(), "disabled");

        let config = SummaryConfig {
            enabled: true,
            api_key: Some("key".to_string()),
            ..SummaryConfig::default()
        };
        assert_eq!(summary_provider(&config).name(), "gemini");
    }

    #[test]
    fn default_config_opens_in_memory() {
        let tracker = Tracker::open(&CoreConfig::default()).unwrap();
        assert_eq!(tracker.summary_provider_name(), "disabled");
        assert!(tracker.catalog().unwrap().is_empty());
        assert_eq!(tracker.users().len(), 2);
    }
}
