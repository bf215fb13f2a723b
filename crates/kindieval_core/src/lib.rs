//! Core domain logic for KindiEval, a preschool development tracker.
//! This crate is the single source of truth for assessment invariants.

pub mod assess;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod summary;
pub mod tracker;

pub use assess::aggregate::{aggregate, aggregate_by_age_band, AgeBandProgress, StatusTally};
pub use assess::classify::{classify_domain, suggest_domain, DomainRule, KeywordRules};
pub use assess::filter::{domain_counts, filter_children, filter_targets};
pub use config::{load_config, ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::assessment::{
    Assessment, AssessmentId, AssessmentRecord, AssessmentStatus, AssessmentValidationError,
};
pub use model::child::{Child, ChildId, ChildValidationError, User, UserRole};
pub use model::target::{AgeBand, Domain, Target, TargetId, TargetValidationError};
pub use repo::{RepoError, RepoResult};
pub use service::assessment_service::{AssessmentService, DashboardSnapshot};
pub use service::assessment_session::{AssessmentSession, SessionStep, WorkflowError};
pub use service::catalog_service::{CatalogError, CatalogService, TargetDraft};
pub use summary::{
    generate_summary, DisabledSummaryProvider, GeminiSummaryProvider, SummaryError,
    SummaryOutcome, SummaryProvider,
};
pub use tracker::{SeedReport, Tracker, TrackerError, TrackerResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
