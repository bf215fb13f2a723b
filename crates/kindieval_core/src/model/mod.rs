//! Domain model for targets, children and assessments.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own per-entity validation so storage and services share one rule set.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID assigned once.
//! - Targets are never deleted; assessments are immutable once built.

pub mod assessment;
pub mod child;
pub mod target;
