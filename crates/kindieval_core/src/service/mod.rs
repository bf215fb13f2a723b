//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Hold the authoring workflow state between user actions.

pub mod assessment_service;
pub mod assessment_session;
pub mod catalog_service;
