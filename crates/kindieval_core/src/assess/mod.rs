//! Pure assessment computations: target filtering, domain classification and
//! result aggregation.
//!
//! # Responsibility
//! - Operate on caller-provided slices only; no storage, no shared state.
//!
//! # Invariants
//! - Every function is total over its inputs and deterministic.

pub mod aggregate;
pub mod classify;
pub mod filter;
