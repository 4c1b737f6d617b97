//! LIPSYNC Test Harness
//!
//! This crate provides:
//! - Canned utterances, pronunciations and jaw tracks
//! - Track invariant checks shared by the integration and property tests
//! - Criterion benchmarks for the pipeline stages

pub mod fixtures;
pub mod invariants;

pub use fixtures::*;
pub use invariants::*;
