//! # Results Module
//!
//! Outcome records produced by check modules and the report aggregated from
//! them at the end of a run.
//!
//! ## Core Types
//! - [`OutcomeRecord`] - one row of evidence for one check
//! - [`Report`] - totals, compliance and the ordered records of one run

pub mod outcome;
pub mod types;

pub use outcome::OutcomeRecord;
pub use types::*;
