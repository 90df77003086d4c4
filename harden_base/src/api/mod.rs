//! # Public API
//!
//! The orchestrator that drives a profile through the registry, and the
//! errors that can stop a run before it starts.

pub mod errors;
pub mod orchestrator;

pub use errors::RunError;
pub use orchestrator::{Orchestrator, RunOutcome, RunState};
