//! The check module contract

use super::errors::ModuleError;
use crate::config::ModuleConfig;
use crate::execution::RunContext;
use crate::results::OutcomeRecord;

/// A named unit of hardening logic for one topic
///
/// `apply` reads its configuration slice, calls zero or more convergence
/// primitives according to the context's mode, and returns its records in
/// presentation order. Expected failures become records with `ok = false`;
/// `Err` is reserved for a module that cannot run at all.
pub trait CheckModule: Send + Sync {
    /// Registry name used in profiles and config tables
    fn name(&self) -> &str;

    /// One-line human description
    fn description(&self) -> &str {
        ""
    }

    fn apply(
        &self,
        config: &ModuleConfig,
        ctx: &RunContext,
    ) -> Result<Vec<OutcomeRecord>, ModuleError>;
}
