//! AIDE file integrity checking

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_packages, run_command, Convergence, PackageState};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

const AIDE_DB: &str = "/var/lib/aide/aide.db.gz";
const AIDE_NEW_DB: &str = "/var/lib/aide/aide.db.new.gz";
const INIT_SCRIPT: &str = "aide --init && mv -f /var/lib/aide/aide.db.new.gz /var/lib/aide/aide.db.gz";

/// Path of an existing (or freshly generated, not yet rotated) AIDE database
pub(crate) fn existing_database(ctx: &RunContext) -> Option<&'static str> {
    [AIDE_DB, AIDE_NEW_DB]
        .into_iter()
        .find(|path| ctx.resolve(path).exists())
}

/// Generate the database and rotate it into place
pub(crate) fn initialize_database(ctx: &RunContext) -> Convergence {
    run_command(ctx, argv(&["bash", "-lc", INIT_SCRIPT]))
}

pub struct Aide;

impl CheckModule for Aide {
    fn name(&self) -> &str {
        "aide"
    }

    fn description(&self) -> &str {
        "Install AIDE and optionally initialize its database"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let installed = OutcomeRecord::from_convergence(
            "AIDE-1",
            "Install AIDE",
            ensure_packages(ctx, &["aide"], PackageState::Present),
        );

        let initialized = if !config.get_bool("initialize_if_missing", false)? {
            OutcomeRecord::informational(
                "AIDE-2",
                "AIDE initialization (skipped by config)",
                "Set aide.initialize_if_missing=true to initialize",
            )
        } else if let Some(database) = existing_database(ctx) {
            OutcomeRecord::informational(
                "AIDE-2",
                "Initialize AIDE database",
                format!("{} already present", database),
            )
        } else {
            OutcomeRecord::from_convergence("AIDE-2", "Initialize AIDE database", initialize_database(ctx))
        };

        Ok(vec![installed, initialized])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{context, run, write};
    use harden_base::execution::{RecordingRunner, RunMode};
    use std::sync::Arc;

    #[test]
    fn test_initialization_skipped_by_default() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let records = run(&Aide, "", &context(RunMode::Apply, root.path(), runner.clone()));

        assert_eq!(records[1].title(), "AIDE initialization (skipped by config)");
        assert_eq!(runner.call_lines(), ["dnf -y install aide"]);
    }

    #[test]
    fn test_initializes_missing_database() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let records = run(&Aide, "initialize_if_missing = true", &context(RunMode::Apply, root.path(), runner.clone()));

        assert!(records[1].changed());
        assert_eq!(runner.calls()[1][..2], ["bash", "-lc"]);
    }

    #[test]
    fn test_existing_database_kept() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), AIDE_DB, "db", 0o600);
        let runner = Arc::new(RecordingRunner::new());
        let records = run(&Aide, "initialize_if_missing = true", &context(RunMode::Apply, root.path(), runner.clone()));

        assert!(!records[1].changed());
        assert_eq!(runner.call_count(), 1);
    }
}
