//! sudo hardening drop-in

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::ensure_file_content;
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

const SUDOERS_DROP_IN: &str = "/etc/sudoers.d/99-cis-hardening";
const CONTENT: &str = "# CIS hardening\nDefaults use_pty\nDefaults logfile=\"/var/log/sudo.log\"\n";

pub struct SudoHardening;

impl CheckModule for SudoHardening {
    fn name(&self) -> &str {
        "sudo"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        Ok(vec![OutcomeRecord::from_convergence(
            "SUDO-1",
            "Configure sudo to use pty and log to /var/log/sudo.log",
            ensure_file_content(ctx, SUDOERS_DROP_IN, CONTENT, 0o440),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{context, mode, read, run};
    use harden_base::execution::{RecordingRunner, RunMode};
    use std::sync::Arc;

    #[test]
    fn test_drop_in_written_read_only() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(RunMode::Apply, root.path(), Arc::new(RecordingRunner::new()));

        let records = run(&SudoHardening, "", &ctx);
        assert!(records[0].changed());
        assert_eq!(mode(root.path(), SUDOERS_DROP_IN), 0o440);
        assert!(read(root.path(), SUDOERS_DROP_IN).contains("Defaults use_pty"));
    }
}
