//! Core dump restrictions

use super::sysctl::{sysctl_setting, SYSCTL_CONF};
use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_file_content, ensure_key_value};
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

const LIMITS_DROP_IN: &str = "/etc/security/limits.d/99-cis-coredumps.conf";

pub struct CoreDumps;

impl CheckModule for CoreDumps {
    fn name(&self) -> &str {
        "coredumps"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let results = vec![
            ensure_file_content(ctx, LIMITS_DROP_IN, "* hard core 0\n", 0o644),
            ensure_key_value(ctx, SYSCTL_CONF, &sysctl_setting("fs.suid_dumpable", "0")),
        ];
        Ok(vec![OutcomeRecord::from_convergences("CORE-1", "Disable core dumps", results)])
    }
}
