//! SELinux enforcing mode

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_key_value, query, run_command, KeyValue};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

const SELINUX_CONFIG: &str = "/etc/selinux/config";

pub struct SelinuxEnforcing;

impl CheckModule for SelinuxEnforcing {
    fn name(&self) -> &str {
        "selinux"
    }

    fn description(&self) -> &str {
        "Persist and activate SELinux enforcing mode"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        if !config.get_bool("enforce", true)? {
            return Ok(vec![OutcomeRecord::informational(
                "SEL-0",
                "SELinux enforcement (skipped by config)",
                "selinux.enforce=false",
            )]);
        }

        let mut results = vec![ensure_key_value(
            ctx,
            SELINUX_CONFIG,
            &KeyValue::new("SELINUX", "enforcing").separator("="),
        )];

        let current = query(ctx, &argv(&["getenforce"]))
            .map(|output| output.combined())
            .unwrap_or_default();
        if current != "Enforcing" {
            results.push(run_command(ctx, argv(&["setenforce", "1"])));
        }

        Ok(vec![OutcomeRecord::from_convergences(
            "SEL-1",
            "Ensure SELinux is enforcing",
            results,
        )])
    }
}
