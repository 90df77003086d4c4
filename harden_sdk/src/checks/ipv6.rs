//! Optional IPv6 disablement

use super::ensure_settings;
use super::sysctl::{sysctl_setting, SYSCTL_CONF};
use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

pub struct DisableIpv6;

impl CheckModule for DisableIpv6 {
    fn name(&self) -> &str {
        "ipv6"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        if !config.get_bool("disable", false)? {
            return Ok(vec![OutcomeRecord::informational(
                "IPV6-0",
                "Disable IPv6 (skipped by config)",
                "ipv6.disable=false",
            )]);
        }

        let settings = [
            sysctl_setting("net.ipv6.conf.all.disable_ipv6", "1"),
            sysctl_setting("net.ipv6.conf.default.disable_ipv6", "1"),
        ];
        Ok(vec![OutcomeRecord::from_convergences(
            "IPV6-1",
            "Disable IPv6 via sysctl",
            ensure_settings(ctx, SYSCTL_CONF, &settings),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{context, read, run};
    use harden_base::execution::{RecordingRunner, RunMode};
    use std::sync::Arc;

    #[test]
    fn test_skipped_by_default() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(RunMode::Apply, root.path(), Arc::new(RecordingRunner::new()));
        let records = run(&DisableIpv6, "", &ctx);

        assert_eq!(records[0].id(), "IPV6-0");
        assert!(!ctx.resolve(SYSCTL_CONF).exists());
    }

    #[test]
    fn test_disable_writes_sysctl_keys() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(RunMode::Apply, root.path(), Arc::new(RecordingRunner::new()));
        let records = run(&DisableIpv6, "disable = true", &ctx);

        assert_eq!(records[0].id(), "IPV6-1");
        assert!(records[0].changed());
        assert_eq!(
            read(root.path(), SYSCTL_CONF),
            "net.ipv6.conf.all.disable_ipv6 = 1\nnet.ipv6.conf.default.disable_ipv6 = 1\n"
        );
    }
}
