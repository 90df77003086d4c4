//! journald persistence and rsyslog

use super::ensure_settings;
use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_packages, ensure_service, KeyValue, PackageState, ServiceState};
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

const JOURNALD_CONF: &str = "/etc/systemd/journald.conf";

pub struct LoggingHardening;

impl CheckModule for LoggingHardening {
    fn name(&self) -> &str {
        "logging"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let journald = [
            KeyValue::new("Storage", "persistent").separator("="),
            KeyValue::new("Compress", "yes").separator("="),
            KeyValue::new("SystemMaxUse", "1G").separator("="),
        ];

        Ok(vec![
            OutcomeRecord::from_convergences(
                "LOG-1",
                "Harden journald persistence/limits",
                ensure_settings(ctx, JOURNALD_CONF, &journald),
            ),
            OutcomeRecord::from_convergence(
                "LOG-2",
                "Install rsyslog",
                ensure_packages(ctx, &["rsyslog"], PackageState::Present),
            ),
            OutcomeRecord::from_convergence(
                "LOG-3",
                "Enable rsyslog",
                ensure_service(ctx, "rsyslog", ServiceState::Enable),
            ),
        ])
    }
}
