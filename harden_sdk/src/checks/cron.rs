//! cron daemon, allow lists and directory permissions

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_file_content, ensure_permissions, ensure_service, Ownership, ServiceState};
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

const CRON_PATHS: &[&str] = &[
    "/etc/crontab",
    "/etc/cron.hourly",
    "/etc/cron.daily",
    "/etc/cron.weekly",
    "/etc/cron.monthly",
    "/etc/cron.d",
];

pub struct CronHardening;

impl CheckModule for CronHardening {
    fn name(&self) -> &str {
        "cron"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let daemon = OutcomeRecord::from_convergence(
            "CRON-1",
            "Enable cron daemon",
            ensure_service(ctx, "crond", ServiceState::Enable),
        );

        let allow_lists = OutcomeRecord::from_convergences(
            "CRON-2",
            "Restrict cron/at to authorized users",
            vec![
                ensure_file_content(ctx, "/etc/cron.allow", "root\n", 0o600),
                ensure_file_content(ctx, "/etc/at.allow", "root\n", 0o600),
            ],
        );

        let permissions = CRON_PATHS
            .iter()
            .map(|path| {
                let mode = if *path == "/etc/crontab" { 0o600 } else { 0o700 };
                let mut result = ensure_permissions(ctx, path, Ownership::root(mode));
                result.note = format!("{}: {}", path, result.note);
                result
            })
            .collect();

        Ok(vec![
            daemon,
            allow_lists,
            OutcomeRecord::from_convergences("CRON-3", "Harden cron permissions", permissions),
        ])
    }
}
