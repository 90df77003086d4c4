//! Password quality, aging, default umask and account lockout

use super::ensure_settings;
use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_file_content, run_command, KeyValue};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

const PWQUALITY_CONF: &str = "/etc/security/pwquality.conf";
const LOGIN_DEFS: &str = "/etc/login.defs";
const UMASK_SCRIPT: &str = "/etc/profile.d/99-cis-umask.sh";
const FAILLOCK_CONF: &str = "/etc/security/faillock.conf";

const AUTHSELECT_FAILLOCK: &str =
    "authselect current >/dev/null 2>&1 && authselect enable-feature with-faillock && authselect apply-changes || true";

pub struct AuthHardening;

impl AuthHardening {
    fn password_quality(config: &ModuleConfig, ctx: &RunContext) -> Result<OutcomeRecord, ModuleError> {
        let spaced = |key: &str, value: i64| KeyValue::new(key, value.to_string()).separator(" = ");

        let mut settings = vec![
            spaced("minlen", config.get_int("pwquality_minlen", 14)?),
            spaced("minclass", config.get_int("pwquality_minclass", 4)?),
        ];
        for credit in ["dcredit", "ucredit", "lcredit", "ocredit"] {
            let value = config.get_int(&format!("pwquality_{}", credit), -1)?;
            settings.push(spaced(credit, value));
        }

        Ok(OutcomeRecord::from_convergences(
            "AUTH-1",
            "Configure password quality (pwquality.conf)",
            ensure_settings(ctx, PWQUALITY_CONF, &settings),
        ))
    }

    fn password_aging(config: &ModuleConfig, ctx: &RunContext) -> Result<OutcomeRecord, ModuleError> {
        let tabbed = |key: &str, value: i64| KeyValue::new(key, value.to_string()).separator("\t");

        let settings = [
            tabbed("PASS_MAX_DAYS", config.get_int("pass_max_days", 365)?),
            tabbed("PASS_MIN_DAYS", config.get_int("pass_min_days", 7)?),
            tabbed("PASS_WARN_AGE", config.get_int("pass_warn_age", 14)?),
        ];

        Ok(OutcomeRecord::from_convergences(
            "AUTH-2",
            "Configure password aging (login.defs)",
            ensure_settings(ctx, LOGIN_DEFS, &settings),
        ))
    }

    fn default_umask(config: &ModuleConfig, ctx: &RunContext) -> Result<OutcomeRecord, ModuleError> {
        let umask = config.get_str("umask", "027")?;
        Ok(OutcomeRecord::from_convergence(
            "AUTH-3",
            "Set default umask",
            ensure_file_content(ctx, UMASK_SCRIPT, &format!("umask {}\n", umask), 0o644),
        ))
    }

    fn account_lockout(config: &ModuleConfig, ctx: &RunContext) -> Result<OutcomeRecord, ModuleError> {
        let spaced = |key: &str, value: i64| KeyValue::new(key, value.to_string()).separator(" = ");

        let settings = [
            spaced("deny", config.get_int("lockout_deny", 5)?),
            spaced("fail_interval", config.get_int("lockout_fail_interval", 900)?),
            spaced("unlock_time", config.get_int("lockout_unlock_time", 900)?),
        ];

        let mut results = ensure_settings(ctx, FAILLOCK_CONF, &settings);
        results.push(run_command(ctx, argv(&["bash", "-lc", AUTHSELECT_FAILLOCK])));

        Ok(OutcomeRecord::from_convergences(
            "AUTH-4",
            "Enable/configure account lockout (faillock)",
            results,
        ))
    }
}

impl CheckModule for AuthHardening {
    fn name(&self) -> &str {
        "auth"
    }

    fn description(&self) -> &str {
        "Password policy, umask and faillock"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        Ok(vec![
            Self::password_quality(config, ctx)?,
            Self::password_aging(config, ctx)?,
            Self::default_umask(config, ctx)?,
            Self::account_lockout(config, ctx)?,
        ])
    }
}
