//! Network kernel parameter hardening

use super::ensure_settings;
use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{query, run_command, KeyValue};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;
use std::collections::BTreeMap;

pub const SYSCTL_CONF: &str = "/etc/sysctl.d/99-cis-hardening.conf";

const NETWORK_SETTINGS: &[(&str, &str)] = &[
    ("net.ipv4.ip_forward", "0"),
    ("net.ipv4.conf.all.send_redirects", "0"),
    ("net.ipv4.conf.default.send_redirects", "0"),
    ("net.ipv4.conf.all.accept_source_route", "0"),
    ("net.ipv4.conf.default.accept_source_route", "0"),
    ("net.ipv4.conf.all.accept_redirects", "0"),
    ("net.ipv4.conf.default.accept_redirects", "0"),
    ("net.ipv4.conf.all.secure_redirects", "0"),
    ("net.ipv4.conf.default.secure_redirects", "0"),
    ("net.ipv4.conf.all.log_martians", "1"),
    ("net.ipv4.conf.default.log_martians", "1"),
    ("net.ipv4.icmp_echo_ignore_broadcasts", "1"),
    ("net.ipv4.icmp_ignore_bogus_error_responses", "1"),
    ("net.ipv4.conf.all.rp_filter", "1"),
    ("net.ipv4.conf.default.rp_filter", "1"),
    ("net.ipv4.tcp_syncookies", "1"),
    ("net.ipv6.conf.all.accept_ra", "0"),
    ("net.ipv6.conf.default.accept_ra", "0"),
    ("net.ipv6.conf.all.accept_redirects", "0"),
    ("net.ipv6.conf.default.accept_redirects", "0"),
];

/// A `key = value` line in the shared hardening sysctl drop-in
pub(crate) fn sysctl_setting(key: &str, value: &str) -> KeyValue {
    KeyValue::new(key, value).separator(" = ")
}

pub struct NetworkSysctl;

impl NetworkSysctl {
    /// Built-in table with `[settings]` overrides applied; new keys go last
    fn desired(config: &ModuleConfig) -> Result<Vec<KeyValue>, ModuleError> {
        let mut overrides = config.get_settings("settings")?;

        let mut desired: Vec<KeyValue> = NETWORK_SETTINGS
            .iter()
            .map(|(key, default)| {
                let value = overrides.remove(*key).unwrap_or_else(|| default.to_string());
                sysctl_setting(key, &value)
            })
            .collect();
        desired.extend(overrides.iter().map(|(key, value)| sysctl_setting(key, value)));
        Ok(desired)
    }

    /// Keys whose running value differs from the desired one
    ///
    /// Keys the kernel does not report are skipped. A query that cannot run
    /// counts every key as drifted so the reload is retried.
    fn live_drift(ctx: &RunContext, desired: &[KeyValue]) -> Vec<String> {
        let mut command = vec!["sysctl".to_string()];
        command.extend(desired.iter().map(|s| s.key.clone()));

        let output = match query(ctx, &command) {
            Ok(output) => output,
            Err(_) => return desired.iter().map(|s| s.key.clone()).collect(),
        };

        // Unknown keys make sysctl exit non-zero but the known ones are still printed
        let running: BTreeMap<&str, String> = output
            .stdout
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim(), normalize(value)))
            .collect();

        desired
            .iter()
            .filter(|s| matches!(running.get(s.key.as_str()), Some(value) if *value != normalize(&s.value)))
            .map(|s| s.key.clone())
            .collect()
    }
}

fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl CheckModule for NetworkSysctl {
    fn name(&self) -> &str {
        "sysctl"
    }

    fn description(&self) -> &str {
        "Network hardening kernel parameters"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let desired = Self::desired(config)?;

        let mut results = ensure_settings(ctx, SYSCTL_CONF, &desired);
        let file_changed = results.iter().any(|c| c.changed());
        let drift = if file_changed {
            Vec::new()
        } else {
            Self::live_drift(ctx, &desired)
        };

        if file_changed || !drift.is_empty() {
            let mut reload = run_command(ctx, argv(&["sysctl", "--system"]));
            if !drift.is_empty() {
                reload.note = format!("Running values differ: {}; {}", drift.join(", "), reload.note);
            }
            results.push(reload);
        }

        Ok(vec![OutcomeRecord::from_convergences(
            "SYSCTL-1",
            "Harden network kernel parameters",
            results,
        )])
    }
}
