//! OpenSSH server hardening

use super::ensure_settings;
use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_permissions, run_command, KeyValue, Ownership};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

pub const SSHD_CONFIG: &str = "/etc/ssh/sshd_config";

const SSHD_SETTINGS: &[(&str, &str)] = &[
    ("LogLevel", "VERBOSE"),
    ("PermitRootLogin", "no"),
    ("PermitEmptyPasswords", "no"),
    ("PermitUserEnvironment", "no"),
    ("HostbasedAuthentication", "no"),
    ("IgnoreRhosts", "yes"),
    ("X11Forwarding", "no"),
    ("AllowTcpForwarding", "no"),
    ("MaxAuthTries", "4"),
    ("MaxStartups", "10:30:60"),
    ("MaxSessions", "10"),
    ("LoginGraceTime", "60"),
    ("ClientAliveInterval", "15"),
    ("ClientAliveCountMax", "3"),
    ("UsePAM", "yes"),
    ("Banner", "/etc/issue.net"),
];

/// Global directives must stay above the first `Match` block
fn sshd_setting(key: &str, value: impl Into<String>) -> KeyValue {
    KeyValue::new(key, value).insert_before("Match")
}

pub struct SshHardening;

impl CheckModule for SshHardening {
    fn name(&self) -> &str {
        "ssh"
    }

    fn description(&self) -> &str {
        "Harden sshd_config settings and permissions"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let mut overrides = config.get_settings("settings")?;
        let mut desired: Vec<KeyValue> = SSHD_SETTINGS
            .iter()
            .map(|(key, default)| {
                let value = overrides.remove(*key).unwrap_or_else(|| default.to_string());
                sshd_setting(key, value)
            })
            .collect();
        desired.extend(overrides.into_iter().map(|(key, value)| sshd_setting(&key, value)));

        let mut settings = ensure_settings(ctx, SSHD_CONFIG, &desired);
        if settings.iter().any(|c| c.changed()) {
            settings.push(run_command(ctx, argv(&["systemctl", "reload", "sshd"])));
        }

        Ok(vec![
            OutcomeRecord::from_convergences("SSH-1", "Harden sshd configuration", settings),
            OutcomeRecord::from_convergence(
                "SSH-2",
                "Restrict sshd_config permissions",
                ensure_permissions(ctx, SSHD_CONFIG, Ownership::root(0o600)),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{context, ids, read, run, snapshot, write};
    use harden_base::execution::{RecordingRunner, RunMode};
    use std::sync::Arc;

    const EXISTING: &str = "#PermitRootLogin prohibit-password\nPermitRootLogin yes\nSubsystem sftp /usr/libexec/openssh/sftp-server\n";

    #[test]
    fn test_preview_reports_without_writing() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), SSHD_CONFIG, EXISTING, 0o644);
        let before = snapshot(root.path());
        let ctx = context(RunMode::Preview, root.path(), Arc::new(RecordingRunner::new()));

        let records = run(&SshHardening, "", &ctx);
        assert_eq!(ids(&records), ["SSH-1", "SSH-2"]);
        assert!(records.iter().all(|r| r.changed() && r.ok()));
        assert_eq!(before, snapshot(root.path()));
    }

    #[test]
    fn test_apply_keeps_comments_and_honors_overrides() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), SSHD_CONFIG, EXISTING, 0o644);
        let runner = Arc::new(RecordingRunner::new());
        let ctx = context(RunMode::Apply, root.path(), runner.clone());

        run(&SshHardening, "[settings]\nMaxAuthTries = 3\n", &ctx);
        assert_eq!(runner.call_lines(), ["systemctl reload sshd"]);
        let content = read(root.path(), SSHD_CONFIG);

        assert!(content.starts_with("#PermitRootLogin prohibit-password\nPermitRootLogin no\n"));
        assert!(content.contains("Subsystem sftp /usr/libexec/openssh/sftp-server\n"));
        assert!(content.contains("MaxAuthTries 3\n"));
        assert!(!content.contains("MaxAuthTries 4"));

        let again = run(&SshHardening, "[settings]\nMaxAuthTries = 3\n", &ctx);
        assert!(!again[0].changed());
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn test_new_directives_stay_above_match_block() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), SSHD_CONFIG, "PermitRootLogin yes\nMatch User backup\n    X11Forwarding yes\n", 0o644);
        let ctx = context(RunMode::Apply, root.path(), Arc::new(RecordingRunner::new()));

        let records = run(&SshHardening, "", &ctx);
        assert!(records[0].ok());

        let content = read(root.path(), SSHD_CONFIG);
        let match_line = content.lines().position(|l| l == "Match User backup").unwrap();
        let lines: Vec<&str> = content.lines().collect();
        for (key, _) in SSHD_SETTINGS {
            let position = lines.iter().position(|l| l.starts_with(key)).unwrap();
            assert!(position < match_line || *key == "X11Forwarding", "{} landed inside Match", key);
        }
        assert!(content.ends_with("Match User backup\nX11Forwarding no\n"));
    }

    #[test]
    fn test_preview_plans_reload_only_when_needed() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), SSHD_CONFIG, EXISTING, 0o644);
        let runner = Arc::new(RecordingRunner::new());

        let preview = run(&SshHardening, "", &context(RunMode::Preview, root.path(), runner.clone()));
        assert!(preview[0].commands().contains(&"systemctl reload sshd".to_string()));

        run(&SshHardening, "", &context(RunMode::Apply, root.path(), runner.clone()));
        let converged = run(&SshHardening, "", &context(RunMode::Preview, root.path(), runner.clone()));
        assert!(converged[0].commands().is_empty());
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn test_missing_config_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(RunMode::Preview, root.path(), Arc::new(RecordingRunner::new()));

        let records = run(&SshHardening, "", &ctx);
        assert!(!records[1].changed());
        assert!(records[1].ok());
        assert_eq!(records[1].notes(), format!("Not found: {}", SSHD_CONFIG));
    }
}
