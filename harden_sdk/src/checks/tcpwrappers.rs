//! TCP wrappers allow and deny lists

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_file_content, query};
use harden_base::execution::{render_command, RunContext};
use harden_base::results::OutcomeRecord;

const HOSTS_ALLOW: &str = "/etc/hosts.allow";
const HOSTS_DENY: &str = "/etc/hosts.deny";
const LOCAL_HOSTS: &[&str] = &["127.0.0.1", "localhost"];
const SSHD_BINARY: &str = "/usr/sbin/sshd";

const HOSTS_DENY_CONTENT: &str = "# TCP Wrappers - Deny All by Default (Whitelist Model)
# CIS Oracle Linux 9 - Network Access Control
#
# Deny all by default - only explicitly allowed hosts can connect
ALL: ALL
";

pub struct TcpWrappers;

impl TcpWrappers {
    fn hosts_allow(allowed_hosts: &[String], allow_all: bool) -> String {
        let mut lines = vec![
            "# TCP Wrappers - Explicit Allow List".to_string(),
            "# CIS Oracle Linux 9 - Network Access Control".to_string(),
            "#".to_string(),
        ];

        if allow_all {
            lines.push("# WARNING: Allowing all hosts".to_string());
            lines.push("ALL: ALL".to_string());
        } else {
            lines.push("# Local services - allow local access".to_string());
            lines.push("sshd: 127.0.0.1 [::1]".to_string());
            lines.push("ALL: localhost 127.0.0.1 [::1]".to_string());
            lines.extend(
                allowed_hosts
                    .iter()
                    .filter(|host| !LOCAL_HOSTS.contains(&host.as_str()))
                    .map(|host| format!("sshd: {}", host)),
            );
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }

    /// Whether sshd links libwrap; informational either way
    fn libwrap_support(ctx: &RunContext) -> OutcomeRecord {
        const ID: &str = "TCP-3";
        const TITLE: &str = "Verify TCP Wrappers support in system services";

        let command = vec![
            "ldd".to_string(),
            ctx.resolve(SSHD_BINARY).to_string_lossy().into_owned(),
        ];
        match query(ctx, &command) {
            Ok(output) if output.success() && output.stdout.contains("libwrap") => {
                OutcomeRecord::informational(ID, TITLE, "SSH daemon linked with TCP Wrappers support (libwrap)")
                    .with_commands(vec![render_command(&command)])
            }
            Ok(_) => OutcomeRecord::informational(
                ID,
                TITLE,
                "sshd does not link libwrap; verify access control through hosts.allow or PAM",
            ),
            Err(e) => OutcomeRecord::informational(
                ID,
                TITLE,
                format!("Could not inspect {}: {}", SSHD_BINARY, e),
            ),
        }
    }
}

impl CheckModule for TcpWrappers {
    fn name(&self) -> &str {
        "tcpwrappers"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let allowed_hosts = config.get_str_list("allowed_hosts", LOCAL_HOSTS)?;
        let allow_all = config.get_bool("allow_all", false)?;

        Ok(vec![
            OutcomeRecord::from_convergence(
                "TCP-1",
                "Configure /etc/hosts.allow with explicit allow rules",
                ensure_file_content(ctx, HOSTS_ALLOW, &Self::hosts_allow(&allowed_hosts, allow_all), 0o644),
            ),
            OutcomeRecord::from_convergence(
                "TCP-2",
                "Configure /etc/hosts.deny with deny all rule",
                ensure_file_content(ctx, HOSTS_DENY, HOSTS_DENY_CONTENT, 0o644),
            ),
            Self::libwrap_support(ctx),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{context, ids, read, run};
    use harden_base::execution::{CommandError, RecordingRunner, RunMode};
    use std::sync::Arc;

    #[test]
    fn test_extra_hosts_allowed_for_sshd() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(RunMode::Apply, root.path(), Arc::new(RecordingRunner::new()));
        run(&TcpWrappers, "allowed_hosts = [\"localhost\", \"10.0.0.0/8\"]", &ctx);

        let allow = read(root.path(), HOSTS_ALLOW);
        assert!(allow.ends_with("ALL: localhost 127.0.0.1 [::1]\nsshd: 10.0.0.0/8\n"));
        assert!(!allow.contains("sshd: localhost"));
        assert!(read(root.path(), HOSTS_DENY).ends_with("ALL: ALL\n"));
    }

    #[test]
    fn test_libwrap_detected_in_either_mode() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(RecordingRunner::new().with_response(
            &["ldd"],
            0,
            "\tlibwrap.so.0 => /lib64/libwrap.so.0 (0x00007f)\n",
        ));
        let records = run(&TcpWrappers, "", &context(RunMode::Preview, root.path(), runner.clone()));

        assert_eq!(ids(&records), ["TCP-1", "TCP-2", "TCP-3"]);
        assert!(!records[2].changed() && records[2].ok());
        assert!(records[2].notes().contains("libwrap"));
        assert_eq!(runner.calls()[0][0], "ldd");
        assert!(runner.calls()[0][1].ends_with("/usr/sbin/sshd"));
    }

    #[test]
    fn test_libwrap_check_never_fails_the_run() {
        let root = tempfile::tempdir().unwrap();
        let missing = Arc::new(RecordingRunner::new().with_response(&["ldd"], 1, "not a dynamic executable"));
        let records = run(&TcpWrappers, "", &context(RunMode::Apply, root.path(), missing));
        assert!(records[2].ok());
        assert!(records[2].notes().starts_with("sshd does not link libwrap"));

        let rejected = Arc::new(RecordingRunner::new().with_error(
            &["ldd"],
            CommandError::NotAllowed { program: "ldd".to_string() },
        ));
        let records = run(&TcpWrappers, "", &context(RunMode::Apply, root.path(), rejected));
        assert!(records[2].ok());
        assert!(records[2].notes().starts_with("Could not inspect /usr/sbin/sshd"));
    }

    #[test]
    fn test_allow_all() {
        let content = TcpWrappers::hosts_allow(&[], true);
        assert!(content.ends_with("# WARNING: Allowing all hosts\nALL: ALL\n"));
    }
}
