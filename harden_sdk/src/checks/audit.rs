//! Audit daemon and baseline audit rules

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{
    ensure_file_content, ensure_packages, ensure_service, run_command, PackageState, ServiceState,
};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

const RULES_PATH: &str = "/etc/audit/rules.d/99-cis-hardening.rules";

const RULES: &str = "## CIS baseline audit rules (starter)
-w /etc/passwd -p wa -k identity
-w /etc/group -p wa -k identity
-w /etc/shadow -p wa -k identity
-w /etc/gshadow -p wa -k identity
-w /etc/sudoers -p wa -k scope
-w /etc/sudoers.d/ -p wa -k scope
-w /var/log/lastlog -p wa -k logins
-w /var/run/faillock/ -p wa -k logins
-a always,exit -F arch=b64 -S adjtimex,settimeofday,clock_settime -k time-change
-a always,exit -F arch=b64 -S sethostname,setdomainname -k system-locale
-a always,exit -F arch=b64 -S mount -F auid>=1000 -F auid!=4294967295 -k mounts
-a always,exit -F arch=b64 -S unlink,unlinkat,rename,renameat -F auid>=1000 -F auid!=4294967295 -k delete
-e 2
";

pub struct AuditHardening;

impl CheckModule for AuditHardening {
    fn name(&self) -> &str {
        "audit"
    }

    fn description(&self) -> &str {
        "Install auditd and load baseline rules"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let installed = OutcomeRecord::from_convergence(
            "AUD-1",
            "Install auditd",
            ensure_packages(ctx, &["audit", "audit-libs"], PackageState::Present),
        );
        let enabled = OutcomeRecord::from_convergence(
            "AUD-2",
            "Enable auditd",
            ensure_service(ctx, "auditd", ServiceState::Enable),
        );

        let rules = ensure_file_content(ctx, RULES_PATH, RULES, 0o640);
        let load = run_command(ctx, argv(&["augenrules", "--load"]));
        let loaded = OutcomeRecord::new(
            "AUD-3",
            "Install CIS audit rules and load",
            rules.changed(),
            rules.ok() && load.ok(),
            format!("{}\n{}", rules.note, load.note),
        )
        .with_commands(load.commands)
        .with_files(rules.files);

        Ok(vec![installed, enabled, loaded])
    }
}
