//! Permissions on account databases and sshd_config

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_permissions, Ownership};
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;

const TARGETS: &[(&str, u32)] = &[
    ("/etc/passwd", 0o644),
    ("/etc/group", 0o644),
    ("/etc/shadow", 0o000),
    ("/etc/gshadow", 0o000),
    ("/etc/ssh/sshd_config", 0o600),
];

pub struct SystemFilePermissions;

impl CheckModule for SystemFilePermissions {
    fn name(&self) -> &str {
        "fileperms"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let results = TARGETS
            .iter()
            .map(|(path, mode)| {
                let mut result = ensure_permissions(ctx, path, Ownership::root(*mode));
                result.note = format!("{}: {}", path, result.note);
                result
            })
            .collect();

        Ok(vec![OutcomeRecord::from_convergences(
            "PERM-1",
            "Harden key system file permissions",
            results,
        )])
    }
}
