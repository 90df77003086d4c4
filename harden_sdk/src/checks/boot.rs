//! Bootloader configuration protection

use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_permissions, ConvergenceStatus, Ownership};
use harden_base::execution::RunContext;
use harden_base::results::OutcomeRecord;
use std::fs;
use std::io::ErrorKind;

const GRUB_CFG: &str = "/boot/grub2/grub.cfg";
const USER_CFG: &str = "/boot/grub2/user.cfg";
const KERNEL_CMDLINE: &str = "/proc/cmdline";

/// Kernel parameters expected on the running command line
const KERNEL_PARAMS: &[(&str, &str)] = &[
    ("audit=1", "audit processes started before auditd"),
    ("audit_backlog_limit=", "audit backlog sized for early boot"),
];

pub struct BootLoader;

impl BootLoader {
    fn restrict(ctx: &RunContext, id: &str, path: &str, missing_hint: &str) -> OutcomeRecord {
        let mut result = ensure_permissions(ctx, path, Ownership::root(0o600));
        if result.status == ConvergenceStatus::NotFound {
            result.note = format!("{} not found ({})", path, missing_hint);
        }
        OutcomeRecord::from_convergence(
            id,
            format!("Ensure {} has restricted permissions (600)", path),
            result,
        )
    }

    /// GRUB passwords need an operator-chosen hash, so this only advises
    fn password_advisory(config: &ModuleConfig, ctx: &RunContext) -> Result<OutcomeRecord, ModuleError> {
        const ID: &str = "BOOT-3";
        const TITLE: &str = "Ensure GRUB bootloader has password protection";

        if !config.get_bool("grub_password", true)? {
            return Ok(OutcomeRecord::informational(
                ID,
                TITLE,
                "GRUB password protection disabled in configuration",
            ));
        }

        let user_cfg = match fs::read_to_string(ctx.resolve(USER_CFG)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Ok(OutcomeRecord::failure(
                    ID,
                    TITLE,
                    format!("Failed to read {}: {}", USER_CFG, e),
                ));
            }
        };

        if user_cfg.contains("superusers") {
            Ok(OutcomeRecord::informational(ID, TITLE, "GRUB superuser already configured"))
        } else {
            Ok(OutcomeRecord::informational(
                ID,
                TITLE,
                "GRUB password not configured - manual intervention required",
            )
            .with_commands(vec![
                "grub2-setpassword".to_string(),
                format!("chmod 600 {}", USER_CFG),
            ]))
        }
    }
}

impl BootLoader {
    /// Compare the running kernel command line against the expected parameters
    fn kernel_params_advisory(ctx: &RunContext) -> OutcomeRecord {
        const ID: &str = "BOOT-4";
        const TITLE: &str = "Ensure GRUB kernel parameters are secure";

        let cmdline = match fs::read_to_string(ctx.resolve(KERNEL_CMDLINE)) {
            Ok(cmdline) => cmdline,
            Err(e) => {
                return OutcomeRecord::informational(
                    ID,
                    TITLE,
                    format!("Kernel command line not readable ({}): {}", KERNEL_CMDLINE, e),
                );
            }
        };

        let missing: Vec<String> = KERNEL_PARAMS
            .iter()
            .filter(|(param, _)| !cmdline.split_whitespace().any(|arg| arg.starts_with(param)))
            .map(|(param, why)| format!("{} ({})", param, why))
            .collect();

        if missing.is_empty() {
            OutcomeRecord::informational(ID, TITLE, "Kernel parameters are secure")
        } else {
            OutcomeRecord::informational(
                ID,
                TITLE,
                format!(
                    "Missing kernel parameters: {}. Add them to GRUB_CMDLINE_LINUX in /etc/default/grub and run grub2-mkconfig",
                    missing.join(", ")
                ),
            )
        }
    }
}

impl CheckModule for BootLoader {
    fn name(&self) -> &str {
        "boot"
    }

    fn description(&self) -> &str {
        "Restrict GRUB configuration and check for a superuser password"
    }

    fn apply(&self, config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        Ok(vec![
            Self::restrict(ctx, "BOOT-1", GRUB_CFG, "EFI system?"),
            Self::restrict(ctx, "BOOT-2", USER_CFG, "may not be configured"),
            Self::password_advisory(config, ctx)?,
            Self::kernel_params_advisory(ctx),
        ])
    }
}
