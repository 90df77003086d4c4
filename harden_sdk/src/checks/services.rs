//! Service hardening: mask network services a hardened server should not
//! run and keep the integrity and audit services enabled

use super::aide::{existing_database, initialize_database};
use harden_base::checks::{CheckModule, ModuleError};
use harden_base::config::ModuleConfig;
use harden_base::converge::{ensure_packages, ensure_service, query, run_commands, PackageState, ServiceState};
use harden_base::execution::{argv, RunContext};
use harden_base::results::OutcomeRecord;

pub const UNWANTED_SERVICES: &[&str] = &[
    "avahi-daemon",
    "cups",
    "dhcpd",
    "slapd",
    "nfs-server",
    "rpcbind",
    "smb",
    "snmpd",
    "rsyncd",
    "ypserv",
    "telnet.socket",
    "tftp.socket",
    "systemd-journal-remote.service",
    "systemd-journal-upload.service",
];

/// Services kept enabled, with a description used in the record title.
/// The AIDE units only exist on some releases and are skipped when absent.
pub const REQUIRED_SERVICES: &[(&str, &str, bool)] = &[
    ("aidecheck.service", "AIDE file integrity monitoring service", true),
    ("aidecheck.timer", "AIDE file integrity monitoring timer", true),
    ("auditd", "Audit daemon for security logging", false),
];

const JOURNAL_REMOTE: &str = "systemd-journal-remote.service";

pub struct UnwantedServices;

impl UnwantedServices {
    fn aide_package(ctx: &RunContext) -> OutcomeRecord {
        OutcomeRecord::from_convergence(
            "SVC-AIDE-PKG",
            "Ensure aide package is installed",
            ensure_packages(ctx, &["aide"], PackageState::Present),
        )
    }

    fn aide_database(ctx: &RunContext) -> OutcomeRecord {
        const TITLE: &str = "Ensure AIDE database is initialized";
        match existing_database(ctx) {
            Some(database) => OutcomeRecord::informational(
                "SVC-AIDE-INIT",
                TITLE,
                format!("AIDE database already exists ({})", database),
            ),
            None => OutcomeRecord::from_convergence("SVC-AIDE-INIT", TITLE, initialize_database(ctx)),
        }
    }

    fn required(ctx: &RunContext, service: &str, description: &str, optional: bool) -> OutcomeRecord {
        let id = format!("SVC-{}", service);
        let title = format!("Enable {}", description);

        if optional {
            match query(ctx, &argv(&["systemctl", "list-unit-files", service])) {
                Ok(output) if output.success() && output.stdout.contains(service) => {}
                Ok(_) => {
                    return OutcomeRecord::informational(
                        id,
                        title,
                        format!("{} not available on this system", service),
                    );
                }
                Err(e) => {
                    return OutcomeRecord::failure(id, title, format!("Error checking service: {}", e));
                }
            }
        }

        OutcomeRecord::from_convergence(id, title, ensure_service(ctx, service, ServiceState::Enable))
    }

    /// `is-enabled` decides whether anything needs doing, in both modes
    fn journal_remote(ctx: &RunContext) -> OutcomeRecord {
        const ID: &str = "SVC-JOURNAL-REMOTE";
        const TITLE: &str = "Ensure systemd-journal-remote is disabled";

        let state = match query(ctx, &argv(&["systemctl", "is-enabled", JOURNAL_REMOTE])) {
            Ok(output) => output.stdout,
            Err(e) => return OutcomeRecord::failure(ID, TITLE, format!("Error: {}", e)),
        };

        if state.contains("disabled") || state.contains("masked") {
            return OutcomeRecord::informational(ID, TITLE, format!("{} already disabled", JOURNAL_REMOTE));
        }

        OutcomeRecord::from_convergence(
            ID,
            TITLE,
            run_commands(
                ctx,
                &[
                    argv(&["systemctl", "disable", JOURNAL_REMOTE]),
                    argv(&["systemctl", "mask", JOURNAL_REMOTE]),
                ],
            ),
        )
    }
}

impl CheckModule for UnwantedServices {
    fn name(&self) -> &str {
        "services"
    }

    fn description(&self) -> &str {
        "Mask unneeded network services and enable integrity and audit services"
    }

    fn apply(&self, _config: &ModuleConfig, ctx: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
        let mut records: Vec<OutcomeRecord> = UNWANTED_SERVICES
            .iter()
            .map(|service| {
                OutcomeRecord::from_convergence(
                    format!("SVC-{}", service),
                    format!("Disable service: {}", service),
                    ensure_service(ctx, service, ServiceState::Mask),
                )
            })
            .collect();

        records.push(Self::aide_package(ctx));
        records.push(Self::aide_database(ctx));
        records.extend(
            REQUIRED_SERVICES
                .iter()
                .map(|(service, description, optional)| Self::required(ctx, service, description, *optional)),
        );
        records.push(Self::journal_remote(ctx));

        Ok(records)
    }
}
