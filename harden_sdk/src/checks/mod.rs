//! CIS hardening check modules
//!
//! Each module is a unit struct implementing [`CheckModule`]. Paths are host
//! paths; the run context maps them under its filesystem root.

pub mod aide;
pub mod audit;
pub mod auth;
pub mod banners;
pub mod boot;
pub mod coredumps;
pub mod cron;
pub mod crypto;
pub mod fileperms;
pub mod firewalld;
pub mod ipv6;
pub mod kernel;
pub mod logging;
pub mod mounts;
pub mod packages;
pub mod selinux;
pub mod services;
pub mod ssh;
pub mod sudo;
pub mod sysctl;
pub mod tcpwrappers;

use harden_base::checks::CheckModule;
use harden_base::converge::{ensure_key_value, Convergence, KeyValue};
use harden_base::execution::RunContext;

/// Every module shipped with the tool, in catalog order
pub fn all_modules() -> Vec<Box<dyn CheckModule>> {
    vec![
        Box::new(kernel::KernelModules),
        Box::new(sysctl::NetworkSysctl),
        Box::new(crypto::CryptoPolicy),
        Box::new(banners::LoginBanners),
        Box::new(ssh::SshHardening),
        Box::new(sudo::SudoHardening),
        Box::new(services::UnwantedServices),
        Box::new(packages::LegacyPackages),
        Box::new(audit::AuditHardening),
        Box::new(logging::LoggingHardening),
        Box::new(fileperms::SystemFilePermissions),
        Box::new(firewalld::Firewalld),
        Box::new(selinux::SelinuxEnforcing),
        Box::new(auth::AuthHardening),
        Box::new(coredumps::CoreDumps),
        Box::new(cron::CronHardening),
        Box::new(aide::Aide),
        Box::new(mounts::TmpMounts),
        Box::new(ipv6::DisableIpv6),
        Box::new(boot::BootLoader),
        Box::new(tcpwrappers::TcpWrappers),
    ]
}

/// Converge several settings into one file
pub(crate) fn ensure_settings(ctx: &RunContext, path: &str, settings: &[KeyValue]) -> Vec<Convergence> {
    settings
        .iter()
        .map(|setting| ensure_key_value(ctx, path, setting))
        .collect()
}
