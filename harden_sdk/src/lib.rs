//! # Harden SDK
//!
//! CIS Oracle Linux 9 hardening modules for the harden convergence engine.
//! Provides kernel, network, service, audit, authentication and filesystem
//! hardening modules, the shipped profiles and the benchmark control map.

// Module declarations
pub mod checks;
pub mod commands;
pub mod controls;
pub mod profiles;

use harden_base::api::Orchestrator;
use harden_base::checks::{ModuleRegistry, ProfileCatalog, RegistryError};

/// Create a registry with every shipped module
///
/// Includes:
/// - Kernel module blacklisting and network sysctl hardening
/// - Crypto policy, banners, SSH and sudo configuration
/// - Service masking and legacy package removal
/// - auditd, journald/rsyslog, firewalld, SELinux and AIDE
/// - Password policy, cron, core dumps, tmpfs mounts, IPv6, bootloader and TCP wrappers
pub fn create_module_registry() -> Result<ModuleRegistry, RegistryError> {
    let mut registry = ModuleRegistry::new();
    for module in checks::all_modules() {
        registry.register(module)?;
    }
    Ok(registry)
}

/// Create the catalog of shipped profiles
pub fn create_profile_catalog() -> Result<ProfileCatalog, RegistryError> {
    let mut catalog = ProfileCatalog::new();
    catalog.add(profiles::l1_server())?;
    catalog.add(profiles::l2_server())?;
    Ok(catalog)
}

/// Orchestrator preloaded with the benchmark name and control mapping
pub fn create_orchestrator(registry: &ModuleRegistry) -> Orchestrator<'_> {
    Orchestrator::new(registry)
        .with_benchmark(controls::BENCHMARK)
        .with_controls(controls::CONTROL_MAPPING.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use harden_base::config::HardeningConfig;
    use harden_base::execution::{RecordingRunner, RunContext, RunMode};
    use harden_base::logging::LoggingService;
    use std::sync::Arc;

    #[test]
    fn test_registry_creation() {
        let registry = create_module_registry().expect("Failed to create registry");
        assert_eq!(registry.len(), 21);
        assert!(registry.has_module("tcpwrappers"));
    }

    #[test]
    fn test_profiles_resolve_against_registry() {
        let registry = create_module_registry().unwrap();
        let catalog = create_profile_catalog().unwrap();

        assert_eq!(catalog.names(), vec!["l1-server", "l2-server"]);
        for profile in catalog.iter() {
            assert!(
                registry.missing_modules(profile).is_empty(),
                "{} references unknown modules",
                profile.name()
            );
        }
    }

    #[test]
    fn test_l2_preview_run_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        let registry = create_module_registry().unwrap();
        let catalog = create_profile_catalog().unwrap();
        let profile = catalog.get("l2-server").unwrap();

        let runner = Arc::new(RecordingRunner::new());
        let ctx = RunContext::new(
            RunMode::Preview,
            profile.name(),
            runner.clone(),
            Arc::new(LoggingService::disabled()),
        )
        .with_root(root.path());

        let outcome = create_orchestrator(&registry)
            .run(profile, &HardeningConfig::default(), &ctx)
            .unwrap();
        let report = outcome.report;

        assert!(report.ok());
        assert_eq!(report.modules_attempted(), 19);
        assert!(report.module_failures().is_empty());
        assert_eq!(report.summary().failed, 0);
        assert_eq!(report.metadata().benchmark.as_deref(), Some(controls::BENCHMARK));

        let crypto = report.results().iter().find(|r| r.id() == "CRYPTO-1").unwrap();
        assert_eq!(crypto.control(), Some("1.5.1"));

        // Preview only issues read-only queries
        let queries = ["getenforce", "systemctl list-unit-files ", "systemctl is-enabled "];
        for line in runner.call_lines() {
            assert!(queries.iter().any(|q| line.starts_with(q)), "unexpected call: {}", line);
        }
    }
}
