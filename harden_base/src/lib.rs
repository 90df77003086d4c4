//! # Harden Base - Host Hardening Convergence Core
//!
//! Converges a host toward a hardened target state. Convergence primitives
//! compare desired and observed state for file content, key/value settings,
//! permissions, packages and services, and either report the difference
//! (preview) or make the change (apply). Check modules combine primitives
//! into outcome records, and the orchestrator runs a profile of modules into
//! a compliance report.

pub mod api;
pub mod checks;
pub mod config;
pub mod converge;
pub mod execution;
pub mod logging;
pub mod results;

// Convenience re-exports
pub use api::{Orchestrator, RunError, RunOutcome, RunState};
pub use results::{OutcomeRecord, Report};

pub mod prelude {
    pub use crate::api::{Orchestrator, RunError, RunOutcome, RunState};

    pub use crate::checks::{
        CheckModule, ModuleError, ModuleRegistry, Profile, ProfileCatalog, RegistryError,
    };

    pub use crate::config::{HardeningConfig, ModuleConfig};

    pub use crate::converge::{
        ensure_file_content, ensure_key_value, ensure_packages, ensure_permissions,
        ensure_service, query, run_command, run_commands, Convergence, ConvergenceStatus,
        KeyValue, Ownership, PackageState, ServiceState,
    };

    pub use crate::execution::{
        argv, CommandRunner, RootPrivilege, RunContext, RunMode, SystemCommandRunner,
    };

    pub use crate::logging::{LogLevel, LoggingService};
    pub use crate::results::{OutcomeRecord, Report};
}
