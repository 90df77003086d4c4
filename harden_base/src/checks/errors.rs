//! Error types for check modules and their registry

/// Failure of a module invocation as a whole
///
/// Expected host conditions (missing files, failing commands) are reported
/// as failing outcome records instead. A `ModuleError` means the module could
/// not do its job at all; the orchestrator records it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("Invalid setting '{key}' for module '{module}': expected {expected}")]
    InvalidConfig {
        module: String,
        key: String,
        expected: &'static str,
    },
}

/// Registry and profile lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Module '{name}' is already registered")]
    DuplicateModule { name: String },

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Profile '{name}' is already defined")]
    DuplicateProfile { name: String },
}
