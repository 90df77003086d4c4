//! Configuration model
//!
//! A hardening run is configured from three layers: `HARDEN_*` environment
//! variables supply the defaults, the TOML file overrides them, and the CLI
//! has the last word. Module tables are passed through untouched and read by
//! each module with typed getters.
//!
//! ```toml
//! [runner]
//! package_manager = "dnf"
//! timeout_secs = 600
//!
//! [logging]
//! level = "info"
//!
//! [modules.firewalld]
//! zone = "drop"
//! enforce_allowlist = true
//! allow_services = ["ssh"]
//! ```

pub mod module_config;
pub mod runtime;

pub use module_config::ModuleConfig;
pub use runtime::{LoggingPreferences, RunnerPreferences};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

/// `[runner]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerSection {
    pub package_manager: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub structured: Option<bool>,
    /// Persistent log file; an empty string disables it
    pub file: Option<String>,
}

/// Parsed configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardeningConfig {
    pub runner: RunnerSection,
    pub logging: LoggingSection,
    pub modules: BTreeMap<String, toml::Table>,
}

impl HardeningConfig {
    /// Load a configuration file
    ///
    /// Returns `Ok(None)` when the file does not exist so the caller can warn
    /// and continue with defaults.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        toml::from_str(&source)
            .map(Some)
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: e,
            })
    }

    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// The configuration slice for one module (empty when not configured)
    pub fn module_config(&self, module: &str) -> ModuleConfig {
        self.modules
            .get(module)
            .cloned()
            .map(|table| ModuleConfig::new(module, table))
            .unwrap_or_else(|| ModuleConfig::empty(module))
    }

    /// Runtime preferences with this file layered over the environment defaults
    pub fn logging_preferences(&self) -> Result<LoggingPreferences, ConfigError> {
        let mut preferences = LoggingPreferences::default();
        preferences.merge_section(&self.logging)?;
        Ok(preferences)
    }

    pub fn runner_preferences(&self) -> Result<RunnerPreferences, ConfigError> {
        let mut preferences = RunnerPreferences::default();
        preferences.merge_section(&self.runner)?;
        Ok(preferences)
    }
}
