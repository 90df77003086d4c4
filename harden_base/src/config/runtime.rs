// RUNTIME PREFERENCES (environment defaults, overridden by the config file and CLI)

use crate::logging::LogLevel;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::{ConfigError, LoggingSection, RunnerSection};

pub const DEFAULT_LOG_FILE: &str = "/var/log/harden.log";

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingPreferences {
    /// Minimum level written by the logging service
    pub min_level: LogLevel,

    /// Emit one JSON object per event instead of plain lines
    pub structured: bool,

    /// Events are also appended here when set
    pub file: Option<PathBuf>,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_level: env::var("HARDEN_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
            structured: env::var("HARDEN_LOG_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            file: log_file(env::var("HARDEN_LOG_FILE").ok().as_deref().unwrap_or(DEFAULT_LOG_FILE)),
        }
    }
}

impl LoggingPreferences {
    /// Layer the `[logging]` table of a config file on top of these values
    pub fn merge_section(&mut self, section: &LoggingSection) -> Result<(), ConfigError> {
        if let Some(level) = &section.level {
            self.min_level = LogLevel::parse(level).ok_or_else(|| ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                reason: format!("unknown log level '{}'", level),
            })?;
        }
        if let Some(structured) = section.structured {
            self.structured = structured;
        }
        if let Some(file) = &section.file {
            self.file = log_file(file);
        }
        Ok(())
    }
}

fn log_file(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Command runner preferences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerPreferences {
    /// Package manager program used by package convergence
    pub package_manager: String,

    /// Per-command timeout; `None` waits for the child indefinitely
    pub timeout: Option<Duration>,
}

impl Default for RunnerPreferences {
    fn default() -> Self {
        Self {
            package_manager: env::var("HARDEN_PACKAGE_MANAGER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "dnf".to_string()),
            timeout: env::var("HARDEN_COMMAND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

impl RunnerPreferences {
    /// Layer the `[runner]` table of a config file on top of these values
    pub fn merge_section(&mut self, section: &RunnerSection) -> Result<(), ConfigError> {
        if let Some(manager) = &section.package_manager {
            if manager.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "runner.package_manager".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            self.package_manager = manager.clone();
        }
        match section.timeout_secs {
            Some(0) => self.timeout = None,
            Some(secs) => self.timeout = Some(Duration::from_secs(secs)),
            None => {}
        }
        Ok(())
    }
}
