//! Logging service and the sinks it can write to

use super::events::{LogEvent, LogLevel};
use crate::config::LoggingPreferences;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for log events
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level-filtering front end handed to modules through the run context
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Console sink (or `console` when given) plus the preferred log file
    ///
    /// A log file that cannot be opened is returned next to a console-only
    /// service so the caller can report it.
    pub fn from_preferences(
        preferences: &LoggingPreferences,
        console: Option<Arc<dyn Logger>>,
    ) -> (Self, Option<std::io::Error>) {
        let console = console.unwrap_or_else(|| -> Arc<dyn Logger> {
            if preferences.structured {
                Arc::new(StructuredLogger)
            } else {
                Arc::new(ConsoleLogger)
            }
        });

        let Some(path) = &preferences.file else {
            return (Self::new(console, preferences.min_level), None);
        };

        match MultiLogger::new()
            .with_logger(console.clone())
            .with_file(path, preferences.structured)
        {
            Ok(multi) => (Self::new(Arc::new(multi), preferences.min_level), None),
            Err(e) => (Self::new(console, preferences.min_level), Some(e)),
        }
    }

    /// Service that drops every event
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullLogger), LogLevel::Error)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

impl std::fmt::Debug for LoggingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingService")
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

/// Human readable lines on stdout, errors on stderr
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        match event.level {
            LogLevel::Error => eprintln!("{}", event.format()),
            _ => println!("{}", event.format()),
        }
    }
}

/// One JSON object per line
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Appends events to a persistent log file
pub struct FileLogger {
    file_path: PathBuf,
    structured: bool,
}

impl FileLogger {
    /// Creates the parent directory and checks the file can be opened for append
    pub fn new(file_path: impl AsRef<Path>, structured: bool) -> Result<Self, std::io::Error> {
        let path = file_path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            file_path: path,
            structured,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        let line = if self.structured {
            event.format_json().unwrap_or_else(|_| event.format())
        } else {
            format!("{} {}", event.timestamp.to_rfc3339(), event.format())
        };

        // Write failures are dropped; there is nowhere left to report them
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&self.file_path) {
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Fans each event out to several sinks
#[derive(Default)]
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
}

impl MultiLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) {
        self.loggers.push(logger);
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.add_logger(logger);
        self
    }

    pub fn with_file(self, file_path: impl AsRef<Path>, structured: bool) -> Result<Self, std::io::Error> {
        let file_logger = FileLogger::new(file_path, structured)?;
        Ok(self.with_logger(Arc::new(file_logger)))
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        for logger in &self.loggers {
            logger.log(event);
        }
    }
}

struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Forwards events into the `log` facade so an installed backend
/// (env_logger in the CLI) decides formatting and filtering
#[cfg(feature = "logging")]
pub struct LogCrateLogger;

#[cfg(feature = "logging")]
impl Logger for LogCrateLogger {
    fn log(&self, event: &LogEvent) {
        let level = match event.level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        };
        log::log!(target: "harden", level, "{}", event.format());
    }
}

/// Memory logger for testing
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.guard().clone()
    }

    pub fn event_count(&self) -> usize {
        self.guard().len()
    }

    pub fn clear(&self) {
        self.guard().clear();
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.guard().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn has_event_with_code(&self, code: &str) -> bool {
        self.guard().iter().any(|e| e.code.as_str() == code)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        self.guard().push(event.clone());
    }
}
