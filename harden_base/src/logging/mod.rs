//! Structured logging for hardening runs
//!
//! There is no process-wide logger. A `LoggingService` is built once by the
//! caller and travels with the `RunContext`; the macros take it explicitly.

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
#[cfg(feature = "logging")]
pub use service::LogCrateLogger;
pub use service::{
    ConsoleLogger, FileLogger, Logger, LoggingService, MemoryLogger, MultiLogger, StructuredLogger,
};
