//! Command runner configurations for different platforms
//!
//! Provides allow-listed command runners for host hardening.

pub mod oel9;

pub use oel9::create_oel9_command_runner;
