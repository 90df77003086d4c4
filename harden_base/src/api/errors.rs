//! # Run Errors

use crate::execution::PreconditionError;

/// Errors that stop a run before any module executes
///
/// Everything that happens after the first module starts is reported through
/// the report's `ok` flags instead.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
}

impl RunError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Precondition(_) => 2,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RunError::Precondition(PreconditionError::NotPrivileged { .. }) => {
                "This tool must be run as root".to_string()
            }
            RunError::Precondition(e) => e.to_string(),
        }
    }
}
