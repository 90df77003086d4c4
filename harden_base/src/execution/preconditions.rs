//! Checks evaluated before any module runs

/// Precondition failures abort the run before the first module
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("Root privileges are required (effective uid {euid})")]
    NotPrivileged { euid: u32 },
}

/// A condition that must hold for any check to be trustworthy
pub trait Precondition: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self) -> Result<(), PreconditionError>;
}

/// Requires the process to run with effective uid 0
#[derive(Debug, Clone, Copy, Default)]
pub struct RootPrivilege;

impl RootPrivilege {
    pub fn effective_uid() -> u32 {
        // SAFETY: geteuid takes no arguments and cannot fail
        unsafe { libc::geteuid() }
    }

    pub fn check_euid(euid: u32) -> Result<(), PreconditionError> {
        if euid == 0 {
            Ok(())
        } else {
            Err(PreconditionError::NotPrivileged { euid })
        }
    }
}

impl Precondition for RootPrivilege {
    fn name(&self) -> &str {
        "root-privilege"
    }

    fn check(&self) -> Result<(), PreconditionError> {
        Self::check_euid(Self::effective_uid())
    }
}
