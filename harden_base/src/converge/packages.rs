//! Package presence convergence through the system package manager

use super::command::run_command;
use super::status::Convergence;
use crate::execution::RunContext;

/// Whether the packages should be installed or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    Present,
    Absent,
}

impl PackageState {
    fn verb(self) -> &'static str {
        match self {
            PackageState::Present => "install",
            PackageState::Absent => "remove",
        }
    }
}

/// Package manager invocation for the given packages
pub fn package_command(package_manager: &str, packages: &[&str], state: PackageState) -> Vec<String> {
    let mut argv = vec![
        package_manager.to_string(),
        "-y".to_string(),
        state.verb().to_string(),
    ];
    argv.extend(packages.iter().map(|p| p.to_string()));
    argv
}

/// Ensure `packages` are installed (or removed)
///
/// Relies on the package manager being a no-op for packages already in the
/// desired state; a successful call is reported as a change.
pub fn ensure_packages(ctx: &RunContext, packages: &[&str], state: PackageState) -> Convergence {
    run_command(ctx, package_command(ctx.package_manager(), packages, state))
}
