//! Convergence primitives
//!
//! Each primitive compares desired against observed state with the same
//! logic in both modes. Preview reports what apply would do and never
//! writes; apply performs exactly that change.

pub mod command;
pub mod file_content;
pub mod key_value;
pub mod packages;
pub mod permissions;
pub mod services;
pub mod status;

pub use command::{query, run_command, run_commands};
pub use file_content::ensure_file_content;
pub use key_value::{ensure_key_value, render_key_value, KeyValue};
pub use packages::{ensure_packages, package_command, PackageState};
pub use permissions::{ensure_permissions, Ownership};
pub use services::{ensure_service, service_commands, ServiceState};
pub use status::{Convergence, ConvergenceStatus};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::execution::{RecordingRunner, RunContext, RunMode};
    use crate::logging::LoggingService;
    use std::collections::BTreeMap;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    pub fn context(mode: RunMode, root: &Path) -> RunContext {
        context_with_runner(mode, root, Arc::new(RecordingRunner::new()))
    }

    pub fn context_with_runner(mode: RunMode, root: &Path, runner: Arc<RecordingRunner>) -> RunContext {
        RunContext::new(mode, "l1-server", runner, Arc::new(LoggingService::disabled()))
            .with_root(root)
    }

    /// Content and mode of every entry under `root`
    pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, (Vec<u8>, u32)> {
        walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .map(|entry| {
                let meta = entry.metadata().unwrap();
                let content = if meta.is_file() {
                    std::fs::read(entry.path()).unwrap()
                } else {
                    Vec::new()
                };
                (entry.path().to_path_buf(), (content, meta.permissions().mode()))
            })
            .collect()
    }
}
