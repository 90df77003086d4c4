//! Explicit per-run context passed to every module and primitive

use super::command_runner::CommandRunner;
use crate::logging::LoggingService;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Preview computes and reports intended changes; Apply performs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Preview,
    Apply,
}

impl RunMode {
    pub fn is_preview(self) -> bool {
        matches!(self, RunMode::Preview)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunMode::Preview => "preview",
            RunMode::Apply => "apply",
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a module needs for one run
///
/// Module code names host paths as absolute paths (`/etc/issue`); `resolve`
/// maps them under the configured filesystem root so a run can target a
/// mounted image or a scratch directory.
#[derive(Clone)]
pub struct RunContext {
    mode: RunMode,
    profile: String,
    root: PathBuf,
    package_manager: String,
    runner: Arc<dyn CommandRunner>,
    logger: Arc<LoggingService>,
}

impl RunContext {
    pub fn new(
        mode: RunMode,
        profile: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        logger: Arc<LoggingService>,
    ) -> Self {
        Self {
            mode,
            profile: profile.into(),
            root: PathBuf::from("/"),
            package_manager: "dnf".to_string(),
            runner,
            logger,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_package_manager(mut self, package_manager: impl Into<String>) -> Self {
        self.package_manager = package_manager.into();
        self
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn is_preview(&self) -> bool {
        self.mode.is_preview()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_manager(&self) -> &str {
        &self.package_manager
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn logger(&self) -> &LoggingService {
        self.logger.as_ref()
    }

    /// Map a host path under the run's filesystem root
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if self.root == Path::new("/") {
            return path.to_path_buf();
        }

        let relative: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
            .collect();
        self.root.join(relative)
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("mode", &self.mode)
            .field("profile", &self.profile)
            .field("root", &self.root)
            .field("package_manager", &self.package_manager)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::RecordingRunner;

    fn context(mode: RunMode) -> RunContext {
        RunContext::new(
            mode,
            "l1-server",
            Arc::new(RecordingRunner::new()),
            Arc::new(LoggingService::disabled()),
        )
    }

    #[test]
    fn test_resolve_at_real_root_is_identity() {
        let ctx = context(RunMode::Apply);
        assert_eq!(ctx.resolve("/etc/issue"), PathBuf::from("/etc/issue"));
        assert!(!ctx.is_preview());
    }

    #[test]
    fn test_resolve_under_alternate_root() {
        let ctx = context(RunMode::Preview).with_root("/mnt/image");
        assert_eq!(
            ctx.resolve("/etc/ssh/sshd_config"),
            PathBuf::from("/mnt/image/etc/ssh/sshd_config")
        );
        assert!(ctx.is_preview());
        assert_eq!(ctx.profile(), "l1-server");
    }

    #[test]
    fn test_mode_strings() {
        assert_eq!(RunMode::Preview.to_string(), "preview");
        assert_eq!(RunMode::Apply.as_str(), "apply");
    }
}
