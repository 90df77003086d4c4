//! Whole-file content convergence

use super::status::{Convergence, ConvergenceStatus};
use crate::execution::RunContext;
use crate::logging::codes;
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Read a file as lossy UTF-8; `Ok(None)` when it does not exist
pub(crate) fn read_existing(path: &Path) -> std::io::Result<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write `content`, creating parent directories as needed
pub(crate) fn write_with_parents(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Ensure `path` holds exactly `content`
///
/// Only content is compared. `mode` is applied when the file is written, so a
/// file with correct content and a drifted mode reports no change.
pub fn ensure_file_content(ctx: &RunContext, path: &str, content: &str, mode: u32) -> Convergence {
    let target = ctx.resolve(path);

    let existing = match read_existing(&target) {
        Ok(existing) => existing,
        Err(e) => {
            crate::log_error!(ctx.logger(), codes::primitive::FILE_IO_FAILED, "Failed to read file",
                "path" => path, "error" => e);
            return Convergence::new(
                ConvergenceStatus::Failed,
                format!("Failed to read {}: {}", path, e),
            )
            .with_file(path);
        }
    };

    if existing.as_deref() == Some(content) {
        return Convergence::new(ConvergenceStatus::Unchanged, "No change").with_file(path);
    }

    if ctx.is_preview() {
        return Convergence::new(
            ConvergenceStatus::WouldChange,
            format!("DRY-RUN: would write {}", path),
        )
        .with_file(path);
    }

    let written = write_with_parents(&target, content)
        .and_then(|_| fs::set_permissions(&target, fs::Permissions::from_mode(mode)));

    match written {
        Ok(()) => {
            Convergence::new(ConvergenceStatus::Changed, format!("Wrote {}", path)).with_file(path)
        }
        Err(e) => {
            crate::log_error!(ctx.logger(), codes::primitive::FILE_IO_FAILED, "Failed to write file",
                "path" => path, "error" => e);
            Convergence::new(
                ConvergenceStatus::Failed,
                format!("Failed to write {}: {}", path, e),
            )
            .with_file(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converge::test_support::{context, snapshot};
    use crate::execution::RunMode;

    #[test]
    fn test_apply_then_stable() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(RunMode::Apply, root.path());

        let first = ensure_file_content(&ctx, "/etc/issue", "Authorized uses only.\n", 0o644);
        assert_eq!(first.status, ConvergenceStatus::Changed);
        assert_eq!(first.files, vec!["/etc/issue".to_string()]);

        let on_disk = root.path().join("etc/issue");
        assert_eq!(fs::read_to_string(&on_disk).unwrap(), "Authorized uses only.\n");
        assert_eq!(
            fs::metadata(&on_disk).unwrap().permissions().mode() & 0o7777,
            0o644
        );

        let second = ensure_file_content(&ctx, "/etc/issue", "Authorized uses only.\n", 0o644);
        assert_eq!(second.status, ConvergenceStatus::Unchanged);
        assert!(!second.changed());
        assert_eq!(second.note, "No change");
    }

    #[test]
    fn test_mode_not_compared() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(RunMode::Apply, root.path());
        let on_disk = root.path().join("etc/motd");
        fs::create_dir_all(on_disk.parent().unwrap()).unwrap();
        fs::write(&on_disk, "").unwrap();
        fs::set_permissions(&on_disk, fs::Permissions::from_mode(0o600)).unwrap();

        let result = ensure_file_content(&ctx, "/etc/motd", "", 0o644);
        assert_eq!(result.status, ConvergenceStatus::Unchanged);
        assert_eq!(
            fs::metadata(&on_disk).unwrap().permissions().mode() & 0o7777,
            0o600
        );
    }

    #[test]
    fn test_preview_never_writes() {
        let root = tempfile::tempdir().unwrap();
        let existing = root.path().join("etc/issue.net");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, "old banner\n").unwrap();
        let before = snapshot(root.path());

        let ctx = context(RunMode::Preview, root.path());
        let changed = ensure_file_content(&ctx, "/etc/issue.net", "new banner\n", 0o644);
        let created = ensure_file_content(&ctx, "/etc/sudoers.d/99-cis", "Defaults use_pty\n", 0o440);

        assert_eq!(changed.status, ConvergenceStatus::WouldChange);
        assert_eq!(changed.note, "DRY-RUN: would write /etc/issue.net");
        assert!(created.changed());
        assert_eq!(snapshot(root.path()), before);
    }

    #[test]
    fn test_unreadable_target_fails() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("etc/issue")).unwrap();
        let ctx = context(RunMode::Apply, root.path());

        let result = ensure_file_content(&ctx, "/etc/issue", "banner\n", 0o644);
        assert_eq!(result.status, ConvergenceStatus::Failed);
        assert!(!result.ok());
        assert!(result.note.starts_with("Failed to read /etc/issue"));
    }
}
