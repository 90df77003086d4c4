//! Permission and ownership convergence

use super::status::{Convergence, ConvergenceStatus};
use crate::execution::RunContext;
use crate::logging::codes;
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::{MetadataExt, PermissionsExt};

/// Desired permission bits and numeric ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

impl Ownership {
    /// Owned by root:root
    pub fn root(mode: u32) -> Self {
        Self { mode, uid: 0, gid: 0 }
    }
}

/// Ensure `path` has the desired mode and owner
///
/// A missing path is not an error here; callers decide whether it matters.
/// When the mode is set but the kernel rejects the ownership change the
/// result is `OwnershipRejected`, which still counts as ok.
pub fn ensure_permissions(ctx: &RunContext, path: &str, desired: Ownership) -> Convergence {
    let target = ctx.resolve(path);

    let metadata = match fs::metadata(&target) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Convergence::new(ConvergenceStatus::NotFound, format!("Not found: {}", path))
                .with_file(path);
        }
        Err(e) => {
            return Convergence::new(
                ConvergenceStatus::Failed,
                format!("Failed to stat {}: {}", path, e),
            )
            .with_file(path);
        }
    };

    let current_mode = metadata.permissions().mode() & 0o7777;
    let (current_uid, current_gid) = (metadata.uid(), metadata.gid());
    let mode_differs = current_mode != desired.mode;
    let owner_differs = (current_uid, current_gid) != (desired.uid, desired.gid);

    if !mode_differs && !owner_differs {
        return Convergence::new(ConvergenceStatus::Unchanged, "No change").with_file(path);
    }

    let mut delta = Vec::new();
    if mode_differs {
        delta.push(format!("mode {:#o}->{:#o}", current_mode, desired.mode));
    }
    if owner_differs {
        delta.push(format!(
            "owner {}:{}->{}:{}",
            current_uid, current_gid, desired.uid, desired.gid
        ));
    }
    let delta = delta.join(", ");

    if ctx.is_preview() {
        return Convergence::new(
            ConvergenceStatus::WouldChange,
            format!("DRY-RUN: would set {} {}", path, delta),
        )
        .with_file(path);
    }

    if let Err(e) = fs::set_permissions(&target, fs::Permissions::from_mode(desired.mode)) {
        crate::log_error!(ctx.logger(), codes::primitive::FILE_IO_FAILED, "Failed to set mode",
            "path" => path, "error" => e);
        return Convergence::new(
            ConvergenceStatus::Failed,
            format!("Failed to set mode on {}: {}", path, e),
        )
        .with_file(path);
    }

    if owner_differs {
        if let Err(e) = std::os::unix::fs::chown(&target, Some(desired.uid), Some(desired.gid)) {
            if e.kind() != ErrorKind::PermissionDenied {
                return Convergence::new(
                    ConvergenceStatus::Failed,
                    format!("Failed to set owner on {}: {}", path, e),
                )
                .with_file(path);
            }
            crate::log_warning!(ctx.logger(), code = codes::primitive::OWNERSHIP_REJECTED,
                "Ownership change rejected", "path" => path, "error" => e);
            return Convergence::new(
                ConvergenceStatus::OwnershipRejected,
                format!("Set {} {}; ownership change rejected: {}", path, delta, e),
            )
            .with_file(path);
        }
    }

    Convergence::new(ConvergenceStatus::Changed, format!("Set {} {}", path, delta)).with_file(path)
}
