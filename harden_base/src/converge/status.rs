//! Result type shared by every convergence primitive

use serde::{Deserialize, Serialize};

/// How a primitive left (or would leave) its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceStatus {
    /// Target already matched the desired state
    Unchanged,
    /// Target path does not exist and the primitive treats that as acceptable
    NotFound,
    /// Preview of a delegated command that was not executed
    Planned,
    /// Preview found a difference
    WouldChange,
    /// Apply made the change
    Changed,
    /// Apply set the mode but the ownership change was rejected
    OwnershipRejected,
    /// The primitive could not reach its goal
    Failed,
}

impl ConvergenceStatus {
    pub fn changed(self) -> bool {
        matches!(
            self,
            Self::WouldChange | Self::Changed | Self::OwnershipRejected
        )
    }

    pub fn ok(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Outcome of one primitive invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    pub status: ConvergenceStatus,
    pub note: String,
    pub commands: Vec<String>,
    pub files: Vec<String>,
}

impl Convergence {
    pub fn new(status: ConvergenceStatus, note: impl Into<String>) -> Self {
        Self {
            status,
            note: note.into(),
            commands: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.commands.push(command.into());
        self
    }

    pub fn with_commands(mut self, commands: Vec<String>) -> Self {
        self.commands.extend(commands);
        self
    }

    pub fn changed(&self) -> bool {
        self.status.changed()
    }

    pub fn ok(&self) -> bool {
        self.status.ok()
    }
}
