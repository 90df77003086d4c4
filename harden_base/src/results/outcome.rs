//! Outcome record: the uniform result every check produces

use crate::converge::Convergence;
use serde::{Deserialize, Serialize};

/// One row of evidence for one check
///
/// Records are immutable once built. The `with_*` methods consume the record
/// and return a new one, so a module builds a record in one expression and
/// then hands it over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    id: String,
    title: String,
    changed: bool,
    ok: bool,
    notes: String,
    #[serde(default)]
    commands: Vec<String>,
    #[serde(default)]
    files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    control: Option<String>,
}

impl OutcomeRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        changed: bool,
        ok: bool,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            changed,
            ok,
            notes: notes.into(),
            commands: Vec::new(),
            files: Vec::new(),
            control: None,
        }
    }

    /// Check that only observed state, or that the module skipped
    pub fn informational(
        id: impl Into<String>,
        title: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self::new(id, title, false, true, notes)
    }

    pub fn failure(id: impl Into<String>, title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self::new(id, title, false, false, notes)
    }

    pub fn from_convergence(
        id: impl Into<String>,
        title: impl Into<String>,
        convergence: Convergence,
    ) -> Self {
        Self::from_convergences(id, title, vec![convergence])
    }

    /// Fold several primitive results into one record
    ///
    /// `changed` if any primitive changed, `ok` only if all were ok. Notes are
    /// joined with "; " and commands keep their order. A file touched by
    /// several primitives is listed once.
    pub fn from_convergences(
        id: impl Into<String>,
        title: impl Into<String>,
        convergences: Vec<Convergence>,
    ) -> Self {
        let changed = convergences.iter().any(Convergence::changed);
        let ok = convergences.iter().all(Convergence::ok);

        let mut notes = Vec::new();
        let mut commands = Vec::new();
        let mut files = Vec::new();
        for convergence in convergences {
            if !convergence.note.is_empty() {
                notes.push(convergence.note);
            }
            commands.extend(convergence.commands);
            for file in convergence.files {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }

        let notes = if notes.is_empty() {
            "Nothing to do".to_string()
        } else {
            notes.join("; ")
        };

        Self::new(id, title, changed, ok, notes)
            .with_commands(commands)
            .with_files(files)
    }

    pub fn with_commands(mut self, commands: Vec<String>) -> Self {
        self.commands.extend(commands);
        self
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files.extend(files);
        self
    }

    /// Attach the benchmark control this record evidences
    pub fn with_control(mut self, control: impl Into<String>) -> Self {
        self.control = Some(control.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn control(&self) -> Option<&str> {
        self.control.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converge::ConvergenceStatus;

    #[test]
    fn test_fold_convergences() {
        let record = OutcomeRecord::from_convergences(
            "BANNER-1",
            "Login banners",
            vec![
                Convergence::new(ConvergenceStatus::Unchanged, "No change").with_file("/etc/issue"),
                Convergence::new(ConvergenceStatus::Changed, "Wrote /etc/motd").with_file("/etc/motd"),
            ],
        );

        assert!(record.changed());
        assert!(record.ok());
        assert_eq!(record.notes(), "No change; Wrote /etc/motd");
        assert_eq!(record.files(), ["/etc/issue", "/etc/motd"]);
        assert!(record.control().is_none());
    }

    #[test]
    fn test_any_failure_fails_record() {
        let record = OutcomeRecord::from_convergences(
            "AUD-3",
            "Audit rules",
            vec![
                Convergence::new(ConvergenceStatus::Changed, "Wrote rules"),
                Convergence::new(ConvergenceStatus::Failed, "augenrules failed")
                    .with_command("augenrules --load"),
            ],
        );
        assert!(!record.ok());
        assert_eq!(record.commands(), ["augenrules --load"]);
    }

    #[test]
    fn test_shared_file_listed_once() {
        let record = OutcomeRecord::from_convergences(
            "LOG-1",
            "journald",
            vec![
                Convergence::new(ConvergenceStatus::Unchanged, "No change")
                    .with_file("/etc/systemd/journald.conf"),
                Convergence::new(ConvergenceStatus::WouldChange, "DRY-RUN")
                    .with_file("/etc/systemd/journald.conf"),
            ],
        );
        assert_eq!(record.files(), ["/etc/systemd/journald.conf"]);
    }

    #[test]
    fn test_empty_fold_is_informational() {
        let record = OutcomeRecord::from_convergences("X-1", "Nothing", Vec::new());
        assert!(!record.changed());
        assert!(record.ok());
        assert_eq!(record.notes(), "Nothing to do");
    }

    #[test]
    fn test_serialization_preserves_every_field() {
        let record = OutcomeRecord::new("SSH-1", "sshd settings", true, true, "Updated")
            .with_commands(vec!["systemctl reload sshd".to_string()])
            .with_files(vec!["/etc/ssh/sshd_config".to_string()])
            .with_control("5.2.1-5.2.21");

        let json = serde_json::to_string(&record).unwrap();
        let parsed: OutcomeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["control"], "5.2.1-5.2.21");
        assert_eq!(value["changed"], true);
    }
}
