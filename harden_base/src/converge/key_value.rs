//! Key/value convergence for line-oriented configuration files

use super::file_content::{read_existing, write_with_parents};
use super::status::{Convergence, ConvergenceStatus};
use crate::execution::RunContext;
use crate::logging::codes;
use regex::Regex;

/// One desired `key<separator>value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    pub separator: String,
    pub comment_prefix: String,
    /// Keyword opening a scoped section; a missing key is added above the first one
    pub insert_before: Option<String>,
}

impl KeyValue {
    /// Setting rendered as `key value` with `#` comments
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            separator: " ".to_string(),
            comment_prefix: "#".to_string(),
            insert_before: None,
        }
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn comment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.comment_prefix = prefix.into();
        self
    }

    /// Add a missing key above the first active line starting with `keyword`
    /// (matched case-insensitively) instead of at the end of the file
    pub fn insert_before(mut self, keyword: impl Into<String>) -> Self {
        self.insert_before = Some(keyword.into());
        self
    }

    pub fn canonical(&self) -> String {
        format!("{}{}{}", self.key, self.separator, self.value)
    }

    fn is_comment(&self, line: &str) -> bool {
        !self.comment_prefix.is_empty() && line.trim_start().starts_with(&self.comment_prefix)
    }
}

/// Rewrite every active line for the key and append one if none exists
///
/// Returns the new file text and whether anything differed from `existing`.
pub fn render_key_value(existing: &str, setting: &KeyValue) -> Result<(String, bool), regex::Error> {
    let matcher = Regex::new(&format!(r"^\s*{}\b", regex::escape(&setting.key)))?;
    let canonical = setting.canonical();

    let mut changed = false;
    let mut found = false;
    let mut lines: Vec<String> = Vec::new();

    for line in existing.lines() {
        if matcher.is_match(line) && !setting.is_comment(line) {
            found = true;
            if line.trim() != canonical {
                changed = true;
            }
            lines.push(canonical.clone());
        } else {
            lines.push(line.to_string());
        }
    }

    if !found {
        let section = match &setting.insert_before {
            Some(keyword) => {
                let opener = Regex::new(&format!(r"(?i)^\s*{}\b", regex::escape(keyword)))?;
                lines
                    .iter()
                    .position(|line| opener.is_match(line) && !setting.is_comment(line))
            }
            None => None,
        };
        match section {
            Some(index) => lines.insert(index, canonical),
            None => lines.push(canonical),
        }
        changed = true;
    }

    let mut rendered = lines.join("\n").trim_end().to_string();
    rendered.push('\n');
    Ok((rendered, changed))
}

/// Ensure `path` contains `setting` as its only active definition of the key
pub fn ensure_key_value(ctx: &RunContext, path: &str, setting: &KeyValue) -> Convergence {
    let target = ctx.resolve(path);
    let failed = |note: String| {
        crate::log_error!(ctx.logger(), codes::primitive::FILE_IO_FAILED, "Key/value update failed",
            "path" => path, "key" => setting.key, "reason" => note);
        Convergence::new(ConvergenceStatus::Failed, note).with_file(path)
    };

    let existing = match read_existing(&target) {
        Ok(existing) => existing.unwrap_or_default(),
        Err(e) => return failed(format!("Failed to read {}: {}", path, e)),
    };

    let (rendered, changed) = match render_key_value(&existing, setting) {
        Ok(result) => result,
        Err(e) => return failed(format!("Invalid key '{}': {}", setting.key, e)),
    };

    if !changed {
        return Convergence::new(ConvergenceStatus::Unchanged, "No change").with_file(path);
    }

    if ctx.is_preview() {
        return Convergence::new(
            ConvergenceStatus::WouldChange,
            format!("DRY-RUN: would update {}: {}", path, setting.key),
        )
        .with_file(path);
    }

    match write_with_parents(&target, &rendered) {
        Ok(()) => Convergence::new(
            ConvergenceStatus::Changed,
            format!("Updated {}: {}", path, setting.key),
        )
        .with_file(path),
        Err(e) => failed(format!("Failed to write {}: {}", path, e)),
    }
}
