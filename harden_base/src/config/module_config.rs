//! Per-module configuration slice with typed lookups

use crate::checks::ModuleError;
use std::collections::BTreeMap;
use toml::{Table, Value};

/// The `[modules.<name>]` table handed to one check module
///
/// Absent keys fall back to the caller's default. A key that is present with
/// the wrong type is an `InvalidConfig` error, never silently ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleConfig {
    module: String,
    table: Table,
}

impl ModuleConfig {
    pub fn new(module: impl Into<String>, table: Table) -> Self {
        Self {
            module: module.into(),
            table,
        }
    }

    pub fn empty(module: impl Into<String>) -> Self {
        Self::new(module, Table::new())
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ModuleError> {
        match self.table.get(key) {
            None => Ok(default),
            Some(Value::Boolean(b)) => Ok(*b),
            Some(_) => Err(self.invalid(key, "boolean")),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> Result<i64, ModuleError> {
        match self.table.get(key) {
            None => Ok(default),
            Some(Value::Integer(i)) => Ok(*i),
            Some(_) => Err(self.invalid(key, "integer")),
        }
    }

    pub fn get_str(&self, key: &str, default: &str) -> Result<String, ModuleError> {
        match self.table.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.invalid(key, "string")),
        }
    }

    pub fn get_str_list(&self, key: &str, default: &[&str]) -> Result<Vec<String>, ModuleError> {
        match self.table.get(key) {
            None => Ok(default.iter().map(|s| s.to_string()).collect()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(self.invalid(key, "array of strings")),
                })
                .collect(),
            Some(_) => Err(self.invalid(key, "array of strings")),
        }
    }

    /// Nested table of scalar settings, rendered as strings
    ///
    /// Used by modules whose desired values are a free-form key/value table,
    /// for example sshd or sysctl overrides.
    pub fn get_settings(&self, key: &str) -> Result<BTreeMap<String, String>, ModuleError> {
        let table = match self.table.get(key) {
            None => return Ok(BTreeMap::new()),
            Some(Value::Table(t)) => t,
            Some(_) => return Err(self.invalid(key, "table")),
        };

        let mut settings = BTreeMap::new();
        for (name, value) in table {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Integer(i) => i.to_string(),
                Value::Float(f) => f.to_string(),
                Value::Boolean(b) => b.to_string(),
                _ => return Err(self.invalid(&format!("{}.{}", key, name), "scalar")),
            };
            settings.insert(name.clone(), rendered);
        }
        Ok(settings)
    }

    fn invalid(&self, key: &str, expected: &'static str) -> ModuleError {
        ModuleError::InvalidConfig {
            module: self.module.clone(),
            key: key.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config(source: &str) -> ModuleConfig {
        ModuleConfig::new("auth", source.parse::<Table>().unwrap())
    }

    #[test]
    fn test_defaults_for_absent_keys() {
        let cfg = ModuleConfig::empty("auth");
        assert!(cfg.get_bool("enforce", true).unwrap());
        assert_eq!(cfg.get_int("pwquality_minlen", 14).unwrap(), 14);
        assert_eq!(cfg.get_str("umask", "027").unwrap(), "027");
        assert_eq!(
            cfg.get_str_list("allowed_hosts", &["127.0.0.1"]).unwrap(),
            vec!["127.0.0.1".to_string()]
        );
        assert!(cfg.get_settings("settings").unwrap().is_empty());
    }

    #[test]
    fn test_present_values_win() {
        let cfg = config(
            r#"
            enforce = false
            pwquality_minlen = 16
            umask = "077"
            allow_ports = ["22/tcp", "443/tcp"]

            [settings]
            MaxAuthTries = 3
            PermitRootLogin = "no"
            "#,
        );

        assert!(!cfg.get_bool("enforce", true).unwrap());
        assert_eq!(cfg.get_int("pwquality_minlen", 14).unwrap(), 16);
        assert_eq!(cfg.get_str("umask", "027").unwrap(), "077");
        assert_eq!(cfg.get_str_list("allow_ports", &[]).unwrap().len(), 2);

        let settings = cfg.get_settings("settings").unwrap();
        assert_eq!(settings.get("MaxAuthTries").map(String::as_str), Some("3"));
        assert_eq!(settings.get("PermitRootLogin").map(String::as_str), Some("no"));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let cfg = config("enforce = \"yes\"\nallow_ports = [22]");

        assert_matches!(
            cfg.get_bool("enforce", true),
            Err(ModuleError::InvalidConfig { ref key, expected: "boolean", .. }) if key == "enforce"
        );
        assert_matches!(
            cfg.get_str_list("allow_ports", &[]),
            Err(ModuleError::InvalidConfig { expected: "array of strings", .. })
        );
    }
}
