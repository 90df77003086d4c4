//! Static registry of check modules
//!
//! Modules are registered once at startup and looked up by name when a
//! profile runs. Unknown names are explicit errors.

use super::errors::RegistryError;
use super::profile::Profile;
use super::traits::CheckModule;
use std::collections::HashMap;

/// Name to module map
pub struct ModuleRegistry {
    modules: HashMap<String, Box<dyn CheckModule>>,

    /// Names in registration order, for listing
    order: Vec<String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn register(&mut self, module: Box<dyn CheckModule>) -> Result<(), RegistryError> {
        let name = module.name().to_string();

        if self.modules.contains_key(&name) {
            return Err(RegistryError::DuplicateModule { name });
        }

        self.order.push(name.clone());
        self.modules.insert(name, module);

        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&dyn CheckModule, RegistryError> {
        self.modules
            .get(name)
            .map(|m| m.as_ref())
            .ok_or_else(|| RegistryError::UnknownModule(name.to_string()))
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered names in registration order
    pub fn list_modules(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Modules named by `profile` that are not registered
    pub fn missing_modules(&self, profile: &Profile) -> Vec<String> {
        profile
            .modules()
            .iter()
            .filter(|name| !self.has_module(name))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::ModuleError;
    use crate::config::ModuleConfig;
    use crate::execution::RunContext;
    use crate::results::OutcomeRecord;

    struct Named(&'static str);

    impl CheckModule for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn apply(&self, _: &ModuleConfig, _: &RunContext) -> Result<Vec<OutcomeRecord>, ModuleError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Named("kernel"))).unwrap();
        registry.register(Box::new(Named("crypto"))).unwrap();

        assert_eq!(registry.get("crypto").unwrap().name(), "crypto");
        assert_eq!(registry.list_modules(), vec!["kernel", "crypto"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_and_unknown() {
        let mut registry = ModuleRegistry::new();
        assert!(registry.is_empty());

        registry.register(Box::new(Named("ssh"))).unwrap();
        assert_eq!(
            registry.register(Box::new(Named("ssh"))),
            Err(RegistryError::DuplicateModule {
                name: "ssh".to_string()
            })
        );
        assert_eq!(
            registry.get("pam").err(),
            Some(RegistryError::UnknownModule("pam".to_string()))
        );
    }

    #[test]
    fn test_missing_modules_for_profile() {
        let mut registry = ModuleRegistry::new();
        registry.register(Box::new(Named("kernel"))).unwrap();
        let profile = Profile::new("p", "", &["kernel", "ghost"]);

        assert_eq!(registry.missing_modules(&profile), vec!["ghost".to_string()]);
    }
}
