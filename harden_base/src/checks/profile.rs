//! Profiles: named, ordered module lists fixed at configuration time

use super::errors::RegistryError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    description: String,
    modules: Vec<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, description: impl Into<String>, modules: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            modules: modules.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// This profile's modules followed by `extra`
    pub fn extend(&self, name: impl Into<String>, description: impl Into<String>, extra: &[&str]) -> Self {
        let mut modules = self.modules.clone();
        modules.extend(extra.iter().map(|m| m.to_string()));
        Self {
            name: name.into(),
            description: description.into(),
            modules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Every profile known to the CLI
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, profile: Profile) -> Result<(), RegistryError> {
        if self.profiles.contains_key(profile.name()) {
            return Err(RegistryError::DuplicateProfile {
                name: profile.name().to_string(),
            });
        }
        self.profiles.insert(profile.name().to_string(), profile);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Profile, RegistryError> {
        self.profiles
            .get(name)
            .ok_or_else(|| RegistryError::UnknownProfile(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }
}
