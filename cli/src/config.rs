//! TOML configuration for the action registry.
//!
//! Mirrors the teacher's `PolicyConfig { rules: Vec<PolicyRule> }`
//! deserialize-then-convert pattern: a plain serde struct that mirrors
//! the file shape, converted into the domain type the engine actually
//! uses.

use busguard_contracts::{ActionDescriptor, ActionRegistry};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },

    #[error("failed to parse {path} as TOML: {source}")]
    Toml { path: String, #[source] source: toml::de::Error },

    #[error("policy in {path} failed to parse")]
    InvalidPolicy { path: String },
}

#[derive(Debug, Deserialize)]
pub struct ActionEntry {
    pub name: String,
    pub id: u32,
    #[serde(default)]
    pub takes_argument: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
}

impl RegistryConfig {
    pub fn into_registry(self) -> ActionRegistry {
        let actions = self
            .actions
            .into_iter()
            .map(|e| ActionDescriptor::new(e.name, e.id, e.takes_argument))
            .collect();
        ActionRegistry::new(actions)
    }
}

/// Load an action registry from a TOML file at `path`.
pub fn load_registry(path: &str) -> Result<ActionRegistry, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| CliError::Read { path: path.to_string(), source })?;
    let config: RegistryConfig = toml::from_str(&text)
        .map_err(|source| CliError::Toml { path: path.to_string(), source })?;
    Ok(config.into_registry())
}

/// Load raw policy DSL text from a plain-text file at `path`.
pub fn load_policy_text(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_config_converts_entries_in_order() {
        let config = RegistryConfig {
            actions: vec![
                ActionEntry { name: "send".to_string(), id: 1, takes_argument: true },
                ActionEntry { name: "ping".to_string(), id: 2, takes_argument: false },
            ],
        };
        let registry = config.into_registry();
        assert_eq!(registry.lookup("send").unwrap().id, 1);
        assert!(registry.lookup("send").unwrap().takes_argument);
        assert!(!registry.lookup("ping").unwrap().takes_argument);
    }

    #[test]
    fn empty_config_yields_empty_registry() {
        let config = RegistryConfig { actions: vec![] };
        let registry = config.into_registry();
        assert!(registry.iter().next().is_none());
    }
}
