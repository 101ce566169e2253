//! Config providers.

use crate::config::error::ConfigError;
use crate::config::types::{MachineConfig, MachineDefinition, StateConfig};
use crate::config::validation::{validate_definition, violations};
use std::collections::HashMap;
use std::sync::Arc;

/// Source of machine and state configs.
///
/// Returned configs are immutable and may be cached for the lifetime of the
/// config id.
pub trait ConfigProvider: Send + Sync {
    fn machine_config(&self, config_id: &str) -> Result<Arc<MachineConfig>, ConfigError>;

    fn state_config(&self, config_id: &str, state: &str) -> Result<Arc<StateConfig>, ConfigError>;
}

struct Entry {
    machine: Arc<MachineConfig>,
    states: HashMap<String, Arc<StateConfig>>,
}

/// Provider backed by definitions held in memory.
///
/// # Example
///
/// ```rust
/// use action_machine::config::{ConfigProvider, InMemoryConfigProvider};
///
/// let mut provider = InMemoryConfigProvider::new();
/// provider
///     .load_json(
///         "hero",
///         r#"{
///             "machine": { "first_state": "Idle" },
///             "states": [
///                 { "name": "Idle", "frames": [{}, {}], "enable_loop": true }
///             ]
///         }"#,
///     )
///     .unwrap();
///
/// let idle = provider.state_config("hero", "Idle").unwrap();
/// assert_eq!(idle.frame_count(), 2);
/// assert!(provider.state_config("hero", "Run").is_err());
/// ```
#[derive(Default)]
pub struct InMemoryConfigProvider {
    entries: HashMap<String, Entry>,
}

impl InMemoryConfigProvider {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a definition without validating it.
    ///
    /// Replaces any definition already registered under `config_id`.
    pub fn insert(&mut self, config_id: impl Into<String>, definition: MachineDefinition) {
        let states = definition
            .states
            .into_iter()
            .map(|state| (state.name.clone(), Arc::new(state)))
            .collect();

        self.entries.insert(
            config_id.into(),
            Entry {
                machine: Arc::new(definition.machine),
                states,
            },
        );
    }

    /// Validate a definition and register it.
    pub fn insert_validated(
        &mut self,
        config_id: impl Into<String>,
        definition: MachineDefinition,
    ) -> Result<(), ConfigError> {
        if let Some(found) = violations(validate_definition(&definition)) {
            return Err(ConfigError::Invalid(found));
        }
        self.insert(config_id, definition);
        Ok(())
    }

    /// Parse a JSON definition, validate it, and register it.
    pub fn load_json(&mut self, config_id: impl Into<String>, json: &str) -> Result<(), ConfigError> {
        let definition: MachineDefinition =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        self.insert_validated(config_id, definition)
    }

    pub fn contains(&self, config_id: &str) -> bool {
        self.entries.contains_key(config_id)
    }

    fn entry(&self, config_id: &str) -> Result<&Entry, ConfigError> {
        self.entries
            .get(config_id)
            .ok_or_else(|| ConfigError::MachineNotFound {
                config_id: config_id.to_string(),
            })
    }
}

impl ConfigProvider for InMemoryConfigProvider {
    fn machine_config(&self, config_id: &str) -> Result<Arc<MachineConfig>, ConfigError> {
        Ok(Arc::clone(&self.entry(config_id)?.machine))
    }

    fn state_config(&self, config_id: &str, state: &str) -> Result<Arc<StateConfig>, ConfigError> {
        self.entry(config_id)?
            .states
            .get(state)
            .map(Arc::clone)
            .ok_or_else(|| ConfigError::StateNotFound {
                config_id: config_id.to_string(),
                state: state.to_string(),
            })
    }
}
