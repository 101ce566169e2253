//! Builder for constructing machine definitions.

use crate::builder::error::BuildError;
use crate::builder::state::StateConfigBuilder;
use crate::config::{ActionConfig, MachineConfig, MachineDefinition, StateConfig};
use std::sync::Arc;

/// Builder for a machine definition with a fluent API.
pub struct MachineDefinitionBuilder {
    first_state: Option<String>,
    global_actions: Vec<Arc<ActionConfig>>,
    states: Vec<StateConfig>,
}

impl MachineDefinitionBuilder {
    pub fn new() -> Self {
        Self {
            first_state: None,
            global_actions: Vec::new(),
            states: Vec::new(),
        }
    }

    /// Set the state entered on initialize (required).
    pub fn first_state(mut self, name: impl Into<String>) -> Self {
        self.first_state = Some(name.into());
        self
    }

    /// Add an action that runs across all states.
    pub fn global_action(mut self, action: ActionConfig) -> Self {
        self.global_actions.push(Arc::new(action));
        self
    }

    /// Build `builder` and append the resulting state.
    ///
    /// Fails with the state builder's error, such as a state without frames.
    pub fn state(mut self, builder: StateConfigBuilder) -> Result<Self, BuildError> {
        let state = builder.build()?;
        self.states.push(state);
        Ok(self)
    }

    /// Append a state config that was built or deserialized elsewhere.
    pub fn add_state(mut self, state: StateConfig) -> Self {
        self.states.push(state);
        self
    }

    /// Build the definition.
    ///
    /// Only required fields are checked here; cross-state references are
    /// checked by [`validate_definition`](crate::config::validate_definition).
    pub fn build(self) -> Result<MachineDefinition, BuildError> {
        let first_state = self
            .first_state
            .filter(|name| !name.is_empty())
            .ok_or(BuildError::MissingFirstState)?;

        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        Ok(MachineDefinition {
            machine: MachineConfig {
                first_state,
                global_actions: self.global_actions,
            },
            states: self.states,
        })
    }
}

impl Default for MachineDefinitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
