//! Builder for constructing state configs.

use crate::builder::error::BuildError;
use crate::config::{ActionConfig, FrameConfig, StateConfig};
use std::sync::Arc;

/// Builder for a single state with a fluent API.
pub struct StateConfigBuilder {
    name: String,
    frames: Vec<FrameConfig>,
    enable_loop: bool,
    actions: Vec<Arc<ActionConfig>>,
    next_state: Option<String>,
}

impl StateConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
            enable_loop: false,
            actions: Vec::new(),
            next_state: None,
        }
    }

    /// Use `count` frames with empty payloads, replacing any frames added so far.
    pub fn frames(mut self, count: usize) -> Self {
        self.frames = vec![FrameConfig::default(); count];
        self
    }

    /// Append one frame.
    pub fn frame(mut self, frame: FrameConfig) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn looping(mut self, enable_loop: bool) -> Self {
        self.enable_loop = enable_loop;
        self
    }

    /// Append an action. Actions are dispatched in insertion order.
    pub fn action(mut self, action: ActionConfig) -> Self {
        self.actions.push(Arc::new(action));
        self
    }

    /// State requested when this state runs out of frames without looping.
    pub fn next_state(mut self, name: impl Into<String>) -> Self {
        self.next_state = Some(name.into());
        self
    }

    pub fn build(self) -> Result<StateConfig, BuildError> {
        if self.name.is_empty() {
            return Err(BuildError::MissingStateName);
        }
        if self.frames.is_empty() {
            return Err(BuildError::NoFrames { state: self.name });
        }

        Ok(StateConfig {
            name: self.name,
            frames: self.frames,
            enable_loop: self.enable_loop,
            actions: self.actions,
            next_state: self.next_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_validates_required_fields() {
        assert_eq!(
            StateConfigBuilder::new("").frames(1).build(),
            Err(BuildError::MissingStateName)
        );
        assert_eq!(
            StateConfigBuilder::new("Idle").build(),
            Err(BuildError::NoFrames {
                state: "Idle".to_string()
            })
        );
    }

    #[test]
    fn fluent_api_builds_state() {
        let state = StateConfigBuilder::new("Attack")
            .frame(FrameConfig::new(json!({ "pose": "wind_up" })))
            .frame(FrameConfig::default())
            .action(ActionConfig::hold("hitbox", 1, 1))
            .action(ActionConfig::continuous("anim"))
            .next_state("Idle")
            .build()
            .unwrap();

        assert_eq!(state.frame_count(), 2);
        assert!(!state.enable_loop);
        assert_eq!(state.actions.len(), 2);
        assert_eq!(state.actions[0].kind, "hitbox");
        assert_eq!(state.next_state.as_deref(), Some("Idle"));
    }

    #[test]
    fn frames_replaces_previous_frames() {
        let state = StateConfigBuilder::new("Idle")
            .frame(FrameConfig::default())
            .frames(3)
            .looping(true)
            .build()
            .unwrap();

        assert_eq!(state.frame_count(), 3);
        assert!(state.enable_loop);
    }
}
