//! Static configuration types.
//!
//! Configs are read-only once built and are shared across machine instances
//! behind `Arc`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Authored data of one frame. Opaque to the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    #[serde(default)]
    pub data: serde_json::Value,
}

impl FrameConfig {
    pub fn new(data: serde_json::Value) -> Self {
        Self { data }
    }
}

/// Begin/end window of a hold-frame action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldFrames {
    /// Frame on which the action enters
    pub begin: u32,
    /// Frame on which the action exits
    pub end: u32,
    /// Whether the action replays on every pass of a looping state
    #[serde(default)]
    pub enable_loop: bool,
}

impl HoldFrames {
    pub fn new(begin: u32, end: u32) -> Self {
        Self {
            begin,
            end,
            enable_loop: false,
        }
    }
}

/// When an action is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FrameWindow {
    /// Active from its first update until the node is disposed
    #[default]
    Continuous,
    /// Active between two frames
    Hold(HoldFrames),
}

/// Static description of one action.
///
/// `kind` selects the handler; `params` is handed to it untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    pub kind: String,
    #[serde(default)]
    pub window: FrameWindow,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ActionConfig {
    /// An action active for the whole lifetime of its node.
    pub fn continuous(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            window: FrameWindow::Continuous,
            params: serde_json::Value::Null,
        }
    }

    /// An action active from `begin` to `end`, played once per state entry.
    pub fn hold(kind: impl Into<String>, begin: u32, end: u32) -> Self {
        Self {
            kind: kind.into(),
            window: FrameWindow::Hold(HoldFrames::new(begin, end)),
            params: serde_json::Value::Null,
        }
    }

    /// Replay a hold window on every pass of a looping state.
    ///
    /// Has no effect on continuous actions.
    pub fn looping(mut self, enable_loop: bool) -> Self {
        if let FrameWindow::Hold(hold) = &mut self.window {
            hold.enable_loop = enable_loop;
        }
        self
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    pub fn hold_frames(&self) -> Option<&HoldFrames> {
        match &self.window {
            FrameWindow::Hold(hold) => Some(hold),
            FrameWindow::Continuous => None,
        }
    }
}

/// One state of a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    pub name: String,
    pub frames: Vec<FrameConfig>,
    #[serde(default)]
    pub enable_loop: bool,
    #[serde(default)]
    pub actions: Vec<Arc<ActionConfig>>,
    /// State requested when a non-looping state runs out of frames
    #[serde(default)]
    pub next_state: Option<String>,
}

impl StateConfig {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame at `index`, if it is in range.
    pub fn frame(&self, index: i64) -> Option<&FrameConfig> {
        usize::try_from(index).ok().and_then(|i| self.frames.get(i))
    }
}

/// Machine-wide settings shared by all states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub first_state: String,
    #[serde(default)]
    pub global_actions: Vec<Arc<ActionConfig>>,
}

/// A machine config together with all of its states.
///
/// This is the unit loaded into an in-memory provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    pub machine: MachineConfig,
    pub states: Vec<StateConfig>,
}

impl MachineDefinition {
    pub fn state(&self, name: &str) -> Option<&StateConfig> {
        self.states.iter().find(|s| s.name == name)
    }
}
