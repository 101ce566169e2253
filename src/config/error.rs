//! Configuration error types.

use thiserror::Error;

/// Authoring problem found while validating a machine definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("State '{state}' has no frames")]
    EmptyFrames { state: String },

    #[error("Action '{kind}' in state '{state}' begins on frame {begin} after it ends on frame {end}")]
    InvertedWindow {
        state: String,
        kind: String,
        begin: u32,
        end: u32,
    },

    #[error("Action '{kind}' in state '{state}' begins on frame {begin} but the state has {frame_count} frames")]
    WindowOutOfRange {
        state: String,
        kind: String,
        begin: u32,
        frame_count: usize,
    },

    #[error("First state '{state}' is not defined")]
    MissingFirstState { state: String },

    #[error("State '{state}' falls back to undefined state '{next}'")]
    UnknownNextState { state: String, next: String },

    #[error("State '{state}' is defined more than once")]
    DuplicateState { state: String },
}

/// Errors returned by config providers
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No machine config registered under '{config_id}'")]
    MachineNotFound { config_id: String },

    #[error("Machine config '{config_id}' has no state '{state}'")]
    StateNotFound { config_id: String, state: String },

    #[error("Failed to parse machine config: {0}")]
    Parse(String),

    #[error("Machine config failed validation with {} violation(s)", .0.len())]
    Invalid(Vec<ConfigViolation>),
}
