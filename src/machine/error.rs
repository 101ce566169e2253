//! Machine error types.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors raised by machine lifecycle calls and ticks.
///
/// Every error returned from [`tick`](crate::machine::ActionMachine::tick) is
/// fatal: the machine refuses further ticks with [`MachineError::Halted`].
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Machine is not initialized")]
    NotInitialized,

    #[error("Machine is already initialized with config '{config_id}'")]
    AlreadyInitialized { config_id: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No handler registered for action kind '{kind}'")]
    UnknownActionKind { kind: String },

    /// The target of a transition has no config.
    #[error("No state config found for state '{state}'")]
    MissingStateConfig { state: String },

    #[error("State '{state}' frame index {index} exceeds its {frame_count} frames")]
    FrameOutOfRange {
        state: String,
        index: i64,
        frame_count: usize,
    },

    #[error("Machine halted after a fatal error: {reason}")]
    Halted { reason: String },
}
