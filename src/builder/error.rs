//! Build errors for state config and machine definition builders.

use thiserror::Error;

/// Errors that can occur when building configs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("State name is empty. Pass a name to StateConfigBuilder::new")]
    MissingStateName,

    #[error("State '{state}' has no frames. Call .frames(n) or .frame(config)")]
    NoFrames { state: String },

    #[error("First state not specified. Call .first_state(name) before .build()")]
    MissingFirstState,

    #[error("No states defined. Add at least one state")]
    NoStates,
}
