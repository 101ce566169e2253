//! Builder API for ergonomic config construction.
//!
//! This module provides fluent builders for states and machine definitions,
//! for code that assembles configs instead of loading them from JSON.

pub mod definition;
pub mod error;
pub mod state;

pub use definition::MachineDefinitionBuilder;
pub use error::BuildError;
pub use state::StateConfigBuilder;
