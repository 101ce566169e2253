//! Static configuration: types, providers, and validation.
//!
//! # Key Concepts
//!
//! - **Definitions**: a `MachineConfig` plus its `StateConfig`s, serializable
//!   with serde so they can be authored as JSON
//! - **Providers**: the `ConfigProvider` trait the machine reads configs
//!   through, with an in-memory implementation
//! - **Validation**: accumulates every authoring violation instead of
//!   stopping at the first one

mod error;
mod provider;
mod types;
mod validation;

pub use error::{ConfigError, ConfigViolation};
pub use provider::{ConfigProvider, InMemoryConfigProvider};
pub use types::{
    ActionConfig, FrameConfig, FrameWindow, HoldFrames, MachineConfig, MachineDefinition,
    StateConfig,
};
pub use validation::{validate_definition, validate_state, violations, ConfigValidation};
