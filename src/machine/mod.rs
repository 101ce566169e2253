//! The action machine and its errors.

mod engine;
mod error;

pub use engine::ActionMachine;
pub use error::MachineError;
