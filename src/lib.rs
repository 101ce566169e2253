//! Action Machine: a deterministic, tick-driven frame sequencer
//!
//! An action machine drives time-based behavior (animation, skills, combat
//! sequences) for one owning entity. Each state is an ordered list of frames;
//! actions are bound to frame windows inside a state, or to the machine as a
//! whole, and receive enter/update/exit callbacks as the frame clock moves.
//!
//! # Core Concepts
//!
//! - **Frame clock**: a global counter that always advances and a state
//!   counter that wait frames can freeze
//! - **Transitions**: requested with a priority during a tick, applied at the
//!   start of the next one
//! - **Actions**: continuous, or held between a begin and an end frame
//! - **Data store**: tagged values shared between the actions of one machine
//!
//! # Example
//!
//! ```rust
//! use action_machine::action::{ActionContext, ActionHandler, ActionNode, HandlerRegistry};
//! use action_machine::builder::{MachineDefinitionBuilder, StateConfigBuilder};
//! use action_machine::config::{ActionConfig, InMemoryConfigProvider};
//! use action_machine::machine::ActionMachine;
//! use std::sync::Arc;
//!
//! const HITS: i32 = 1;
//!
//! struct Hitbox;
//!
//! impl ActionHandler<(), ()> for Hitbox {
//!     fn enter(&self, _node: &mut ActionNode<(), ()>, cx: &mut ActionContext<'_, (), ()>) {
//!         let hits = cx.data().get_or_default::<i64>(HITS);
//!         cx.data_mut().set(HITS, hits + 1);
//!     }
//! }
//!
//! let definition = MachineDefinitionBuilder::new()
//!     .first_state("Idle")
//!     .state(
//!         StateConfigBuilder::new("Idle")
//!             .frames(3)
//!             .looping(true)
//!             .action(ActionConfig::hold("hitbox", 0, 2).looping(true)),
//!     )
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let mut provider = InMemoryConfigProvider::new();
//! provider.insert_validated("hero", definition).unwrap();
//! let registry = HandlerRegistry::<(), ()>::new().register("hitbox", Hitbox);
//!
//! let mut machine: ActionMachine<(), ()> =
//!     ActionMachine::new(Arc::new(provider), Arc::new(registry));
//! machine.initialize("hero", (), ()).unwrap();
//!
//! for _ in 0..7 {
//!     machine.tick(1.0 / 60.0).unwrap();
//! }
//!
//! assert_eq!(machine.state_frame_index(), Some(0));
//! assert_eq!(machine.loop_count(), 2);
//! assert_eq!(machine.data().get_as::<i64>(HITS), Some(3));
//! ```

pub mod action;
pub mod builder;
pub mod config;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use action::{ActionContext, ActionHandler, ActionNode, HandlerRegistry};
pub use config::{ActionConfig, ConfigProvider, InMemoryConfigProvider, MachineDefinition};
pub use crate::core::{DataStore, Value};
pub use machine::{ActionMachine, MachineError};
