//! Action nodes, their handlers, and per-tick dispatch.
//!
//! # Key Concepts
//!
//! - **Handlers**: shared behavior for one action kind, resolved by name
//! - **Nodes**: per-state runtime instances tracking an enter/update/exit
//!   lifecycle, stored in a recycling arena
//! - **Dispatch**: decides each tick which nodes enter, update, and exit from
//!   their frame window and the current reference frame

mod context;
pub(crate) mod dispatch;
mod handler;
mod node;

pub use context::{ActionContext, FrameInfo};
pub use handler::{ActionHandler, HandlerRegistry, HandlerResolver, SharedHandler};
pub use node::{ActionNode, NodeArena, NodeId};
