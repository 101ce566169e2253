//! Action handlers and their resolution by action kind.

use crate::action::context::ActionContext;
use crate::action::node::ActionNode;
use std::collections::HashMap;
use std::sync::Arc;

/// Behavior behind one kind of action.
///
/// Handlers are shared by every node of their kind, across machines, so any
/// per-node runtime state belongs in the node's scratch slot
/// ([`ActionNode::set_scratch`]).
///
/// # Example
///
/// ```rust
/// use action_machine::action::{ActionContext, ActionHandler, ActionNode};
///
/// struct Hitstop;
///
/// impl ActionHandler<(), ()> for Hitstop {
///     fn enter(&self, _node: &mut ActionNode<(), ()>, cx: &mut ActionContext<'_, (), ()>) {
///         cx.set_wait_frames(2);
///     }
/// }
/// ```
pub trait ActionHandler<C, I>: Send + Sync {
    /// Called once when the node becomes active.
    fn enter(&self, _node: &mut ActionNode<C, I>, _cx: &mut ActionContext<'_, C, I>) {}

    /// Called once per tick while the node is active.
    fn update(
        &self,
        _node: &mut ActionNode<C, I>,
        _cx: &mut ActionContext<'_, C, I>,
        _delta_time: f32,
    ) {
    }

    /// Called once when the node stops being active.
    fn exit(&self, _node: &mut ActionNode<C, I>, _cx: &mut ActionContext<'_, C, I>) {}
}

/// Shared handler reference stored on nodes.
pub type SharedHandler<C, I> = Arc<dyn ActionHandler<C, I>>;

/// Maps an action kind to its handler.
pub trait HandlerResolver<C, I>: Send + Sync {
    fn resolve(&self, kind: &str) -> Option<SharedHandler<C, I>>;
}

/// Handler table keyed by action kind.
pub struct HandlerRegistry<C, I> {
    handlers: HashMap<String, SharedHandler<C, I>>,
}

impl<C, I> HandlerRegistry<C, I> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler, replacing any previous handler of the same kind.
    pub fn register<H>(mut self, kind: impl Into<String>, handler: H) -> Self
    where
        H: ActionHandler<C, I> + 'static,
    {
        self.handlers.insert(kind.into(), Arc::new(handler));
        self
    }

    /// Register an already shared handler.
    pub fn register_shared(mut self, kind: impl Into<String>, handler: SharedHandler<C, I>) -> Self {
        self.handlers.insert(kind.into(), handler);
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<C, I> Default for HandlerRegistry<C, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, I> HandlerResolver<C, I> for HandlerRegistry<C, I> {
    fn resolve(&self, kind: &str) -> Option<SharedHandler<C, I>> {
        self.handlers.get(kind).map(Arc::clone)
    }
}
