//! Action nodes and the arena that recycles their slots.

use crate::action::context::ActionContext;
use crate::action::handler::SharedHandler;
use crate::config::{ActionConfig, HoldFrames};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Runtime binding of one action config to its handler.
///
/// A node is dormant until entered, active until exited. Every node that is
/// entered receives exactly one matching exit, either at the end of its
/// window or when it is disposed.
pub struct ActionNode<C, I> {
    config: Arc<ActionConfig>,
    handler: SharedHandler<C, I>,
    created_frame: i64,
    is_updating: bool,
    update_count: u64,
    scratch: Option<Box<dyn Any>>,
}

impl<C, I> ActionNode<C, I> {
    pub(crate) fn new(
        config: Arc<ActionConfig>,
        handler: SharedHandler<C, I>,
        created_frame: i64,
    ) -> Self {
        Self {
            config,
            handler,
            created_frame,
            is_updating: false,
            update_count: 0,
            scratch: None,
        }
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    pub fn kind(&self) -> &str {
        &self.config.kind
    }

    pub fn hold_frames(&self) -> Option<&HoldFrames> {
        self.config.hold_frames()
    }

    /// State frame at which the node was created.
    ///
    /// State nodes are created one tick before their first active frame.
    pub fn created_frame(&self) -> i64 {
        self.created_frame
    }

    /// Whether the node is inside its active window.
    pub fn is_updating(&self) -> bool {
        self.is_updating
    }

    /// Updates received since the last enter.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Store handler-owned runtime state on this node.
    ///
    /// Scratch state lives for one activation: every enter starts empty.
    pub fn set_scratch<T: Any>(&mut self, value: T) {
        self.scratch = Some(Box::new(value));
    }

    pub fn scratch<T: Any>(&self) -> Option<&T> {
        self.scratch.as_ref().and_then(|s| s.downcast_ref())
    }

    pub fn scratch_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.scratch.as_mut().and_then(|s| s.downcast_mut())
    }

    pub fn clear_scratch(&mut self) {
        self.scratch = None;
    }

    pub(crate) fn invoke_enter(&mut self, cx: &mut ActionContext<'_, C, I>) {
        if self.is_updating {
            return;
        }
        self.is_updating = true;
        self.update_count = 0;
        self.scratch = None;
        tracing::trace!(kind = %self.config.kind, "action enter");

        let handler = Arc::clone(&self.handler);
        handler.enter(self, cx);
    }

    /// No-op while dormant.
    pub(crate) fn invoke_update(&mut self, cx: &mut ActionContext<'_, C, I>, delta_time: f32) {
        if !self.is_updating {
            return;
        }

        let handler = Arc::clone(&self.handler);
        handler.update(self, cx, delta_time);
        self.update_count += 1;
    }

    pub(crate) fn invoke_exit(&mut self, cx: &mut ActionContext<'_, C, I>) {
        if !self.is_updating {
            return;
        }
        self.is_updating = false;
        tracing::trace!(kind = %self.config.kind, updates = self.update_count, "action exit");

        let handler = Arc::clone(&self.handler);
        handler.exit(self, cx);
    }
}

impl<C, I> fmt::Debug for ActionNode<C, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionNode")
            .field("kind", &self.config.kind)
            .field("created_frame", &self.created_frame)
            .field("is_updating", &self.is_updating)
            .field("update_count", &self.update_count)
            .finish_non_exhaustive()
    }
}

/// Handle to a node slot. Stale handles never alias a recycled slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

struct Slot<C, I> {
    generation: u32,
    node: Option<ActionNode<C, I>>,
}

/// Slot arena with a free list.
///
/// Released slots are reused by later `create` calls, so a machine that
/// keeps changing state settles at a fixed number of slots.
pub struct NodeArena<C, I> {
    slots: Vec<Slot<C, I>>,
    free: Vec<u32>,
}

impl<C, I> Default for NodeArena<C, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, I> NodeArena<C, I> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn create(&mut self, node: ActionNode<C, I>) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&ActionNode<C, I>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ActionNode<C, I>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Release a slot and return its node. The handle becomes stale.
    pub fn recycle(&mut self, id: NodeId) -> Option<ActionNode<C, I>> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    /// Live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
