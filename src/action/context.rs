//! Context handed to action handlers.

use crate::core::{DataStore, TransitionArbiter};

/// Frame counters as seen by a handler during one dispatch pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameInfo {
    pub global_frame_index: i64,
    pub frame_index: i64,
    pub state_begin_frame_index: i64,
    /// Frame the dispatcher compares hold windows against: the global frame
    /// for global actions, the in-state frame for state actions
    pub reference_frame: i64,
    pub loop_count: u32,
}

/// What a handler may touch while it runs.
///
/// Node lists are deliberately out of reach; a transition requested here is
/// only applied at the start of the next tick.
pub struct ActionContext<'a, C, I> {
    pub(crate) controller: &'a C,
    pub(crate) input: &'a I,
    pub(crate) state_name: &'a str,
    pub(crate) frame: FrameInfo,
    pub(crate) data: &'a mut DataStore,
    pub(crate) arbiter: &'a mut TransitionArbiter,
    pub(crate) wait_frames: &'a mut u32,
}

impl<'a, C, I> ActionContext<'a, C, I> {
    /// The owning context the machine was initialized with.
    pub fn controller(&self) -> &C {
        self.controller
    }

    pub fn input(&self) -> &I {
        self.input
    }

    pub fn state_name(&self) -> &str {
        self.state_name
    }

    pub fn frame(&self) -> FrameInfo {
        self.frame
    }

    pub fn data(&self) -> &DataStore {
        self.data
    }

    pub fn data_mut(&mut self) -> &mut DataStore {
        self.data
    }

    /// Ask for a state change on the next tick.
    ///
    /// Returns `false` if a higher-priority request is already pending.
    pub fn request_transition(&mut self, state: &str, priority: i32) -> bool {
        self.arbiter.request(Some(state), priority)
    }

    pub fn wait_frames(&self) -> u32 {
        *self.wait_frames
    }

    /// Freeze the state frame for the next `frames` state advances.
    pub fn set_wait_frames(&mut self, frames: u32) {
        *self.wait_frames = frames;
    }
}
