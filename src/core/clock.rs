//! Frame clock: global and state frame counters.
//!
//! The clock is pure bookkeeping. It never looks at configs directly; callers
//! pass the frame count and loop flag of the active state when they need the
//! effective in-state index.

/// Frame index used before the first tick.
pub const NOT_STARTED: i64 = -1;

/// Two frame counters, a state-begin marker, and a wait-frame countdown.
///
/// The global counter advances every tick. The state counter stops advancing
/// while wait frames are pending.
///
/// # Example
///
/// ```rust
/// use action_machine::core::FrameClock;
///
/// let mut clock = FrameClock::new();
/// clock.begin_state();
///
/// clock.advance_global();
/// assert!(clock.advance_state());
/// assert_eq!(clock.state_frame_index(3, false), 0);
///
/// clock.set_wait_frames(1);
/// clock.advance_global();
/// assert!(!clock.advance_state());
/// assert_eq!(clock.frame_index(), 0);
/// assert_eq!(clock.global_frame_index(), 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    global_frame_index: i64,
    frame_index: i64,
    state_begin_frame_index: i64,
    wait_frames: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock with every counter in the "not started" position.
    pub fn new() -> Self {
        Self {
            global_frame_index: NOT_STARTED,
            frame_index: NOT_STARTED,
            state_begin_frame_index: NOT_STARTED,
            wait_frames: 0,
        }
    }

    pub fn global_frame_index(&self) -> i64 {
        self.global_frame_index
    }

    pub fn frame_index(&self) -> i64 {
        self.frame_index
    }

    pub fn state_begin_frame_index(&self) -> i64 {
        self.state_begin_frame_index
    }

    pub fn wait_frames(&self) -> u32 {
        self.wait_frames
    }

    pub fn set_wait_frames(&mut self, frames: u32) {
        self.wait_frames = frames;
    }

    pub(crate) fn wait_frames_mut(&mut self) -> &mut u32 {
        &mut self.wait_frames
    }

    /// True until the first tick has advanced the global counter.
    pub fn is_started(&self) -> bool {
        self.global_frame_index >= 0
    }

    /// Mark the next state frame as the first frame of a new state.
    pub fn begin_state(&mut self) {
        self.state_begin_frame_index = self.frame_index + 1;
    }

    /// Advance the global counter. Never affected by wait frames.
    pub fn advance_global(&mut self) -> i64 {
        self.global_frame_index += 1;
        self.global_frame_index
    }

    /// Advance the state counter, or consume one wait frame instead.
    ///
    /// Returns `false` on a frozen tick.
    pub fn advance_state(&mut self) -> bool {
        if self.wait_frames > 0 {
            self.wait_frames -= 1;
            return false;
        }

        self.frame_index += 1;
        true
    }

    /// Raw number of state frames elapsed since the state began.
    pub fn interval(&self) -> i64 {
        self.frame_index - self.state_begin_frame_index
    }

    /// Effective frame-within-state index.
    ///
    /// Looping states wrap once the interval reaches `frame_count`;
    /// non-looping states return the raw interval, which callers must range
    /// check.
    pub fn state_frame_index(&self, frame_count: usize, enable_loop: bool) -> i64 {
        let interval = self.interval();
        let frame_count = frame_count as i64;
        if enable_loop && frame_count > 0 && interval >= frame_count {
            return interval % frame_count;
        }
        interval
    }

    /// Number of full passes completed over a looping state's frames.
    pub fn loop_count(&self, frame_count: usize, enable_loop: bool) -> u32 {
        if !enable_loop || frame_count == 0 {
            return 0;
        }

        let interval = self.interval();
        let frame_count = frame_count as i64;
        if interval < frame_count {
            return 0;
        }
        u32::try_from(interval / frame_count).unwrap_or(u32::MAX)
    }
}
