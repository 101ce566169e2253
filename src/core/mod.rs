//! Frame clock, transition arbitration, and the tagged data store.
//!
//! This module contains the bookkeeping pieces of the engine:
//! - Frame counters and in-state index arithmetic via `FrameClock`
//! - Priority-based transition requests via `TransitionArbiter`
//! - Cross-action shared values via `DataStore`
//!
//! None of these types call out to action handlers; the machine composes them.

mod arbiter;
mod clock;
mod data;

pub use arbiter::{TransitionArbiter, TransitionRequest};
pub use clock::{FrameClock, NOT_STARTED};
pub use data::{DataError, DataStore, FromValue, Tag, Value};
