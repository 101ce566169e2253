//! Priority arbitration of state transition requests.
//!
//! Requests made during a tick are only recorded here. The machine swaps the
//! winning request out at the start of the next tick, so node lists are never
//! mutated while they are being iterated.

use serde::{Deserialize, Serialize};

/// A concrete request to move to another state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Target state name
    pub target: String,
    /// Higher values win
    pub priority: i32,
}

/// Holds at most one pending transition request.
///
/// Arbitration rules:
/// - an empty pending slot accepts any concrete request
/// - a concrete request replaces a pending one when its priority is greater
///   than or equal to the pending priority
/// - an empty target never replaces a concrete pending request
///
/// # Example
///
/// ```rust
/// use action_machine::core::TransitionArbiter;
///
/// let mut arbiter = TransitionArbiter::new();
/// assert!(arbiter.request(Some("Attack"), 5));
/// assert!(!arbiter.request(Some("Walk"), 1));
/// assert!(arbiter.request(Some("Hurt"), 5));
/// assert!(!arbiter.request(None, 100));
///
/// let applied = arbiter.take().unwrap();
/// assert_eq!(applied.target, "Hurt");
/// assert!(!arbiter.has_pending());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionArbiter {
    pending: Option<TransitionRequest>,
}

impl TransitionArbiter {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Record a request. Returns `true` if it is now the pending request.
    pub fn request(&mut self, target: Option<&str>, priority: i32) -> bool {
        let Some(target) = target.filter(|t| !t.is_empty()) else {
            if let Some(pending) = &self.pending {
                tracing::trace!(
                    pending = %pending.target,
                    "empty transition request ignored"
                );
            }
            return false;
        };

        if let Some(pending) = &self.pending {
            if priority < pending.priority {
                tracing::trace!(
                    target,
                    priority,
                    pending = %pending.target,
                    pending_priority = pending.priority,
                    "transition request dropped"
                );
                return false;
            }
        }

        self.pending = Some(TransitionRequest {
            target: target.to_string(),
            priority,
        });
        true
    }

    pub fn pending(&self) -> Option<&TransitionRequest> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Remove and return the pending request.
    pub fn take(&mut self) -> Option<TransitionRequest> {
        self.pending.take()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
