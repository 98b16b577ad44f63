//! Server lifecycle state machine.
//!
//! `Created → Listening → ShuttingDown → Closed`, forward only.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Created,
    Listening,
    ShuttingDown,
    Closed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Listening => "listening",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Holds the current state and publishes transitions.
#[derive(Debug, Clone)]
pub struct StateTracker {
    tx: Arc<watch::Sender<LifecycleState>>,
}

impl StateTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(LifecycleState::Created);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.tx.subscribe()
    }

    /// Move to `next` if it lies ahead of the current state.
    ///
    /// Returns `false` and leaves the state alone otherwise.
    pub fn advance(&self, next: LifecycleState) -> bool {
        let mut from = None;
        let changed = self.tx.send_if_modified(|state| {
            if next > *state {
                from = Some(*state);
                *state = next;
                true
            } else {
                false
            }
        });
        if let Some(from) = from {
            tracing::debug!(%from, to = %next, "Lifecycle transition");
        }
        changed
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
