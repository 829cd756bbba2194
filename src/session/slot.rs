//! Latest-result slot with generation tickets

use parking_lot::Mutex;
use std::sync::Arc;

/// Handed out when a training run starts; identifies the run's generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct SlotState<T> {
    issued: u64,
    stored: u64,
    value: Option<Arc<T>>,
}

/// Holds the newest completed result of one kind of training run.
///
/// A result is accepted only if no newer run has already stored its own, so
/// a slow older run can never overwrite a newer result.
pub struct ResultSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                issued: 0,
                stored: 0,
                value: None,
            }),
        }
    }

    /// Start a run. Any run started earlier is superseded.
    pub fn begin(&self) -> Ticket {
        let mut state = self.state.lock();
        state.issued += 1;
        Ticket {
            generation: state.issued,
        }
    }

    /// Offer a finished result. Returns `false` when a newer result is already stored.
    pub fn complete(&self, ticket: Ticket, value: impl Into<Arc<T>>) -> bool {
        let mut state = self.state.lock();
        if ticket.generation < state.stored {
            return false;
        }
        state.stored = ticket.generation;
        state.value = Some(value.into());
        true
    }

    /// Newest accepted result
    pub fn latest(&self) -> Option<Arc<T>> {
        self.state.lock().value.clone()
    }

    /// Generation of the newest accepted result (0 = none)
    pub fn stored_generation(&self) -> u64 {
        self.state.lock().stored
    }
}
