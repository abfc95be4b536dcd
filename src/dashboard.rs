//! Latest-wins snapshot holder.
//!
//! A range change starts a new fetch/compute cycle while an older one may
//! still be in flight. Each cycle takes a [`Ticket`]; only the most recently
//! issued ticket may publish its snapshot, and results from superseded
//! cycles are dropped.

use std::sync::{Mutex, MutexGuard};

use crate::models::AnalyticsSnapshot;
use crate::range::DateRange;

/// Handle for one fetch/compute cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub range: DateRange,
}

#[derive(Debug, Default)]
struct State {
    generation: u64,
    range: Option<DateRange>,
    snapshot: Option<AnalyticsSnapshot>,
}

/// Holds the current snapshot and arbitrates between overlapping cycles.
#[derive(Debug, Default)]
pub struct Dashboard {
    state: Mutex<State>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cycle for `range`, superseding every earlier ticket.
    pub fn begin(&self, range: DateRange) -> Ticket {
        let mut state = self.lock();
        state.generation += 1;
        Ticket {
            generation: state.generation,
            range,
        }
    }

    /// Whether `ticket` is still the latest issued.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.lock().generation == ticket.generation
    }

    /// Publish the result of a cycle.
    ///
    /// Returns `false` and discards `snapshot` if a newer cycle has begun
    /// since `ticket` was issued. The previous snapshot is replaced whole.
    pub fn complete(&self, ticket: Ticket, snapshot: AnalyticsSnapshot) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.generation {
            log::debug!(
                "Discarding {} snapshot from superseded cycle {} (current {})",
                ticket.range,
                ticket.generation,
                state.generation
            );
            return false;
        }
        state.range = Some(ticket.range);
        state.snapshot = Some(snapshot);
        true
    }

    /// The last published snapshot.
    pub fn snapshot(&self) -> Option<AnalyticsSnapshot> {
        self.lock().snapshot.clone()
    }

    /// Range of the last published snapshot.
    pub fn range(&self) -> Option<DateRange> {
        self.lock().range
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State is replaced whole on every write, so a poisoned guard is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
