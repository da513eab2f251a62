// src/orchestrator/mod.rs
//! Upload and match workflows.
//!
//! Each orchestrator keeps its lifecycle in a [`SequencedState`]: every call
//! takes the next sequence number and only the outcome carrying the latest
//! number is applied. A superseded network call still runs to completion, its
//! result is dropped.

pub mod matching;
pub mod upload;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use matching::{MatchOrchestrator, MatchState};
pub use upload::{ResumeState, UploadOrchestrator};

/// Sequence number of one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct SequencedState<S> {
    inner: Mutex<Slot<S>>,
}

#[derive(Debug)]
struct Slot<S> {
    latest: u64,
    state: S,
}

impl<S: Clone> SequencedState<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Mutex::new(Slot {
                latest: 0,
                state: initial,
            }),
        }
    }

    pub fn current(&self) -> S {
        self.lock().state.clone()
    }

    /// Start a new request: it supersedes whatever was in flight
    pub fn begin(&self, pending: impl FnOnce(&S) -> S) -> Ticket {
        let mut slot = self.lock();
        slot.latest += 1;
        slot.state = pending(&slot.state);
        Ticket(slot.latest)
    }

    /// Settle without any I/O, still superseding in-flight requests
    pub fn replace(&self, next: impl FnOnce(&S) -> S) -> S {
        let mut slot = self.lock();
        slot.latest += 1;
        slot.state = next(&slot.state);
        slot.state.clone()
    }

    /// Apply an outcome if its ticket is still the latest. Returns the applied
    /// state, `None` for a stale ticket.
    pub fn settle(&self, ticket: Ticket, next: impl FnOnce(&S) -> S) -> Option<S> {
        self.settle_with(ticket, next, |_| {})
    }

    /// [`settle`](Self::settle), running `commit` on the applied state before
    /// the slot is released. A newer request cannot settle in between.
    pub fn settle_with(
        &self,
        ticket: Ticket,
        next: impl FnOnce(&S) -> S,
        commit: impl FnOnce(&S),
    ) -> Option<S> {
        let mut slot = self.lock();
        if slot.latest != ticket.0 {
            return None;
        }
        slot.state = next(&slot.state);
        commit(&slot.state);
        Some(slot.state.clone())
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.lock().latest == ticket.0
    }

    fn lock(&self) -> MutexGuard<'_, Slot<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
