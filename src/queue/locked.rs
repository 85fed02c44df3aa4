//! Mutex-guarded queue without a coordinator task
//!
//! Same store, same state machine, same acknowledgment rules as
//! [`SequencedQueue`](crate::queue::SequencedQueue), but every operation is
//! a short critical section and nothing ever waits. An empty, still-open
//! queue answers [`Pulled::Empty`] and the consumer polls again later.
//! Useful where no async runtime is available.

use crate::core::sync::handle_mutex_poison;
use crate::queue::config::QueueConfig;
use crate::queue::entry::Entry;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::store::EntryStore;
use crate::queue::types::{QueueState, QueueStats};
use log::{debug, trace};
use std::sync::{Mutex, MutexGuard};

/// Outcome of a non-blocking fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pulled<T> {
    /// Front entry, possibly a redelivery
    Entry(Entry<T>),
    /// Nothing buffered yet; try again later
    Empty,
    /// Disposed and drained; no entry will ever arrive
    Closed,
}

impl<T> Pulled<T> {
    pub fn into_entry(self) -> Option<Entry<T>> {
        match self {
            Pulled::Entry(entry) => Some(entry),
            Pulled::Empty | Pulled::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Pulled::Closed)
    }
}

#[derive(Debug)]
struct Inner<T> {
    store: EntryStore<T>,
    state: QueueState,
}

impl<T> Inner<T> {
    fn settle_drain(&mut self) {
        if self.state == QueueState::Draining && self.store.is_empty() {
            self.state = QueueState::Closed;
        }
    }

    fn deliver(&mut self) -> Pulled<T> {
        match self.store.deliver_front() {
            Some(delivery) => Pulled::Entry(delivery.entry),
            None if self.state.is_closed() => Pulled::Closed,
            None => Pulled::Empty,
        }
    }
}

/// Lock-based acknowledgment-gated queue
///
/// ```rust
/// use seqqueue::queue::api::{LockedQueue, Pulled};
///
/// let queue = LockedQueue::new();
/// assert_eq!(queue.peek().unwrap(), Pulled::Empty);
///
/// queue.push("line").unwrap();
/// let entry = queue.peek().unwrap().into_entry().unwrap();
/// queue.dispose().unwrap();
///
/// assert!(queue.pull(entry.seq()).unwrap().is_closed());
/// ```
#[derive(Debug)]
pub struct LockedQueue<T> {
    name: String,
    inner: Mutex<Inner<T>>,
}

impl<T> Default for LockedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LockedQueue<T> {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            name: config.name,
            inner: Mutex::new(Inner {
                store: EntryStore::starting_at(config.initial_sequence),
                state: QueueState::Open,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, Inner<T>>> {
        handle_mutex_poison(self.inner.lock(), |message| QueueError::Internal {
            message,
        })
    }

    /// Append a value; returns its sequence number
    pub fn push(&self, value: T) -> QueueResult<u64> {
        let mut inner = self.lock()?;
        if !inner.state.accepts_push() {
            debug!("[{}] Rejected push while {}", self.name, inner.state);
            return Err(QueueError::Disposed);
        }
        let seq = inner.store.append(value);
        trace!("[{}] Pushed seq {}", self.name, seq);
        Ok(seq)
    }

    /// Acknowledge `ack`, then hand out the front entry
    pub fn pull(&self, ack: u64) -> QueueResult<Pulled<T>> {
        let mut inner = self.lock()?;
        let trimmed = inner.store.acknowledge(ack);
        trace!("[{}] Ack {} trimmed {} entries", self.name, ack, trimmed);
        inner.settle_drain();
        Ok(inner.deliver())
    }

    /// Hand out the front entry without acknowledging anything
    pub fn peek(&self) -> QueueResult<Pulled<T>> {
        let mut inner = self.lock()?;
        Ok(inner.deliver())
    }

    /// Stop accepting pushes; idempotent
    pub fn dispose(&self) -> QueueResult<()> {
        let mut inner = self.lock()?;
        if inner.state == QueueState::Open {
            debug!(
                "[{}] Dispose requested with {} entries buffered",
                self.name,
                inner.store.len()
            );
            inner.state = QueueState::Draining;
            inner.settle_drain();
        }
        Ok(())
    }

    pub fn state(&self) -> QueueResult<QueueState> {
        Ok(self.lock()?.state)
    }

    pub fn stats(&self) -> QueueResult<QueueStats> {
        let inner = self.lock()?;
        Ok(inner.store.stats(inner.state))
    }
}
