//! Entry store with window-based acknowledgment
//!
//! Holds the contiguous run of entries that have not been acknowledged yet,
//! together with the two sequence counters that define what may be
//! acknowledged:
//!
//! - `next_seq` is the number the next appended value receives
//! - `delivered_boundary` is the exclusive end of the window
//!   `[front.seq, delivered_boundary)` of entries handed out at least once
//!
//! Acknowledgments outside that window are absorbed silently. This is what
//! lets a consumer retry, repeat or replay stale acknowledgments without the
//! store ever losing or skipping an entry.

use crate::queue::entry::Entry;
use crate::queue::sequence::{cyclic_distance, in_window};
use crate::queue::types::{QueueState, QueueStats};
use std::collections::VecDeque;

/// Result of handing out the front entry
#[derive(Debug, Clone)]
pub struct Delivery<T> {
    pub entry: Entry<T>,
    /// The entry had already been delivered and was not acknowledged since
    pub redelivered: bool,
}

/// Running totals kept alongside the entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounters {
    pub pushed: u64,
    pub acknowledged: u64,
    pub deliveries: u64,
    pub redeliveries: u64,
}

/// Ordered, gap-free run of unacknowledged entries
#[derive(Debug)]
pub struct EntryStore<T> {
    next_seq: u64,
    delivered_boundary: u64,
    entries: VecDeque<Entry<T>>,
    counters: StoreCounters,
}

impl<T> Default for EntryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntryStore<T> {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Empty store whose first appended value receives `seq`
    pub fn starting_at(seq: u64) -> Self {
        Self {
            next_seq: seq,
            delivered_boundary: seq,
            entries: VecDeque::new(),
            counters: StoreCounters::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn delivered_boundary(&self) -> u64 {
        self.delivered_boundary
    }

    pub fn counters(&self) -> StoreCounters {
        self.counters
    }

    /// Snapshot of the store as seen by a queue in `state`
    pub fn stats(&self, state: QueueState) -> QueueStats {
        QueueStats {
            state,
            buffered: self.entries.len(),
            next_seq: self.next_seq,
            delivered_boundary: self.delivered_boundary,
            pushed: self.counters.pushed,
            acknowledged: self.counters.acknowledged,
            deliveries: self.counters.deliveries,
            redeliveries: self.counters.redeliveries,
        }
    }

    pub fn front(&self) -> Option<&Entry<T>> {
        self.entries.front()
    }

    /// Append a value under the next sequence number and return that number
    pub fn append(&mut self, value: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.push_back(Entry::new(seq, value));
        self.counters.pushed += 1;
        seq
    }

    /// Trim every entry up to and including `seq` if `seq` is inside the
    /// delivered window; returns how many entries were removed.
    ///
    /// Stale, duplicate and not-yet-delivered sequence numbers are no-ops.
    pub fn acknowledge(&mut self, seq: u64) -> usize {
        let front = match self.entries.front() {
            Some(entry) => entry.seq(),
            None => return 0,
        };

        if !in_window(front, self.delivered_boundary, seq) {
            return 0;
        }

        // Contiguity means the distance lands exactly on the entry numbered `seq`
        let count = usize::try_from(cyclic_distance(front, seq).saturating_add(1))
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        self.entries.drain(..count);
        self.counters.acknowledged += count as u64;
        count
    }

    /// Hand out the front entry and extend the delivered window to cover it
    pub fn deliver_front(&mut self) -> Option<Delivery<T>> {
        let entry = self.entries.front()?.clone();
        let redelivered = in_window(entry.seq(), self.delivered_boundary, entry.seq());

        self.delivered_boundary = entry.seq().wrapping_add(1);
        self.counters.deliveries += 1;
        if redelivered {
            self.counters.redeliveries += 1;
        }

        Some(Delivery { entry, redelivered })
    }

    /// Front entry without touching the delivered window
    pub fn peek_front(&self) -> Option<Entry<T>> {
        self.entries.front().cloned()
    }

    /// Sequence numbers currently held, front first
    pub fn sequences(&self) -> Vec<u64> {
        self.entries.iter().map(Entry::seq).collect()
    }

    /// Build a store in an arbitrary consistent state
    #[cfg(test)]
    pub(crate) fn from_parts(next_seq: u64, delivered_boundary: u64, values: Vec<(u64, T)>) -> Self {
        Self {
            next_seq,
            delivered_boundary,
            entries: values
                .into_iter()
                .map(|(seq, value)| Entry::new(seq, value))
                .collect(),
            counters: StoreCounters::default(),
        }
    }
}
