//! Sequenced queue entry

use std::sync::Arc;

/// A value paired with the sequence number the queue assigned to it.
///
/// The payload is `Arc`-wrapped so the store and the consumer share one
/// allocation; redelivering an entry never copies the value.
#[derive(Debug)]
pub struct Entry<T> {
    seq: u64,
    value: Arc<T>,
}

impl<T> Entry<T> {
    pub(crate) fn new(seq: u64, value: T) -> Self {
        Self {
            seq,
            value: Arc::new(value),
        }
    }

    /// Sequence number to pass back when acknowledging this entry
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Shared handle to the payload
    pub fn shared_value(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }

    /// Take the payload back out, cloning only if the queue still holds it
    pub fn into_value(self) -> T
    where
        T: Clone,
    {
        Arc::try_unwrap(self.value).unwrap_or_else(|shared| (*shared).clone())
    }
}

// Manual impl: cloning an entry clones the Arc, so T itself need not be Clone
impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: PartialEq> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq && self.value == other.value
    }
}

impl<T: Eq> Eq for Entry<T> {}
