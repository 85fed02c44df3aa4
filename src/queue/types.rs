//! Type definitions for the queue system
//!
//! Lifecycle state and the statistics snapshot both queue implementations
//! report.

use std::fmt;

/// Lifecycle of a queue
///
/// `Open -> Draining` on dispose, `Draining -> Closed` once the last entry is
/// acknowledged. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueState {
    /// Accepting pushes and delivering entries
    Open,
    /// Dispose requested; no new pushes, buffered entries still delivered
    Draining,
    /// Drained after dispose; no further delivery
    Closed,
}

impl QueueState {
    pub fn accepts_push(self) -> bool {
        matches!(self, QueueState::Open)
    }

    pub fn is_closed(self) -> bool {
        matches!(self, QueueState::Closed)
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueueState::Open => "open",
            QueueState::Draining => "draining",
            QueueState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Point-in-time statistics for a queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    /// Current lifecycle state
    pub state: QueueState,
    /// Entries held (delivered-but-unacknowledged plus pending)
    pub buffered: usize,
    /// Sequence number the next push receives
    pub next_seq: u64,
    /// Exclusive end of the delivered window
    pub delivered_boundary: u64,
    /// Total pushes accepted
    pub pushed: u64,
    /// Total entries trimmed by acknowledgments
    pub acknowledged: u64,
    /// Total entries handed to the consumer, redeliveries included
    pub deliveries: u64,
    /// Deliveries of an entry that had already been delivered
    pub redeliveries: u64,
}

impl fmt::Display for QueueStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state={} buffered={} pushed={} acknowledged={} deliveries={} redeliveries={} next_seq={}",
            self.state,
            self.buffered,
            self.pushed,
            self.acknowledged,
            self.deliveries,
            self.redeliveries,
            self.next_seq
        )
    }
}
