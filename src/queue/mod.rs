//! Acknowledgment-Gated Sequenced Queue
//!
//! A single-consumer delivery queue that hands out one entry at a time and
//! only moves past an entry once the consumer acknowledges it. Unacknowledged
//! entries are redelivered; entries are never lost or reordered.
//!
//! # Overview
//!
//! - **Sequence numbers**: every pushed value gets the next `u64` sequence
//!   number, wrapping past `u64::MAX`
//! - **Combined ack-and-fetch**: [`SequencedQueue::pull`] acknowledges the
//!   previous entry and returns the next one in a single step
//! - **Silent stale acks**: acknowledging a sequence number outside the
//!   delivered window does nothing; the consumer simply gets the same entry
//! - **Single owner**: one coordinator task owns all state; handles talk to
//!   it by message only
//! - **Graceful drain**: [`SequencedQueue::dispose`] stops new pushes while
//!   buffered entries keep flowing until acknowledged
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  ┌────────────┐
//! │ Producer A │  │ Producer B │
//! └─────┬──────┘  └─────┬──────┘
//!       │ push          │ push
//!       ▼               ▼
//! ┌────────────────────────────────────────────┐
//! │            QueueCoordinator task           │
//! │  ┌───┬───┬───┬───┬───┐                     │
//! │  │ 4 │ 5 │ 6 │ 7 │ 8 │  next_seq = 9       │
//! │  └───┴───┴───┴───┴───┘                     │
//! │    ▲ delivered window [4, 5)               │
//! └────┼───────────────────────────────────────┘
//!      │ pull(ack = 4) trims 4, delivers 5
//! ┌────┴──────┐
//! │ Consumer  │
//! └───────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use seqqueue::queue::{SequencedQueue, QueueConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = SequencedQueue::with_config(QueueConfig::named("shipper"));
//! let producer = queue.producer();
//!
//! producer.push("GET /index.html".to_string()).await?;
//! producer.push("GET /favicon.ico".to_string()).await?;
//! queue.dispose().await?;
//!
//! let mut consumer = queue.consumer();
//! while let Some(entry) = consumer.next().await? {
//!     println!("{} {}", entry.seq(), entry.value());
//!     consumer.confirm(&entry);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
mod coordinator;
pub mod entry;
pub mod error;
pub mod handle;
pub mod locked;
pub mod sequence;
pub mod store;
pub mod types;

pub use config::QueueConfig;
pub use entry::Entry;
pub use error::{QueueError, QueueResult};
pub use handle::{QueueConsumer, QueueProducer, SequencedQueue};
pub use locked::{LockedQueue, Pulled};
pub use types::{QueueState, QueueStats};

#[cfg(test)]
mod tests;
