//! Public API for the queue system
//!
//! External modules should import from here rather than directly from the
//! implementation modules.

// Coordinated queue and its handles
pub use crate::queue::handle::{QueueConsumer, QueueProducer, SequencedQueue};

// Lock-based alternative
pub use crate::queue::locked::{LockedQueue, Pulled};

// Entries and configuration
pub use crate::queue::config::QueueConfig;
pub use crate::queue::entry::Entry;

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};

// Lifecycle and statistics
pub use crate::queue::types::{QueueState, QueueStats};

// Sequence arithmetic
pub use crate::queue::sequence::{cyclic_distance, in_window};
