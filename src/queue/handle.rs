//! Public handles onto a coordinated queue
//!
//! [`SequencedQueue`] owns the lifecycle (dispose, stats) and can hand out a
//! cloneable [`QueueProducer`] for each producer and one [`QueueConsumer`]
//! that remembers what it has confirmed.

use crate::queue::config::QueueConfig;
use crate::queue::coordinator::{Command, QueueCoordinator};
use crate::queue::entry::Entry;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::store::EntryStore;
use crate::queue::types::QueueStats;
use tokio::sync::{mpsc, oneshot, watch};

/// Acknowledgment-gated delivery queue backed by a coordinator task
///
/// Values pushed by any number of producers are numbered in the order the
/// coordinator receives them and delivered one at a time. A consumer only
/// moves past an entry by passing its sequence number to the next
/// [`pull`](Self::pull); anything else gets the same entry again.
///
/// Must be created from within a tokio runtime.
///
/// # Example
///
/// ```rust
/// use seqqueue::queue::api::SequencedQueue;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = SequencedQueue::new();
/// queue.push("first").await?;
/// queue.push("second").await?;
/// queue.dispose().await?;
///
/// let first = queue.peek().await?.expect("entry");
/// let second = queue.pull(first.seq()).await?.expect("entry");
/// assert_eq!(*second.value(), "second");
///
/// // Acknowledging the last entry of a disposed queue ends the stream
/// assert!(queue.pull(second.seq()).await?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct SequencedQueue<T> {
    name: String,
    commands: mpsc::UnboundedSender<Command<T>>,
    final_stats: watch::Receiver<QueueStats>,
}

impl<T> Clone for SequencedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            commands: self.commands.clone(),
            final_stats: self.final_stats.clone(),
        }
    }
}

impl<T> std::fmt::Debug for SequencedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencedQueue")
            .field("name", &self.name)
            .field("closed", &self.commands.is_closed())
            .finish()
    }
}

impl<T: Send + Sync + 'static> Default for SequencedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> SequencedQueue<T> {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create a queue and spawn its coordinator on the current runtime
    pub fn with_config(config: QueueConfig) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let store = EntryStore::starting_at(config.initial_sequence);
        let coordinator = QueueCoordinator::new(config.name.clone(), store, receiver);
        let final_stats = coordinator.final_stats();
        tokio::spawn(coordinator.run());

        Self {
            name: config.name,
            commands,
            final_stats,
        }
    }
}

impl<T> SequencedQueue<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a value; returns the sequence number it was given
    ///
    /// Fails with [`QueueError::Disposed`] once [`dispose`](Self::dispose)
    /// has been processed.
    pub async fn push(&self, value: T) -> QueueResult<u64> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Push { value, reply })?;
        response.await.map_err(|_| QueueError::Closed)?
    }

    /// Acknowledge `ack` and fetch the entry at the front of the queue
    ///
    /// If `ack` is not the sequence number of a delivered, unacknowledged
    /// entry the acknowledgment is ignored and the current front is
    /// returned again. Waits while the queue is empty and not yet drained.
    /// `Ok(None)` means the queue was disposed and fully drained; every
    /// later call returns the same.
    ///
    /// Dropping the returned future abandons the wait but not the
    /// acknowledgment, which the coordinator may already have applied.
    pub async fn pull(&self, ack: u64) -> QueueResult<Option<Entry<T>>> {
        self.fetch(Some(ack)).await
    }

    /// Fetch the front entry without acknowledging anything first
    ///
    /// Intended for a consumer that has not yet learned a sequence number
    /// to acknowledge.
    pub async fn peek(&self) -> QueueResult<Option<Entry<T>>> {
        self.fetch(None).await
    }

    /// Stop accepting pushes; buffered entries are still delivered
    ///
    /// Repeated calls, and calls after the queue closed, are harmless.
    pub async fn dispose(&self) -> QueueResult<()> {
        // A stopped coordinator is already past disposal
        let _ = self.commands.send(Command::Dispose);
        Ok(())
    }

    /// Current statistics, or the final ones once the coordinator stopped
    pub async fn stats(&self) -> QueueResult<QueueStats> {
        let (reply, response) = oneshot::channel();
        if self.commands.send(Command::Stats { reply }).is_ok() {
            if let Ok(stats) = response.await {
                return Ok(stats);
            }
        }
        Ok(self.final_stats.borrow().clone())
    }

    /// Whether the coordinator has stopped (closed or abandoned)
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Wait until the coordinator stops
    pub async fn closed(&self) {
        self.commands.closed().await
    }

    pub fn producer(&self) -> QueueProducer<T> {
        QueueProducer {
            commands: self.commands.clone(),
        }
    }

    /// Consumer that tracks its own acknowledgments
    ///
    /// The queue serves one consumer; create one per queue.
    pub fn consumer(&self) -> QueueConsumer<T> {
        QueueConsumer {
            queue: self.clone(),
            last_confirmed: None,
        }
    }

    async fn fetch(&self, ack: Option<u64>) -> QueueResult<Option<Entry<T>>> {
        let (reply, response) = oneshot::channel();
        if self.commands.send(Command::Fetch { ack, reply }).is_err() {
            return Ok(None);
        }
        // A coordinator that stops without answering has closed for good
        response.await.unwrap_or(Ok(None))
    }

    fn send(&self, command: Command<T>) -> QueueResult<()> {
        self.commands.send(command).map_err(|_| QueueError::Closed)
    }
}

/// Push-only handle for a producer
pub struct QueueProducer<T> {
    commands: mpsc::UnboundedSender<Command<T>>,
}

impl<T> Clone for QueueProducer<T> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
        }
    }
}

impl<T> QueueProducer<T> {
    /// See [`SequencedQueue::push`]
    pub async fn push(&self, value: T) -> QueueResult<u64> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Push { value, reply })
            .map_err(|_| QueueError::Closed)?;
        response.await.map_err(|_| QueueError::Closed)?
    }
}

/// Consumer that remembers the last entry it confirmed
///
/// [`next`](Self::next) peeks until something has been confirmed and pulls
/// with the remembered sequence number afterwards. Calling `next` again
/// without [`confirm`](Self::confirm)ing redelivers the same entry.
///
/// ```rust
/// use seqqueue::queue::api::SequencedQueue;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = SequencedQueue::new();
/// let mut consumer = queue.consumer();
/// queue.push(7).await?;
/// queue.dispose().await?;
///
/// while let Some(entry) = consumer.next().await? {
///     // process, then confirm
///     consumer.confirm(&entry);
/// }
/// # Ok(())
/// # }
/// ```
pub struct QueueConsumer<T> {
    queue: SequencedQueue<T>,
    last_confirmed: Option<u64>,
}

impl<T> QueueConsumer<T> {
    /// Fetch the next entry, acknowledging whatever was confirmed
    pub async fn next(&mut self) -> QueueResult<Option<Entry<T>>> {
        match self.last_confirmed {
            Some(seq) => self.queue.pull(seq).await,
            None => self.queue.peek().await,
        }
    }

    /// Record `entry` as fully processed
    pub fn confirm(&mut self, entry: &Entry<T>) {
        self.last_confirmed = Some(entry.seq());
    }

    pub fn last_confirmed(&self) -> Option<u64> {
        self.last_confirmed
    }
}
