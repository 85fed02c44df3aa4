//! Queue coordinator task
//!
//! The coordinator is the single owner of the entry store and the queue
//! state. Handles never touch either directly: every operation is a
//! [`Command`] sent over one unbounded channel and answered on a oneshot
//! reply channel, so all state transitions happen in the order the
//! coordinator receives them.
//!
//! ```text
//!  QueueProducer ───Push────┐
//!  QueueProducer ───Push────┤        ┌─────────────────────────────┐
//!                           ├───────▶│ QueueCoordinator (one task) │
//!  QueueConsumer ───Fetch───┤        │  EntryStore + QueueState    │
//!  SequencedQueue ──Dispose─┘        │  at most one parked Fetch   │
//!                                    └─────────────────────────────┘
//! ```
//!
//! A fetch that finds the store empty while the queue is open is parked and
//! answered by the next push (or by the drain completing). Only one fetch can
//! be parked; the queue serves a single consumer.

use crate::queue::entry::Entry;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::store::EntryStore;
use crate::queue::types::{QueueState, QueueStats};
use log::{debug, info, trace};
use tokio::sync::{mpsc, oneshot, watch};

pub(crate) type FetchReply<T> = oneshot::Sender<QueueResult<Option<Entry<T>>>>;

/// Messages accepted by the coordinator
pub(crate) enum Command<T> {
    Push {
        value: T,
        reply: oneshot::Sender<QueueResult<u64>>,
    },
    /// `ack: None` is a peek: deliver the front without acknowledging first
    Fetch {
        ack: Option<u64>,
        reply: FetchReply<T>,
    },
    Dispose,
    Stats {
        reply: oneshot::Sender<QueueStats>,
    },
}

pub(crate) struct QueueCoordinator<T> {
    name: String,
    store: EntryStore<T>,
    state: QueueState,
    pending: Option<FetchReply<T>>,
    commands: mpsc::UnboundedReceiver<Command<T>>,
    /// Last snapshot, published when the loop exits
    final_stats: watch::Sender<QueueStats>,
}

impl<T> QueueCoordinator<T> {
    pub(crate) fn new(
        name: String,
        store: EntryStore<T>,
        commands: mpsc::UnboundedReceiver<Command<T>>,
    ) -> Self {
        let (final_stats, _) = watch::channel(store.stats(QueueState::Open));
        Self {
            name,
            store,
            state: QueueState::Open,
            pending: None,
            commands,
            final_stats,
        }
    }

    /// Receiver holding the stats the coordinator had when it stopped
    pub(crate) fn final_stats(&self) -> watch::Receiver<QueueStats> {
        self.final_stats.subscribe()
    }

    /// Process commands until the queue closes or every handle is dropped
    pub(crate) async fn run(mut self) {
        info!(
            "[{}] Queue coordinator started at sequence {}",
            self.name,
            self.store.next_seq()
        );

        while let Some(command) = self.commands.recv().await {
            self.handle(command);
            if self.state.is_closed() {
                break;
            }
        }

        if self.state.is_closed() {
            info!("[{}] Queue drained and closed", self.name);
        } else {
            debug!(
                "[{}] All queue handles dropped; discarding {} buffered entries",
                self.name,
                self.store.len()
            );
        }
        // Published before the command receiver drops with `self`
        self.final_stats.send_replace(self.stats());
    }

    fn handle(&mut self, command: Command<T>) {
        match command {
            Command::Push { value, reply } => self.push(value, reply),
            Command::Fetch { ack, reply } => self.fetch(ack, reply),
            Command::Dispose => self.dispose(),
            Command::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
        }
    }

    fn push(&mut self, value: T, reply: oneshot::Sender<QueueResult<u64>>) {
        if !self.state.accepts_push() {
            debug!("[{}] Rejected push while {}", self.name, self.state);
            let _ = reply.send(Err(QueueError::Disposed));
            return;
        }

        let seq = self.store.append(value);
        trace!("[{}] Pushed seq {}", self.name, seq);
        let _ = reply.send(Ok(seq));
        self.serve_pending();
    }

    fn fetch(&mut self, ack: Option<u64>, reply: FetchReply<T>) {
        if let Some(seq) = ack {
            let trimmed = self.store.acknowledge(seq);
            if trimmed > 0 {
                trace!("[{}] Ack {} trimmed {} entries", self.name, seq, trimmed);
            } else {
                trace!("[{}] Ack {} outside delivered window", self.name, seq);
            }
            self.settle_drain();
        }

        if let Some(previous) = self.pending.replace(reply) {
            debug!("[{}] Superseding parked fetch", self.name);
            let _ = previous.send(Err(QueueError::Superseded));
        }
        self.serve_pending();
    }

    fn dispose(&mut self) {
        if self.state == QueueState::Open {
            debug!(
                "[{}] Dispose requested with {} entries buffered",
                self.name,
                self.store.len()
            );
            self.state = QueueState::Draining;
            self.settle_drain();
            self.serve_pending();
        }
    }

    /// Draining with nothing left to deliver is closed
    fn settle_drain(&mut self) {
        if self.state == QueueState::Draining && self.store.is_empty() {
            debug!("[{}] Drain complete", self.name);
            self.state = QueueState::Closed;
        }
    }

    /// Answer the parked fetch if there is anything to answer it with
    fn serve_pending(&mut self) {
        let Some(reply) = self.pending.take() else {
            return;
        };

        if reply.is_closed() {
            debug!("[{}] Parked fetch abandoned by consumer", self.name);
            return;
        }

        if let Some(entry) = self.store.peek_front() {
            let seq = entry.seq();
            // The window only grows once the consumer actually has the entry
            match reply.send(Ok(Some(entry))) {
                Ok(()) => {
                    if let Some(delivery) = self.store.deliver_front() {
                        if delivery.redelivered {
                            trace!("[{}] Redelivered seq {}", self.name, seq);
                        } else {
                            trace!("[{}] Delivered seq {}", self.name, seq);
                        }
                    }
                }
                Err(_) => debug!("[{}] Consumer left before seq {} was delivered", self.name, seq),
            }
        } else if self.state.is_closed() {
            let _ = reply.send(Ok(None));
        } else {
            trace!("[{}] Parking fetch on empty queue", self.name);
            self.pending = Some(reply);
        }
    }

    fn stats(&self) -> QueueStats {
        self.store.stats(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    fn coordinator() -> (QueueCoordinator<i32>, mpsc::UnboundedSender<Command<i32>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            QueueCoordinator::new("test".to_string(), EntryStore::new(), rx),
            tx,
        )
    }

    fn fetch(
        coordinator: &mut QueueCoordinator<i32>,
        ack: Option<u64>,
    ) -> oneshot::Receiver<QueueResult<Option<Entry<i32>>>> {
        let (reply, rx) = oneshot::channel();
        coordinator.handle(Command::Fetch { ack, reply });
        rx
    }

    fn push(coordinator: &mut QueueCoordinator<i32>, value: i32) -> QueueResult<u64> {
        let (reply, mut rx) = oneshot::channel();
        coordinator.handle(Command::Push { value, reply });
        rx.try_recv().expect("push is answered synchronously")
    }

    #[test]
    fn test_push_then_fetch_delivers_without_trimming() {
        let (mut coordinator, _tx) = coordinator();
        assert_eq!(push(&mut coordinator, 127), Ok(0));

        let mut rx = fetch(&mut coordinator, Some(0));
        let entry = rx.try_recv().unwrap().unwrap().unwrap();

        assert_eq!((entry.seq(), *entry.value()), (0, 127));
        assert_eq!(coordinator.store.len(), 1);
        assert_eq!(coordinator.store.delivered_boundary(), 1);
    }

    #[test]
    fn test_fetch_on_empty_open_queue_parks_until_push() {
        let (mut coordinator, _tx) = coordinator();

        let mut rx = fetch(&mut coordinator, Some(0));
        assert!(rx.try_recv().is_err());
        assert!(coordinator.pending.is_some());

        push(&mut coordinator, 5).unwrap();
        let entry = rx.try_recv().unwrap().unwrap().unwrap();
        assert_eq!(entry.seq(), 0);
        assert!(coordinator.pending.is_none());
    }

    #[test]
    fn test_abandoned_parked_fetch_leaves_head_undelivered() {
        let (mut coordinator, _tx) = coordinator();

        drop(fetch(&mut coordinator, None));
        push(&mut coordinator, 5).unwrap();

        assert_eq!(coordinator.store.delivered_boundary(), 0);
        assert_eq!(coordinator.store.counters().deliveries, 0);
        assert!(coordinator.pending.is_none());
    }

    #[test]
    fn test_newer_fetch_supersedes_parked_one() {
        let (mut coordinator, _tx) = coordinator();

        let mut first = fetch(&mut coordinator, None);
        let mut second = fetch(&mut coordinator, None);

        assert_eq!(first.try_recv().unwrap(), Err(QueueError::Superseded));
        push(&mut coordinator, 1).unwrap();
        assert!(second.try_recv().unwrap().unwrap().is_some());
    }

    #[test]
    fn test_dispose_answers_parked_fetch_with_end_of_stream() {
        let (mut coordinator, _tx) = coordinator();

        let mut rx = fetch(&mut coordinator, None);
        coordinator.handle(Command::Dispose);

        assert_eq!(rx.try_recv().unwrap(), Ok(None));
        assert_eq!(coordinator.state, QueueState::Closed);
    }

    #[test]
    fn test_push_rejected_while_draining() {
        let (mut coordinator, _tx) = coordinator();
        push(&mut coordinator, 1).unwrap();
        coordinator.handle(Command::Dispose);

        assert_eq!(coordinator.state, QueueState::Draining);
        assert_eq!(push(&mut coordinator, 2), Err(QueueError::Disposed));
        assert_eq!(coordinator.store.len(), 1);
    }

    #[test]
    fn test_final_ack_while_draining_closes() {
        let (mut coordinator, _tx) = coordinator();
        push(&mut coordinator, 1).unwrap();
        coordinator.handle(Command::Dispose);

        let entry = fetch(&mut coordinator, Some(0))
            .try_recv()
            .unwrap()
            .unwrap()
            .unwrap();
        let mut rx = fetch(&mut coordinator, Some(entry.seq()));

        assert_eq!(rx.try_recv().unwrap(), Ok(None));
        assert_eq!(coordinator.state, QueueState::Closed);
    }

    #[tokio::test]
    async fn test_run_exits_when_handles_dropped() {
        let (coordinator, tx) = coordinator();
        let task = tokio::spawn(coordinator.run());
        drop(tx);

        let result = timeout(Duration::from_millis(500), task).await;
        assert!(result.is_ok(), "coordinator should stop once all senders are gone");
    }

    #[tokio::test]
    async fn test_run_exits_after_close() {
        let (coordinator, tx) = coordinator();
        let final_stats = coordinator.final_stats();
        let task = tokio::spawn(coordinator.run());
        tx.send(Command::Dispose).unwrap();

        let result = timeout(Duration::from_millis(500), task).await;
        assert!(result.is_ok(), "coordinator should stop once closed");
        assert!(tx.is_closed());
        assert_eq!(final_stats.borrow().state, QueueState::Closed);
    }
}
