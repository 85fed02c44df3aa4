//! Line relay over a sequenced queue
//!
//! A reader task pushes each input line; the consumer writes
//! `<seq>\t<line>` records and confirms each entry only once it is written.
//! A failed attempt leaves the entry unconfirmed, so the next fetch hands
//! the same line out again.

use crate::app::error::AppError;
use crate::queue::{QueueConsumer, QueueProducer, QueueStats, SequencedQueue};
use log::{debug, info, warn};
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;

/// Outcome of a completed relay run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySummary {
    pub lines_read: u64,
    pub forwarded: u64,
    pub failed_attempts: u64,
    pub stats: QueueStats,
}

impl fmt::Display for RelaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relay finished: {} lines read, {} forwarded, {} failed attempts ({})",
            self.lines_read, self.forwarded, self.failed_attempts, self.stats
        )
    }
}

/// Relay every line of `input` to `output` through `queue`
///
/// Ends when the input is exhausted or `shutdown` fires; either way the
/// queue is disposed and everything already buffered is still written.
/// `fail_every: Some(n)` fails every nth forwarding attempt.
pub async fn run_relay<R, W>(
    input: R,
    mut output: W,
    queue: SequencedQueue<String>,
    fail_every: Option<usize>,
    shutdown: broadcast::Receiver<()>,
) -> Result<RelaySummary, AppError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let reader = tokio::spawn(read_lines(
        input,
        queue.producer(),
        queue.clone(),
        shutdown,
    ));

    let (forwarded, failed_attempts) =
        match forward_entries(&mut output, queue.consumer(), fail_every).await {
            Ok(counts) => counts,
            Err(e) => {
                reader.abort();
                queue.dispose().await?;
                return Err(e);
            }
        };

    let lines_read = reader.await.map_err(|e| AppError::Task {
        message: e.to_string(),
    })??;

    Ok(RelaySummary {
        lines_read,
        forwarded,
        failed_attempts,
        stats: queue.stats().await?,
    })
}

async fn read_lines<R>(
    input: R,
    producer: QueueProducer<String>,
    queue: SequencedQueue<String>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<u64, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut lines_read = 0u64;
    // A dropped shutdown sender means no signal can arrive
    let mut armed = true;

    loop {
        tokio::select! {
            biased;

            signal = shutdown.recv(), if armed => match signal {
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    info!("Shutdown requested after {} lines; draining queue", lines_read);
                    break;
                }
                Err(broadcast::error::RecvError::Closed) => armed = false,
            },

            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    producer.push(line).await?;
                    lines_read += 1;
                }
                Ok(None) => {
                    debug!("End of input after {} lines", lines_read);
                    break;
                }
                Err(e) => {
                    queue.dispose().await?;
                    return Err(AppError::io("Reading input", e));
                }
            },
        }
    }

    queue.dispose().await?;
    Ok(lines_read)
}

async fn forward_entries<W>(
    output: &mut W,
    mut consumer: QueueConsumer<String>,
    fail_every: Option<usize>,
) -> Result<(u64, u64), AppError>
where
    W: AsyncWrite + Unpin,
{
    let mut attempts = 0usize;
    let mut forwarded = 0u64;
    let mut failed = 0u64;

    while let Some(entry) = consumer.next().await? {
        attempts += 1;
        if fail_every.is_some_and(|n| attempts % n == 0) {
            failed += 1;
            warn!("Simulated failure forwarding seq {}", entry.seq());
            continue;
        }

        let record = format!("{}\t{}\n", entry.seq(), entry.value());
        output
            .write_all(record.as_bytes())
            .await
            .map_err(|e| AppError::io("Writing output", e))?;
        forwarded += 1;
        consumer.confirm(&entry);
    }

    output
        .flush()
        .await
        .map_err(|e| AppError::io("Flushing output", e))?;
    Ok((forwarded, failed))
}
