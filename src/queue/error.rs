//! Queue Error Types
//!
//! Invalid acknowledgments are never errors; they are absorbed by the store.
//! These variants cover usage outside the queue's contract and a vanished
//! coordinator.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is disposing and no longer accepts pushes")]
    Disposed,

    #[error("Queue coordinator has stopped")]
    Closed,

    #[error("Pending fetch was superseded by a newer fetch")]
    Superseded,

    #[error("Internal queue error: {message}")]
    Internal { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

impl crate::core::error_handling::ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, QueueError::Disposed)
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::Disposed => Some("Queue is disposing and no longer accepts pushes"),
            _ => None,
        }
    }
}
