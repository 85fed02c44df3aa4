//! Application error types

use crate::core::error_handling::ContextualError;
use crate::queue::QueueError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    #[error("Relay task failed: {message}")]
    Task { message: String },
}

impl AppError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config {
            message: message.into(),
        }
    }
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config { .. } => true,
            AppError::Queue(queue_error) => queue_error.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Config { message } => Some(message.as_str()),
            AppError::Queue(queue_error) => queue_error.user_message(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_user_actionable() {
        let error = AppError::config("fail_every must be at least 2");
        assert!(error.is_user_actionable());
        assert_eq!(error.user_message(), Some("fail_every must be at least 2"));
        assert_eq!(
            error.to_string(),
            "Configuration error: fail_every must be at least 2"
        );
    }

    #[test]
    fn test_io_error_is_system_error() {
        let error = AppError::io(
            "Opening input",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(!error.is_user_actionable());
        assert!(error.user_message().is_none());
        assert_eq!(error.to_string(), "Opening input: missing");
    }

    #[test]
    fn test_queue_errors_keep_their_classification() {
        let disposed: AppError = QueueError::Disposed.into();
        let closed: AppError = QueueError::Closed.into();

        assert!(disposed.is_user_actionable());
        assert!(!closed.is_user_actionable());
        assert_eq!(closed.to_string(), "Queue error: Queue coordinator has stopped");
    }
}
