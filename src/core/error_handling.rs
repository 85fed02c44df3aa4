//! Generic error handling utilities
//!
//! Provides unified error reporting that works across the queue and
//! application error types.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with a helpful, actionable message. When it returns
/// `false`, `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message the user can act on
    ///
    /// Examples of user-actionable errors:
    /// - Configuration file mistakes
    /// - Pushing to a queue that is already disposing
    ///
    /// Examples of system errors:
    /// - IO failures
    /// - A queue coordinator that stopped unexpectedly
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors log their own message; system errors log the
/// operation context. Full detail always goes to debug level.
///
/// # Examples
/// ```rust,no_run
/// # use seqqueue::core::error_handling::log_error_with_context;
/// # use seqqueue::queue::QueueError;
/// log_error_with_context(&QueueError::Disposed, "Forwarding input");
/// // Logs: "FATAL: Queue is disposing and no longer accepts pushes"
///
/// log_error_with_context(&QueueError::Closed, "Forwarding input");
/// // Logs: "FATAL: Forwarding input"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
