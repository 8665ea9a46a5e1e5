//! Generic error handling utilities
//!
//! Lets the binary report queue, configuration and CLI failures the same way:
//! a single `FATAL:` line at error level, with the full detail at debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)` with something the user can act on (fix the capacity, fix
/// the config file). When it returns `false`, `user_message()` returns `None`.
pub trait ContextualError: std::error::Error {
    /// True when the error carries a message that should be shown directly,
    /// such as a rejected capacity or an invalid configuration value
    fn is_user_actionable(&self) -> bool;

    /// The message to show for a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors print their own message; anything else prints
/// `operation_context`. The `Display` and `Debug` forms always follow at
/// debug level.
///
/// # Examples
/// ```rust,no_run
/// use pubqueue::core::error_handling::log_error_with_context;
/// use pubqueue::queue::api::QueueError;
///
/// // Logs: "FATAL: Queue capacity must be a positive number of messages"
/// log_error_with_context(&QueueError::InvalidCapacity { capacity: 0 }, "Creating queue");
///
/// // Logs: "FATAL: Running demo"
/// log_error_with_context(&QueueError::Closed, "Running demo");
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", fatal_message(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

fn fatal_message<'a, E: ContextualError>(error: &'a E, operation_context: &'a str) -> &'a str {
    if error.is_user_actionable() {
        error.user_message().unwrap_or(operation_context)
    } else {
        operation_context
    }
}
