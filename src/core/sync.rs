//! Synchronization utilities for robust mutex handling
//!
//! Lock and condition-variable results are funnelled through
//! [`handle_mutex_poison`] so a panic in one thread surfaces as an error in
//! the others instead of a second panic.

use std::sync::LockResult;

/// Handle poisoned mutex cases with consistent error handling
///
/// Works for anything returning a [`LockResult`]: `Mutex::lock`,
/// `Condvar::wait` and `Condvar::wait_timeout`.
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use pubqueue::core::sync::handle_mutex_poison;
/// use pubqueue::queue::api::QueueError;
///
/// let mutex = Mutex::new(42);
/// let guard = handle_mutex_poison(mutex.lock(), |message| QueueError::Poisoned { message })
///     .unwrap();
/// assert_eq!(*guard, 42);
/// ```
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(
            format!(
                "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
                poison_err
            )
        )
    })
}
