//! Helpers for handling failures that cannot be propagated.

use tracing::{debug, error};

/// Log the error then panic with the same message.
pub fn log_and_panic<Err: core::fmt::Display>(error: Err, message: &str) -> ! {
    error!("{message}: {error}");

    panic!("{message}: {error}");
}

/// Unwrapping helpers that log before giving up.
pub trait Failure<T> {
    /// Unwrap the value, logging and panicking with `message` on failure.
    fn log_and_panic(self, message: &str) -> T;

    /// Unwrap the value, logging `message` and returning `None` on failure.
    fn log(self, message: &str) -> Option<T>;
}

/// Explicitly discard a failure.
pub trait Ignore {
    /// Discard the failure, recording the caller in the debug log.
    fn ignore(self);
}

impl<T, E: core::fmt::Display> Failure<T> for Result<T, E> {
    fn log_and_panic(self, message: &str) -> T {
        match self {
            Ok(value) => value,
            Err(error) => log_and_panic(error, message),
        }
    }

    fn log(self, message: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                error!("{message}: {error}");
                None
            }
        }
    }
}

impl<T, E> Ignore for Result<T, E> {
    #[track_caller]
    fn ignore(self) {
        if self.is_err() {
            debug!("Ignoring error ({})", core::panic::Location::caller());
        }
    }
}

impl<T> Failure<T> for Option<T> {
    fn log_and_panic(self, message: &str) -> T {
        match self {
            Some(value) => value,
            None => log_and_panic("Was None", message),
        }
    }

    fn log(self, message: &str) -> Self {
        match self {
            Some(value) => Some(value),
            None => {
                error!("{message}: Was None");
                None
            }
        }
    }
}

impl<T> Ignore for Option<T> {
    #[track_caller]
    fn ignore(self) {
        if self.is_none() {
            debug!("Ignoring None ({})", core::panic::Location::caller());
        }
    }
}
