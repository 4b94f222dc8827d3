use core::fmt::Display;

use thiserror::Error;

/// A shortcut for `Result<T, PlatformError>`.
pub type LabelledPlatformResult<T> = Result<T, PlatformError>;

/// A platform failure wrapped with the call that triggered it.
#[derive(Debug, Error)]
pub struct PlatformError {
    call: &'static str,
    message: String,
}

impl PlatformError {
    /// Create a PlatformError from a failure message and a call label.
    pub fn new(call: &'static str, message: impl Display) -> Self {
        Self {
            call,
            message: message.to_string(),
        }
    }

    /// The label of the platform call that failed.
    pub fn call(&self) -> &'static str {
        self.call
    }
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Platform {} call failed:\n{}", self.call, self.message)
    }
}
