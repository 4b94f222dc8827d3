//! Why a capture request could not be served.

use thiserror::Error;

/// The outcome reported to a requester when no screenshot could be produced.
///
/// The message text is part of the file-drop protocol: external requesters
/// read it verbatim from the result marker.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaptureError {
    /// The user answered the consent round-trip with a denial.
    #[error("Screen capture consent was denied")]
    GrantDenied,

    /// No capture session is established; either one was never started, it
    /// was stopped, or the grant was revoked.
    #[error("Projection session is not ready")]
    SessionNotReady,

    /// The reader had no frame to hand out.
    #[error("No frame was available from the reader")]
    NoFrameAvailable,

    /// The capture pipeline failed.
    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}
