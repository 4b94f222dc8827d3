//! Pulls a frame from the capture session and persists it as a PNG.

mod write_png;

use std::{path::PathBuf, thread, time::Instant};

use core::time::Duration;

use projection_capture_provider::{CaptureSession, FrameReader, Projection};
use tracing::{debug, info, instrument};

use crate::error::CaptureError;

/// Turns the session's latest frame into a screenshot file.
pub struct FrameCapturer {
    screenshot_dir: PathBuf,
    settle_delay: Duration,
}

impl FrameCapturer {
    /// Create a capturer writing screenshots into `screenshot_dir`.
    pub fn new(screenshot_dir: PathBuf, settle_delay: Duration) -> Self {
        Self {
            screenshot_dir,
            settle_delay,
        }
    }

    /// Capture the latest frame and write it to a PNG file.
    ///
    /// Waits for the settle delay before pulling so the virtual display has
    /// rendered at least one frame. Older queued frames are discarded; only
    /// the newest is persisted.
    #[instrument("FrameCapturer::Capture", skip_all, err)]
    pub fn capture<P: Projection>(
        &self,
        session: &mut CaptureSession<P>,
    ) -> Result<PathBuf, CaptureError> {
        if !session.is_ready() {
            return Err(CaptureError::SessionNotReady);
        }

        thread::sleep(self.settle_delay);

        // Revocation may have landed during the settle delay.
        if !session.is_ready() {
            return Err(CaptureError::SessionNotReady);
        }

        let reader = session.reader_mut().ok_or(CaptureError::SessionNotReady)?;

        let start = Instant::now();
        let frame = reader
            .acquire_latest_frame()
            .map_err(|error| CaptureError::CaptureFailed(error.to_string()))?
            .ok_or(CaptureError::NoFrameAvailable)?;
        debug!("Acquired frame in {}ms", start.elapsed().as_millis());

        let path = write_png::write_screenshot(&frame, &self.screenshot_dir)
            .map_err(|error| CaptureError::CaptureFailed(error.to_string()))?;

        info!("Saved screenshot to {}", path.display());
        Ok(path)
    }
}
