use thiserror::Error;
use tracing::{debug, info};

use crate::{CaptureGrant, FrameReader, PlatformError, Projection, ProjectionHandle};

use super::{ActiveProjection, CaptureSession, Ready};

impl<P: Projection> CaptureSession<P> {
    /// Establish the session from a grant.
    ///
    /// Idempotent: if a session is already active, returns
    /// [`Ready::AlreadyActive`] without creating a second display/reader
    /// pair. The OS-visible capture task is announced before the handle is
    /// minted; some platforms reject mint attempts in the other order.
    pub fn start(&mut self, grant: &CaptureGrant, reader_depth: usize) -> Result<Ready, Error> {
        if self.active.is_some() {
            debug!("Capture session already active, skipping start");
            return Ok(Ready::AlreadyActive);
        }

        self.projection
            .announce_capture_task()
            .map_err(Error::Announce)?;

        let mut handle = self.projection.mint_handle(grant).map_err(Error::Mint)?;
        let revocation = handle.revocation();

        let metrics = match self.projection.display_metrics() {
            Ok(metrics) => metrics,
            Err(error) => {
                handle.release();
                return Err(Error::Metrics(error));
            }
        };
        info!(
            "Screen: {}x{} @ {} dpi",
            metrics.width, metrics.height, metrics.density_dpi
        );

        let mut reader = match handle.create_reader(metrics, reader_depth) {
            Ok(reader) => reader,
            Err(error) => {
                handle.release();
                return Err(Error::CreateReader(error));
            }
        };

        let display = match handle.create_virtual_display(metrics, &mut reader) {
            Ok(display) => display,
            Err(error) => {
                reader.close();
                handle.release();
                return Err(Error::BindDisplay(error));
            }
        };

        self.active = Some(ActiveProjection {
            handle,
            display,
            reader,
            metrics,
            revocation,
        });

        Ok(Ready::Started)
    }
}

/// Reasons a session could not be established.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Announcing the capture task failed.
    #[error("Failed to announce the capture task:\n{0}")]
    Announce(#[source] PlatformError),

    /// Minting the privileged handle failed; the grant may be consumed or
    /// invalid.
    #[error("Failed to mint the privileged handle:\n{0}")]
    Mint(#[source] PlatformError),

    /// Querying the display metrics failed.
    #[error("Failed to query display metrics:\n{0}")]
    Metrics(#[source] PlatformError),

    /// Creating the frame-buffer reader failed.
    #[error("Failed to create the frame-buffer reader:\n{0}")]
    CreateReader(#[source] PlatformError),

    /// Binding the virtual display into the reader failed.
    #[error("Failed to bind the virtual display:\n{0}")]
    BindDisplay(#[source] PlatformError),
}
