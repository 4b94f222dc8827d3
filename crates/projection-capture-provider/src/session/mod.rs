//! The live capture session: privileged handle, virtual display, and
//! frame-buffer reader.

mod start;

pub use start::Error as StartError;

use tracing::{info, warn};

use crate::{
    DisplayMetrics, FrameReader, Projection, ProjectionHandle, RevocationWatch, VirtualDisplay,
};

/// Outcome of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ready {
    /// A new display/reader pair was created.
    Started,

    /// A session was already active; nothing was created.
    AlreadyActive,
}

/// The capture session owning the resources minted from a grant.
///
/// At most one display/reader pair exists at a time, enforced by the
/// idempotent start guard. The session value stays usable after `stop` or
/// revocation so it can be re-established from a fresh grant.
pub struct CaptureSession<P: Projection> {
    projection: P,
    active: Option<ActiveProjection<P::Handle>>,
}

struct ActiveProjection<H: ProjectionHandle> {
    handle: H,
    display: H::Display,
    reader: H::Reader,
    metrics: DisplayMetrics,
    revocation: RevocationWatch,
}

impl<P: Projection> CaptureSession<P> {
    /// Create a session over the given projection platform. No resources are
    /// held until [`CaptureSession::start`].
    pub fn new(projection: P) -> Self {
        Self {
            projection,
            active: None,
        }
    }

    /// Whether a privileged handle is live. Drains any pending revocation
    /// notice first.
    pub fn is_ready(&mut self) -> bool {
        self.poll_revocation();
        self.active.is_some()
    }

    /// Display metrics snapshotted at session start.
    ///
    /// Not refreshed if the display rotates or resizes after start.
    pub fn metrics(&self) -> Option<DisplayMetrics> {
        self.active.as_ref().map(|active| active.metrics)
    }

    /// Mutable access to the active frame-buffer reader.
    pub fn reader_mut(&mut self) -> Option<&mut <P::Handle as ProjectionHandle>::Reader> {
        self.active.as_mut().map(|active| &mut active.reader)
    }

    /// Drain revocation notices, releasing the capture resources if one had
    /// arrived. Returns whether the session was revoked by this call.
    pub fn poll_revocation(&mut self) -> bool {
        let revoked = self
            .active
            .as_ref()
            .is_some_and(|active| active.revocation.notice_pending());

        if revoked {
            warn!("Projection grant was revoked, releasing capture resources");
            self.release_active();
        }

        revoked
    }

    /// Stop the session: release the virtual display, close the reader, and
    /// release the privileged handle, in that order. No-op when already
    /// stopped.
    pub fn stop(&mut self) {
        if self.active.is_some() {
            info!("Stopping capture session");
            self.release_active();
        }
    }

    fn release_active(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.display.release();
            active.reader.close();
            active.handle.release();
        }
    }
}
