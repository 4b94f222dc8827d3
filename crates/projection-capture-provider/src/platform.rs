//! Traits the host platform implements to expose its projection API.

use std::sync::mpsc::{Receiver, Sender, channel};

use crate::{CaptureGrant, Consent, DisplayMetrics, LabelledPlatformResult, RawFrame};

/// An interactive surface able to run the platform consent flow.
///
/// Obtaining a grant requires direct access to such a surface; there is no
/// headless path.
pub trait ConsentSurface {
    /// Run the consent round-trip. Blocks until the user accepts or
    /// dismisses; the round-trip has no timeout.
    fn request_capture_consent(&mut self) -> LabelledPlatformResult<Consent>;

    /// Bring the requesting application in front of other windows.
    fn bring_to_foreground(&mut self) -> LabelledPlatformResult<()>;
}

/// The platform projection entry point.
pub trait Projection: Send + 'static {
    /// The privileged handle this platform mints.
    type Handle: ProjectionHandle;

    /// Announce the OS-visible capture task.
    ///
    /// Must complete before [`Projection::mint_handle`]; some platforms
    /// reject mint attempts from an unannounced task.
    fn announce_capture_task(&mut self) -> LabelledPlatformResult<()>;

    /// Query the current display bounds and density.
    fn display_metrics(&mut self) -> LabelledPlatformResult<DisplayMetrics>;

    /// Consume a grant into a privileged capture handle.
    fn mint_handle(&mut self, grant: &CaptureGrant) -> LabelledPlatformResult<Self::Handle>;
}

/// A privileged capture handle minted from a grant.
pub trait ProjectionHandle: Send + 'static {
    /// The frame-buffer reader this handle allocates.
    type Reader: FrameReader;

    /// The virtual display binding this handle creates.
    type Display: VirtualDisplay;

    /// Watch for the asynchronous revocation notice. Subscribed once at
    /// session start.
    fn revocation(&mut self) -> RevocationWatch;

    /// Allocate a frame-buffer reader sized to the given metrics with the
    /// given buffer depth.
    fn create_reader(
        &mut self,
        metrics: DisplayMetrics,
        depth: usize,
    ) -> LabelledPlatformResult<Self::Reader>;

    /// Bind a virtual display mirroring the real display into the reader.
    fn create_virtual_display(
        &mut self,
        metrics: DisplayMetrics,
        reader: &mut Self::Reader,
    ) -> LabelledPlatformResult<Self::Display>;

    /// Release the privileged handle. Safe to call more than once.
    fn release(&mut self);
}

/// An OS-level mirrored output surface.
pub trait VirtualDisplay: Send + 'static {
    /// Release the virtual display binding. Safe to call more than once.
    fn release(&mut self);
}

/// A bounded-depth queue of most-recent rendered frames.
pub trait FrameReader: Send + 'static {
    /// Pull the most recent available frame; older buffered frames are
    /// discarded. Returns `None` if no frame is ready within the attempt.
    fn acquire_latest_frame(&mut self) -> LabelledPlatformResult<Option<RawFrame>>;

    /// Close the reader. Safe to call more than once.
    fn close(&mut self);
}

/// Sender half held by the platform to deliver revocation notices.
#[derive(Debug, Clone)]
pub struct RevocationNotifier {
    sender: Sender<()>,
}

impl RevocationNotifier {
    /// Deliver a revocation notice. Delivery to a dropped watch is a no-op.
    pub fn notify(&self) {
        let _ = self.sender.send(());
    }
}

/// Receiver half the session polls for revocation notices.
#[derive(Debug)]
pub struct RevocationWatch {
    receiver: Receiver<()>,
}

impl RevocationWatch {
    /// Create a connected notifier/watch pair.
    pub fn pair() -> (RevocationNotifier, Self) {
        let (sender, receiver) = channel();
        (RevocationNotifier { sender }, Self { receiver })
    }

    /// Drain pending notices, returning whether any had arrived.
    pub fn notice_pending(&self) -> bool {
        let mut pending = false;
        while self.receiver.try_recv().is_ok() {
            pending = true;
        }
        pending
    }
}
