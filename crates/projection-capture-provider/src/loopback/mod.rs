//! A software projection platform mirroring a synthetic screen.
//!
//! Serves hosts that have no OS projection API, and the test suite. Frames
//! carry an aligned row stride so consumers exercise their padding crop, and
//! the platform enforces the announce-then-mint ordering real platforms
//! require.

mod pattern;

pub use pattern::{PADDING_BYTE, ROW_ALIGNMENT};

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;
use rand::RngCore;

use crate::{
    CaptureGrant, Consent, ConsentSurface, DisplayMetrics, FrameReader, LabelledPlatformResult,
    PlatformError, Projection, ProjectionHandle, RawFrame, RevocationNotifier, RevocationWatch,
    VirtualDisplay,
};

/// Consent decision the loopback surface returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentPolicy {
    /// Accept the round-trip and issue a grant.
    Accept,

    /// Dismiss the round-trip; no grant is issued.
    Dismiss,
}

struct State {
    metrics: DisplayMetrics,
    consent_policy: ConsentPolicy,
    announced: bool,
    issued_payload: Option<Box<[u8]>>,
    revoked: bool,
    notifiers: Vec<RevocationNotifier>,
    frames_available: bool,
    frame_counter: u64,
    readers_live: u32,
    displays_live: u32,
}

/// The shared synthetic screen behind the loopback consent surface and
/// projection.
pub struct LoopbackPlatform {
    state: Arc<Mutex<State>>,
}

impl LoopbackPlatform {
    /// Create a platform mirroring a screen with the given metrics.
    pub fn new(metrics: DisplayMetrics) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                metrics,
                consent_policy: ConsentPolicy::Accept,
                announced: false,
                issued_payload: None,
                revoked: false,
                notifiers: vec![],
                frames_available: true,
                frame_counter: 0,
                readers_live: 0,
                displays_live: 0,
            })),
        }
    }

    /// The interactive consent half of the platform.
    pub fn consent_surface(&self) -> LoopbackConsentSurface {
        LoopbackConsentSurface {
            state: Arc::clone(&self.state),
        }
    }

    /// The projection half of the platform.
    pub fn projection(&self) -> LoopbackProjection {
        LoopbackProjection {
            state: Arc::clone(&self.state),
        }
    }

    /// Choose how the consent surface answers the next round-trip.
    pub fn set_consent_policy(&self, policy: ConsentPolicy) {
        self.state.lock().consent_policy = policy;
    }

    /// Deliver the asynchronous revocation notice, as when the user stops
    /// projection from a system control.
    pub fn revoke(&self) {
        let mut state = self.state.lock();
        state.revoked = true;
        for notifier in &state.notifiers {
            notifier.notify();
        }
    }

    /// Starve or feed the reader; when starved, pull attempts find no frame.
    pub fn set_frames_available(&self, available: bool) {
        self.state.lock().frames_available = available;
    }

    /// How many frame-buffer readers are currently open.
    pub fn readers_live(&self) -> u32 {
        self.state.lock().readers_live
    }

    /// How many virtual displays are currently bound.
    pub fn displays_live(&self) -> u32 {
        self.state.lock().displays_live
    }

    /// How many revocation notifiers the platform is holding.
    pub fn watchers_held(&self) -> usize {
        self.state.lock().notifiers.len()
    }
}

/// Loopback implementation of [`ConsentSurface`].
pub struct LoopbackConsentSurface {
    state: Arc<Mutex<State>>,
}

impl ConsentSurface for LoopbackConsentSurface {
    fn request_capture_consent(&mut self) -> LabelledPlatformResult<Consent> {
        let mut state = self.state.lock();

        match state.consent_policy {
            ConsentPolicy::Dismiss => Ok(Consent::Denied),
            ConsentPolicy::Accept => {
                let mut payload = vec![0u8; 16];
                rand::rng().fill_bytes(&mut payload);
                let payload: Box<[u8]> = payload.into();

                state.issued_payload = Some(payload.clone());

                Ok(Consent::Granted(CaptureGrant {
                    result_code: -1,
                    payload,
                }))
            }
        }
    }

    fn bring_to_foreground(&mut self) -> LabelledPlatformResult<()> {
        Ok(())
    }
}

/// Loopback implementation of [`Projection`].
pub struct LoopbackProjection {
    state: Arc<Mutex<State>>,
}

impl Projection for LoopbackProjection {
    type Handle = LoopbackHandle;

    fn announce_capture_task(&mut self) -> LabelledPlatformResult<()> {
        self.state.lock().announced = true;
        Ok(())
    }

    fn display_metrics(&mut self) -> LabelledPlatformResult<DisplayMetrics> {
        Ok(self.state.lock().metrics)
    }

    fn mint_handle(&mut self, grant: &CaptureGrant) -> LabelledPlatformResult<Self::Handle> {
        let mut state = self.state.lock();

        if !state.announced {
            return Err(PlatformError::new(
                "mint_handle",
                "the capture task was not announced before minting",
            ));
        }

        // The grant is single-use: it must match the one issued by the last
        // consent round-trip and is consumed here.
        match state.issued_payload.take() {
            Some(payload) if payload == grant.payload => {}
            _ => {
                return Err(PlatformError::new(
                    "mint_handle",
                    "the grant does not match the issued grant",
                ));
            }
        }

        state.revoked = false;

        // Watches subscribed by earlier sessions are gone; their notifiers
        // would otherwise pile up one per re-establishment.
        state.notifiers.clear();

        Ok(LoopbackHandle {
            state: Arc::clone(&self.state),
            released: false,
        })
    }
}

/// Loopback implementation of [`ProjectionHandle`].
pub struct LoopbackHandle {
    state: Arc<Mutex<State>>,
    released: bool,
}

impl ProjectionHandle for LoopbackHandle {
    type Reader = LoopbackReader;
    type Display = LoopbackDisplay;

    fn revocation(&mut self) -> RevocationWatch {
        let (notifier, watch) = RevocationWatch::pair();
        self.state.lock().notifiers.push(notifier);
        watch
    }

    fn create_reader(
        &mut self,
        metrics: DisplayMetrics,
        depth: usize,
    ) -> LabelledPlatformResult<Self::Reader> {
        if self.released {
            return Err(PlatformError::new(
                "create_reader",
                "the privileged handle has been released",
            ));
        }

        self.state.lock().readers_live += 1;

        Ok(LoopbackReader {
            state: Arc::clone(&self.state),
            metrics,
            depth,
            queue: VecDeque::new(),
            closed: false,
        })
    }

    fn create_virtual_display(
        &mut self,
        _metrics: DisplayMetrics,
        _reader: &mut Self::Reader,
    ) -> LabelledPlatformResult<Self::Display> {
        if self.released {
            return Err(PlatformError::new(
                "create_virtual_display",
                "the privileged handle has been released",
            ));
        }

        self.state.lock().displays_live += 1;

        Ok(LoopbackDisplay {
            state: Arc::clone(&self.state),
            released: false,
        })
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Loopback implementation of [`VirtualDisplay`].
pub struct LoopbackDisplay {
    state: Arc<Mutex<State>>,
    released: bool,
}

impl VirtualDisplay for LoopbackDisplay {
    fn release(&mut self) {
        if !self.released {
            self.state.lock().displays_live -= 1;
        }
        self.released = true;
    }
}

/// Loopback implementation of [`FrameReader`].
pub struct LoopbackReader {
    state: Arc<Mutex<State>>,
    metrics: DisplayMetrics,
    depth: usize,
    queue: VecDeque<RawFrame>,
    closed: bool,
}

impl FrameReader for LoopbackReader {
    fn acquire_latest_frame(&mut self) -> LabelledPlatformResult<Option<RawFrame>> {
        if self.closed {
            return Err(PlatformError::new(
                "acquire_latest_frame",
                "the reader is closed",
            ));
        }

        // Refill the bounded queue from the mirrored screen.
        {
            let mut state = self.state.lock();

            if state.revoked {
                return Err(PlatformError::new(
                    "acquire_latest_frame",
                    "the projection has been revoked",
                ));
            }

            if state.frames_available {
                while self.queue.len() < self.depth {
                    state.frame_counter += 1;
                    self.queue
                        .push_back(pattern::render(self.metrics, state.frame_counter));
                }
            }
        }

        // The newest frame wins; everything older is discarded.
        Ok(self.queue.drain(..).last())
    }

    fn close(&mut self) {
        if !self.closed {
            self.state.lock().readers_live -= 1;
        }
        self.queue.clear();
        self.closed = true;
    }
}
