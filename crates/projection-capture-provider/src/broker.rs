//! The permission broker: one consent round-trip per grant.

use tracing::info;

use crate::{Consent, ConsentSurface, LabelledPlatformResult};

/// Obtains a one-time capture grant from the platform consent flow.
///
/// Grants are never cached or reused across process restarts; a fresh one
/// must be requested each time a session is established from cold start.
pub struct PermissionBroker<C: ConsentSurface> {
    surface: C,
}

impl<C: ConsentSurface> PermissionBroker<C> {
    /// Create a broker over the given consent surface.
    pub fn new(surface: C) -> Self {
        Self { surface }
    }

    /// Run a single consent round-trip.
    ///
    /// Blocks until the user accepts or dismisses. A denial is terminal for
    /// this round-trip; no retry is attempted.
    pub fn request_grant(&mut self) -> LabelledPlatformResult<Consent> {
        let consent = self.surface.request_capture_consent()?;

        match &consent {
            Consent::Granted(_) => info!("Capture grant obtained"),
            Consent::Denied => info!("Capture grant denied by the user"),
        }

        Ok(consent)
    }

    /// Bring the requesting application in front of other windows.
    pub fn bring_to_foreground(&mut self) -> LabelledPlatformResult<()> {
        self.surface.bring_to_foreground()
    }
}
