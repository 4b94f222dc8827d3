//! Translation from a consent round-trip to a capture grant.

use projection_capture_provider::{CaptureGrant, Consent, ConsentSurface, PermissionBroker};

use crate::error::CaptureError;

/// Run one consent round-trip and translate the outcome into a grant.
///
/// A denial is terminal for the round-trip; callers wanting another chance
/// must run a fresh one.
pub fn acquire_grant<C: ConsentSurface>(
    broker: &mut PermissionBroker<C>,
) -> Result<CaptureGrant, CaptureError> {
    match broker.request_grant() {
        Ok(Consent::Granted(grant)) => Ok(grant),
        Ok(Consent::Denied) => Err(CaptureError::GrantDenied),
        Err(error) => Err(CaptureError::CaptureFailed(error.to_string())),
    }
}
