/// A one-time capture authorization issued by the platform consent flow.
///
/// Immutable once obtained, consumed by minting the privileged handle, and
/// never cached across process restarts. The platform invalidates it if the
/// user stops projection from a system control; the session observes that
/// through the revocation watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureGrant {
    /// Platform result code from the consent round-trip.
    pub result_code: i32,

    /// Opaque platform payload backing the grant.
    pub payload: Box<[u8]>,
}

/// Outcome of a consent round-trip.
#[derive(Debug)]
pub enum Consent {
    /// The user accepted; the grant authorizes minting a privileged handle.
    Granted(CaptureGrant),

    /// The user dismissed or declined. Terminal for this round-trip, no
    /// retry is attempted.
    Denied,
}
