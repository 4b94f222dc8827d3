//! Platform seam and session lifecycle for grant-based screen capture.
//!
//! The platform's projection API is reached through the traits in
//! [`platform`]; [`session::CaptureSession`] owns the privileged handle,
//! virtual display, and frame-buffer reader minted from a one-time
//! [`CaptureGrant`]. The [`loopback`] module provides a software platform for
//! hosts without an OS projection API and for the test suite.

pub mod broker;
pub mod loopback;
pub mod platform;
pub mod session;

mod frame;
mod grant;
mod metrics;
mod result;

pub use broker::PermissionBroker;
pub use frame::RawFrame;
pub use grant::{CaptureGrant, Consent};
pub use metrics::DisplayMetrics;
pub use platform::{
    ConsentSurface, FrameReader, Projection, ProjectionHandle, RevocationNotifier,
    RevocationWatch, VirtualDisplay,
};
pub use result::{LabelledPlatformResult, PlatformError};
pub use session::{CaptureSession, Ready, StartError};
