//! # Device Screenshot Service
//! Serves on-demand screenshots of the device screen from a long-lived
//! projection capture session.
//!
//! Requests arrive either directly over an in-process channel or as marker
//! files dropped by an external process; both are serialized through a single
//! request server. Results are PNG files in the screenshot directory.

pub mod capturer;
pub mod config;
pub mod consent;
pub mod directories;
pub mod error;
pub mod failure;
pub mod logger;
pub mod server;

pub use capturer::FrameCapturer;
pub use config::Config;
pub use consent::acquire_grant;
pub use error::CaptureError;
pub use server::{CommChannel, RequestServer, StartSessionError};
