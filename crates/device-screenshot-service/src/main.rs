//! # Device Screenshot Service
//! Binary entry point wiring the loopback platform into the request server.
//!

use std::io::BufRead;

use device_screenshot_service::{
    Config, FrameCapturer, RequestServer, acquire_grant, directories,
    failure::{Failure, Ignore},
    logger::setup_logger, server::CommChannel,
};
use mimalloc::MiMalloc;
use projection_capture_provider::{
    CaptureSession, DisplayMetrics, PermissionBroker, loopback::LoopbackPlatform,
};
use tracing::{info, info_span, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// The Cargo package version.
#[cfg(not(debug_assertions))]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The Cargo package version or '0.0.0' if a non-release build.
#[cfg(debug_assertions)]
pub const VERSION: &str = "0.0.0";

/// If this instance should have debug enabled.
pub fn should_debug() -> bool {
    std::env::args().any(|arg| arg.eq("--debug"))
}

fn main() {
    // Set up logger
    let _logger_guards = setup_logger(&directories::config_dir(), should_debug())
        .log_and_panic("Could not set up the logger");

    // Log application start
    let _span = info_span!("[Main Thread]").entered();
    info!("Device Screenshot Service v{}", VERSION);

    // Load config
    let config = Config::load_or_create().log_and_panic("Could not load the config");

    // The loopback platform mirrors a synthetic screen; hosts with a real
    // projection API plug in here instead.
    let platform = LoopbackPlatform::new(DisplayMetrics {
        width: 1080,
        height: 2400,
        density_dpi: 420,
    });
    let mut broker = PermissionBroker::new(platform.consent_surface());
    let session = CaptureSession::new(platform.projection());

    let capturer = FrameCapturer::new(directories::screenshot_dir(), config.settle_delay());
    let comm = CommChannel::open(&directories::comm_dir())
        .log_and_panic("Could not open the file-drop channel");

    let server = RequestServer::start(
        session,
        capturer,
        comm,
        config.poll_interval(),
        config.reader_depth,
    );

    // Establish the session from a fresh grant
    {
        broker
            .bring_to_foreground()
            .log("Could not bring the service to the foreground")
            .ignore();

        let grant = match acquire_grant(&mut broker) {
            Ok(grant) => grant,
            Err(error) => {
                warn!("Exiting: {error}");
                return;
            }
        };

        server
            .start_session(grant)
            .log_and_panic("Could not establish the capture session");
    }

    info!("Serving requests; press Enter for a screenshot, close stdin to exit");

    // Each stdin line triggers a direct capture; markers are served by the
    // server's own polling in the meantime.
    for line in std::io::stdin().lock().lines() {
        if line.is_err() {
            break;
        }

        match server.take_screenshot() {
            Ok(path) => info!("Screenshot saved to {}", path.display()),
            Err(error) => warn!("Capture failed: {error}"),
        }
    }

    server.stop();
}
