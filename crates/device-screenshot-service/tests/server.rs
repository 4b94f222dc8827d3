//! Tests for the request server's direct ingress path.

use core::time::Duration;
use std::fs;

use device_screenshot_service::{
    CaptureError, FrameCapturer, RequestServer, acquire_grant, server::CommChannel,
};
use projection_capture_provider::{
    CaptureSession, DisplayMetrics, PermissionBroker, Ready,
    loopback::{ConsentPolicy, LoopbackPlatform},
};
use tempfile::TempDir;

const METRICS: DisplayMetrics = DisplayMetrics {
    width: 1080,
    height: 2400,
    density_dpi: 420,
};

struct Fixture {
    platform: LoopbackPlatform,
    server: RequestServer,
    screenshot_dir: TempDir,
    comm_dir: TempDir,
}

fn fixture() -> Fixture {
    let platform = LoopbackPlatform::new(METRICS);
    let session = CaptureSession::new(platform.projection());

    let screenshot_dir = TempDir::new().unwrap();
    let comm_dir = TempDir::new().unwrap();

    let capturer = FrameCapturer::new(
        screenshot_dir.path().to_path_buf(),
        Duration::from_millis(10),
    );
    let comm = CommChannel::open(comm_dir.path()).unwrap();

    let server = RequestServer::start(session, capturer, comm, Duration::from_millis(20), 2);

    Fixture {
        platform,
        server,
        screenshot_dir,
        comm_dir,
    }
}

fn establish(fixture: &Fixture) -> Ready {
    let mut broker = PermissionBroker::new(fixture.platform.consent_surface());
    let grant = acquire_grant(&mut broker).unwrap();
    fixture.server.start_session(grant).unwrap()
}

#[test]
fn screenshot_decodes_to_the_full_screen() {
    let fixture = fixture();
    establish(&fixture);

    let path = fixture.server.take_screenshot().unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("screenshot_"));
    assert!(name.ends_with(".png"));
    assert!(path.is_absolute());

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (METRICS.width, METRICS.height));

    // The synthetic frame is a position gradient; a shifted or uncropped
    // frame would not decode to these values.
    let pixel = img.get_pixel(1079, 0);
    assert_eq!(pixel.0[0], (1079 & 0xFF) as u8);
    assert_eq!(pixel.0[1], 0);
    assert_eq!(pixel.0[3], 0xFF);
}

#[test]
fn screenshots_get_distinct_names() {
    let fixture = fixture();
    establish(&fixture);

    let first = fixture.server.take_screenshot().unwrap();
    let second = fixture.server.take_screenshot().unwrap();

    assert_ne!(first, second);
    assert!(first.exists());
    assert!(second.exists());
}

#[test]
fn requests_before_a_session_report_not_ready() {
    let fixture = fixture();

    assert!(!fixture.server.session_ready());

    let error = fixture.server.take_screenshot().unwrap_err();
    assert!(matches!(error, CaptureError::SessionNotReady));

    // Nothing was written.
    assert_eq!(fs::read_dir(fixture.screenshot_dir.path()).unwrap().count(), 0);
}

#[test]
fn denied_consent_reports_grant_denied() {
    let fixture = fixture();
    fixture.platform.set_consent_policy(ConsentPolicy::Dismiss);

    let mut broker = PermissionBroker::new(fixture.platform.consent_surface());
    let error = acquire_grant(&mut broker).unwrap_err();
    assert!(matches!(error, CaptureError::GrantDenied));

    // With no session established, requests report the missing session.
    let error = fixture.server.take_screenshot().unwrap_err();
    assert!(matches!(error, CaptureError::SessionNotReady));
}

#[test]
fn establishing_twice_reuses_the_session() {
    let fixture = fixture();

    assert_eq!(establish(&fixture), Ready::Started);
    assert_eq!(establish(&fixture), Ready::AlreadyActive);

    assert_eq!(fixture.platform.displays_live(), 1);
    assert_eq!(fixture.platform.readers_live(), 1);
}

#[test]
fn starved_reader_reports_no_frame() {
    let fixture = fixture();
    establish(&fixture);
    fixture.platform.set_frames_available(false);

    let error = fixture.server.take_screenshot().unwrap_err();
    assert!(matches!(error, CaptureError::NoFrameAvailable));
}

#[test]
fn revocation_keeps_the_server_alive() {
    let fixture = fixture();
    establish(&fixture);
    fixture.server.take_screenshot().unwrap();

    fixture.platform.revoke();

    // The server keeps answering; requests report the missing session.
    let error = fixture.server.take_screenshot().unwrap_err();
    assert!(matches!(error, CaptureError::SessionNotReady));
    assert!(!fixture.server.session_ready());
    assert_eq!(fixture.platform.displays_live(), 0);

    // A fresh grant re-establishes the session.
    assert_eq!(establish(&fixture), Ready::Started);
    fixture.server.take_screenshot().unwrap();
}

#[test]
fn stop_halts_the_session_and_polling() {
    let fixture = fixture();
    establish(&fixture);

    fixture.server.stop();

    assert!(!fixture.server.session_ready());
    assert_eq!(fixture.platform.displays_live(), 0);
    assert_eq!(fixture.platform.readers_live(), 0);

    let error = fixture.server.take_screenshot().unwrap_err();
    assert!(matches!(error, CaptureError::SessionNotReady));

    // A dropped marker is not consumed while polling is halted.
    let request = fixture
        .comm_dir
        .path()
        .join(device_screenshot_service::server::COMM_DIR)
        .join(device_screenshot_service::server::REQUEST_FILE);
    fs::write(&request, "").unwrap();
    std::thread::sleep(Duration::from_millis(150));
    assert!(request.exists());
}
