//! Tests for the file-drop ingress path.

use core::time::Duration;
use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use device_screenshot_service::{
    FrameCapturer, RequestServer, acquire_grant,
    server::{COMM_DIR, CommChannel, REQUEST_FILE, RESULT_FILE},
};
use projection_capture_provider::{
    CaptureSession, DisplayMetrics, PermissionBroker, loopback::LoopbackPlatform,
};
use tempfile::TempDir;

const METRICS: DisplayMetrics = DisplayMetrics {
    width: 320,
    height: 640,
    density_dpi: 320,
};

struct Fixture {
    platform: LoopbackPlatform,
    server: RequestServer,
    _screenshot_dir: TempDir,
    comm_dir: TempDir,
}

impl Fixture {
    fn request_path(&self) -> PathBuf {
        self.comm_dir.path().join(COMM_DIR).join(REQUEST_FILE)
    }

    fn result_path(&self) -> PathBuf {
        self.comm_dir.path().join(COMM_DIR).join(RESULT_FILE)
    }
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
        _screenshot_dir: screenshot_dir,
        comm_dir,
    }
}

fn establish(fixture: &Fixture) {
    let mut broker = PermissionBroker::new(fixture.platform.consent_surface());
    let grant = acquire_grant(&mut broker).unwrap();
    fixture.server.start_session(grant).unwrap();
}

/// Block until the result marker appears, then consume and return it.
fn await_result(path: &Path) -> String {
    let deadline = Instant::now() + Duration::from_secs(5);

    loop {
        if let Ok(contents) = fs::read_to_string(path) {
            fs::remove_file(path).unwrap();
            return contents;
        }

        assert!(Instant::now() < deadline, "No result marker was written");
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn dropped_marker_is_served() {
    let fixture = fixture();
    establish(&fixture);

    fs::write(fixture.request_path(), "").unwrap();

    let contents = await_result(&fixture.result_path());
    let path = contents
        .strip_prefix("success:")
        .expect("Result should be a success");

    // The request marker was consumed.
    assert!(!fixture.request_path().exists());

    let img = image::open(path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (METRICS.width, METRICS.height));
}

#[test]
fn marker_without_a_session_reports_the_error() {
    let fixture = fixture();

    fs::write(fixture.request_path(), "").unwrap();

    let contents = await_result(&fixture.result_path());
    assert_eq!(contents, "error:Projection session is not ready");
}

#[test]
fn consecutive_markers_are_each_served() {
    let fixture = fixture();
    establish(&fixture);

    fs::write(fixture.request_path(), "").unwrap();
    let first = await_result(&fixture.result_path());

    fs::write(fixture.request_path(), "").unwrap();
    let second = await_result(&fixture.result_path());

    assert!(first.starts_with("success:"));
    assert!(second.starts_with("success:"));
    assert_ne!(first, second);
}

#[test]
fn stale_markers_are_swept_on_open() {
    let dir = TempDir::new().unwrap();
    let comm = dir.path().join(COMM_DIR);
    fs::create_dir_all(&comm).unwrap();

    fs::write(comm.join(REQUEST_FILE), "").unwrap();
    fs::write(comm.join(RESULT_FILE), "success:/nowhere").unwrap();

    CommChannel::open(dir.path()).unwrap();

    assert!(!comm.join(REQUEST_FILE).exists());
    assert!(!comm.join(RESULT_FILE).exists());
}
