//! Tests for the loopback frame-buffer reader.

use projection_capture_provider::{
    CaptureSession, Consent, DisplayMetrics, FrameReader, PermissionBroker,
    loopback::{LoopbackPlatform, LoopbackProjection, PADDING_BYTE, ROW_ALIGNMENT},
};

const METRICS: DisplayMetrics = DisplayMetrics {
    width: 50,
    height: 30,
    density_dpi: 160,
};

fn started(platform: &LoopbackPlatform) -> CaptureSession<LoopbackProjection> {
    let mut broker = PermissionBroker::new(platform.consent_surface());
    let grant = match broker.request_grant().unwrap() {
        Consent::Granted(grant) => grant,
        Consent::Denied => panic!("Consent should be granted"),
    };

    let mut session = CaptureSession::new(platform.projection());
    session.start(&grant, 2).unwrap();
    session
}

#[test]
fn frames_carry_aligned_stride_and_padding() {
    let platform = LoopbackPlatform::new(METRICS);
    let mut session = started(&platform);

    let reader = session.reader_mut().unwrap();
    let frame = reader.acquire_latest_frame().unwrap().unwrap();

    assert_eq!(frame.width, METRICS.width);
    assert_eq!(frame.height, METRICS.height);
    assert_eq!(frame.row_stride % ROW_ALIGNMENT, 0);
    assert!(frame.row_stride > frame.width * frame.pixel_stride);
    assert_eq!(frame.data.len(), (frame.row_stride * frame.height) as usize);

    // Every byte past the tight row is padding.
    let tight_row = (frame.width * frame.pixel_stride) as usize;
    for y in 0..frame.height as usize {
        let row = y * frame.row_stride as usize;
        for &byte in &frame.data[row + tight_row..row + frame.row_stride as usize] {
            assert_eq!(byte, PADDING_BYTE);
        }
    }
}

#[test]
fn pull_returns_the_newest_queued_frame() {
    let platform = LoopbackPlatform::new(METRICS);
    let mut session = started(&platform);

    let reader = session.reader_mut().unwrap();

    // Depth 2: the first pull drains frames 1 and 2 and keeps the newer.
    let frame = reader.acquire_latest_frame().unwrap().unwrap();
    assert_eq!(frame.data[2], 2);

    let frame = reader.acquire_latest_frame().unwrap().unwrap();
    assert_eq!(frame.data[2], 4);
}

#[test]
fn starved_reader_finds_no_frame() {
    let platform = LoopbackPlatform::new(METRICS);
    let mut session = started(&platform);
    platform.set_frames_available(false);

    let reader = session.reader_mut().unwrap();
    assert!(reader.acquire_latest_frame().unwrap().is_none());

    platform.set_frames_available(true);
    assert!(reader.acquire_latest_frame().unwrap().is_some());
}

#[test]
fn revoked_projection_fails_the_pull() {
    let platform = LoopbackPlatform::new(METRICS);
    let mut session = started(&platform);
    platform.revoke();

    let reader = session.reader_mut().unwrap();
    let error = reader.acquire_latest_frame().unwrap_err();
    assert_eq!(error.call(), "acquire_latest_frame");
}

#[test]
fn pixel_gradient_encodes_position() {
    let platform = LoopbackPlatform::new(METRICS);
    let mut session = started(&platform);

    let reader = session.reader_mut().unwrap();
    let frame = reader.acquire_latest_frame().unwrap().unwrap();

    let x = 17usize;
    let y = 23usize;
    let index = y * frame.row_stride as usize + x * frame.pixel_stride as usize;
    assert_eq!(frame.data[index], x as u8);
    assert_eq!(frame.data[index + 1], y as u8);
    assert_eq!(frame.data[index + 3], 0xFF);
}
