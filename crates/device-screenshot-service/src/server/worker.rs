use std::{path::PathBuf, sync::mpsc::Sender};

use projection_capture_provider::{CaptureGrant, CaptureSession, Projection, Ready, StartError};
use tracing::{debug, error, info, warn};

use crate::{capturer::FrameCapturer, error::CaptureError, failure::Ignore};

use super::comm::CommChannel;

/// Where a request came from, and so where its result goes.
enum Ingress {
    Direct(Sender<Result<PathBuf, CaptureError>>),
    Marker,
}

pub(super) struct InnerServer<P: Projection> {
    session: CaptureSession<P>,
    capturer: FrameCapturer,
    comm: CommChannel,
    reader_depth: usize,
    polling: bool,
}

impl<P: Projection> InnerServer<P> {
    pub fn new(
        session: CaptureSession<P>,
        capturer: FrameCapturer,
        comm: CommChannel,
        reader_depth: usize,
    ) -> Self {
        Self {
            session,
            capturer,
            comm,
            reader_depth,
            polling: true,
        }
    }

    pub fn start_session(
        &mut self,
        grant: &CaptureGrant,
        reply: Sender<Result<Ready, StartError>>,
    ) {
        let result = self.session.start(grant, self.reader_depth);

        match &result {
            Ok(Ready::Started) => {
                info!("Capture session established");
                self.polling = true;
            }
            Ok(Ready::AlreadyActive) => debug!("Capture session already established"),
            Err(error) => error!("Could not establish the capture session: {error}"),
        }

        reply.send(result).ignore();
    }

    pub fn session_ready(&mut self) -> bool {
        self.session.is_ready()
    }

    /// One poll tick: notice a revocation and look for a dropped request.
    pub fn poll(&mut self) {
        self.session.poll_revocation();

        if self.polling && self.comm.take_request() {
            self.serve(Ingress::Marker);
        }
    }

    pub fn serve_direct(&mut self, reply: Sender<Result<PathBuf, CaptureError>>) {
        self.serve(Ingress::Direct(reply));
    }

    fn serve(&mut self, ingress: Ingress) {
        let result = self.capturer.capture(&mut self.session);

        match &result {
            Ok(path) => info!("Served screenshot: {}", path.display()),
            Err(error) => warn!("Could not serve the screenshot: {error}"),
        }

        match ingress {
            Ingress::Direct(reply) => reply.send(result).ignore(),
            Ingress::Marker => {
                if let Err(error) = self.comm.write_result(&result) {
                    error!("Could not write the result marker: {error}");
                }
            }
        }
    }

    pub fn stop(&mut self) {
        self.session.stop();

        if self.polling {
            self.polling = false;
            debug!("File polling halted");
        }
    }
}
