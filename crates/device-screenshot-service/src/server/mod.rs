//! The request server: one worker thread serving both ingress paths.
//!
//! Direct requests and file-drop markers are funnelled through the same
//! single-slot queue, so at most one capture is in flight and a second
//! request waits rather than interleaving.

mod comm;
mod worker;

pub use comm::{COMM_DIR, CommChannel, REQUEST_FILE, RESULT_FILE};

use std::{
    path::PathBuf,
    sync::mpsc::{RecvTimeoutError, Sender, SyncSender, channel, sync_channel},
    thread::{self, JoinHandle},
};

use core::time::Duration;

use projection_capture_provider::{CaptureGrant, CaptureSession, Projection, Ready, StartError};
use thiserror::Error;
use tracing::{error, info_span};

use crate::{
    capturer::FrameCapturer,
    error::CaptureError,
    failure::{Failure, Ignore},
};

use worker::InnerServer;

enum Message {
    StartSession(CaptureGrant, Sender<Result<Ready, StartError>>),
    TakeScreenshot(Sender<Result<PathBuf, CaptureError>>),
    CheckReady(Sender<bool>),
    Stop,
    Shutdown,
}

/// Handle to the request server thread.
pub struct RequestServer {
    // Option allows for joining the thread which requires ownership.
    thread: Option<JoinHandle<()>>,
    sender: SyncSender<Message>,
}

impl RequestServer {
    /// Start the server thread over an established or to-be-established
    /// session.
    ///
    /// The thread polls for dropped request markers every `poll_interval`
    /// while no direct message is pending.
    pub fn start<P: Projection>(
        session: CaptureSession<P>,
        capturer: FrameCapturer,
        comm: CommChannel,
        poll_interval: Duration,
        reader_depth: usize,
    ) -> Self {
        // Single-slot queue: a second request waits for the one in flight.
        let (sender, receiver) = sync_channel(1);

        let thread = thread::Builder::new()
            .name("Request Server".into())
            .spawn(move || {
                let _span = info_span!("[Request Server]").entered();
                let mut inner = InnerServer::new(session, capturer, comm, reader_depth);

                loop {
                    match receiver.recv_timeout(poll_interval) {
                        Ok(Message::Shutdown) => break,
                        Ok(Message::StartSession(grant, reply)) => {
                            inner.start_session(&grant, reply);
                        }
                        Ok(Message::TakeScreenshot(reply)) => inner.serve_direct(reply),
                        Ok(Message::CheckReady(reply)) => {
                            reply.send(inner.session_ready()).ignore();
                        }
                        Ok(Message::Stop) => inner.stop(),
                        Err(RecvTimeoutError::Timeout) => inner.poll(),
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }

                inner.stop();
            })
            .log_and_panic("Could not start the request server thread");

        Self {
            thread: Some(thread),
            sender,
        }
    }

    /// Establish the capture session from a grant.
    pub fn start_session(&self, grant: CaptureGrant) -> Result<Ready, StartSessionError> {
        let (reply, response) = channel();

        self.sender
            .send(Message::StartSession(grant, reply))
            .map_err(|_| StartSessionError::ServerStopped)?;

        let result = response.recv().map_err(|_| StartSessionError::ServerStopped)?;
        Ok(result?)
    }

    /// Request a screenshot and block until it has been served.
    pub fn take_screenshot(&self) -> Result<PathBuf, CaptureError> {
        let (reply, response) = channel();

        self.sender
            .send(Message::TakeScreenshot(reply))
            .map_err(|_| CaptureError::CaptureFailed("the request server is not running".into()))?;

        response.recv().map_err(|_| {
            CaptureError::CaptureFailed("the request server dropped the request".into())
        })?
    }

    /// Whether a capture session is currently established.
    pub fn session_ready(&self) -> bool {
        let (reply, response) = channel();

        if self.sender.send(Message::CheckReady(reply)).is_err() {
            return false;
        }

        response.recv().unwrap_or(false)
    }

    /// Stop the capture session and halt marker polling.
    ///
    /// The server thread stays alive; later requests are answered with
    /// [`CaptureError::SessionNotReady`] until a new session is established.
    pub fn stop(&self) {
        self.sender.send(Message::Stop).ignore();
    }
}

impl Drop for RequestServer {
    fn drop(&mut self) {
        self.sender.send(Message::Shutdown).ignore();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Joining Request Server thread returned an error");
            }
        }
    }
}

/// Reasons a session could not be established through the server.
#[derive(Debug, Error)]
pub enum StartSessionError {
    /// The session itself failed to start.
    #[error("Failed to establish the capture session:\n{0}")]
    Session(#[from] StartError),

    /// The server thread is no longer running.
    #[error("The request server is not running")]
    ServerStopped,
}
