//! The file-drop channel external requesters use.
//!
//! A requester drops an empty marker file to ask for a screenshot and reads
//! the result marker back. File contents are `success:<absolute path>` or
//! `error:<message>`.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::error::CaptureError;

/// Name of the channel directory.
pub const COMM_DIR: &str = "ghost_comm";

/// Name of the request marker file.
pub const REQUEST_FILE: &str = "capture_request";

/// Name of the result marker file.
pub const RESULT_FILE: &str = "capture_result";

/// One end of the file-drop channel.
pub struct CommChannel {
    dir: PathBuf,
}

impl CommChannel {
    /// Open the channel under `base`, sweeping any markers left over from a
    /// previous run.
    pub fn open(base: &Path) -> io::Result<Self> {
        let dir = base.join(COMM_DIR);
        fs::create_dir_all(&dir)?;

        let channel = Self { dir };

        for stale in [channel.request_path(), channel.result_path()] {
            match fs::remove_file(&stale) {
                Ok(()) => warn!("Removed stale marker {}", stale.display()),
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => return Err(error),
            }
        }

        Ok(channel)
    }

    /// Path to the request marker.
    pub fn request_path(&self) -> PathBuf {
        self.dir.join(REQUEST_FILE)
    }

    /// Path to the result marker.
    pub fn result_path(&self) -> PathBuf {
        self.dir.join(RESULT_FILE)
    }

    /// Consume a pending request marker if one has been dropped.
    ///
    /// The remove doubles as the existence check, so a marker is consumed
    /// exactly once.
    pub fn take_request(&self) -> bool {
        match fs::remove_file(self.request_path()) {
            Ok(()) => {
                debug!("Request marker detected");
                true
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => false,
            Err(error) => {
                warn!("Could not remove the request marker: {error}");
                false
            }
        }
    }

    /// Write the result marker for a served request.
    pub fn write_result(&self, result: &Result<PathBuf, CaptureError>) -> io::Result<()> {
        let contents = match result {
            Ok(path) => format!("success:{}", path.display()),
            Err(error) => format!("error:{error}"),
        };

        fs::write(self.result_path(), contents)
    }
}
