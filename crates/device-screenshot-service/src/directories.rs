//! The directories the service reads and writes.

use std::fs::create_dir_all;

use crate::failure::{Failure, Ignore};

const APP_DIR: &str = "device-screenshot";

/// Path to the screenshot directory.
pub fn screenshot_dir() -> std::path::PathBuf {
    let dir = dirs::picture_dir()
        .log_and_panic("The picture directory could not be retrieved")
        .join("Screenshots");

    create_dir_all(&dir)
        .log("Could not create the screenshot directory")
        .ignore();

    dir
}

/// Path to the config directory.
pub fn config_dir() -> std::path::PathBuf {
    let dir = dirs::config_dir()
        .log_and_panic("The config directory could not be retrieved")
        .join(APP_DIR);

    create_dir_all(&dir)
        .log("Could not create the config directory")
        .ignore();

    dir
}

/// Path to the directory the file-drop channel lives under.
pub fn comm_dir() -> std::path::PathBuf {
    let dir = dirs::cache_dir()
        .log_and_panic("The cache directory could not be retrieved")
        .join(APP_DIR);

    create_dir_all(&dir)
        .log("Could not create the comm directory")
        .ignore();

    dir
}
