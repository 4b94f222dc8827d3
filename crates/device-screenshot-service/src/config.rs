//! User configuration for the service timings.

use core::time::Duration;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directories::config_dir;

const CONFIG_FILE: &str = "device-screenshot.toml";

/// Timing and depth knobs for the request server.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// How often the server looks for a dropped request marker, in
    /// milliseconds.
    pub poll_interval_ms: u64,

    /// How long a capture waits for the virtual display to settle before
    /// pulling a frame, in milliseconds.
    pub settle_delay_ms: u64,

    /// How many frames the frame-buffer reader queues.
    pub reader_depth: usize,
}

/// Reasons the config file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Opening the config file failed.
    #[error("Failed to open config file:\n{0}")]
    OpenFile(#[source] io::Error),

    /// Writing the default config file failed.
    #[error("Failed to save config file:\n{0}")]
    SaveFile(#[from] SaveError),

    /// Reading the config file failed.
    #[error("Failed to read config file:\n{0}")]
    ReadFile(#[source] io::Error),

    /// The config file contents were not valid.
    #[error("Failed to deserialize config:\n{0}")]
    Deserialize(#[from] toml::de::Error),
}

/// Reasons the config file could not be saved.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Serializing the config failed.
    #[error("Failed to serialize config:\n{0}")]
    Serialize(#[from] toml::ser::Error),

    /// Writing the config file failed.
    #[error("Failed to write file:\n{0}")]
    Write(#[from] io::Error),
}

impl Config {
    /// Load the config file, creating it with defaults if it does not exist.
    pub fn load_or_create() -> Result<Self, LoadError> {
        let file = fs::File::open(Self::file_path());

        if file
            .as_ref()
            .is_err_and(|e| e.kind() == io::ErrorKind::NotFound)
        {
            let config = Self::default();
            config.save()?;

            return Ok(config);
        }

        let mut file = file.map_err(LoadError::OpenFile)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(LoadError::ReadFile)?;

        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Save the config to its file.
    pub fn save(&self) -> Result<(), SaveError> {
        let toml_string = toml::to_string_pretty(self)?;

        fs::write(Self::file_path(), toml_string.as_bytes())?;
        Ok(())
    }

    /// Path to the config file.
    pub fn file_path() -> PathBuf {
        config_dir().join(CONFIG_FILE)
    }

    /// The marker poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// The capture settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            settle_delay_ms: 100,
            reader_depth: 2,
        }
    }
}
