//! Centralized error type for the bridge umbrella crate.
//!
//! Wraps both subsystem errors so `?` propagates naturally across crate boundaries.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("MIDI: {0}")]
    Midi(#[from] microrack_midi::Error),

    #[error("Serial: {0}")]
    Serial(#[from] microrack_serial::Error),

    #[error("Serial write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("Cannot read config file {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
