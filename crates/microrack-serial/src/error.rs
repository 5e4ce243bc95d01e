//! Error types for the serial output subsystem.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial port enumeration failed: {0}")]
    Enumerate(#[source] serialport::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
