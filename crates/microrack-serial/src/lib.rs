//! Serial output subsystem for the MicroRack bridge.
//!
//! Opens a serial device at a fixed baud rate and exposes it as an
//! `io::Write` sink. Bytes are written as given, with no framing.

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{SerialConfig, DEFAULT_BAUD_RATE, DEFAULT_TIMEOUT_MS};

mod device;
pub use device::{list_ports, SerialDevice, SerialKind};

mod link;
pub use link::SerialLink;
