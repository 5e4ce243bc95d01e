//! # MicroRack MIDI bridge
//!
//! Relays MIDI from a virtual or hardware input port to a serial device,
//! byte for byte.
//!
//! ## Architecture
//!
//! The umbrella crate coordinates two subsystems:
//! - **microrack-midi** - MIDI input (enumeration, named/virtual ports, event queue)
//! - **microrack-serial** - Serial output (enumeration, 8N1 link at a fixed baud rate)
//!
//! The midir callback pushes every incoming message into a lock-free queue.
//! The [`Forwarder`] drains that queue on a short poll interval, drops meta
//! events and writes everything else to the serial port unchanged.
//!
//! ## Quick Start
//!
//! ```ignore
//! use microrack_bridge::Bridge;
//!
//! let mut bridge = Bridge::builder()
//!     .serial_port("/dev/ttyUSB0")
//!     .build()
//!     .and_then(Bridge::open)?;
//!
//! let running = bridge.running_flag();
//! // hand `running` to a signal handler, then:
//! bridge.run()?;
//! bridge.close();
//! ```

pub use microrack_midi as midi;
pub use microrack_serial as serial;

mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::BridgeConfig;

mod builder;
pub use builder::BridgeBuilder;

pub mod forward;
pub use forward::{ForwardStats, Forwarder};

mod bridge;
pub use bridge::Bridge;

pub mod listing;

pub use microrack_midi::{IgnoreFilter, MidiSource, RawMidiEvent};
pub use microrack_serial::SerialConfig;
