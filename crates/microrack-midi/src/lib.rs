//! MIDI input subsystem for the MicroRack bridge.
//!
//! Provides device enumeration, named and virtual input ports, raw event
//! capture and a lock-free queue from the driver callback to the consumer.
//!
//! Feature gates: `midi-io` (driver access via midir).

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{
    IgnoreFilter, MidiInputConfig, MidiSource, DEFAULT_CLIENT_NAME, DEFAULT_VIRTUAL_PORT_NAME,
};

pub(crate) mod device;
pub use device::{find_device, MidiInputDevice};

pub(crate) mod event;
pub use event::{classify, MessageKind, RawMidiEvent};

pub mod queue;
pub use queue::{
    midi_event_queue, midi_event_queue_with_capacity, MidiEventConsumer, MidiEventProducer,
};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::{list_devices, open_input, MidiInputConnectionHandle};
