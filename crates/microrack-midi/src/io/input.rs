//! MIDI input: device enumeration, connection and virtual port creation.
//!
//! Every message the driver delivers is copied into the event queue from the
//! midir callback thread. Nothing is parsed here.

use crate::config::{MidiInputConfig, MidiSource};
use crate::device::{find_device, MidiInputDevice};
use crate::error::{Error, Result};
use crate::event::RawMidiEvent;
use crate::queue::MidiEventProducer;
use midir::{MidiInput, MidiInputConnection, MidiInputPort};
use tracing::debug;

/// Live connection to a MIDI input. Dropping it closes the port.
pub struct MidiInputConnectionHandle {
    connection: MidiInputConnection<MidiEventProducer>,
    port_name: String,
    is_virtual: bool,
}

impl MidiInputConnectionHandle {
    /// Name of the connected port, or of the virtual port that was created.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn close(self) {
        let (_input, _producer) = self.connection.close();
        debug!("Closed MIDI input '{}'", self.port_name);
    }
}

impl std::fmt::Debug for MidiInputConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiInputConnectionHandle")
            .field("port_name", &self.port_name)
            .field("is_virtual", &self.is_virtual)
            .finish()
    }
}

fn on_message(timestamp_us: u64, message: &[u8], producer: &mut MidiEventProducer) {
    if message.is_empty() {
        return;
    }
    if !producer.push(RawMidiEvent::new(timestamp_us, message)) {
        debug!("MIDI input queue full, dropping {} byte message", message.len());
    }
}

fn enumerate(midi_input: &MidiInput, ports: &[MidiInputPort]) -> Vec<MidiInputDevice> {
    ports
        .iter()
        .enumerate()
        .map(|(index, port)| MidiInputDevice {
            index,
            name: midi_input
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index)),
        })
        .collect()
}

/// Lists the MIDI input ports currently visible to the driver.
pub fn list_devices() -> Result<Vec<MidiInputDevice>> {
    let midi_input = MidiInput::new("microrack-device-list")?;
    let ports = midi_input.ports();
    Ok(enumerate(&midi_input, &ports))
}

/// Opens the configured source and starts pushing events into `producer`.
pub fn open_input(
    config: &MidiInputConfig,
    producer: MidiEventProducer,
) -> Result<MidiInputConnectionHandle> {
    config.validate()?;

    let mut midi_input = MidiInput::new(&config.client_name)?;
    midi_input.ignore(config.ignore.into());

    match &config.source {
        MidiSource::Port { name } => connect_port(midi_input, name, producer),
        MidiSource::Virtual { name } => create_virtual(midi_input, name, producer),
    }
}

fn connect_port(
    midi_input: MidiInput,
    query: &str,
    producer: MidiEventProducer,
) -> Result<MidiInputConnectionHandle> {
    let ports = midi_input.ports();
    let devices = enumerate(&midi_input, &ports);
    let device = find_device(&devices, query)
        .ok_or_else(|| Error::PortNotFound(query.to_string()))?;
    let port = ports
        .get(device.index)
        .ok_or_else(|| Error::PortNotFound(query.to_string()))?;

    let connection = midi_input.connect(port, "microrack-input", on_message, producer)?;
    debug!("Connected MIDI input {}: {}", device.index, device.name);

    Ok(MidiInputConnectionHandle {
        connection,
        port_name: device.name.clone(),
        is_virtual: false,
    })
}

#[cfg(unix)]
fn create_virtual(
    midi_input: MidiInput,
    name: &str,
    producer: MidiEventProducer,
) -> Result<MidiInputConnectionHandle> {
    use midir::os::unix::VirtualInput;

    let connection = midi_input.create_virtual(name, on_message, producer)?;
    debug!("Created virtual MIDI input '{}'", name);

    Ok(MidiInputConnectionHandle {
        connection,
        port_name: name.to_string(),
        is_virtual: true,
    })
}

#[cfg(not(unix))]
fn create_virtual(
    _midi_input: MidiInput,
    _name: &str,
    _producer: MidiEventProducer,
) -> Result<MidiInputConnectionHandle> {
    Err(Error::VirtualPortUnsupported)
}
