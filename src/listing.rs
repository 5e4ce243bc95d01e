//! Human-readable port listings for `--list`.

use microrack_midi::MidiInputDevice;
use microrack_serial::SerialDevice;
use std::fmt::Write;

pub fn format_midi_inputs(devices: &[MidiInputDevice]) -> String {
    if devices.is_empty() {
        return "No MIDI input ports found.\n".to_string();
    }
    let mut out = String::from("Available MIDI input ports:\n");
    for device in devices {
        let _ = writeln!(out, "  [{}] {}", device.index, device.name);
    }
    out
}

pub fn format_serial_ports(ports: &[SerialDevice]) -> String {
    if ports.is_empty() {
        return "No serial ports found.\n".to_string();
    }
    let mut out = String::from("Available serial ports:\n");
    for port in ports {
        let _ = writeln!(out, "  {} ({})", port.name, port.kind);
    }
    out
}
