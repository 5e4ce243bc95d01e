//! Builder for configuring and opening a `Bridge`.

use crate::config::BridgeConfig;
use crate::{Bridge, Result};
use microrack_midi::{IgnoreFilter, MidiSource};
use std::time::Duration;

/// Starts from defaults (or a loaded [`BridgeConfig`]) and applies overrides.
///
/// # Example
///
/// ```ignore
/// use microrack_bridge::Bridge;
///
/// let mut bridge = Bridge::builder()
///     .serial_port("/dev/ttyUSB0")
///     .baud_rate(115_200)
///     .midi_port("KeyStep")
///     .open()?;
///
/// bridge.run()?;
/// bridge.close();
/// ```
#[derive(Debug, Clone, Default)]
pub struct BridgeBuilder {
    config: BridgeConfig,
}

impl BridgeBuilder {
    pub fn from_config(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn serial_port(mut self, path: impl Into<String>) -> Self {
        self.config.serial.path = path.into();
        self
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.config.serial.baud_rate = baud_rate;
        self
    }

    pub fn serial_timeout(mut self, timeout: Duration) -> Self {
        self.config.serial.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Connect to an existing MIDI input instead of creating a virtual one.
    pub fn midi_port(mut self, name: impl Into<String>) -> Self {
        self.config.midi.source = MidiSource::port(name);
        self
    }

    pub fn virtual_port(mut self, name: impl Into<String>) -> Self {
        self.config.midi.source = MidiSource::virtual_port(name);
        self
    }

    pub fn ignore(mut self, filter: IgnoreFilter) -> Self {
        self.config.midi.ignore = filter;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.midi.queue_capacity = capacity;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// True once a serial device path has been set.
    pub fn has_serial_port(&self) -> bool {
        !self.config.serial.path.trim().is_empty()
    }

    /// Validates and returns the assembled config.
    pub fn build(self) -> Result<BridgeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Validates the config, then opens the serial port and the MIDI input.
    pub fn open(self) -> Result<Bridge> {
        Bridge::open(self.build()?)
    }
}
