//! MIDI input configuration.

use crate::error::{Error, Result};
use crate::queue::DEFAULT_QUEUE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VIRTUAL_PORT_NAME: &str = "MicroRack MIDI Bridge";
pub const DEFAULT_CLIENT_NAME: &str = "microrack-bridge";

/// Where MIDI comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MidiSource {
    /// Create a virtual destination other applications can send to.
    Virtual { name: String },
    /// Connect to an existing input port (exact name, index, or substring).
    Port { name: String },
}

impl MidiSource {
    pub fn virtual_port(name: impl Into<String>) -> Self {
        MidiSource::Virtual { name: name.into() }
    }

    pub fn port(name: impl Into<String>) -> Self {
        MidiSource::Port { name: name.into() }
    }

    pub fn name(&self) -> &str {
        match self {
            MidiSource::Virtual { name } | MidiSource::Port { name } => name,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, MidiSource::Virtual { .. })
    }
}

impl Default for MidiSource {
    fn default() -> Self {
        MidiSource::virtual_port(DEFAULT_VIRTUAL_PORT_NAME)
    }
}

/// Message classes the driver discards before they reach the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreFilter {
    None,
    Sysex,
    Time,
    #[default]
    ActiveSense,
    SysexAndTime,
    SysexAndActiveSense,
    TimeAndActiveSense,
    All,
}

impl IgnoreFilter {
    const NAMES: [(&'static str, IgnoreFilter); 8] = [
        ("none", IgnoreFilter::None),
        ("sysex", IgnoreFilter::Sysex),
        ("time", IgnoreFilter::Time),
        ("active_sense", IgnoreFilter::ActiveSense),
        ("sysex_and_time", IgnoreFilter::SysexAndTime),
        ("sysex_and_active_sense", IgnoreFilter::SysexAndActiveSense),
        ("time_and_active_sense", IgnoreFilter::TimeAndActiveSense),
        ("all", IgnoreFilter::All),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IgnoreFilter::None => "none",
            IgnoreFilter::Sysex => "sysex",
            IgnoreFilter::Time => "time",
            IgnoreFilter::ActiveSense => "active_sense",
            IgnoreFilter::SysexAndTime => "sysex_and_time",
            IgnoreFilter::SysexAndActiveSense => "sysex_and_active_sense",
            IgnoreFilter::TimeAndActiveSense => "time_and_active_sense",
            IgnoreFilter::All => "all",
        }
    }
}

impl fmt::Display for IgnoreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IgnoreFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, filter)| *filter)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::NAMES.iter().map(|(name, _)| *name).collect();
                format!("unknown ignore filter '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

#[cfg(feature = "midi-io")]
impl From<IgnoreFilter> for midir::Ignore {
    fn from(filter: IgnoreFilter) -> Self {
        match filter {
            IgnoreFilter::None => midir::Ignore::None,
            IgnoreFilter::Sysex => midir::Ignore::Sysex,
            IgnoreFilter::Time => midir::Ignore::Time,
            IgnoreFilter::ActiveSense => midir::Ignore::ActiveSense,
            IgnoreFilter::SysexAndTime => midir::Ignore::SysexAndTime,
            IgnoreFilter::SysexAndActiveSense => midir::Ignore::SysexAndActiveSense,
            IgnoreFilter::TimeAndActiveSense => midir::Ignore::TimeAndActiveSense,
            IgnoreFilter::All => midir::Ignore::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiInputConfig {
    pub source: MidiSource,
    pub ignore: IgnoreFilter,
    /// Slots in the callback-to-loop queue.
    pub queue_capacity: usize,
    /// Client name registered with the MIDI driver.
    pub client_name: String,
}

impl Default for MidiInputConfig {
    fn default() -> Self {
        Self {
            source: MidiSource::default(),
            ignore: IgnoreFilter::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
        }
    }
}

impl MidiInputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.source.name().trim().is_empty() {
            let what = if self.source.is_virtual() {
                "virtual port name"
            } else {
                "MIDI port name"
            };
            return Err(Error::InvalidConfig(format!("{} must not be empty", what)));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "queue_capacity must be greater than zero".to_string(),
            ));
        }
        if self.client_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "client_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
