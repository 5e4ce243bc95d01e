//! Bridge configuration: serial target, MIDI source and loop timing.
//!
//! Every field has a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! poll_interval_ms = 1
//!
//! [serial]
//! path = "/dev/ttyUSB0"
//! baud_rate = 115200
//!
//! [midi]
//! ignore = "active_sense"
//!
//! [midi.source]
//! kind = "port"
//! name = "KeyStep"
//! ```

use crate::error::{Error, Result};
use microrack_midi::MidiInputConfig;
use microrack_serial::SerialConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub serial: SerialConfig,
    pub midi: MidiInputConfig,
    /// Sleep between queue drains in the forwarding loop.
    pub poll_interval_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            midi: MidiInputConfig::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        self.serial.validate()?;
        self.midi.validate()?;
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
