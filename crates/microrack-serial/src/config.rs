//! Serial port configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Line settings are fixed at 8N1 with no flow control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub path: String,
    pub baud_rate: u32,
    /// Per-attempt I/O timeout in milliseconds. Writes retry past it.
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SerialConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "serial port path must not be empty".to_string(),
            ));
        }
        if self.baud_rate == 0 {
            return Err(Error::InvalidConfig(
                "baud_rate must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SerialConfig::new("/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = SerialConfig::new("COM3")
            .with_baud_rate(31_250)
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.path, "COM3");
        assert_eq!(config.baud_rate, 31_250);
        assert_eq!(config.timeout_ms, 250);
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let config = SerialConfig::new("/dev/ttyUSB0").with_timeout(Duration::MAX);
        assert_eq!(config.timeout_ms, u64::MAX);
    }

    #[test]
    fn test_validate() {
        assert!(SerialConfig::default().validate().is_err());
        assert!(SerialConfig::new("   ").validate().is_err());

        let err = SerialConfig::new("/dev/ttyACM0")
            .with_baud_rate(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("baud_rate"));
    }
}
