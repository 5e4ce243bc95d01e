//! An open serial connection that accepts raw bytes.

use crate::config::SerialConfig;
use crate::error::{Error, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Write};
use tracing::{debug, warn};

pub struct SerialLink {
    port: Box<dyn SerialPort>,
    path: String,
    baud_rate: u32,
}

impl SerialLink {
    /// Opens `config.path` at `config.baud_rate`, 8N1, no flow control.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        config.validate()?;

        let port = serialport::new(config.path.as_str(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.timeout())
            .open()
            .map_err(|source| Error::Open {
                path: config.path.clone(),
                source,
            })?;

        debug!("Opened serial port {} @ {} baud", config.path, config.baud_rate);
        Ok(Self::from_port(port, config.path.clone(), config.baud_rate))
    }

    /// Wraps an already-open port.
    pub fn from_port(port: Box<dyn SerialPort>, path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port,
            path: path.into(),
            baud_rate,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Flushes pending output and closes the port.
    pub fn close(mut self) {
        if let Err(e) = self.port.flush() {
            warn!("Flush on close of {} failed: {}", self.path, e);
        }
        debug!("Closed serial port {}", self.path);
    }
}

impl Write for SerialLink {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    /// Blocks until the whole buffer is written.
    ///
    /// The port timeout only bounds each attempt: a device that stops reading
    /// for a while stalls the writer instead of failing it. Any other I/O
    /// error is returned.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        write_all_blocking(&mut self.port, &self.path, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

fn write_all_blocking<W: Write + ?Sized>(port: &mut W, path: &str, mut buf: &[u8]) -> io::Result<()> {
    let mut stalled = false;
    while !buf.is_empty() {
        match port.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole buffer",
                ));
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                if !stalled {
                    debug!("{} not accepting data, waiting", path);
                    stalled = true;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Times out `stalls` times, then takes two bytes per call.
    struct StallingPort {
        stalls: usize,
        written: Vec<u8>,
    }

    impl Write for StallingPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.stalls > 0 {
                self.stalls -= 1;
                return Err(io::Error::new(io::ErrorKind::TimedOut, "Operation timed out"));
            }
            let n = buf.len().min(2);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_all_waits_through_timeouts() {
        let mut port = StallingPort {
            stalls: 3,
            written: Vec::new(),
        };
        write_all_blocking(&mut port, "test", &[0xF0, 0x7D, 0x01, 0x02, 0xF7]).unwrap();
        assert_eq!(port.stalls, 0);
        assert_eq!(port.written, vec![0xF0, 0x7D, 0x01, 0x02, 0xF7]);
    }

    struct BrokenPort;

    impl Write for BrokenPort {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_all_fails_on_io_error() {
        let err = write_all_blocking(&mut BrokenPort, "test", &[0x90, 60, 100]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let err = SerialLink::open(&SerialConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_open_missing_device_names_path() {
        let config = SerialConfig::new("/dev/microrack-no-such-tty");
        let err = SerialLink::open(&config).unwrap_err();
        match &err {
            Error::Open { path, .. } => assert_eq!(path, "/dev/microrack-no-such-tty"),
            other => panic!("Expected Open error, got {:?}", other),
        }
        assert!(err.to_string().contains("/dev/microrack-no-such-tty"));
    }
}
