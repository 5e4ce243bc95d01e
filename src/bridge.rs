//! Bridge lifecycle: open serial, open MIDI, forward, close both.

use crate::builder::BridgeBuilder;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::forward::{ForwardStats, Forwarder};
use microrack_midi::{midi_event_queue_with_capacity, open_input, MidiInputConnectionHandle};
use microrack_serial::SerialLink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// An open MIDI input relayed to an open serial port.
///
/// The running flag starts set; clearing it (from a signal handler or
/// another thread) makes [`Bridge::run`] return.
pub struct Bridge {
    forwarder: Forwarder<SerialLink>,
    input: MidiInputConnectionHandle,
    running: Arc<AtomicBool>,
}

impl Bridge {
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::default()
    }

    /// Opens the serial port first, then the MIDI source.
    ///
    /// If the MIDI source can't be opened the serial port is closed before
    /// the error is returned.
    pub fn open(config: BridgeConfig) -> Result<Self> {
        Self::open_with_running_flag(config, Arc::new(AtomicBool::new(true)))
    }

    /// Like [`Bridge::open`], but uses a flag the caller already handed to a
    /// signal handler. If the flag is cleared while opening, [`Bridge::run`]
    /// returns straight away.
    pub fn open_with_running_flag(config: BridgeConfig, running: Arc<AtomicBool>) -> Result<Self> {
        config.validate()?;

        let serial = SerialLink::open(&config.serial)?;

        let (producer, consumer) = midi_event_queue_with_capacity(config.midi.queue_capacity);
        let input = match open_input(&config.midi, producer) {
            Ok(input) => input,
            Err(e) => {
                serial.close();
                return Err(e.into());
            }
        };

        let forwarder = Forwarder::new(consumer, serial).with_poll_interval(config.poll_interval());
        debug!(
            "Bridge open: '{}' -> {} @ {} baud",
            input.port_name(),
            config.serial.path,
            config.serial.baud_rate
        );

        Ok(Self {
            forwarder,
            input,
            running,
        })
    }

    /// Shared flag for signal handlers. Store `false` to stop [`Bridge::run`].
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Forwards until stopped or until a serial write fails.
    pub fn run(&mut self) -> Result<ForwardStats> {
        let running = Arc::clone(&self.running);
        self.forwarder.run(&running)
    }

    pub fn stats(&self) -> ForwardStats {
        self.forwarder.stats()
    }

    pub fn midi_port_name(&self) -> &str {
        self.input.port_name()
    }

    pub fn is_virtual(&self) -> bool {
        self.input.is_virtual()
    }

    pub fn serial_path(&self) -> &str {
        self.forwarder.sink().path()
    }

    pub fn baud_rate(&self) -> u32 {
        self.forwarder.sink().baud_rate()
    }

    /// Closes the MIDI input, then the serial port. Returns the final counters.
    pub fn close(self) -> ForwardStats {
        let stats = self.forwarder.stats();
        self.input.close();
        self.forwarder.into_sink().close();
        info!(
            forwarded = stats.forwarded_messages,
            bytes = stats.forwarded_bytes,
            skipped_meta = stats.skipped_meta,
            dropped = stats.dropped_overflow,
            "Bridge closed"
        );
        stats
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("midi", &self.input)
            .field("serial", self.forwarder.sink())
            .field("running", &self.is_running())
            .finish()
    }
}
