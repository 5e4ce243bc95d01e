//! The forwarding loop: MIDI event queue in, raw bytes out.
//!
//! Each poll drains everything the MIDI callback has queued, drops meta
//! events, and writes every other message to the sink exactly as received.

use crate::error::{Error, Result};
use microrack_midi::MidiEventConsumer;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Counters accumulated over the lifetime of a [`Forwarder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardStats {
    pub forwarded_messages: u64,
    pub forwarded_bytes: u64,
    pub skipped_meta: u64,
    /// Events lost because the MIDI input queue was full.
    pub dropped_overflow: u64,
}

pub struct Forwarder<W: Write> {
    consumer: MidiEventConsumer,
    sink: W,
    poll_interval: Duration,
    stats: ForwardStats,
}

impl<W: Write> Forwarder<W> {
    pub fn new(consumer: MidiEventConsumer, sink: W) -> Self {
        Self {
            consumer,
            sink,
            poll_interval: Duration::from_millis(crate::config::DEFAULT_POLL_INTERVAL_MS),
            stats: ForwardStats::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn stats(&self) -> ForwardStats {
        self.stats
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Gives the sink back so the caller can close it.
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Drains all pending events. Returns the number of messages written.
    ///
    /// A write error aborts the drain; events still queued stay queued.
    pub fn poll_once(&mut self) -> Result<usize> {
        let mut written = 0;

        while let Some(event) = self.consumer.pop() {
            if event.is_meta() {
                self.stats.skipped_meta += 1;
                debug!("Skipping meta event ({} bytes)", event.len());
                continue;
            }
            if event.is_empty() {
                continue;
            }

            self.sink.write_all(event.as_bytes()).map_err(Error::Write)?;
            self.stats.forwarded_messages += 1;
            self.stats.forwarded_bytes += event.len() as u64;
            written += 1;
        }

        let dropped = self.consumer.dropped_count();
        if dropped > self.stats.dropped_overflow {
            warn!(
                "MIDI input queue overflowed, {} event(s) dropped",
                dropped - self.stats.dropped_overflow
            );
            self.stats.dropped_overflow = dropped;
        }

        Ok(written)
    }

    /// Polls until `running` is cleared or a write fails.
    ///
    /// Events that arrive after the flag is cleared are not forwarded.
    pub fn run(&mut self, running: &AtomicBool) -> Result<ForwardStats> {
        while running.load(Ordering::SeqCst) {
            self.poll_once()?;
            thread::sleep(self.poll_interval);
        }
        Ok(self.stats)
    }
}

impl<W: Write> std::fmt::Debug for Forwarder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("pending", &self.consumer.pending_count())
            .field("poll_interval", &self.poll_interval)
            .field("stats", &self.stats)
            .finish()
    }
}
