//! Integration tests for the forwarding pipeline.
//!
//! These drive the same queue -> forwarder path the bridge uses, with an
//! in-memory sink in place of the serial port.

use microrack_bridge::midi::{midi_event_queue_with_capacity, RawMidiEvent};
use microrack_bridge::{BridgeBuilder, BridgeConfig, Forwarder, IgnoreFilter, MidiSource};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sink that can be inspected while the forwarder owns it.
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// 1. Threaded forwarding: callback thread -> forwarder thread -> sink
// ---------------------------------------------------------------------------

#[test]
fn test_threaded_forwarding_preserves_stream() {
    let (mut producer, consumer) = midi_event_queue_with_capacity(256);
    let sink = SharedSink::default();
    let running = Arc::new(AtomicBool::new(true));

    let mut forwarder =
        Forwarder::new(consumer, sink.clone()).with_poll_interval(Duration::from_millis(1));
    let loop_running = Arc::clone(&running);
    let forward_thread = thread::spawn(move || forwarder.run(&loop_running));

    // A short phrase with clock ticks and one meta event mixed in
    let mut expected = Vec::new();
    for note in 60u8..72 {
        let on = [0x90, note, 100];
        let off = [0x80, note, 0];
        assert!(producer.push(RawMidiEvent::new(0, &on)));
        assert!(producer.push(RawMidiEvent::new(0, &[0xF8])));
        assert!(producer.push(RawMidiEvent::new(0, &[0xFF, 0x01, 0x01, b'x'])));
        assert!(producer.push(RawMidiEvent::new(0, &off)));
        expected.extend_from_slice(&on);
        expected.push(0xF8);
        expected.extend_from_slice(&off);
    }

    // Wait for the forwarder to catch up before stopping it
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while sink.bytes().len() < expected.len() && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(2));
    }
    running.store(false, Ordering::SeqCst);

    let stats = forward_thread.join().unwrap().unwrap();
    assert_eq!(sink.bytes(), expected);
    assert_eq!(stats.forwarded_messages, 36);
    assert_eq!(stats.skipped_meta, 12);
    assert_eq!(stats.dropped_overflow, 0);
}

// ---------------------------------------------------------------------------
// 2. Config file -> builder -> config
// ---------------------------------------------------------------------------

#[test]
fn test_config_file_with_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
poll_interval_ms = 3

[serial]
path = "/dev/ttyUSB1"
baud_rate = 31250

[midi]
ignore = "all"

[midi.source]
kind = "port"
name = "KeyStep"
"#
    )
    .unwrap();

    let loaded = BridgeConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded.serial.path, "/dev/ttyUSB1");
    assert_eq!(loaded.midi.ignore, IgnoreFilter::All);

    let config = BridgeBuilder::from_config(loaded)
        .serial_port("/dev/ttyUSB0")
        .baud_rate(115_200)
        .build()
        .unwrap();

    assert_eq!(config.serial.path, "/dev/ttyUSB0");
    assert_eq!(config.serial.baud_rate, 115_200);
    assert_eq!(config.midi.source, MidiSource::port("KeyStep"));
    assert_eq!(config.poll_interval_ms, 3);
}

#[test]
fn test_config_file_parse_error_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[serial\npath = 1").unwrap();

    let err = BridgeConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, microrack_bridge::Error::ConfigParse(_)));
}
