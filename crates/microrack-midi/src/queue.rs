//! Lock-free hand-off of raw MIDI events from the driver callback thread.

use crate::event::RawMidiEvent;
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Producer side -- push events from the midir callback.
pub struct MidiEventProducer {
    producer: HeapProd<RawMidiEvent>,
    dropped: Arc<AtomicU64>,
}

impl MidiEventProducer {
    /// Returns `false` and counts a drop if the ring buffer is full.
    #[inline]
    pub fn push(&mut self, event: RawMidiEvent) -> bool {
        if self.producer.try_push(event).is_ok() {
            true
        } else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}

/// Consumer side -- drained by the forwarding loop.
pub struct MidiEventConsumer {
    consumer: HeapCons<RawMidiEvent>,
    dropped: Arc<AtomicU64>,
}

impl MidiEventConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<RawMidiEvent> {
        self.consumer.try_pop()
    }

    /// Appends all pending events to `out`, returns how many were moved.
    pub fn drain_into(&mut self, out: &mut Vec<RawMidiEvent>) -> usize {
        let count = self.consumer.occupied_len();
        out.reserve(count);
        let mut moved = 0;
        while let Some(event) = self.consumer.try_pop() {
            out.push(event);
            moved += 1;
        }
        moved
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.consumer.is_empty()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.consumer.occupied_len()
    }

    /// Events the producer had to discard because the queue was full.
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.consumer.capacity().get()
    }
}

pub fn midi_event_queue() -> (MidiEventProducer, MidiEventConsumer) {
    midi_event_queue_with_capacity(DEFAULT_QUEUE_CAPACITY)
}

/// # Panics
/// Panics if `capacity` is zero. Callers validate config first.
pub fn midi_event_queue_with_capacity(capacity: usize) -> (MidiEventProducer, MidiEventConsumer) {
    let rb = HeapRb::new(capacity);
    let (producer, consumer) = rb.split();
    let dropped = Arc::new(AtomicU64::new(0));
    (
        MidiEventProducer {
            producer,
            dropped: Arc::clone(&dropped),
        },
        MidiEventConsumer { consumer, dropped },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_on(note: u8) -> RawMidiEvent {
        RawMidiEvent::new(0, &[0x90, note, 100])
    }

    #[test]
    fn test_push_and_pop_in_order() {
        let (mut producer, mut consumer) = midi_event_queue();

        assert!(producer.push(note_on(60)));
        assert!(producer.push(note_on(64)));
        assert!(producer.push(note_on(67)));
        assert_eq!(consumer.pending_count(), 3);

        assert_eq!(consumer.pop().unwrap().as_bytes(), &[0x90, 60, 100]);
        assert_eq!(consumer.pop().unwrap().as_bytes(), &[0x90, 64, 100]);
        assert_eq!(consumer.pop().unwrap().as_bytes(), &[0x90, 67, 100]);
        assert!(consumer.pop().is_none());
        assert!(!consumer.has_pending());
    }

    #[test]
    fn test_drain_into() {
        let (mut producer, mut consumer) = midi_event_queue_with_capacity(8);
        for note in 0..5 {
            producer.push(note_on(note));
        }

        let mut out = Vec::new();
        assert_eq!(consumer.drain_into(&mut out), 5);
        assert_eq!(out.len(), 5);
        assert_eq!(out[4].as_bytes()[1], 4);
        assert_eq!(consumer.drain_into(&mut out), 0);
    }

    #[test]
    fn test_capacity_overflow_counts_drops() {
        let (mut producer, consumer) = midi_event_queue_with_capacity(4);
        assert_eq!(consumer.capacity(), 4);

        for _ in 0..4 {
            assert!(producer.push(note_on(60)));
        }
        assert!(!producer.push(note_on(61)));
        assert!(!producer.push(note_on(62)));
        assert_eq!(consumer.dropped_count(), 2);
        assert_eq!(consumer.pending_count(), 4);
    }

    #[test]
    fn test_producer_on_another_thread() {
        let (mut producer, mut consumer) = midi_event_queue_with_capacity(64);

        let handle = std::thread::spawn(move || {
            for note in 0..32 {
                assert!(producer.push(note_on(note)));
            }
        });
        handle.join().unwrap();

        let mut out = Vec::new();
        consumer.drain_into(&mut out);
        let notes: Vec<u8> = out.iter().map(|e| e.as_bytes()[1]).collect();
        assert_eq!(notes, (0..32).collect::<Vec<u8>>());
    }
}
