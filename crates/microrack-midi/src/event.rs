//! Raw MIDI events as delivered by the driver, plus wire/meta classification.
//!
//! Bytes are carried verbatim. The only inspection done is on the leading
//! byte, which is enough to tell Standard MIDI File meta events apart from
//! messages that exist on the wire.

use smallvec::SmallVec;

const META_PREFIX: u8 = 0xFF;

/// Coarse message class, derived from the leading (status) byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `0x80..=0xEF`, including channel mode messages.
    ChannelVoice,
    /// `0xF0`.
    SystemExclusive,
    /// `0xF1..=0xF7`.
    SystemCommon,
    /// Single byte in `0xF8..=0xFF`.
    SystemRealTime,
    /// `0xFF` followed by a type byte and payload. Never valid on the wire.
    Meta,
    /// Leading byte is a data byte (< `0x80`).
    Unknown,
}

impl MessageKind {
    #[inline]
    pub fn is_wire_format(self) -> bool {
        !matches!(self, MessageKind::Meta)
    }
}

/// Returns `None` for an empty message.
#[inline]
pub fn classify(bytes: &[u8]) -> Option<MessageKind> {
    let (&status, rest) = bytes.split_first()?;
    let kind = match status {
        META_PREFIX if !rest.is_empty() => MessageKind::Meta,
        0x80..=0xEF => MessageKind::ChannelVoice,
        0xF0 => MessageKind::SystemExclusive,
        0xF1..=0xF7 => MessageKind::SystemCommon,
        0xF8..=0xFF => MessageKind::SystemRealTime,
        _ => MessageKind::Unknown,
    };
    Some(kind)
}

/// One complete MIDI message with the driver timestamp it arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMidiEvent {
    /// Driver timestamp in microseconds. Informational only.
    pub timestamp_us: u64,
    pub bytes: SmallVec<[u8; 3]>,
}

impl RawMidiEvent {
    #[inline]
    pub fn new(timestamp_us: u64, bytes: &[u8]) -> Self {
        Self {
            timestamp_us,
            bytes: SmallVec::from_slice(bytes),
        }
    }

    #[inline]
    pub fn kind(&self) -> Option<MessageKind> {
        classify(&self.bytes)
    }

    #[inline]
    pub fn is_meta(&self) -> bool {
        self.kind() == Some(MessageKind::Meta)
    }

    /// True when the bytes can be written to a MIDI wire as-is.
    #[inline]
    pub fn is_wire_format(&self) -> bool {
        self.kind().is_some_and(MessageKind::is_wire_format)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&[u8]> for RawMidiEvent {
    fn from(bytes: &[u8]) -> Self {
        Self::new(0, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_channel_voice() {
        assert_eq!(classify(&[0x90, 60, 100]), Some(MessageKind::ChannelVoice));
        assert_eq!(classify(&[0x8F, 60, 0]), Some(MessageKind::ChannelVoice));
        assert_eq!(classify(&[0xC3, 5]), Some(MessageKind::ChannelVoice));
        // Channel mode (All Notes Off) is still a channel message
        assert_eq!(classify(&[0xB0, 123, 0]), Some(MessageKind::ChannelVoice));
        assert_eq!(classify(&[0xEF, 0, 64]), Some(MessageKind::ChannelVoice));
    }

    #[test]
    fn test_classify_system_messages() {
        assert_eq!(
            classify(&[0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7]),
            Some(MessageKind::SystemExclusive)
        );
        assert_eq!(classify(&[0xF2, 0x10, 0x00]), Some(MessageKind::SystemCommon));
        assert_eq!(classify(&[0xF6]), Some(MessageKind::SystemCommon));
        assert_eq!(classify(&[0xF8]), Some(MessageKind::SystemRealTime));
        assert_eq!(classify(&[0xFA]), Some(MessageKind::SystemRealTime));
        assert_eq!(classify(&[0xFE]), Some(MessageKind::SystemRealTime));
    }

    #[test]
    fn test_lone_ff_is_system_reset_not_meta() {
        assert_eq!(classify(&[0xFF]), Some(MessageKind::SystemRealTime));
        let event = RawMidiEvent::new(0, &[0xFF]);
        assert!(!event.is_meta());
        assert!(event.is_wire_format());
    }

    #[test]
    fn test_meta_events() {
        // Set Tempo: FF 51 03 07 A1 20
        let tempo = RawMidiEvent::new(0, &[0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
        assert_eq!(tempo.kind(), Some(MessageKind::Meta));
        assert!(tempo.is_meta());
        assert!(!tempo.is_wire_format());

        // End of Track: FF 2F 00
        let eot = RawMidiEvent::new(0, &[0xFF, 0x2F, 0x00]);
        assert!(eot.is_meta());
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(classify(&[]), None);
        let empty = RawMidiEvent::new(0, &[]);
        assert!(empty.is_empty());
        assert!(!empty.is_wire_format());
        assert!(!empty.is_meta());

        // Running-status data without a status byte is passed through
        let data = RawMidiEvent::new(0, &[0x3C, 0x40]);
        assert_eq!(data.kind(), Some(MessageKind::Unknown));
        assert!(data.is_wire_format());
    }

    #[test]
    fn test_bytes_kept_verbatim() {
        let sysex = [0xF0, 0x43, 0x10, 0x4C, 0x00, 0x00, 0x7E, 0x00, 0xF7];
        let event = RawMidiEvent::new(1234, &sysex);
        assert_eq!(event.as_bytes(), &sysex);
        assert_eq!(event.len(), sysex.len());
        assert_eq!(event.timestamp_us, 1234);
    }
}
