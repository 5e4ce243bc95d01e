//! MIDI input device descriptors and port lookup.

/// Information about an available MIDI input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiInputDevice {
    /// Position in the driver's port list (for `--list` output and lookup).
    pub index: usize,
    pub name: String,
}

/// Resolves a user-supplied port query against the enumerated devices.
///
/// Tries an exact name match, then the query as a listing index, then a
/// case-insensitive substring match. A numeric query that matches no index
/// still gets the substring match.
pub fn find_device<'a>(devices: &'a [MidiInputDevice], query: &str) -> Option<&'a MidiInputDevice> {
    if let Some(device) = devices.iter().find(|d| d.name == query) {
        return Some(device);
    }

    if let Ok(index) = query.trim().parse::<usize>() {
        if let Some(device) = devices.iter().find(|d| d.index == index) {
            return Some(device);
        }
    }

    let needle = query.to_lowercase();
    if needle.is_empty() {
        return None;
    }
    devices
        .iter()
        .find(|d| d.name.to_lowercase().contains(&needle))
}
