//! Serial port enumeration.

use crate::error::{Error, Result};
use serialport::SerialPortType;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialKind {
    Usb {
        vid: u16,
        pid: u16,
        product: Option<String>,
    },
    Bluetooth,
    Pci,
    Unknown,
}

impl From<SerialPortType> for SerialKind {
    fn from(port_type: SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(info) => SerialKind::Usb {
                vid: info.vid,
                pid: info.pid,
                product: info.product,
            },
            SerialPortType::BluetoothPort => SerialKind::Bluetooth,
            SerialPortType::PciPort => SerialKind::Pci,
            SerialPortType::Unknown => SerialKind::Unknown,
        }
    }
}

impl fmt::Display for SerialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialKind::Usb {
                vid,
                pid,
                product: Some(product),
            } => write!(f, "USB {:04x}:{:04x} {}", vid, pid, product),
            SerialKind::Usb { vid, pid, .. } => write!(f, "USB {:04x}:{:04x}", vid, pid),
            SerialKind::Bluetooth => f.write_str("Bluetooth"),
            SerialKind::Pci => f.write_str("PCI"),
            SerialKind::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialDevice {
    pub name: String,
    pub kind: SerialKind,
}

pub fn list_ports() -> Result<Vec<SerialDevice>> {
    let ports = serialport::available_ports().map_err(Error::Enumerate)?;
    Ok(ports
        .into_iter()
        .map(|info| SerialDevice {
            name: info.port_name,
            kind: info.port_type.into(),
        })
        .collect())
}
