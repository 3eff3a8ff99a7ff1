//! Device value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::InvalidCategoryError;

/// OS-assigned audio device id, stable only within a boot session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioDeviceId(pub u32);

impl fmt::Display for AudioDeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport a device is attached over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    BuiltIn,
    Usb,
    Bluetooth,
    BluetoothLe,
    Hdmi,
    Aggregate,
    Virtual,
    Unknown,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Transport::BuiltIn => "built-in",
            Transport::Usb => "usb",
            Transport::Bluetooth => "bluetooth",
            Transport::BluetoothLe => "bluetooth-le",
            Transport::Hdmi => "hdmi",
            Transport::Aggregate => "aggregate",
            Transport::Virtual => "virtual",
            Transport::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// A physical audio device with input and/or output endpoints.
///
/// The numeric `id` is only valid for the current boot session; `uid` is
/// the persistent identity string the OS layer provides. Overrides and
/// priority lists match on `name`, since reconnecting a USB or Bluetooth
/// device often yields a new id but the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub id: AudioDeviceId,
    pub uid: String,
    pub name: String,
    pub transport: Transport,
    pub has_input: bool,
    pub has_output: bool,
}

impl AudioDevice {
    pub fn is_built_in(&self) -> bool {
        self.transport == Transport::BuiltIn
    }

    pub fn is_bluetooth(&self) -> bool {
        matches!(self.transport, Transport::Bluetooth | Transport::BluetoothLe)
    }

    pub fn is_usb(&self) -> bool {
        self.transport == Transport::Usb
    }

    pub fn is_hdmi(&self) -> bool {
        self.transport == Transport::Hdmi
    }
}

/// A camera device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDevice {
    pub uid: String,
    pub name: String,
    pub is_built_in: bool,
}

/// Device category a selection or override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceCategory {
    Mic,
    Output,
    Camera,
}

impl DeviceCategory {
    pub const ALL: [DeviceCategory; 3] = [
        DeviceCategory::Mic,
        DeviceCategory::Output,
        DeviceCategory::Camera,
    ];
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCategory::Mic => write!(f, "mic"),
            DeviceCategory::Output => write!(f, "output"),
            DeviceCategory::Camera => write!(f, "camera"),
        }
    }
}

impl FromStr for DeviceCategory {
    type Err = InvalidCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mic" | "input" | "microphone" => Ok(DeviceCategory::Mic),
            "output" | "speaker" | "speakers" => Ok(DeviceCategory::Output),
            "camera" | "cam" => Ok(DeviceCategory::Camera),
            _ => Err(InvalidCategoryError {
                input: s.to_string(),
            }),
        }
    }
}
