//! Device inventory port interface

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{AudioDevice, AudioDeviceId, VideoDevice};

/// Change notifications emitted by the inventory.
///
/// Each variant is an independent source stream for debouncing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryEvent {
    AudioListChanged,
    DefaultInputChanged,
    DefaultOutputChanged,
    CameraListChanged,
}

/// Port for enumerating OS audio/video devices and default-device slots.
///
/// Enumeration failures are absorbed at this boundary: implementations
/// return empty lists or `None` rather than erroring. The next change
/// event naturally retries.
#[async_trait]
pub trait DeviceInventory: Send + Sync {
    /// All audio devices currently known to the OS.
    async fn audio_devices(&self) -> Vec<AudioDevice>;

    /// All cameras currently known to the OS.
    async fn video_devices(&self) -> Vec<VideoDevice>;

    /// Id of the current OS default input, if any.
    async fn default_input(&self) -> Option<AudioDeviceId>;

    /// Id of the current OS default output, if any.
    async fn default_output(&self) -> Option<AudioDeviceId>;

    /// Subscribe to change notifications.
    fn events(&self) -> broadcast::Receiver<InventoryEvent>;
}
