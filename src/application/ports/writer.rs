//! Default-device writer port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AudioDevice;

/// Errors from writing an OS default-device slot
#[derive(Debug, Clone, Error)]
pub enum ApplyError {
    #[error("Device control tool not found: {0}")]
    ToolNotFound(String),

    #[error("OS rejected default-{slot} change to \"{device}\": {message}")]
    WriteRejected {
        slot: &'static str,
        device: String,
        message: String,
    },
}

/// Port for writing the OS default input/output device slots.
///
/// Callers are expected to skip the write when the slot already holds the
/// device; implementations perform the write unconditionally.
#[async_trait]
pub trait DefaultDeviceWriter: Send + Sync {
    /// Make `device` the OS default input.
    async fn set_default_input(&self, device: &AudioDevice) -> Result<(), ApplyError>;

    /// Make `device` the OS default output.
    async fn set_default_output(&self, device: &AudioDevice) -> Result<(), ApplyError>;
}
