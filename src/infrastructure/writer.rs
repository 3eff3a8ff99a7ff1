//! Default-device writer adapters

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{ApplyError, DefaultDeviceWriter};
use crate::domain::AudioDevice;

/// pactl-backed writer (PulseAudio/PipeWire).
///
/// Shells out to `pactl set-default-source`/`set-default-sink` with the
/// device uid the inventory reported.
pub struct PactlWriter {
    binary: String,
}

impl PactlWriter {
    pub fn new() -> Self {
        Self {
            binary: "pactl".to_string(),
        }
    }

    /// Custom binary, for tests.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(
        &self,
        subcommand: &str,
        device: &AudioDevice,
        slot: &'static str,
    ) -> Result<(), ApplyError> {
        let status = Command::new(&self.binary)
            .args([subcommand, &device.uid])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ApplyError::ToolNotFound(self.binary.clone())
                } else {
                    ApplyError::WriteRejected {
                        slot,
                        device: device.name.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        if !status.success() {
            return Err(ApplyError::WriteRejected {
                slot,
                device: device.name.clone(),
                message: format!("{} exited with status: {}", self.binary, status),
            });
        }

        Ok(())
    }
}

impl Default for PactlWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DefaultDeviceWriter for PactlWriter {
    async fn set_default_input(&self, device: &AudioDevice) -> Result<(), ApplyError> {
        self.run("set-default-source", device, "input").await
    }

    async fn set_default_output(&self, device: &AudioDevice) -> Result<(), ApplyError> {
        self.run("set-default-sink", device, "output").await
    }
}

/// Writer that accepts everything and touches nothing, for platforms
/// without pactl and for dry runs.
pub struct NoOpWriter;

#[async_trait]
impl DefaultDeviceWriter for NoOpWriter {
    async fn set_default_input(&self, _device: &AudioDevice) -> Result<(), ApplyError> {
        Ok(())
    }

    async fn set_default_output(&self, _device: &AudioDevice) -> Result<(), ApplyError> {
        Ok(())
    }
}
