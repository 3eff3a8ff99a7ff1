//! Evaluation snapshot value objects

use std::collections::HashMap;

use super::device::{AudioDevice, AudioDeviceId, DeviceCategory, VideoDevice};
use super::posture::Posture;

/// The OS default-device slots at snapshot time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentDefaults {
    pub input: Option<AudioDeviceId>,
    pub output: Option<AudioDeviceId>,
}

/// Ephemeral world view assembled fresh for each evaluation.
///
/// Never partially mutated: the orchestrator builds a complete snapshot,
/// hands it to the policy, and drops it.
#[derive(Debug, Clone)]
pub struct DeviceSnapshot {
    pub posture: Posture,
    pub audio_devices: Vec<AudioDevice>,
    pub video_devices: Vec<VideoDevice>,
    pub current_defaults: CurrentDefaults,
    /// Sticky user overrides, keyed by display name
    pub overrides: HashMap<DeviceCategory, String>,
}

impl DeviceSnapshot {
    /// A snapshot with nothing attached, used as a base in tests and
    /// one-shot evaluations.
    pub fn empty(posture: Posture) -> Self {
        Self {
            posture,
            audio_devices: Vec::new(),
            video_devices: Vec::new(),
            current_defaults: CurrentDefaults::default(),
            overrides: HashMap::new(),
        }
    }
}
