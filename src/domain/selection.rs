//! Selection output value object

use super::device::{AudioDevice, VideoDevice};

/// Outcome of one policy evaluation.
///
/// `reason` names the posture that produced the result, not the tier that
/// fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub mic: Option<AudioDevice>,
    pub output: Option<AudioDevice>,
    pub camera: Option<VideoDevice>,
    pub reason: String,
}

impl Selection {
    /// Single-line summary for status output.
    pub fn summary(&self) -> String {
        format!(
            "mic: {} | output: {} | camera: {}",
            self.mic.as_ref().map(|d| d.name.as_str()).unwrap_or("-"),
            self.output.as_ref().map(|d| d.name.as_str()).unwrap_or("-"),
            self.camera.as_ref().map(|d| d.name.as_str()).unwrap_or("-"),
        )
    }
}
