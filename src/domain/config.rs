//! Switching configuration value object

use serde::{Deserialize, Serialize};

use super::device::DeviceCategory;
use super::posture::Posture;

/// Per-posture device priority lists plus the heuristic fallback knobs.
///
/// Priority lists match display names exactly (case-sensitive); blocked
/// keywords and the stream-cam keyword match case-insensitively as
/// substrings. Every field carries a serde default so partial config files
/// load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    /// Preferred mics while open, highest priority first
    pub open_mic: Vec<String>,
    /// Preferred outputs while open
    pub open_output: Vec<String>,
    /// Preferred cameras while open
    pub open_camera: Vec<String>,
    /// Preferred mics while closed/docked
    pub closed_mic: Vec<String>,
    /// Preferred outputs while closed/docked
    pub closed_output: Vec<String>,
    /// Preferred cameras while closed/docked
    pub closed_camera: Vec<String>,
    /// Substrings that disqualify a mic from automatic selection
    pub blocked_mic_keywords: Vec<String>,
    /// Substrings that disqualify an output from automatic selection
    pub blocked_output_keywords: Vec<String>,
    /// Substring identifying a dedicated streaming camera and its mic
    pub stream_cam_keyword: String,
    /// Permit built-in speakers as a fallback even when externals exist
    pub allow_builtin_speakers: bool,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            open_mic: Vec::new(),
            open_output: Vec::new(),
            open_camera: Vec::new(),
            closed_mic: Vec::new(),
            closed_output: Vec::new(),
            closed_camera: Vec::new(),
            blocked_mic_keywords: Vec::new(),
            blocked_output_keywords: Vec::new(),
            stream_cam_keyword: "StreamCam".to_string(),
            allow_builtin_speakers: false,
        }
    }
}

impl SwitchConfig {
    /// Priority list for a category under the given posture.
    pub fn priorities(&self, posture: Posture, category: DeviceCategory) -> &[String] {
        match (posture, category) {
            (Posture::Open, DeviceCategory::Mic) => &self.open_mic,
            (Posture::Open, DeviceCategory::Output) => &self.open_output,
            (Posture::Open, DeviceCategory::Camera) => &self.open_camera,
            (Posture::Closed, DeviceCategory::Mic) => &self.closed_mic,
            (Posture::Closed, DeviceCategory::Output) => &self.closed_output,
            (Posture::Closed, DeviceCategory::Camera) => &self.closed_camera,
        }
    }

    /// Blocked keywords for a category; cameras carry no blocklist.
    pub fn blocked_keywords(&self, category: DeviceCategory) -> &[String] {
        match category {
            DeviceCategory::Mic => &self.blocked_mic_keywords,
            DeviceCategory::Output => &self.blocked_output_keywords,
            DeviceCategory::Camera => &[],
        }
    }

    /// Whether a device name hits the category-scoped blocklist.
    pub fn is_blocked(&self, category: DeviceCategory, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.blocked_keywords(category)
            .iter()
            .any(|keyword| lowered.contains(&keyword.to_lowercase()))
    }

    /// Whether a device name matches the stream-cam keyword.
    ///
    /// An empty keyword matches nothing rather than everything.
    pub fn matches_stream_cam(&self, name: &str) -> bool {
        !self.stream_cam_keyword.is_empty()
            && name
                .to_lowercase()
                .contains(&self.stream_cam_keyword.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_empty_lists() {
        let config = SwitchConfig::default();
        assert!(config.open_mic.is_empty());
        assert!(config.closed_camera.is_empty());
        assert!(config.blocked_mic_keywords.is_empty());
        assert_eq!(config.stream_cam_keyword, "StreamCam");
        assert!(!config.allow_builtin_speakers);
    }

    #[test]
    fn priorities_map_posture_and_category() {
        let config = SwitchConfig {
            closed_mic: vec!["Desk Mic".to_string()],
            open_output: vec!["Studio Monitors".to_string()],
            ..Default::default()
        };

        assert_eq!(
            config.priorities(Posture::Closed, DeviceCategory::Mic),
            ["Desk Mic".to_string()]
        );
        assert_eq!(
            config.priorities(Posture::Open, DeviceCategory::Output),
            ["Studio Monitors".to_string()]
        );
        assert!(config
            .priorities(Posture::Open, DeviceCategory::Mic)
            .is_empty());
    }

    #[test]
    fn blocklist_is_case_insensitive_substring() {
        let config = SwitchConfig {
            blocked_mic_keywords: vec!["airpods".to_string()],
            ..Default::default()
        };

        assert!(config.is_blocked(DeviceCategory::Mic, "AirPods Pro"));
        assert!(!config.is_blocked(DeviceCategory::Output, "AirPods Pro"));
        assert!(!config.is_blocked(DeviceCategory::Mic, "Desk Mic"));
    }

    #[test]
    fn cameras_have_no_blocklist() {
        let config = SwitchConfig {
            blocked_mic_keywords: vec!["Cam".to_string()],
            blocked_output_keywords: vec!["Cam".to_string()],
            ..Default::default()
        };
        assert!(!config.is_blocked(DeviceCategory::Camera, "Logi StreamCam"));
    }

    #[test]
    fn stream_cam_keyword_is_case_insensitive() {
        let config = SwitchConfig::default();
        assert!(config.matches_stream_cam("Logi STREAMCAM"));
        assert!(!config.matches_stream_cam("FaceTime HD Camera"));
    }

    #[test]
    fn empty_stream_cam_keyword_matches_nothing() {
        let config = SwitchConfig {
            stream_cam_keyword: String::new(),
            ..Default::default()
        };
        assert!(!config.matches_stream_cam("Logi StreamCam"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SwitchConfig =
            serde_json::from_str(r#"{"closed_mic": ["Desk Mic"]}"#).unwrap();
        assert_eq!(config.closed_mic, ["Desk Mic".to_string()]);
        assert_eq!(config.stream_cam_keyword, "StreamCam");
        assert!(config.open_mic.is_empty());
    }

    #[test]
    fn json_round_trips() {
        let config = SwitchConfig {
            closed_output: vec!["DELL U2720Q".to_string()],
            blocked_output_keywords: vec!["Headphone".to_string()],
            allow_builtin_speakers: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: SwitchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
