//! Device selection policy
//!
//! Pure function of (configuration, snapshot): identical inputs always
//! produce an identical selection, which keeps the policy unit-testable
//! without hardware. Precedence per category, most specific first:
//! manual override, posture priority list, category heuristic.

use super::config::SwitchConfig;
use super::device::{AudioDevice, DeviceCategory, VideoDevice};
use super::posture::Posture;
use super::selection::Selection;
use super::snapshot::DeviceSnapshot;

/// Multi-tier device selection over one snapshot.
pub struct SelectionPolicy<'a> {
    config: &'a SwitchConfig,
}

impl<'a> SelectionPolicy<'a> {
    pub fn new(config: &'a SwitchConfig) -> Self {
        Self { config }
    }

    /// Compute the selection for all three categories.
    ///
    /// Never fails: an empty device list at any tier yields `None` for
    /// that category.
    pub fn evaluate(&self, snapshot: &DeviceSnapshot) -> Selection {
        Selection {
            mic: self.select_mic(snapshot),
            output: self.select_output(snapshot),
            camera: self.select_camera(snapshot),
            reason: snapshot.posture.mode_label().to_string(),
        }
    }

    // --- Mic ---

    fn select_mic(&self, snapshot: &DeviceSnapshot) -> Option<AudioDevice> {
        let inputs: Vec<&AudioDevice> = snapshot
            .audio_devices
            .iter()
            .filter(|d| d.has_input)
            .collect();

        // Overrides bypass the blocklist
        if let Some(device) = self.override_match(snapshot, DeviceCategory::Mic, &inputs) {
            return Some(device.clone());
        }

        let eligible: Vec<&AudioDevice> = inputs
            .iter()
            .copied()
            .filter(|d| !self.config.is_blocked(DeviceCategory::Mic, &d.name))
            .collect();

        if let Some(device) =
            self.priority_match(snapshot.posture, DeviceCategory::Mic, &eligible)
        {
            return Some(device.clone());
        }

        // Docked setups usually pair a streaming camera with its own mic
        if snapshot.posture == Posture::Closed {
            if let Some(device) = eligible
                .iter()
                .find(|d| self.config.matches_stream_cam(&d.name))
            {
                return Some((*device).clone());
            }
        }

        eligible
            .iter()
            .find(|d| d.is_built_in())
            .map(|d| (*d).clone())
    }

    // --- Output ---

    fn select_output(&self, snapshot: &DeviceSnapshot) -> Option<AudioDevice> {
        let outputs: Vec<&AudioDevice> = snapshot
            .audio_devices
            .iter()
            .filter(|d| d.has_output)
            .collect();

        if let Some(device) = self.override_match(snapshot, DeviceCategory::Output, &outputs) {
            return Some(device.clone());
        }

        let eligible: Vec<&AudioDevice> = outputs
            .iter()
            .copied()
            .filter(|d| !self.config.is_blocked(DeviceCategory::Output, &d.name))
            .collect();

        if let Some(device) =
            self.priority_match(snapshot.posture, DeviceCategory::Output, &eligible)
        {
            return Some(device.clone());
        }

        // Externals first: Bluetooth/USB, skipping the stream cam's own
        // audio endpoint
        if let Some(device) = eligible.iter().find(|d| {
            !d.is_built_in()
                && (d.is_bluetooth() || d.is_usb())
                && !self.config.matches_stream_cam(&d.name)
        }) {
            return Some((*device).clone());
        }

        // Then displays and output-only USB endpoints
        if let Some(device) = eligible
            .iter()
            .find(|d| !d.is_built_in() && (d.is_hdmi() || (d.is_usb() && !d.has_input)))
        {
            return Some((*device).clone());
        }

        if self.config.allow_builtin_speakers {
            if let Some(device) = eligible.iter().find(|d| d.is_built_in()) {
                return Some((*device).clone());
            }
        }

        // Built-in as last resort only when nothing else is attached at all
        match outputs.as_slice() {
            [only] if only.is_built_in() => Some((*only).clone()),
            _ => None,
        }
    }

    // --- Camera ---

    fn select_camera(&self, snapshot: &DeviceSnapshot) -> Option<VideoDevice> {
        let cameras = &snapshot.video_devices;

        if let Some(name) = snapshot.overrides.get(&DeviceCategory::Camera) {
            if let Some(device) = cameras.iter().find(|d| &d.name == name) {
                return Some(device.clone());
            }
        }

        for name in self
            .config
            .priorities(snapshot.posture, DeviceCategory::Camera)
        {
            if let Some(device) = cameras.iter().find(|d| &d.name == name) {
                return Some(device.clone());
            }
        }

        match snapshot.posture {
            Posture::Closed => cameras
                .iter()
                .find(|d| self.config.matches_stream_cam(&d.name))
                .or_else(|| cameras.iter().find(|d| !d.is_built_in))
                .or_else(|| cameras.iter().find(|d| d.is_built_in))
                .cloned(),
            Posture::Open => cameras
                .iter()
                .find(|d| d.is_built_in)
                .or_else(|| cameras.first())
                .cloned(),
        }
    }

    // --- Shared tiers ---

    fn override_match<'d>(
        &self,
        snapshot: &DeviceSnapshot,
        category: DeviceCategory,
        pool: &[&'d AudioDevice],
    ) -> Option<&'d AudioDevice> {
        let name = snapshot.overrides.get(&category)?;
        pool.iter().copied().find(|d| &d.name == name)
    }

    fn priority_match<'d>(
        &self,
        posture: Posture,
        category: DeviceCategory,
        pool: &[&'d AudioDevice],
    ) -> Option<&'d AudioDevice> {
        for name in self.config.priorities(posture, category) {
            if let Some(device) = pool.iter().copied().find(|d| &d.name == name) {
                return Some(device);
            }
        }
        None
    }
}
