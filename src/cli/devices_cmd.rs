//! Devices command handler - one-shot enumeration and dry-run evaluation

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{ConfigStore, DeviceInventory};
use crate::application::{DetectorConfig, PostureDetector};
use crate::domain::{CurrentDefaults, DeviceSnapshot, SelectionPolicy, SwitchConfig};
use crate::infrastructure::{JsonConfigStore, SysfsProbe, SystemInventory};

use super::presenter::Presenter;

/// Enumerate devices and show what a fresh evaluation would select.
/// Nothing is applied.
pub async fn handle_devices_command(presenter: &Presenter) -> Result<(), String> {
    let store = JsonConfigStore::new();
    let config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            presenter.warn(&format!("Config unreadable, using defaults: {}", e));
            SwitchConfig::default()
        }
    };

    let probe = Arc::new(SysfsProbe::new());
    let detector = PostureDetector::new(probe, DetectorConfig::default());
    let posture = detector.current();

    let inventory = SystemInventory::new(Duration::from_secs(2));
    let audio_devices = inventory.audio_devices().await;
    let video_devices = inventory.video_devices().await;
    let current_defaults = CurrentDefaults {
        input: inventory.default_input().await,
        output: inventory.default_output().await,
    };

    let snapshot = DeviceSnapshot {
        posture,
        audio_devices: audio_devices.clone(),
        video_devices: video_devices.clone(),
        current_defaults,
        ..DeviceSnapshot::empty(posture)
    };
    let selection = SelectionPolicy::new(&config).evaluate(&snapshot);

    presenter.info(&format!("Posture: {} ({})", posture, selection.reason));

    presenter.output("Audio devices:");
    for device in &audio_devices {
        let endpoints = match (device.has_input, device.has_output) {
            (true, true) => "in+out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "-",
        };
        let mut markers = Vec::new();
        if selection.mic.as_ref().is_some_and(|d| d.id == device.id) {
            markers.push("mic");
        }
        if selection.output.as_ref().is_some_and(|d| d.id == device.id) {
            markers.push("output");
        }
        let marker = if markers.is_empty() {
            String::new()
        } else {
            format!("  ← {}", markers.join(", "))
        };
        presenter.output(&format!(
            "  [{:<12} {:<6}] {}{}",
            device.transport.to_string(),
            endpoints,
            device.name,
            marker
        ));
    }
    if audio_devices.is_empty() {
        presenter.output("  (none)");
    }

    presenter.output("Cameras:");
    for camera in &video_devices {
        let kind = if camera.is_built_in { "built-in" } else { "external" };
        let marker = if selection.camera.as_ref().is_some_and(|c| c.uid == camera.uid) {
            "  ← camera"
        } else {
            ""
        };
        presenter.output(&format!("  [{:<8}] {}{}", kind, camera.name, marker));
    }
    if video_devices.is_empty() {
        presenter.output("  (none)");
    }

    Ok(())
}
