//! cpal-backed device inventory
//!
//! cpal exposes neither persistent device ids nor hot-plug callbacks, so
//! this adapter interns session-scoped numeric ids per device name and
//! detects churn by polling a fingerprint of the device world. Transport
//! is inferred from the device name, which is the only signal cpal
//! surfaces for it.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::v4l::{scan_cameras, DEFAULT_SYSFS_ROOT};
use crate::application::ports::{DeviceInventory, InventoryEvent};
use crate::domain::{AudioDevice, AudioDeviceId, Transport, VideoDevice};

/// System-backed inventory: audio via cpal, cameras via the V4L sysfs
/// tree, change detection via fingerprint polling.
pub struct SystemInventory {
    ids: Mutex<IdRegistry>,
    events_tx: broadcast::Sender<InventoryEvent>,
    video_root: PathBuf,
    rescan_interval: Duration,
}

impl SystemInventory {
    pub fn new(rescan_interval: Duration) -> Arc<Self> {
        Self::with_video_root(rescan_interval, PathBuf::from(DEFAULT_SYSFS_ROOT))
    }

    /// Custom camera sysfs root, for tests.
    pub fn with_video_root(rescan_interval: Duration, video_root: PathBuf) -> Arc<Self> {
        let (events_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            ids: Mutex::new(IdRegistry::new()),
            events_tx,
            video_root,
            rescan_interval,
        })
    }

    /// Spawn the rescan task that diffs fingerprints and fans out change
    /// events per aspect.
    pub fn spawn_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        let inventory = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inventory.rescan_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last: Option<Fingerprint> = None;

            loop {
                ticker.tick().await;
                let current = inventory.fingerprint();
                if let Some(previous) = &last {
                    for event in previous.diff(&current) {
                        let _ = inventory.events_tx.send(event);
                    }
                }
                last = Some(current);
            }
        })
    }

    fn enumerate_audio(&self) -> Vec<AudioDevice> {
        let host = cpal::default_host();

        // Merge input and output enumerations by name; a device listed in
        // both directions has both endpoints.
        let mut capabilities: BTreeMap<String, (bool, bool)> = BTreeMap::new();
        if let Ok(devices) = host.input_devices() {
            for device in devices {
                if let Ok(name) = device.name() {
                    capabilities.entry(name).or_insert((false, false)).0 = true;
                }
            }
        }
        if let Ok(devices) = host.output_devices() {
            for device in devices {
                if let Ok(name) = device.name() {
                    capabilities.entry(name).or_insert((false, false)).1 = true;
                }
            }
        }

        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        capabilities
            .into_iter()
            .map(|(name, (has_input, has_output))| AudioDevice {
                id: ids.intern(&name),
                uid: name.clone(),
                transport: infer_transport(&name),
                name,
                has_input,
                has_output,
            })
            .collect()
    }

    fn default_device_name(input: bool) -> Option<String> {
        let host = cpal::default_host();
        let device = if input {
            host.default_input_device()?
        } else {
            host.default_output_device()?
        };
        device.name().ok()
    }

    fn fingerprint(&self) -> Fingerprint {
        let audio = self
            .enumerate_audio()
            .into_iter()
            .map(|d| (d.name, d.has_input, d.has_output))
            .collect();
        let mut cameras: Vec<String> = scan_cameras(&self.video_root)
            .into_iter()
            .map(|c| c.name)
            .collect();
        cameras.sort();

        Fingerprint {
            audio,
            cameras,
            default_input: Self::default_device_name(true),
            default_output: Self::default_device_name(false),
        }
    }
}

#[async_trait]
impl DeviceInventory for SystemInventory {
    async fn audio_devices(&self) -> Vec<AudioDevice> {
        self.enumerate_audio()
    }

    async fn video_devices(&self) -> Vec<VideoDevice> {
        scan_cameras(&self.video_root)
    }

    async fn default_input(&self) -> Option<AudioDeviceId> {
        let name = Self::default_device_name(true)?;
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        Some(ids.intern(&name))
    }

    async fn default_output(&self) -> Option<AudioDeviceId> {
        let name = Self::default_device_name(false)?;
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        Some(ids.intern(&name))
    }

    fn events(&self) -> broadcast::Receiver<InventoryEvent> {
        self.events_tx.subscribe()
    }
}

/// Session-scoped numeric ids, interned per device name.
///
/// Reconnecting a device keeps its id for the life of this process, which
/// is all the stability the numeric id promises.
struct IdRegistry {
    next: u32,
    by_name: HashMap<String, AudioDeviceId>,
}

impl IdRegistry {
    fn new() -> Self {
        Self {
            next: 1,
            by_name: HashMap::new(),
        }
    }

    fn intern(&mut self, name: &str) -> AudioDeviceId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = AudioDeviceId(self.next);
        self.next += 1;
        self.by_name.insert(name.to_string(), id);
        id
    }
}

/// Comparable snapshot of the device world for change detection.
#[derive(Debug, PartialEq, Eq)]
struct Fingerprint {
    audio: Vec<(String, bool, bool)>,
    cameras: Vec<String>,
    default_input: Option<String>,
    default_output: Option<String>,
}

impl Fingerprint {
    fn diff(&self, other: &Fingerprint) -> Vec<InventoryEvent> {
        let mut events = Vec::new();
        if self.audio != other.audio {
            events.push(InventoryEvent::AudioListChanged);
        }
        if self.default_input != other.default_input {
            events.push(InventoryEvent::DefaultInputChanged);
        }
        if self.default_output != other.default_output {
            events.push(InventoryEvent::DefaultOutputChanged);
        }
        if self.cameras != other.cameras {
            events.push(InventoryEvent::CameraListChanged);
        }
        events
    }
}

/// Best-effort transport classification from the device name.
///
/// PulseAudio/PipeWire and CoreAudio both put the bus into the visible
/// name ("bluez_output...", "USB Audio", "HDMI"), which is the only
/// transport signal cpal exposes.
fn infer_transport(name: &str) -> Transport {
    let lowered = name.to_lowercase();
    if lowered.contains("monitor of") || lowered.contains("virtual") || lowered.contains("null") {
        Transport::Virtual
    } else if lowered.contains("aggregate") {
        Transport::Aggregate
    } else if lowered.contains("bluez") || lowered.contains("bluetooth") {
        Transport::Bluetooth
    } else if lowered.contains("hdmi") || lowered.contains("displayport") {
        Transport::Hdmi
    } else if lowered.contains("usb") || lowered.contains("dock") {
        Transport::Usb
    } else if lowered.contains("built-in")
        || lowered.contains("builtin")
        || lowered.contains("internal")
        || lowered.contains("macbook")
    {
        Transport::BuiltIn
    } else {
        Transport::Unknown
    }
}
