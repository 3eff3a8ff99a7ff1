//! Posture probe adapters

use std::fs;
use std::path::PathBuf;

use crate::application::ports::{PlatformProbe, ProbeError};

/// sysfs/procfs-backed probe (Linux).
///
/// Lid state comes from `/proc/acpi/button/lid/*/state`, the built-in
/// panel from the eDP/LVDS connectors under `/sys/class/drm`. There is no
/// push stream; the detector's poll backstop covers reconfiguration.
pub struct SysfsProbe {
    lid_root: PathBuf,
    drm_root: PathBuf,
}

impl SysfsProbe {
    pub fn new() -> Self {
        Self {
            lid_root: PathBuf::from("/proc/acpi/button/lid"),
            drm_root: PathBuf::from("/sys/class/drm"),
        }
    }

    /// Custom roots, for tests.
    pub fn with_roots(lid_root: impl Into<PathBuf>, drm_root: impl Into<PathBuf>) -> Self {
        Self {
            lid_root: lid_root.into(),
            drm_root: drm_root.into(),
        }
    }
}

impl Default for SysfsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformProbe for SysfsProbe {
    fn lid_closed(&self) -> Result<bool, ProbeError> {
        // No lid device reads as not-closed (desktops)
        let entries = match fs::read_dir(&self.lid_root) {
            Ok(entries) => entries,
            Err(_) => return Ok(false),
        };

        for entry in entries.flatten() {
            let state_path = entry.path().join("state");
            if !state_path.exists() {
                continue;
            }
            let contents = fs::read_to_string(&state_path)
                .map_err(|e| ProbeError::LidReadFailed(e.to_string()))?;
            return Ok(contents.to_lowercase().contains("closed"));
        }

        Ok(false)
    }

    fn builtin_display_active(&self) -> Result<bool, ProbeError> {
        let entries = match fs::read_dir(&self.drm_root) {
            Ok(entries) => entries,
            Err(_) => return Ok(true),
        };

        for entry in entries.flatten() {
            let connector = entry.file_name().to_string_lossy().into_owned();
            if !connector.contains("-eDP-") && !connector.contains("-LVDS-") {
                continue;
            }
            let enabled = fs::read_to_string(entry.path().join("enabled"))
                .map_err(|e| ProbeError::DisplayReadFailed(e.to_string()))?;
            return Ok(enabled.trim().eq_ignore_ascii_case("enabled"));
        }

        // No built-in panel found, so nothing can deactivate
        Ok(true)
    }
}

/// Fixed-signal probe for platforms without a sysfs tree, and for tests.
pub struct StaticProbe {
    lid_closed: bool,
    display_active: bool,
}

impl StaticProbe {
    /// Always reads as open.
    pub fn open() -> Self {
        Self {
            lid_closed: false,
            display_active: true,
        }
    }

    /// Always reads as closed.
    pub fn closed() -> Self {
        Self {
            lid_closed: true,
            display_active: false,
        }
    }
}

impl PlatformProbe for StaticProbe {
    fn lid_closed(&self) -> Result<bool, ProbeError> {
        Ok(self.lid_closed)
    }

    fn builtin_display_active(&self) -> Result<bool, ProbeError> {
        Ok(self.display_active)
    }
}
