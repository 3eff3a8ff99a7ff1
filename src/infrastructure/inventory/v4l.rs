//! V4L sysfs camera scan

use std::fs;
use std::path::Path;

use crate::domain::VideoDevice;

/// Where the kernel exposes video capture nodes.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/video4linux";

/// Enumerate cameras from a video4linux sysfs tree.
///
/// A missing tree (non-Linux, no cameras) yields an empty list. Multiple
/// nodes of the same physical camera (capture plus metadata) collapse to
/// the first node.
pub fn scan_cameras(root: &Path) -> Vec<VideoDevice> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut nodes: Vec<(String, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let node = entry.file_name().to_string_lossy().into_owned();
            if !node.starts_with("video") {
                return None;
            }
            let name = fs::read_to_string(entry.path().join("name")).ok()?;
            let name = name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some((node, name))
        })
        .collect();
    nodes.sort();

    let mut cameras: Vec<VideoDevice> = Vec::new();
    for (node, name) in nodes {
        if cameras.iter().any(|c| c.name == name) {
            continue;
        }
        cameras.push(VideoDevice {
            uid: node,
            is_built_in: looks_built_in(&name),
            name,
        });
    }
    cameras
}

fn looks_built_in(name: &str) -> bool {
    let lowered = name.to_lowercase();
    ["integrated", "built-in", "builtin", "internal", "facetime"]
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
