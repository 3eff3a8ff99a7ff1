//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces, integrating
//! with cpal, the sysfs trees, pactl, and the on-disk configuration.

pub mod config;
pub mod inventory;
pub mod notification;
pub mod probe;
pub mod writer;

// Re-export adapters
pub use config::JsonConfigStore;
pub use inventory::SystemInventory;
pub use notification::NotifySendNotifier;
pub use probe::{StaticProbe, SysfsProbe};
pub use writer::{NoOpWriter, PactlWriter};
