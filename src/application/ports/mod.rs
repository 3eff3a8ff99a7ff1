//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod inventory;
pub mod notifier;
pub mod probe;
pub mod sink;
pub mod writer;

// Re-export common types
pub use config::ConfigStore;
pub use inventory::{DeviceInventory, InventoryEvent};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use probe::{PlatformProbe, ProbeError};
pub use sink::PresentationSink;
pub use writer::{ApplyError, DefaultDeviceWriter};
