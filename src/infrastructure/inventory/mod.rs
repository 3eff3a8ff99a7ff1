//! Device inventory adapters

pub mod system;
pub mod v4l;

pub use system::SystemInventory;
