//! Notification adapters

pub mod notify_send;

pub use notify_send::NotifySendNotifier;
