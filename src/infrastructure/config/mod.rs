//! Configuration store adapters

pub mod json;

pub use json::JsonConfigStore;
