//! Configuration port interface

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::config::SwitchConfig;
use crate::domain::error::ConfigError;

/// Port for configuration storage.
///
/// `current` is the cheap cached read used during evaluation; `load` and
/// `save` hit the backing file. `save` fires the change stream so the
/// orchestrator re-evaluates immediately after an edit.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load configuration from storage, refreshing the cached copy.
    ///
    /// # Returns
    /// The loaded config (defaults if the file doesn't exist)
    async fn load(&self) -> Result<SwitchConfig, ConfigError>;

    /// Save configuration to storage and notify subscribers.
    ///
    /// # Arguments
    /// * `config` - The configuration to save
    async fn save(&self, config: &SwitchConfig) -> Result<(), ConfigError>;

    /// The in-memory configuration as of the last load/save.
    fn current(&self) -> SwitchConfig;

    /// Subscribe to change notifications fired after every save.
    fn subscribe(&self) -> broadcast::Receiver<()>;

    /// Get the configuration file path.
    fn path(&self) -> PathBuf;

    /// Check if configuration file exists.
    fn exists(&self) -> bool;

    /// Initialize configuration file with defaults.
    /// Fails if file already exists.
    async fn init(&self) -> Result<(), ConfigError>;
}
