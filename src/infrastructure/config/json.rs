//! JSON config store adapter (XDG path)

use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::broadcast;

use crate::application::ports::ConfigStore;
use crate::domain::config::SwitchConfig;
use crate::domain::error::ConfigError;

/// XDG-compliant JSON config store with an in-memory cache and a change
/// stream fired after every save.
pub struct JsonConfigStore {
    path: PathBuf,
    cached: RwLock<SwitchConfig>,
    changed_tx: broadcast::Sender<()>,
}

impl JsonConfigStore {
    /// Create a new config store with the default path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("autodock");

        Self::with_path(config_dir.join("config.json"))
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let (changed_tx, _) = broadcast::channel(16);
        Self {
            path: path.into(),
            cached: RwLock::new(SwitchConfig::default()),
            changed_tx,
        }
    }

    /// Parse JSON content into SwitchConfig
    fn parse_json(content: &str) -> Result<SwitchConfig, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize SwitchConfig to pretty JSON
    fn to_json(config: &SwitchConfig) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    fn cache(&self, config: &SwitchConfig) {
        let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
        *cached = config.clone();
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn load(&self) -> Result<SwitchConfig, ConfigError> {
        if !self.exists() {
            // Defaults if the file doesn't exist yet
            let config = SwitchConfig::default();
            self.cache(&config);
            return Ok(config);
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config = Self::parse_json(&content)?;
        self.cache(&config);
        Ok(config)
    }

    async fn save(&self, config: &SwitchConfig) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_json(config)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        self.cache(config);
        let _ = self.changed_tx.send(());

        Ok(())
    }

    fn current(&self) -> SwitchConfig {
        self.cached.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changed_tx.subscribe()
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&SwitchConfig::default()).await
    }
}
