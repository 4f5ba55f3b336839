use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for a [`BoardStore`](crate::BoardStore)
///
/// ```toml
/// storage_key = "trello_clone_data_v1"
/// seed_demo_board = true
/// pretty_json = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Key of the persistence slot holding the serialized state
    pub storage_key: String,
    /// Seed the demo board when no usable persisted state exists;
    /// otherwise start empty
    pub seed_demo_board: bool,
    /// Write indented JSON
    pub pretty_json: bool,
}

impl StoreConfig {
    pub const DEFAULT_STORAGE_KEY: &'static str = "trello_clone_data_v1";

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn without_demo_board(mut self) -> Self {
        self.seed_demo_board = false;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: StoreConfig =
            toml::from_str(text).map_err(|e| TrellisError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            TrellisError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(TrellisError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: Self::DEFAULT_STORAGE_KEY.to_string(),
            seed_demo_board: true,
            pretty_json: false,
        }
    }
}
