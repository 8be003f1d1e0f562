//! Settings provider trait

use async_trait::async_trait;

use super::settings::PickerSettings;

/// Source of picker settings
///
/// Implementations:
/// - `MemorySettingsProvider`: In-memory for testing
/// - `FileSettingsProvider`: YAML file (user or workspace level)
/// - Editor adapters: read from the host's settings store
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Settings stored at this level; unset fields stay `None`
    async fn get_settings(&self) -> ConfigResult<PickerSettings>;

    /// Replace the settings stored at this level
    async fn update_settings(&self, settings: PickerSettings) -> ConfigResult<()>;
}

/// Errors that can occur while reading or writing settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
