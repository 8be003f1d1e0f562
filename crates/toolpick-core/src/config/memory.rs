//! In-memory settings provider

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::PickerSettings;
use super::traits::{ConfigResult, SettingsProvider};

/// In-memory settings provider for testing
#[derive(Debug, Default)]
pub struct MemorySettingsProvider {
    settings: RwLock<PickerSettings>,
}

impl MemorySettingsProvider {
    /// Provider holding the default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider holding `settings`
    pub fn with_settings(settings: PickerSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Reset to defaults
    pub fn clear(&self) {
        *self.settings.write() = PickerSettings::default();
    }
}

#[async_trait]
impl SettingsProvider for MemorySettingsProvider {
    async fn get_settings(&self) -> ConfigResult<PickerSettings> {
        Ok(self.settings.read().clone())
    }

    async fn update_settings(&self, settings: PickerSettings) -> ConfigResult<()> {
        settings.validate()?;
        *self.settings.write() = settings;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[tokio::test]
    async fn test_memory_settings_provider() {
        let provider = MemorySettingsProvider::new();
        assert_eq!(provider.get_settings().await.unwrap(), PickerSettings::default());

        let settings = PickerSettings::new().with_tool_grouping_threshold(10);
        provider.update_settings(settings.clone()).await.unwrap();
        assert_eq!(provider.get_settings().await.unwrap(), settings);

        // Invalid settings leave the stored ones untouched
        let blank = PickerSettings::new().with_placeholder("");
        assert!(matches!(
            provider.update_settings(blank).await,
            Err(ConfigError::Invalid { .. })
        ));
        assert_eq!(provider.get_settings().await.unwrap(), settings);

        provider.clear();
        assert_eq!(provider.get_settings().await.unwrap().tool_limit(), None);
    }
}
