//! File-based settings provider (YAML)
//!
//! Supports user-level (~/.config/toolpick/settings.yaml) and workspace-level
//! (.config/toolpick/settings.yaml) settings.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::PickerSettings;
use super::traits::{ConfigResult, SettingsProvider};

const SETTINGS_DIR: &str = "toolpick";
const SETTINGS_FILE: &str = "settings.yaml";

/// Settings level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level settings (~/.config/toolpick/settings.yaml)
    User,
    /// Workspace-level settings (.config/toolpick/settings.yaml in the workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// File-based settings provider
///
/// A missing file reads as default settings. The parsed file is cached until
/// [`reload`](Self::reload) or the next write.
///
/// # Example
///
/// ```no_run
/// use toolpick_core::config::FileSettingsProvider;
///
/// let user = FileSettingsProvider::user();
/// let workspace = FileSettingsProvider::workspace("/path/to/workspace");
/// ```
pub struct FileSettingsProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<PickerSettings>>,
}

impl FileSettingsProvider {
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// User-level provider under the platform config directory
    pub fn user() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(
            config_dir.join(SETTINGS_DIR).join(SETTINGS_FILE),
            ConfigLevel::User,
        )
    }

    /// Workspace-level provider (.config/toolpick/settings.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root
            .as_ref()
            .join(".config")
            .join(SETTINGS_DIR)
            .join(SETTINGS_FILE);
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> ConfigResult<PickerSettings> {
        if !self.path.exists() {
            return Ok(PickerSettings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(PickerSettings::default());
        }

        let settings: PickerSettings = serde_yaml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn save(&self, settings: &PickerSettings) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(settings)?;
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(settings.clone());
        Ok(())
    }

    fn cached(&self) -> ConfigResult<PickerSettings> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }
        self.reload()
    }

    /// Re-read the file, replacing the cache
    pub fn reload(&self) -> ConfigResult<PickerSettings> {
        let settings = self.load()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }
}

impl std::fmt::Debug for FileSettingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSettingsProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl SettingsProvider for FileSettingsProvider {
    async fn get_settings(&self) -> ConfigResult<PickerSettings> {
        self.cached()
    }

    async fn update_settings(&self, settings: PickerSettings) -> ConfigResult<()> {
        settings.validate()?;
        self.save(&settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_defaults() {
        let dir = tempdir().unwrap();
        let provider = FileSettingsProvider::new(dir.path().join(SETTINGS_FILE), ConfigLevel::User);

        assert!(!provider.exists());
        assert_eq!(provider.get_settings().await.unwrap(), PickerSettings::default());
    }

    #[tokio::test]
    async fn test_update_persists() {
        let dir = tempdir().unwrap();
        let provider = FileSettingsProvider::workspace(dir.path());
        assert!(provider.path().ends_with(".config/toolpick/settings.yaml"));
        assert_eq!(provider.level(), ConfigLevel::Workspace);

        let settings = PickerSettings::new()
            .with_tool_grouping_threshold(32)
            .with_placeholder("Pick tools");
        provider.update_settings(settings.clone()).await.unwrap();
        assert!(provider.exists());

        let content = fs::read_to_string(provider.path()).unwrap();
        assert!(content.contains("toolGroupingThreshold: 32"));

        let reopened = FileSettingsProvider::workspace(dir.path());
        assert_eq!(reopened.get_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_edits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let provider = FileSettingsProvider::new(&path, ConfigLevel::User);

        assert_eq!(provider.get_settings().await.unwrap().tool_limit(), None);

        fs::write(&path, "toolGroupingThreshold: 5\n").unwrap();
        // Cached until reloaded
        assert_eq!(provider.get_settings().await.unwrap().tool_limit(), None);
        assert_eq!(provider.reload().unwrap().tool_limit(), Some(5));
        assert_eq!(provider.get_settings().await.unwrap().tool_limit(), Some(5));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "toolGroupingThreshold: [not, a, number]\n").unwrap();

        let provider = FileSettingsProvider::new(&path, ConfigLevel::User);
        assert!(matches!(provider.get_settings().await, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_empty_file_reads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "\n").unwrap();

        let provider = FileSettingsProvider::new(&path, ConfigLevel::User);
        assert_eq!(provider.reload().unwrap(), PickerSettings::default());
    }
}
