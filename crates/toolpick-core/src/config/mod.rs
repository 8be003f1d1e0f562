//! Picker settings and the providers that store them
//!
//! Supports multiple settings sources:
//! - `MemorySettingsProvider`: In-memory for testing
//! - `FileSettingsProvider`: YAML file-based (user/workspace level)
//!
//! [`resolve_settings`] layers several providers, later ones overriding
//! earlier ones key by key.

mod traits;
mod settings;
mod memory;
mod file;

pub use traits::{ConfigError, ConfigResult, SettingsProvider};
pub use settings::{PickerSettings, DEFAULT_PLACEHOLDER};
pub use memory::MemorySettingsProvider;
pub use file::{ConfigLevel, FileSettingsProvider};

/// Merge settings from providers in priority order (lowest first)
pub async fn resolve_settings(providers: &[&dyn SettingsProvider]) -> ConfigResult<PickerSettings> {
    let mut resolved = PickerSettings::default();
    for provider in providers {
        resolved = resolved.overlay(provider.get_settings().await?);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_workspace_overrides_user() {
        let user = MemorySettingsProvider::with_settings(
            PickerSettings::new()
                .with_tool_grouping_threshold(128)
                .with_description("user description"),
        );
        let workspace = MemorySettingsProvider::with_settings(
            PickerSettings::new().with_tool_grouping_threshold(16),
        );

        let resolved = resolve_settings(&[&user, &workspace]).await.unwrap();
        assert_eq!(resolved.tool_limit(), Some(16));
        assert_eq!(resolved.description(), Some("user description"));
    }

    #[tokio::test]
    async fn test_no_providers() {
        let resolved = resolve_settings(&[]).await.unwrap();
        assert_eq!(resolved, PickerSettings::default());
    }
}
