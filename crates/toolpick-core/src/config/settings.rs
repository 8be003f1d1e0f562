//! Picker settings

use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult};

/// Placeholder shown above a non-empty tree when none is configured
pub const DEFAULT_PLACEHOLDER: &str = "Select tools that are available to chat";

/// User-facing picker settings
///
/// Every field is optional so that a workspace file can override single keys of
/// the user file. See [`PickerSettings::overlay`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerSettings {
    /// Number of checked tools above which the picker warns; 0 disables the warning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_grouping_threshold: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PickerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool_grouping_threshold(mut self, threshold: usize) -> Self {
        self.tool_grouping_threshold = Some(threshold);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Keys set in `other` win
    pub fn overlay(self, other: PickerSettings) -> Self {
        Self {
            tool_grouping_threshold: other.tool_grouping_threshold.or(self.tool_grouping_threshold),
            placeholder: other.placeholder.or(self.placeholder),
            description: other.description.or(self.description),
        }
    }

    /// Effective tool limit; `None` when the warning is disabled
    pub fn tool_limit(&self) -> Option<usize> {
        self.tool_grouping_threshold.filter(|&threshold| threshold > 0)
    }

    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Reject values the picker cannot display
    pub fn validate(&self) -> ConfigResult<()> {
        if matches!(self.placeholder.as_deref(), Some(p) if p.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                key: "placeholder".to_string(),
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
