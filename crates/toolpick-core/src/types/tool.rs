//! Tool and tool set definitions

use std::fmt;
use serde::{Deserialize, Serialize};

use super::source::ToolSource;

/// Identity of a tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(String);

impl ToolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identity of a tool set
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolSetId(String);

impl ToolSetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolSetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Icon reference, either a theme icon name or a resource URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Icon {
    Theme(String),
    Uri(String),
}

impl Icon {
    pub fn theme(name: impl Into<String>) -> Self {
        Icon::Theme(name.into())
    }
}

/// An atomic capability exposed to the chat agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: ToolId,
    /// Name used to reference the tool in prompts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_name: Option<String>,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_description: Option<String>,
    #[serde(default)]
    pub model_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub source: ToolSource,
    /// Whether users can pick this tool on its own
    #[serde(default = "referenceable_by_default")]
    pub can_be_referenced: bool,
    /// Catalog-declared default when no selection exists yet
    #[serde(default)]
    pub default_enabled: bool,
}

fn referenceable_by_default() -> bool {
    true
}

impl Tool {
    /// Create a referenceable tool
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, source: ToolSource) -> Self {
        Self {
            id: ToolId::new(id),
            reference_name: None,
            display_name: display_name.into(),
            user_description: None,
            model_description: String::new(),
            icon: None,
            source,
            can_be_referenced: true,
            default_enabled: false,
        }
    }

    pub fn with_reference_name(mut self, name: impl Into<String>) -> Self {
        self.reference_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.model_description = description.into();
        self
    }

    pub fn with_user_description(mut self, description: impl Into<String>) -> Self {
        self.user_description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Mark the tool as only usable through a tool set
    pub fn unreferenceable(mut self) -> Self {
        self.can_be_referenced = false;
        self
    }

    pub fn enabled_by_default(mut self) -> Self {
        self.default_enabled = true;
        self
    }

    /// Label shown in the picker
    pub fn label(&self) -> &str {
        self.reference_name.as_deref().unwrap_or(&self.display_name)
    }

    /// Description shown next to the label
    pub fn description(&self) -> Option<&str> {
        match self.user_description.as_deref() {
            Some(description) => Some(description),
            None if !self.model_description.is_empty() => Some(&self.model_description),
            None => None,
        }
    }
}

/// Member of a tool set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum ToolSetMember {
    Tool(ToolId),
    ToolSet(ToolSetId),
}

/// A named, ordered group of tools and nested tool sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSet {
    pub id: ToolSetId,
    pub reference_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub source: ToolSource,
    #[serde(default)]
    pub members: Vec<ToolSetMember>,
    #[serde(default)]
    pub default_enabled: bool,
}

impl ToolSet {
    pub fn new(id: impl Into<String>, reference_name: impl Into<String>, source: ToolSource) -> Self {
        Self {
            id: ToolSetId::new(id),
            reference_name: reference_name.into(),
            description: None,
            icon: None,
            source,
            members: Vec::new(),
            default_enabled: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_tool(mut self, id: impl Into<String>) -> Self {
        self.members.push(ToolSetMember::Tool(ToolId::new(id)));
        self
    }

    pub fn with_tools<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members
            .extend(ids.into_iter().map(|id| ToolSetMember::Tool(ToolId::new(id))));
        self
    }

    pub fn with_tool_set(mut self, id: impl Into<String>) -> Self {
        self.members.push(ToolSetMember::ToolSet(ToolSetId::new(id)));
        self
    }

    pub fn enabled_by_default(mut self) -> Self {
        self.default_enabled = true;
        self
    }
}
