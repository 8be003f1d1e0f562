//! MCP server descriptors and the host interface the picker talks to

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::McpResult;
use crate::types::{Icon, ToolId};

/// Freshness of a server's cached tool list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpCacheState {
    /// Never listed
    #[default]
    Unknown,
    /// Listed from the running server
    Fresh,
    /// Listed once, but the server definition changed since
    Outdated,
}

impl McpCacheState {
    /// Unknown and outdated caches offer an "Update Tools" entry
    pub fn needs_refresh(self) -> bool {
        matches!(self, McpCacheState::Unknown | McpCacheState::Outdated)
    }
}

/// Connection state of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpConnectionState {
    #[default]
    Stopped,
    Starting,
    Running,
    Error,
}

/// What the picker needs to know about one MCP server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerDescriptor {
    /// Server definition id
    pub id: String,
    pub label: String,
    pub collection_id: String,
    /// Label of the owning collection when it can be configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_label: Option<String>,
    #[serde(default)]
    pub cache_state: McpCacheState,
    #[serde(default)]
    pub connection_state: McpConnectionState,
    /// Tools the server currently exposes
    #[serde(default)]
    pub tools: Vec<ToolId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
}

impl McpServerDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            collection_id: collection_id.into(),
            collection_label: None,
            cache_state: McpCacheState::Unknown,
            connection_state: McpConnectionState::Stopped,
            tools: Vec::new(),
            icon: None,
        }
    }

    pub fn with_cache_state(mut self, state: McpCacheState) -> Self {
        self.cache_state = state;
        self
    }

    pub fn with_connection_state(mut self, state: McpConnectionState) -> Self {
        self.connection_state = state;
        self
    }

    pub fn with_collection_label(mut self, label: impl Into<String>) -> Self {
        self.collection_label = Some(label.into());
        self
    }

    pub fn with_tools<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = ids.into_iter().map(ToolId::new).collect();
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// Registry of MCP servers, as seen by the picker
///
/// Implemented by the editor's MCP service, or by [`super::RmcpServerHost`] for
/// servers reached directly through the rmcp client.
#[async_trait]
pub trait McpServerHost: Send + Sync {
    /// Current server descriptors
    fn servers(&self) -> Vec<McpServerDescriptor>;

    /// Start the server if needed and wait until its tool list is live
    async fn refresh_tools(&self, server_id: &str) -> McpResult<()>;

    /// Surface the server's diagnostic output to the user
    fn show_output(&self, server_id: &str);
}
