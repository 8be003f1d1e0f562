//! Provenance of tools and tool sets

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Where a tool or tool set was contributed from
///
/// The source decides which bucket an item lands in and how buckets are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolSource {
    /// Defined by the user, optionally backed by a tool set file
    User {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file: Option<PathBuf>,
    },
    /// Shipped with the editor
    Internal,
    /// Contributed by an MCP server
    Mcp {
        #[serde(rename = "collectionId")]
        collection_id: String,
        #[serde(rename = "serverId")]
        server_id: String,
        label: String,
    },
    /// Contributed by an extension
    Extension {
        #[serde(rename = "extensionId")]
        extension_id: String,
        label: String,
    },
    /// Registered for a single request, never listed in the picker
    External,
}

impl ToolSource {
    pub fn user() -> Self {
        ToolSource::User { file: None }
    }

    pub fn user_file(file: impl Into<PathBuf>) -> Self {
        ToolSource::User { file: Some(file.into()) }
    }

    pub fn internal() -> Self {
        ToolSource::Internal
    }

    pub fn mcp(
        collection_id: impl Into<String>,
        server_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        ToolSource::Mcp {
            collection_id: collection_id.into(),
            server_id: server_id.into(),
            label: label.into(),
        }
    }

    pub fn extension(extension_id: impl Into<String>, label: impl Into<String>) -> Self {
        ToolSource::Extension {
            extension_id: extension_id.into(),
            label: label.into(),
        }
    }

    pub fn is_mcp(&self) -> bool {
        matches!(self, ToolSource::Mcp { .. })
    }

    /// Server id for MCP sources
    pub fn mcp_server_id(&self) -> Option<&str> {
        match self {
            ToolSource::Mcp { server_id, .. } => Some(server_id),
            _ => None,
        }
    }

    /// Whether two sources describe the same origin.
    ///
    /// Labels and user file paths are ignored; only the identifying ids count.
    pub fn same_origin(&self, other: &ToolSource) -> bool {
        match (self, other) {
            (ToolSource::User { .. }, ToolSource::User { .. }) => true,
            (ToolSource::Internal, ToolSource::Internal) => true,
            (ToolSource::External, ToolSource::External) => true,
            (
                ToolSource::Mcp { collection_id: a_col, server_id: a_srv, .. },
                ToolSource::Mcp { collection_id: b_col, server_id: b_srv, .. },
            ) => a_col == b_col && a_srv == b_srv,
            (
                ToolSource::Extension { extension_id: a, .. },
                ToolSource::Extension { extension_id: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}
