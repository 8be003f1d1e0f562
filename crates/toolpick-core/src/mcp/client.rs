//! MCP client using the official rmcp SDK
//!
//! Connects to MCP servers over Unix socket or HTTP and turns their
//! `tools/list` response into catalog entries.

use std::path::Path;
use std::sync::Arc;

use rmcp::{
    ServiceExt,
    model::{ClientCapabilities, ClientInfo, Implementation, Tool as McpTool},
    service::RunningService,
    RoleClient,
};
use thiserror::Error;

#[cfg(unix)]
use tokio::net::UnixStream;

use super::server::McpServerDescriptor;
use crate::logging::Logger;
use crate::types::{Tool, ToolSet, ToolSource};

/// MCP client errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Server not connected: {0}")]
    NotConnected(String),

    #[error("Unknown MCP server: {0}")]
    UnknownServer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type McpResult<T> = Result<T, McpError>;

/// MCP client for listing the tools of one server
pub struct McpClient {
    client: RunningService<RoleClient, ClientInfo>,
    logger: Arc<dyn Logger>,
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "toolpick-core".to_string(),
            title: Some("Tool Picker".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

impl McpClient {
    /// Connect to an MCP server over a Unix socket
    #[cfg(unix)]
    pub async fn connect_unix<P: AsRef<Path>>(
        socket_path: P,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        let path = socket_path.as_ref();
        logger.info(&format!("[McpClient] Connecting to Unix socket: {:?}", path));

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| McpError::ConnectionFailed(e.to_string()))?;

        let client = client_info()
            .serve(stream)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized");

        Ok(Self { client, logger })
    }

    /// Connect to an MCP server over HTTP (Streamable HTTP transport)
    pub async fn connect_http(url: &str, logger: Arc<dyn Logger>) -> McpResult<Self> {
        use rmcp::transport::StreamableHttpClientTransport;

        logger.info(&format!("[McpClient] Connecting to HTTP: {}", url));

        let transport = StreamableHttpClientTransport::from_uri(url);

        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        logger.info("[McpClient] Connected and initialized");

        Ok(Self { client, logger })
    }

    /// List all tools the server exposes
    pub async fn list_tools(&self) -> McpResult<Vec<McpTool>> {
        let result = self
            .client
            .list_tools(Default::default())
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger
            .info(&format!("[McpClient] Listed {} tools", result.tools.len()));

        Ok(result.tools)
    }

    /// Server implementation info reported during initialization
    pub fn server_info(&self) -> Option<&Implementation> {
        self.client.peer_info().map(|info| &info.server_info)
    }

    /// Close the connection
    pub async fn close(self) -> McpResult<()> {
        self.logger.info("[McpClient] Closing connection");
        self.client
            .cancel()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;
        Ok(())
    }
}

/// Catalog entries contributed by one server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpToolListing {
    pub tools: Vec<Tool>,
    /// The server's own tool set, which the picker shows as the server bucket
    pub tool_set: ToolSet,
}

/// Catalog id of a tool listed by an MCP server
pub fn mcp_tool_id(server_id: &str, tool_name: &str) -> String {
    format!("mcp_{}_{}", server_id, tool_name)
}

/// Turn a `tools/list` response into catalog tools plus the server tool set
pub fn listing_from_tools(server: &McpServerDescriptor, listed: &[McpTool]) -> McpToolListing {
    let source = ToolSource::mcp(&server.collection_id, &server.id, &server.label);

    let tools: Vec<Tool> = listed
        .iter()
        .map(|mcp_tool| {
            let name = mcp_tool.name.to_string();
            let tool = Tool::new(mcp_tool_id(&server.id, &name), name.clone(), source.clone())
                .with_reference_name(name);
            match mcp_tool.description.as_deref() {
                Some(description) => tool.with_description(description),
                None => tool,
            }
        })
        .collect();

    let tool_set = ToolSet::new(server.id.clone(), server.label.clone(), source)
        .with_tools(tools.iter().map(|tool| tool.id.as_str().to_string()));

    McpToolListing { tools, tool_set }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ToolId, ToolSetMember};

    fn listed(name: &'static str, description: &'static str) -> McpTool {
        McpTool::new(name, description, Arc::new(serde_json::Map::new()))
    }

    #[test]
    fn test_listing_from_tools() {
        let server = McpServerDescriptor::new("gh", "GitHub", "workspace");
        let listing = listing_from_tools(
            &server,
            &[listed("create_issue", "Open an issue"), listed("search", "Search code")],
        );

        assert_eq!(listing.tools.len(), 2);
        let issue = &listing.tools[0];
        assert_eq!(issue.id, ToolId::new("mcp_gh_create_issue"));
        assert_eq!(issue.label(), "create_issue");
        assert_eq!(issue.description(), Some("Open an issue"));
        assert!(issue.can_be_referenced);
        assert_eq!(issue.source.mcp_server_id(), Some("gh"));

        assert_eq!(listing.tool_set.id.as_str(), "gh");
        assert_eq!(listing.tool_set.reference_name, "GitHub");
        assert_eq!(
            listing.tool_set.members,
            vec![
                ToolSetMember::Tool(ToolId::new("mcp_gh_create_issue")),
                ToolSetMember::Tool(ToolId::new("mcp_gh_search")),
            ]
        );
    }

    #[test]
    fn test_empty_listing() {
        let server = McpServerDescriptor::new("idle", "Idle", "workspace");
        let listing = listing_from_tools(&server, &[]);

        assert!(listing.tools.is_empty());
        assert!(listing.tool_set.members.is_empty());
        assert!(listing.tool_set.source.is_mcp());
    }
}
