//! MCP (Model Context Protocol) server access
//!
//! The picker only needs two things from MCP: server descriptors (identity,
//! cache and connection state) and a way to refresh a server's tool list.
//! Both sit behind [`McpServerHost`]. [`RmcpServerHost`] implements it on top
//! of the official rmcp SDK.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolpick_core::mcp::{McpClient, McpServerDescriptor, RmcpServerHost};
//! use std::sync::Arc;
//!
//! let client = McpClient::connect_http("http://localhost:3000/mcp", logger.clone()).await?;
//! let host = RmcpServerHost::new(logger);
//! host.add_server(McpServerDescriptor::new("gh", "GitHub", "workspace"), Some(Arc::new(client)));
//! host.refresh_tools("gh").await?;
//! ```

mod client;
mod host;
mod server;

pub use client::{listing_from_tools, mcp_tool_id, McpClient, McpError, McpResult, McpToolListing};
pub use host::RmcpServerHost;
pub use server::{McpCacheState, McpConnectionState, McpServerDescriptor, McpServerHost};

// Re-export the rmcp tool type returned by `McpClient::list_tools`
pub use rmcp::model::Tool as McpTool;
