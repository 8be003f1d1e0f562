//! Server host backed by rmcp clients
//!
//! Keeps one entry per configured server: its descriptor, an optional live
//! client, the last tool listing, and the diagnostic lines produced while
//! refreshing. The listings double as a catalog provider so the picker sees
//! refreshed tools on its next rebuild.

use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::{listing_from_tools, McpClient, McpError, McpResult, McpToolListing};
use super::server::{McpCacheState, McpConnectionState, McpServerDescriptor, McpServerHost};
use crate::catalog::{Catalog, CatalogProvider};
use crate::logging::Logger;

struct HostedServer {
    descriptor: McpServerDescriptor,
    client: Option<Arc<McpClient>>,
    listing: Option<McpToolListing>,
    output: Vec<String>,
}

/// [`McpServerHost`] for servers reached through [`McpClient`]
pub struct RmcpServerHost {
    servers: RwLock<Vec<HostedServer>>,
    logger: Arc<dyn Logger>,
}

impl RmcpServerHost {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            servers: RwLock::new(Vec::new()),
            logger,
        }
    }

    /// Register a server, replacing any previous entry with the same id
    pub fn add_server(&self, descriptor: McpServerDescriptor, client: Option<Arc<McpClient>>) {
        let mut servers = self.servers.write();
        servers.retain(|s| s.descriptor.id != descriptor.id);
        servers.push(HostedServer {
            descriptor,
            client,
            listing: None,
            output: Vec::new(),
        });
    }

    /// Attach a client to a registered server
    pub fn connect(&self, server_id: &str, client: Arc<McpClient>) -> McpResult<()> {
        let mut servers = self.servers.write();
        let server = servers
            .iter_mut()
            .find(|s| s.descriptor.id == server_id)
            .ok_or_else(|| McpError::UnknownServer(server_id.to_string()))?;
        server.client = Some(client);
        Ok(())
    }

    /// Diagnostic lines recorded for a server
    pub fn output(&self, server_id: &str) -> Vec<String> {
        self.servers
            .read()
            .iter()
            .find(|s| s.descriptor.id == server_id)
            .map(|s| s.output.clone())
            .unwrap_or_default()
    }

    fn record_failure(&self, server_id: &str, error: &McpError) {
        let mut servers = self.servers.write();
        if let Some(server) = servers.iter_mut().find(|s| s.descriptor.id == server_id) {
            server.descriptor.connection_state = McpConnectionState::Error;
            server.output.push(error.to_string());
        }
    }
}

#[async_trait]
impl McpServerHost for RmcpServerHost {
    fn servers(&self) -> Vec<McpServerDescriptor> {
        self.servers
            .read()
            .iter()
            .map(|s| s.descriptor.clone())
            .collect()
    }

    async fn refresh_tools(&self, server_id: &str) -> McpResult<()> {
        let (descriptor, client) = {
            let servers = self.servers.read();
            let server = servers
                .iter()
                .find(|s| s.descriptor.id == server_id)
                .ok_or_else(|| McpError::UnknownServer(server_id.to_string()))?;
            (server.descriptor.clone(), server.client.clone())
        };

        let Some(client) = client else {
            let error = McpError::NotConnected(server_id.to_string());
            self.record_failure(server_id, &error);
            return Err(error);
        };

        let listed = match client.list_tools().await {
            Ok(listed) => listed,
            Err(error) => {
                self.record_failure(server_id, &error);
                return Err(error);
            }
        };

        let listing = listing_from_tools(&descriptor, &listed);
        self.logger.info(&format!(
            "[RmcpServerHost] {} exposes {} tools",
            descriptor.label,
            listing.tools.len()
        ));

        let mut servers = self.servers.write();
        if let Some(server) = servers.iter_mut().find(|s| s.descriptor.id == server_id) {
            server.descriptor.tools = listing.tools.iter().map(|t| t.id.clone()).collect();
            server.descriptor.cache_state = McpCacheState::Fresh;
            server.descriptor.connection_state = McpConnectionState::Running;
            server.listing = Some(listing);
        }

        Ok(())
    }

    fn show_output(&self, server_id: &str) {
        let output = self.output(server_id);
        if output.is_empty() {
            self.logger
                .info(&format!("[RmcpServerHost] No output recorded for {}", server_id));
            return;
        }
        for line in output {
            self.logger.warn(&format!("[RmcpServerHost] {}: {}", server_id, line));
        }
    }
}

impl CatalogProvider for RmcpServerHost {
    fn catalog(&self) -> Arc<Catalog> {
        let servers = self.servers.read();
        let mut tools = Vec::new();
        let mut tool_sets = Vec::new();

        for listing in servers.iter().filter_map(|s| s.listing.as_ref()) {
            tools.extend(listing.tools.iter().cloned());
            tool_sets.push(listing.tool_set.clone());
        }

        Arc::new(Catalog::new(tools, tool_sets))
    }
}
