//! Toolpick Core
//!
//! Runtime-agnostic engine behind a chat client's tool picker.
//! It turns a catalog of tools and tool sets into a grouped, checkable tree,
//! and turns the user's edits back into a selection the chat request can use.
//!
//! ## Picking tools
//!
//! ```rust,ignore
//! use toolpick_core::picker::{ToolPicker, PickerOutcome};
//!
//! let picker = Arc::new(ToolPicker::open(catalog, mcp_host, settings, logger, previous.as_ref()));
//!
//! // The "Update Tools" row of a stale MCP server
//! picker.refresh_server("github").await;
//!
//! if let PickerOutcome::Accepted(selection) = picker.accept() {
//!     let tools = selection.enabled_tools(&catalog_provider.catalog());
//! }
//! ```

pub mod types;
pub mod catalog;
pub mod logging;
pub mod config;
pub mod mcp;
pub mod picker;

// Re-export commonly used types
pub use types::{
    CapabilityId, DismissSignal, Icon, Selection, Tool, ToolId, ToolSet, ToolSetId,
    ToolSetMember, ToolSource,
};

pub use catalog::{Catalog, CatalogBuilder, CatalogError, CatalogProvider, ToolSchemaSnapshot};

pub use logging::{Logger, NoOpLogger, ConsoleLogger};

pub use config::{PickerSettings, SettingsProvider, FileSettingsProvider, MemorySettingsProvider};

pub use mcp::{McpClient, McpError, McpResult, McpServerDescriptor, McpServerHost, RmcpServerHost};

pub use picker::{NodeRef, PickerOutcome, PickerTree, RefreshOutcome, ToolPicker};
