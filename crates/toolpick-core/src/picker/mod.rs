//! Hierarchical tool picker
//!
//! A render goes through four steps:
//!
//! 1. [`build_buckets`] groups the catalog by provenance (user, built-in,
//!    one bucket per MCP server and per extension).
//! 2. [`assemble`] nests tool sets and tools under those buckets and sorts them.
//! 3. [`propagate`] writes a [`Selection`](crate::types::Selection) onto the
//!    tree, including the MCP bucket tri-state.
//! 4. [`reduce`] reads the edited tree back into a selection.
//!
//! [`ToolPicker`] runs these steps for one open picker and handles MCP
//! refreshes and dismissal.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolpick_core::picker::{ToolPicker, PickerOutcome};
//!
//! let picker = Arc::new(ToolPicker::open(catalog, host, settings, logger, previous.as_ref()));
//! picker.refresh_server("github").await;
//! if let PickerOutcome::Accepted(selection) = picker.accept() {
//!     save(selection);
//! }
//! ```

mod bucket;
mod limit;
mod reduce;
mod session;
mod state;
mod tree;

pub use bucket::{build_buckets, BucketBuilder, BucketKey, BucketKind, BucketMap, BucketOrdinal, NodeAction};
pub use limit::{checked_tool_count, tool_limit_warning, ToolLimitWarning};
pub use reduce::reduce;
pub use session::{PickerOutcome, RefreshOutcome, ToolPicker};
pub use state::{propagate, seed_selection, set_checked, NodeRef};
pub use tree::{assemble, Bucket, CheckState, PickerTree, RefreshNode, ToolRow, ToolSetRow, TreeNode};
