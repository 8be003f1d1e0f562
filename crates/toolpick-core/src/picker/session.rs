//! Picker session
//!
//! A [`ToolPicker`] owns one open picker: the rendered tree, the MCP refreshes
//! it started, and the dismissal flag. Every rebuild reads the catalog and the
//! server list afresh and carries the current check marks over.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::bucket::build_buckets;
use super::limit::{tool_limit_warning, ToolLimitWarning};
use super::reduce::reduce;
use super::state::{propagate, seed_selection, set_checked, NodeRef};
use super::tree::{assemble, PickerTree};
use crate::catalog::CatalogProvider;
use crate::config::PickerSettings;
use crate::logging::Logger;
use crate::mcp::McpServerHost;
use crate::types::{DismissSignal, Selection};

pub(crate) const EMPTY_PLACEHOLDER: &str = "Add tools to chat";

/// How a picker session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Accepted(Selection),
    Cancelled,
}

/// Result of [`ToolPicker::refresh_server`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Tools were refreshed and the tree rebuilt
    Rebuilt,
    /// The refresh failed; output was shown and the tree rebuilt unchanged
    Failed,
    /// A refresh for this server is already in flight
    AlreadyRunning,
    /// The picker was closed before the refresh finished
    Discarded,
    UnknownServer,
}

/// Marks a server busy for the duration of a refresh.
///
/// Dropping it, including when the refresh future itself is dropped, clears
/// both the in-flight entry and the bucket's busy flag.
struct InFlight<'a> {
    refreshing: &'a Mutex<HashSet<String>>,
    tree: &'a RwLock<PickerTree>,
    server_id: String,
}

impl<'a> InFlight<'a> {
    /// `None` if a refresh for the server is already running
    fn start(picker: &'a ToolPicker, server_id: &str) -> Option<Self> {
        if !picker.refreshing.lock().insert(server_id.to_string()) {
            return None;
        }
        if let Some(bucket) = picker.tree.write().server_bucket_mut(server_id) {
            bucket.busy = true;
        }
        Some(Self {
            refreshing: &picker.refreshing,
            tree: &picker.tree,
            server_id: server_id.to_string(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.refreshing.lock().remove(&self.server_id);
        if let Some(bucket) = self.tree.write().server_bucket_mut(&self.server_id) {
            bucket.busy = false;
        }
    }
}

/// An open tool picker
pub struct ToolPicker {
    catalog: Arc<dyn CatalogProvider>,
    mcp: Arc<dyn McpServerHost>,
    settings: PickerSettings,
    logger: Arc<dyn Logger>,
    tree: RwLock<PickerTree>,
    refreshing: Mutex<HashSet<String>>,
    dismiss: DismissSignal,
}

impl ToolPicker {
    /// Open a picker, seeding check marks from `previous` or the catalog defaults
    pub fn open(
        catalog: Arc<dyn CatalogProvider>,
        mcp: Arc<dyn McpServerHost>,
        settings: PickerSettings,
        logger: Arc<dyn Logger>,
        previous: Option<&Selection>,
    ) -> Self {
        let picker = Self {
            catalog,
            mcp,
            settings,
            logger,
            tree: RwLock::new(PickerTree::default()),
            refreshing: Mutex::new(HashSet::new()),
            dismiss: DismissSignal::new(),
        };

        let previous = previous.cloned().unwrap_or_default();
        picker.rebuild_from(&previous);
        picker
    }

    /// Rebuild the tree, keeping the current check marks
    pub fn rebuild(&self) {
        let current = self.current_selection();
        self.rebuild_from(&current);
    }

    fn rebuild_from(&self, selection: &Selection) {
        let catalog = self.catalog.catalog();

        let excluded = catalog.excluded_tool_sets();
        if !excluded.is_empty() {
            self.logger.warn(&format!(
                "[ToolPicker] Skipping {} cyclic tool sets: {:?}",
                excluded.len(),
                excluded.iter().map(|id| id.as_str()).collect::<Vec<_>>()
            ));
        }
        for tool in catalog.conflicting_memberships() {
            self.logger.debug(&format!(
                "[ToolPicker] Tool {} belongs to tool sets of different origins",
                tool
            ));
        }

        let seeded = seed_selection(&catalog, Some(selection));
        let mut tree = assemble(build_buckets(&catalog, self.mcp.servers()), &catalog);
        propagate(&mut tree, &seeded);

        let refreshing = self.refreshing.lock().clone();
        for bucket in tree.buckets_mut() {
            bucket.busy = bucket
                .mcp_server
                .as_ref()
                .is_some_and(|id| refreshing.contains(id));
        }

        self.logger.debug(&format!(
            "[ToolPicker] Rendered {} buckets",
            tree.buckets().len()
        ));
        *self.tree.write() = tree;
    }

    /// Snapshot of the current tree
    pub fn tree(&self) -> PickerTree {
        self.tree.read().clone()
    }

    /// Apply a user toggle; returns `false` for unknown nodes
    pub fn set_checked(&self, node: &NodeRef, checked: bool) -> bool {
        set_checked(&mut self.tree.write(), node, checked)
    }

    /// Selection the tree currently shows
    pub fn current_selection(&self) -> Selection {
        reduce(&self.tree.read())
    }

    /// Input placeholder; the empty-tree text when nothing can be picked
    pub fn placeholder(&self) -> &str {
        if self.tree.read().is_empty() {
            EMPTY_PLACEHOLDER
        } else {
            self.settings.placeholder()
        }
    }

    /// Optional text shown above the tree
    pub fn description(&self) -> Option<&str> {
        self.settings.description()
    }

    /// Warning when too many tools are checked
    pub fn tool_limit_warning(&self) -> Option<ToolLimitWarning> {
        tool_limit_warning(&self.tree.read(), self.settings.tool_limit())
    }

    /// Whether a refresh of `server_id` is running
    pub fn is_busy(&self, server_id: &str) -> bool {
        self.refreshing.lock().contains(server_id)
    }

    /// Handle that observes the picker closing
    pub fn dismiss_signal(&self) -> DismissSignal {
        self.dismiss.clone()
    }

    /// Ask an MCP server for its live tools and rebuild the tree.
    ///
    /// Failures are reported through the host's output and never returned as
    /// errors. Only one refresh per server runs at a time.
    pub async fn refresh_server(&self, server_id: &str) -> RefreshOutcome {
        if self.dismiss.is_dismissed() {
            return RefreshOutcome::Discarded;
        }
        if !self.mcp.servers().iter().any(|s| s.id == server_id) {
            self.logger
                .warn(&format!("[ToolPicker] Unknown MCP server: {}", server_id));
            return RefreshOutcome::UnknownServer;
        }
        let Some(guard) = InFlight::start(self, server_id) else {
            self.logger.debug(&format!(
                "[ToolPicker] Refresh of {} already running",
                server_id
            ));
            return RefreshOutcome::AlreadyRunning;
        };

        self.logger
            .info(&format!("[ToolPicker] Refreshing tools of {}", server_id));
        let result = self.mcp.refresh_tools(server_id).await;
        drop(guard);

        if self.dismiss.is_dismissed() {
            self.logger.debug(&format!(
                "[ToolPicker] Picker closed, dropping refresh of {}",
                server_id
            ));
            return RefreshOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                self.rebuild();
                RefreshOutcome::Rebuilt
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "[ToolPicker] Failed to refresh {}: {}",
                    server_id, e
                ));
                self.mcp.show_output(server_id);
                self.rebuild();
                RefreshOutcome::Failed
            }
        }
    }

    /// Close the picker and commit the tree's selection
    pub fn accept(&self) -> PickerOutcome {
        if !self.dismiss.dismiss() {
            return PickerOutcome::Cancelled;
        }
        PickerOutcome::Accepted(self.current_selection())
    }

    /// Close the picker without committing
    pub fn dismiss(&self) -> PickerOutcome {
        self.dismiss.dismiss();
        PickerOutcome::Cancelled
    }
}
