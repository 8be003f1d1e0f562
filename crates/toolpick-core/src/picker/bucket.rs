//! Bucket construction
//!
//! Buckets group tree rows by provenance: user tool sets, built-in tools, one
//! bucket per MCP server and one per extension. They are rebuilt on every
//! render and never persisted.

use std::collections::HashMap;
use std::fmt;

use super::tree::{Bucket, RefreshNode, TreeNode};
use crate::catalog::Catalog;
use crate::mcp::{McpConnectionState, McpServerDescriptor};
use crate::types::{Icon, ToolSetId, ToolSource};

pub(crate) const USER_BUCKET_LABEL: &str = "User Defined Tool Sets";
pub(crate) const BUILT_IN_BUCKET_LABEL: &str = "Built-In";

/// Stable grouping key derived from a [`ToolSource`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey(String);

impl BucketKey {
    /// Grouping key for a source.
    ///
    /// # Panics
    ///
    /// External sources never reach the picker; asking for their key is a bug
    /// in the caller.
    pub fn for_source(source: &ToolSource) -> Self {
        match source {
            ToolSource::User { .. } => BucketKey((BucketOrdinal::User as u8).to_string()),
            ToolSource::Internal => BucketKey((BucketOrdinal::BuiltIn as u8).to_string()),
            ToolSource::Mcp { collection_id, server_id, .. } => {
                BucketKey(format!("mcp:{}:{}", collection_id, server_id))
            }
            ToolSource::Extension { extension_id, .. } => {
                BucketKey(format!("extension:{}", extension_id))
            }
            ToolSource::External => {
                panic!("external tool sources cannot be grouped into picker buckets")
            }
        }
    }

    /// Raw key, stable across renders
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort position of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketOrdinal {
    User = 0,
    BuiltIn = 1,
    Mcp = 2,
    Extension = 3,
}

/// Whether a bucket stands for a tool set of its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketKind {
    /// Pure grouping; only its rows carry state
    Presentational,
    /// The bucket is the MCP server's tool set
    AliasesToolSet(ToolSetId),
}

/// Button-style actions attached to a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    /// Open the configuration of an MCP collection
    ConfigureCollection { collection_id: String, label: String },
    /// Show the diagnostic output of an MCP server
    ShowOutput { server_id: String },
    /// Open the file a user tool set is defined in
    EditToolSet { file: std::path::PathBuf },
}

struct ServerSlot {
    descriptor: McpServerDescriptor,
    seen: bool,
}

/// Buckets keyed by [`BucketKey`], kept in creation order until sorted
#[derive(Debug, Default)]
pub struct BucketMap {
    buckets: Vec<Bucket>,
    index: HashMap<BucketKey, usize>,
}

impl BucketMap {
    /// Bucket by key
    pub fn get(&self, key: &BucketKey) -> Option<&Bucket> {
        self.index.get(key).map(|&idx| &self.buckets[idx])
    }

    pub fn get_mut(&mut self, key: &BucketKey) -> Option<&mut Bucket> {
        self.index.get(key).map(|&idx| &mut self.buckets[idx])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    fn insert(&mut self, bucket: Bucket) {
        self.index.insert(bucket.key.clone(), self.buckets.len());
        self.buckets.push(bucket);
    }

    /// Buckets ordered by ordinal, then label, then key
    pub fn into_sorted(self) -> Vec<Bucket> {
        let mut buckets = self.buckets;
        buckets.sort_by(|a, b| {
            a.ordinal
                .cmp(&b.ordinal)
                .then_with(|| super::tree::compare_labels(&a.label, &b.label))
                .then_with(|| a.key.cmp(&b.key))
        });
        buckets
    }
}

/// Creates buckets on demand while the catalog is walked
pub struct BucketBuilder {
    servers: HashMap<String, ServerSlot>,
    server_order: Vec<String>,
    buckets: BucketMap,
}

impl BucketBuilder {
    /// Builder aware of the registered MCP servers
    pub fn new(servers: impl IntoIterator<Item = McpServerDescriptor>) -> Self {
        let mut slots = HashMap::new();
        let mut order = Vec::new();
        for descriptor in servers {
            order.push(descriptor.id.clone());
            slots.insert(descriptor.id.clone(), ServerSlot { descriptor, seen: false });
        }
        Self {
            servers: slots,
            server_order: order,
            buckets: BucketMap::default(),
        }
    }

    /// Bucket for a source, created on first use.
    ///
    /// Returns `None` for MCP sources whose server is not registered.
    pub fn bucket_for(&mut self, source: &ToolSource) -> Option<&mut Bucket> {
        let key = BucketKey::for_source(source);
        if self.buckets.get(&key).is_none() {
            let bucket = self.create(source, key.clone())?;
            self.buckets.insert(bucket);
        }
        self.buckets.get_mut(&key)
    }

    /// Add buckets for stale servers that contributed nothing yet, so the user
    /// can still ask them to start and list their tools.
    pub fn add_idle_servers(&mut self) {
        let idle: Vec<ToolSource> = self
            .server_order
            .iter()
            .filter_map(|id| self.servers.get(id))
            .filter(|slot| !slot.seen && slot.descriptor.cache_state.needs_refresh())
            .map(|slot| {
                ToolSource::mcp(
                    &slot.descriptor.collection_id,
                    &slot.descriptor.id,
                    &slot.descriptor.label,
                )
            })
            .collect();

        for source in idle {
            self.bucket_for(&source);
        }
    }

    /// Buckets collected so far
    pub fn finish(self) -> BucketMap {
        self.buckets
    }

    fn create(&mut self, source: &ToolSource, key: BucketKey) -> Option<Bucket> {
        match source {
            ToolSource::Mcp { server_id, label, .. } => {
                let slot = self.servers.get_mut(server_id)?;
                slot.seen = true;
                Some(mcp_bucket(&slot.descriptor, label, key))
            }
            ToolSource::Extension { label, .. } => Some(Bucket::new(
                key,
                BucketOrdinal::Extension,
                label.clone(),
                Some(Icon::theme("extensions")),
                true,
            )),
            ToolSource::Internal => Some(Bucket::new(
                key,
                BucketOrdinal::BuiltIn,
                BUILT_IN_BUCKET_LABEL.to_string(),
                None,
                false,
            )),
            ToolSource::User { .. } => Some(Bucket::new(
                key,
                BucketOrdinal::User,
                USER_BUCKET_LABEL.to_string(),
                None,
                true,
            )),
            ToolSource::External => unreachable!("external sources are rejected by BucketKey"),
        }
    }
}

fn mcp_bucket(server: &McpServerDescriptor, label: &str, key: BucketKey) -> Bucket {
    let icon = server.icon.clone().unwrap_or_else(|| Icon::theme("mcp"));
    let stale = server.cache_state.needs_refresh();
    let mut bucket = Bucket::new(key, BucketOrdinal::Mcp, label.to_string(), Some(icon), !stale);
    bucket.mcp_server = Some(server.id.clone());

    if let Some(collection_label) = &server.collection_label {
        bucket.actions.push(NodeAction::ConfigureCollection {
            collection_id: server.collection_id.clone(),
            label: format!("Configure {}", collection_label),
        });
    }
    if server.connection_state == McpConnectionState::Error {
        bucket.actions.push(NodeAction::ShowOutput {
            server_id: server.id.clone(),
        });
    }
    if stale {
        bucket
            .children
            .push(TreeNode::Refresh(RefreshNode::new(server.id.clone())));
    }

    bucket
}

/// Buckets for everything the catalog can place, plus idle stale servers.
///
/// Children are filled in by [`super::assemble`].
pub fn build_buckets(
    catalog: &Catalog,
    servers: impl IntoIterator<Item = McpServerDescriptor>,
) -> BucketMap {
    let mut builder = BucketBuilder::new(servers);

    for set in catalog.tool_sets() {
        builder.bucket_for(&set.source);
    }
    for tool in catalog.tools().filter(|tool| tool.can_be_referenced) {
        builder.bucket_for(&tool.source);
    }
    builder.add_idle_servers();

    builder.finish()
}
