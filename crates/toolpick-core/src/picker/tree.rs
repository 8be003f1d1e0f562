//! Picker tree nodes and tree assembly

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::bucket::{BucketKey, BucketKind, BucketMap, BucketOrdinal, NodeAction};
use crate::catalog::Catalog;
use crate::types::{Icon, Tool, ToolId, ToolSet, ToolSetId, ToolSource};

pub(crate) const UPDATE_TOOLS_LABEL: &str = "Update Tools";

/// Checked state of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Checked,
    /// Some, but not all, children are checked
    Indeterminate,
}

impl CheckState {
    /// Aggregate of child states; no children counts as unchecked
    pub fn from_children(children: impl IntoIterator<Item = bool>) -> Self {
        let (mut any, mut all, mut count) = (false, true, 0usize);
        for checked in children {
            any |= checked;
            all &= checked;
            count += 1;
        }
        match (count, any, all) {
            (0, _, _) => CheckState::Unchecked,
            (_, _, true) => CheckState::Checked,
            (_, true, false) => CheckState::Indeterminate,
            _ => CheckState::Unchecked,
        }
    }

    /// Only a fully checked state counts
    pub fn is_checked(self) -> bool {
        self == CheckState::Checked
    }
}

/// Top-level grouping row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub key: BucketKey,
    pub ordinal: BucketOrdinal,
    pub kind: BucketKind,
    pub label: String,
    pub icon: Option<Icon>,
    pub collapsed: bool,
    /// Set while the bucket's MCP server refreshes
    pub busy: bool,
    /// `None` for presentational buckets
    pub checked: Option<CheckState>,
    pub actions: Vec<NodeAction>,
    /// Server id for MCP buckets
    pub mcp_server: Option<String>,
    pub children: Vec<TreeNode>,
}

impl Bucket {
    pub(crate) fn new(
        key: BucketKey,
        ordinal: BucketOrdinal,
        label: String,
        icon: Option<Icon>,
        collapsed: bool,
    ) -> Self {
        Self {
            key,
            ordinal,
            kind: BucketKind::Presentational,
            label,
            icon,
            collapsed,
            busy: false,
            checked: None,
            actions: Vec::new(),
            mcp_server: None,
            children: Vec::new(),
        }
    }

    /// Tool set this bucket stands for, if any
    pub fn aliased_tool_set(&self) -> Option<&ToolSetId> {
        match &self.kind {
            BucketKind::AliasesToolSet(id) => Some(id),
            BucketKind::Presentational => None,
        }
    }

    /// Tool rows placed directly in the bucket
    pub fn tool_rows(&self) -> impl Iterator<Item = &ToolRow> {
        self.children.iter().filter_map(|child| match child {
            TreeNode::Tool(row) => Some(row),
            _ => None,
        })
    }

    pub(crate) fn tool_rows_mut(&mut self) -> impl Iterator<Item = &mut ToolRow> {
        self.children.iter_mut().filter_map(|child| match child {
            TreeNode::Tool(row) => Some(row),
            _ => None,
        })
    }

    /// Tool set rows in display order
    pub fn tool_set_rows(&self) -> impl Iterator<Item = &ToolSetRow> {
        self.children.iter().filter_map(|child| match child {
            TreeNode::ToolSet(row) => Some(row),
            _ => None,
        })
    }

    /// The refresh node of a stale MCP server
    pub fn refresh_node(&self) -> Option<&RefreshNode> {
        self.children.iter().find_map(|child| match child {
            TreeNode::Refresh(node) => Some(node),
            _ => None,
        })
    }
}

/// Row below a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// "Update Tools" entry of a stale MCP server
    Refresh(RefreshNode),
    ToolSet(ToolSetRow),
    Tool(ToolRow),
}

impl TreeNode {
    /// Label shown for the node
    pub fn label(&self) -> &str {
        match self {
            TreeNode::Refresh(node) => &node.label,
            TreeNode::ToolSet(row) => &row.label,
            TreeNode::Tool(row) => &row.label,
        }
    }

    /// The tool itself, or a tool set row's tools
    pub fn tool_rows(&self) -> std::slice::Iter<'_, ToolRow> {
        match self {
            TreeNode::Tool(row) => std::slice::from_ref(row).iter(),
            TreeNode::ToolSet(row) => row.children.iter(),
            TreeNode::Refresh(_) => (&[] as &[ToolRow]).iter(),
        }
    }

    fn sort_id(&self) -> &str {
        match self {
            TreeNode::Refresh(node) => &node.server_id,
            TreeNode::ToolSet(row) => row.id.as_str(),
            TreeNode::Tool(row) => row.id.as_str(),
        }
    }
}

/// Action row that asks an MCP server for its live tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshNode {
    pub server_id: String,
    pub label: String,
    pub icon: Icon,
}

impl RefreshNode {
    /// Refresh node for `server_id`
    pub fn new(server_id: impl Into<String>) -> Self {
        Self {
            server_id: server_id.into(),
            label: UPDATE_TOOLS_LABEL.to_string(),
            icon: Icon::theme("sync"),
        }
    }
}

/// A non-MCP tool set shown inside its bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSetRow {
    pub id: ToolSetId,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<Icon>,
    pub checked: bool,
    pub collapsed: bool,
    pub actions: Vec<NodeAction>,
    pub children: Vec<ToolRow>,
}

impl ToolSetRow {
    fn from_tool_set(set: &ToolSet, children: Vec<ToolRow>) -> Self {
        let mut actions = Vec::new();
        if let ToolSource::User { file: Some(file) } = &set.source {
            actions.push(NodeAction::EditToolSet { file: file.clone() });
        }
        Self {
            id: set.id.clone(),
            label: set.reference_name.clone(),
            description: set.description.clone(),
            icon: set.icon.clone(),
            checked: false,
            collapsed: true,
            actions,
            children,
        }
    }
}

/// A single tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRow {
    pub id: ToolId,
    pub label: String,
    pub description: Option<String>,
    pub icon: Icon,
    pub checked: bool,
}

impl ToolRow {
    fn from_tool(tool: &Tool) -> Self {
        Self {
            id: tool.id.clone(),
            label: tool.label().to_string(),
            description: tool.description().map(str::to_string),
            icon: tool.icon.clone().unwrap_or_else(|| Icon::theme("tools")),
            checked: false,
        }
    }
}

/// The assembled picker tree: sorted buckets and their rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerTree {
    buckets: Vec<Bucket>,
}

impl PickerTree {
    /// Tree over already sorted buckets
    pub fn new(buckets: Vec<Bucket>) -> Self {
        Self { buckets }
    }

    /// Buckets in display order
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn buckets_mut(&mut self) -> &mut [Bucket] {
        &mut self.buckets
    }

    /// Bucket by key
    pub fn bucket(&self, key: &BucketKey) -> Option<&Bucket> {
        self.buckets.iter().find(|b| &b.key == key)
    }

    pub fn bucket_mut(&mut self, key: &BucketKey) -> Option<&mut Bucket> {
        self.buckets.iter_mut().find(|b| &b.key == key)
    }

    /// Bucket of an MCP server
    pub fn server_bucket_mut(&mut self, server_id: &str) -> Option<&mut Bucket> {
        self.buckets
            .iter_mut()
            .find(|b| b.mcp_server.as_deref() == Some(server_id))
    }

    /// No buckets at all; the picker shows its empty placeholder
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every tool row in the tree, duplicates included
    pub fn tool_rows(&self) -> impl Iterator<Item = &ToolRow> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.children.iter().flat_map(TreeNode::tool_rows))
    }
}

/// Case-insensitive label order, falling back to the raw label
pub(crate) fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Nest tool sets and tools under their buckets.
///
/// MCP tool sets become the bucket itself; every other tool set becomes a row
/// holding its flattened tools. Referenceable tools are then listed directly in
/// their source's bucket. All nodes start unchecked; see [`super::propagate`].
pub fn assemble(mut buckets: BucketMap, catalog: &Catalog) -> PickerTree {
    let mut loose: HashMap<BucketKey, HashSet<ToolId>> = HashMap::new();

    for set in catalog.tool_sets() {
        let key = BucketKey::for_source(&set.source);
        let Some(bucket) = buckets.get_mut(&key) else {
            continue;
        };

        if set.source.is_mcp() {
            bucket.kind = BucketKind::AliasesToolSet(set.id.clone());
            let placed = loose.entry(key).or_default();
            for tool in catalog.tools_of(&set.id) {
                if placed.insert(tool.id.clone()) {
                    bucket.children.push(TreeNode::Tool(ToolRow::from_tool(tool)));
                }
            }
        } else {
            let children = catalog
                .tools_of(&set.id)
                .into_iter()
                .map(ToolRow::from_tool)
                .collect();
            bucket
                .children
                .push(TreeNode::ToolSet(ToolSetRow::from_tool_set(set, children)));
        }
    }

    for tool in catalog.tools().filter(|tool| tool.can_be_referenced) {
        let key = BucketKey::for_source(&tool.source);
        let Some(bucket) = buckets.get_mut(&key) else {
            continue;
        };
        if loose.entry(key).or_default().insert(tool.id.clone()) {
            bucket.children.push(TreeNode::Tool(ToolRow::from_tool(tool)));
        }
    }

    let mut sorted = buckets.into_sorted();
    for bucket in &mut sorted {
        sort_children(&mut bucket.children);
    }

    PickerTree::new(sorted)
}

fn sort_children(children: &mut [TreeNode]) {
    children.sort_by(|a, b| {
        let a_refresh = matches!(a, TreeNode::Refresh(_));
        let b_refresh = matches!(b, TreeNode::Refresh(_));
        b_refresh
            .cmp(&a_refresh)
            .then_with(|| compare_labels(a.label(), b.label()))
            .then_with(|| a.sort_id().cmp(b.sort_id()))
    });

    for child in children.iter_mut() {
        if let TreeNode::ToolSet(row) = child {
            row.children.sort_by(|a, b| {
                compare_labels(&a.label, &b.label).then_with(|| a.id.cmp(&b.id))
            });
        }
    }
}
