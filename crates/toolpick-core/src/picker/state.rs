//! Selection seeding, propagation into the tree, and user toggles

use super::bucket::{BucketKey, BucketKind};
use super::tree::{Bucket, CheckState, PickerTree, ToolSetRow, TreeNode};
use crate::catalog::Catalog;
use crate::types::{CapabilityId, Selection, ToolId, ToolSetId};

/// Selection the first render starts from.
///
/// Catalog defaults, overwritten by the previous session's entries. Entries for
/// identities the catalog no longer has are dropped.
pub fn seed_selection(catalog: &Catalog, previous: Option<&Selection>) -> Selection {
    let mut seeded = catalog.default_selection();
    if let Some(previous) = previous {
        for (id, enabled) in previous.iter() {
            if catalog.contains(id) {
                seeded.set(id.clone(), enabled);
            }
        }
    }
    seeded
}

/// Write a selection onto every node of the tree.
///
/// A checked tool set checks all of its direct children. An MCP bucket follows
/// its tool set's flag, or summarizes its tools when the flag is off.
/// Presentational buckets never carry a state.
pub fn propagate(tree: &mut PickerTree, selection: &Selection) {
    for bucket in tree.buckets_mut() {
        propagate_bucket(bucket, selection);
    }
}

fn propagate_bucket(bucket: &mut Bucket, selection: &Selection) {
    let set_checked = match &bucket.kind {
        BucketKind::AliasesToolSet(id) => Some(selection.is_enabled(&CapabilityId::from(id))),
        BucketKind::Presentational => None,
    };

    for child in &mut bucket.children {
        match child {
            TreeNode::Refresh(_) => {}
            TreeNode::Tool(row) => {
                row.checked = set_checked.unwrap_or(false)
                    || selection.is_enabled(&CapabilityId::from(&row.id));
            }
            TreeNode::ToolSet(row) => propagate_row(row, selection),
        }
    }

    bucket.checked = match set_checked {
        None => None,
        Some(true) => Some(CheckState::Checked),
        Some(false) => Some(CheckState::from_children(bucket.tool_rows().map(|t| t.checked))),
    };
}

fn propagate_row(row: &mut ToolSetRow, selection: &Selection) {
    row.checked = selection.is_enabled(&CapabilityId::from(&row.id));
    for tool in &mut row.children {
        tool.checked = row.checked || selection.is_enabled(&CapabilityId::from(&tool.id));
    }
}

/// Address of a checkable node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Bucket(BucketKey),
    ToolSet {
        bucket: BucketKey,
        tool_set: ToolSetId,
    },
    /// A tool, either directly in the bucket or inside a tool set row
    Tool {
        bucket: BucketKey,
        tool_set: Option<ToolSetId>,
        tool: ToolId,
    },
}

/// Apply a user toggle and re-derive the affected parents.
///
/// Returns `false` if the node does not exist.
pub fn set_checked(tree: &mut PickerTree, node: &NodeRef, checked: bool) -> bool {
    match node {
        NodeRef::Bucket(key) => {
            let Some(bucket) = tree.bucket_mut(key) else {
                return false;
            };
            check_bucket(bucket, checked);
            true
        }
        NodeRef::ToolSet { bucket, tool_set } => {
            let Some(row) = tree.bucket_mut(bucket).and_then(|b| tool_set_row_mut(b, tool_set))
            else {
                return false;
            };
            row.checked = checked;
            for tool in &mut row.children {
                tool.checked = checked;
            }
            true
        }
        NodeRef::Tool { bucket, tool_set: Some(set_id), tool } => {
            let Some(row) = tree.bucket_mut(bucket).and_then(|b| tool_set_row_mut(b, set_id))
            else {
                return false;
            };
            let Some(tool_row) = row.children.iter_mut().find(|t| &t.id == tool) else {
                return false;
            };
            tool_row.checked = checked;
            row.checked = row.children.iter().all(|t| t.checked);
            true
        }
        NodeRef::Tool { bucket, tool_set: None, tool } => {
            let Some(bucket) = tree.bucket_mut(bucket) else {
                return false;
            };
            let Some(tool_row) = bucket.tool_rows_mut().find(|t| &t.id == tool) else {
                return false;
            };
            tool_row.checked = checked;
            if bucket.checked.is_some() {
                bucket.checked = Some(CheckState::from_children(bucket.tool_rows().map(|t| t.checked)));
            }
            true
        }
    }
}

fn check_bucket(bucket: &mut Bucket, checked: bool) {
    for child in &mut bucket.children {
        match child {
            TreeNode::Refresh(_) => {}
            TreeNode::Tool(row) => row.checked = checked,
            TreeNode::ToolSet(row) => {
                row.checked = checked;
                for tool in &mut row.children {
                    tool.checked = checked;
                }
            }
        }
    }

    if bucket.checked.is_some() {
        bucket.checked = Some(if checked {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        });
    }
}

fn tool_set_row_mut<'a>(bucket: &'a mut Bucket, id: &ToolSetId) -> Option<&'a mut ToolSetRow> {
    bucket.children.iter_mut().find_map(|child| match child {
        TreeNode::ToolSet(row) if &row.id == id => Some(row),
        _ => None,
    })
}
