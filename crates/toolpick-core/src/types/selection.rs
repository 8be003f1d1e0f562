//! Selection map carried between picker sessions

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use serde::{Deserialize, Serialize};

use super::tool::{ToolId, ToolSetId, ToolSetMember};
use crate::catalog::Catalog;

/// Identity of a selectable capability
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityId {
    Tool(ToolId),
    ToolSet(ToolSetId),
}

impl From<ToolId> for CapabilityId {
    fn from(id: ToolId) -> Self {
        CapabilityId::Tool(id)
    }
}

impl From<ToolSetId> for CapabilityId {
    fn from(id: ToolSetId) -> Self {
        CapabilityId::ToolSet(id)
    }
}

impl From<&ToolId> for CapabilityId {
    fn from(id: &ToolId) -> Self {
        CapabilityId::Tool(id.clone())
    }
}

impl From<&ToolSetId> for CapabilityId {
    fn from(id: &ToolSetId) -> Self {
        CapabilityId::ToolSet(id.clone())
    }
}

/// Enabled/disabled state per tool and tool set
///
/// Ordered so that two reductions of the same tree compare and iterate identically.
/// Serialized as a list of `{kind, id, enabled}` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<SelectionRecord>", from = "Vec<SelectionRecord>")]
pub struct Selection {
    entries: BTreeMap<CapabilityId, bool>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &CapabilityId) -> Option<bool> {
        self.entries.get(id).copied()
    }

    /// True only for entries explicitly set to `true`
    pub fn is_enabled(&self, id: &CapabilityId) -> bool {
        self.get(id) == Some(true)
    }

    pub fn contains(&self, id: &CapabilityId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn set(&mut self, id: impl Into<CapabilityId>, enabled: bool) {
        self.entries.insert(id.into(), enabled);
    }

    /// Set an entry, keeping `true` if it is already enabled
    pub fn merge_enabled(&mut self, id: impl Into<CapabilityId>, enabled: bool) {
        let entry = self.entries.entry(id.into()).or_insert(false);
        *entry = *entry || enabled;
    }

    pub fn remove(&mut self, id: &CapabilityId) -> Option<bool> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CapabilityId, bool)> {
        self.entries.iter().map(|(id, enabled)| (id, *enabled))
    }

    /// Tools the chat request should carry.
    ///
    /// A tool is enabled when its own entry is `true` or when an enabled tool set
    /// contains it, directly or through nested sets. Tools missing from the catalog
    /// are left out.
    pub fn enabled_tools(&self, catalog: &Catalog) -> BTreeSet<ToolId> {
        let mut enabled = BTreeSet::new();

        for (id, on) in self.iter() {
            if !on {
                continue;
            }
            match id {
                CapabilityId::Tool(tool_id) => {
                    if catalog.tool(tool_id).is_some() {
                        enabled.insert(tool_id.clone());
                    }
                }
                CapabilityId::ToolSet(set_id) => {
                    let mut visited = HashSet::new();
                    collect_set_tools(catalog, set_id, &mut visited, &mut enabled);
                }
            }
        }

        enabled
    }
}

fn collect_set_tools(
    catalog: &Catalog,
    set_id: &ToolSetId,
    visited: &mut HashSet<ToolSetId>,
    out: &mut BTreeSet<ToolId>,
) {
    if !visited.insert(set_id.clone()) {
        return;
    }
    let Some(set) = catalog.tool_set(set_id) else {
        return;
    };
    for member in &set.members {
        match member {
            ToolSetMember::Tool(tool_id) => {
                if catalog.tool(tool_id).is_some() {
                    out.insert(tool_id.clone());
                }
            }
            ToolSetMember::ToolSet(nested) => collect_set_tools(catalog, nested, visited, out),
        }
    }
}

impl FromIterator<(CapabilityId, bool)> for Selection {
    fn from_iter<I: IntoIterator<Item = (CapabilityId, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Selection {
    type Item = (CapabilityId, bool);
    type IntoIter = btree_map::IntoIter<CapabilityId, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Kind tag used in serialized selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapabilityKind {
    Tool,
    ToolSet,
}

/// One serialized selection entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub kind: CapabilityKind,
    pub id: String,
    pub enabled: bool,
}

impl From<Selection> for Vec<SelectionRecord> {
    fn from(selection: Selection) -> Self {
        selection
            .into_iter()
            .map(|(id, enabled)| match id {
                CapabilityId::Tool(id) => SelectionRecord {
                    kind: CapabilityKind::Tool,
                    id: id.as_str().to_string(),
                    enabled,
                },
                CapabilityId::ToolSet(id) => SelectionRecord {
                    kind: CapabilityKind::ToolSet,
                    id: id.as_str().to_string(),
                    enabled,
                },
            })
            .collect()
    }
}

impl From<Vec<SelectionRecord>> for Selection {
    fn from(records: Vec<SelectionRecord>) -> Self {
        records
            .into_iter()
            .map(|record| {
                let id = match record.kind {
                    CapabilityKind::Tool => CapabilityId::Tool(ToolId::new(record.id)),
                    CapabilityKind::ToolSet => CapabilityId::ToolSet(ToolSetId::new(record.id)),
                };
                (id, record.enabled)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Tool, ToolSet, ToolSource};

    fn tool_id(id: &str) -> CapabilityId {
        CapabilityId::Tool(ToolId::new(id))
    }

    #[test]
    fn test_merge_enabled_keeps_true() {
        let mut selection = Selection::new();
        selection.merge_enabled(ToolId::new("fetch"), true);
        selection.merge_enabled(ToolId::new("fetch"), false);
        assert_eq!(selection.get(&tool_id("fetch")), Some(true));

        selection.merge_enabled(ToolId::new("read"), false);
        assert_eq!(selection.get(&tool_id("read")), Some(false));
        assert!(!selection.is_enabled(&tool_id("read")));
    }

    #[test]
    fn test_set_overwrites() {
        let mut selection = Selection::new();
        selection.set(ToolId::new("fetch"), true);
        selection.set(ToolId::new("fetch"), false);
        assert_eq!(selection.get(&tool_id("fetch")), Some(false));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_serialized_form() {
        let mut selection = Selection::new();
        selection.set(ToolId::new("fetch"), true);
        selection.set(ToolSetId::new("web"), false);

        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "kind": "tool", "id": "fetch", "enabled": true },
                { "kind": "toolSet", "id": "web", "enabled": false },
            ])
        );

        let back: Selection = serde_json::from_value(json).unwrap();
        assert_eq!(back, selection);
    }

    #[test]
    fn test_enabled_tools_expands_nested_sets() {
        let catalog = Catalog::new(
            vec![
                Tool::new("read", "read", ToolSource::internal()),
                Tool::new("edit", "edit", ToolSource::internal()),
                Tool::new("fetch", "fetch", ToolSource::internal()),
                Tool::new("run", "run", ToolSource::internal()),
            ],
            vec![
                ToolSet::new("files", "files", ToolSource::internal()).with_tools(["read", "edit"]),
                ToolSet::new("all", "all", ToolSource::user())
                    .with_tool_set("files")
                    .with_tool("fetch"),
            ],
        );

        let mut selection = Selection::new();
        selection.set(ToolSetId::new("all"), true);
        selection.set(ToolId::new("run"), false);
        selection.set(ToolId::new("gone"), true);

        let enabled: Vec<_> = selection
            .enabled_tools(&catalog)
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(enabled, vec!["edit", "fetch", "read"]);
    }
}
