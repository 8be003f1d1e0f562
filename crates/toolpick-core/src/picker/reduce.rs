//! Collapse a picker tree back into a selection

use super::tree::{CheckState, PickerTree, TreeNode};
use crate::types::{CapabilityId, Selection, ToolId, ToolSetId};

/// Read the tree's check marks into a [`Selection`].
///
/// A tool shown in several places is enabled if any of its rows is checked.
/// An MCP tool set is enabled when all of its tools end up enabled; a bucket
/// without tool rows falls back to its own state. Deriving the set from the
/// merged tool values makes a second render of the result reduce to the same
/// selection.
pub fn reduce(tree: &PickerTree) -> Selection {
    let mut selection = Selection::new();
    let mut aliases: Vec<(ToolSetId, Vec<ToolId>, bool)> = Vec::new();

    for bucket in tree.buckets() {
        if let Some(set_id) = bucket.aliased_tool_set() {
            let tools = bucket.tool_rows().map(|t| t.id.clone()).collect();
            let own = bucket.checked == Some(CheckState::Checked);
            aliases.push((set_id.clone(), tools, own));
        }

        for child in &bucket.children {
            match child {
                TreeNode::Refresh(_) => {}
                TreeNode::Tool(row) => selection.merge_enabled(&row.id, row.checked),
                TreeNode::ToolSet(row) => {
                    selection.merge_enabled(&row.id, row.checked);
                    for tool in &row.children {
                        selection.merge_enabled(&tool.id, tool.checked);
                    }
                }
            }
        }
    }

    for (set_id, tools, own) in aliases {
        let enabled = if tools.is_empty() {
            own
        } else {
            tools
                .iter()
                .all(|id| selection.is_enabled(&CapabilityId::from(id)))
        };
        selection.set(set_id, enabled);
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::mcp::{McpCacheState, McpServerDescriptor};
    use crate::picker::{assemble, build_buckets, propagate, seed_selection, set_checked, BucketKey, NodeRef};
    use crate::types::{CapabilityId, Tool, ToolId, ToolSet, ToolSetId, ToolSource};

    fn fresh(id: &str) -> McpServerDescriptor {
        McpServerDescriptor::new(id, id, "ws").with_cache_state(McpCacheState::Fresh)
    }

    fn render(catalog: &Catalog, servers: Vec<McpServerDescriptor>, selection: &Selection) -> PickerTree {
        let mut tree = assemble(build_buckets(catalog, servers), catalog);
        propagate(&mut tree, selection);
        tree
    }

    fn web_catalog() -> Catalog {
        let web = ToolSource::mcp("ws", "web", "web");
        Catalog::new(
            vec![
                Tool::new("web_fetch", "fetch", web.clone()),
                Tool::new("web_search", "search", web.clone()),
                Tool::new("fetch", "fetch", ToolSource::internal()),
            ],
            vec![ToolSet::new("web", "web", web).with_tools(["web_fetch", "web_search"])],
        )
    }

    fn enabled(selection: &Selection, id: impl Into<CapabilityId>) -> Option<bool> {
        selection.get(&id.into())
    }

    #[test]
    fn test_web_scenario() {
        let catalog = web_catalog();
        let mut seed = seed_selection(&catalog, None);
        seed.set(ToolId::new("fetch"), true);

        let mut tree = render(&catalog, vec![fresh("web")], &seed);
        let search = NodeRef::Tool {
            bucket: BucketKey::for_source(&ToolSource::mcp("ws", "web", "web")),
            tool_set: None,
            tool: ToolId::new("web_search"),
        };
        assert!(set_checked(&mut tree, &search, true));

        let selection = reduce(&tree);
        assert_eq!(enabled(&selection, ToolSetId::new("web")), Some(false));
        assert_eq!(enabled(&selection, ToolId::new("web_search")), Some(true));
        assert_eq!(enabled(&selection, ToolId::new("web_fetch")), Some(false));
        assert_eq!(enabled(&selection, ToolId::new("fetch")), Some(true));
    }

    #[test]
    fn test_mcp_set_requires_all_tools() {
        let catalog = web_catalog();
        let mut selection = Selection::new();
        selection.set(ToolId::new("web_fetch"), true);
        selection.set(ToolId::new("web_search"), true);

        let reduced = reduce(&render(&catalog, vec![fresh("web")], &selection));
        assert_eq!(enabled(&reduced, ToolSetId::new("web")), Some(true));
    }

    #[test]
    fn test_checked_set_enables_its_tools() {
        let catalog = Catalog::new(
            vec![
                Tool::new("read", "read", ToolSource::internal()).unreferenceable(),
                Tool::new("edit", "edit", ToolSource::internal()).unreferenceable(),
            ],
            vec![ToolSet::new("files", "files", ToolSource::user()).with_tools(["read", "edit"])],
        );
        let mut selection = Selection::new();
        selection.set(ToolSetId::new("files"), true);

        let reduced = reduce(&render(&catalog, Vec::new(), &selection));
        assert_eq!(enabled(&reduced, ToolSetId::new("files")), Some(true));
        assert_eq!(enabled(&reduced, ToolId::new("read")), Some(true));
        assert_eq!(enabled(&reduced, ToolId::new("edit")), Some(true));
    }

    #[test]
    fn test_duplicate_tool_or_merges() {
        // "read" shows up loose in Built-In and inside the user set
        let catalog = Catalog::new(
            vec![Tool::new("read", "read", ToolSource::internal())],
            vec![ToolSet::new("mine", "mine", ToolSource::user()).with_tool("read")],
        );
        let mut selection = Selection::new();
        selection.set(ToolSetId::new("mine"), true);
        selection.set(ToolId::new("read"), false);

        let reduced = reduce(&render(&catalog, Vec::new(), &selection));
        assert_eq!(enabled(&reduced, ToolId::new("read")), Some(true));
    }

    #[test]
    fn test_empty_mcp_bucket_uses_own_state() {
        let source = ToolSource::mcp("ws", "idle", "idle");
        let catalog = Catalog::new(vec![], vec![ToolSet::new("idle", "idle", source)]);
        let mut selection = Selection::new();
        selection.set(ToolSetId::new("idle"), true);

        let reduced = reduce(&render(&catalog, vec![fresh("idle")], &selection));
        assert_eq!(enabled(&reduced, ToolSetId::new("idle")), Some(true));

        let reduced = reduce(&render(&catalog, vec![fresh("idle")], &Selection::new()));
        assert_eq!(enabled(&reduced, ToolSetId::new("idle")), Some(false));
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let catalog = web_catalog();
        let mut previous = Selection::new();
        previous.set(ToolId::new("web_search"), true);
        previous.set(ToolId::new("fetch"), true);
        let seed = seed_selection(&catalog, Some(&previous));

        let first = reduce(&render(&catalog, vec![fresh("web")], &seed));
        let second = reduce(&render(&catalog, vec![fresh("web")], &first));
        assert_eq!(first, second);

        let tree = render(&catalog, vec![fresh("web")], &seed);
        assert_eq!(reduce(&tree), reduce(&tree));
    }

    #[test]
    fn test_shared_tool_is_stable_across_renders() {
        // web_fetch sits in the MCP set and in a checked user set
        let web = ToolSource::mcp("ws", "web", "web");
        let catalog = Catalog::new(
            vec![
                Tool::new("web_fetch", "fetch", web.clone()),
                Tool::new("web_search", "search", web.clone()),
            ],
            vec![
                ToolSet::new("web", "web", web).with_tools(["web_fetch", "web_search"]),
                ToolSet::new("mine", "mine", ToolSource::user()).with_tool("web_fetch"),
            ],
        );
        let mut previous = Selection::new();
        previous.set(ToolSetId::new("mine"), true);
        previous.set(ToolId::new("web_search"), true);

        let seed = seed_selection(&catalog, Some(&previous));
        let first = reduce(&render(&catalog, vec![fresh("web")], &seed));
        let second = reduce(&render(
            &catalog,
            vec![fresh("web")],
            &seed_selection(&catalog, Some(&first)),
        ));

        assert_eq!(first, second);
        assert_eq!(enabled(&first, ToolId::new("web_fetch")), Some(true));
        assert_eq!(enabled(&first, ToolSetId::new("web")), Some(true));
    }

    #[test]
    fn test_vanished_tool_leaves_no_trace() {
        let catalog = web_catalog();
        let mut previous = Selection::new();
        previous.set(ToolId::new("search"), true);

        let seed = seed_selection(&catalog, Some(&previous));
        let tree = render(&catalog, vec![fresh("web")], &seed);

        assert!(tree.tool_rows().all(|t| t.id != ToolId::new("search")));
        assert!(!reduce(&tree).contains(&CapabilityId::from(ToolId::new("search"))));
    }
}
