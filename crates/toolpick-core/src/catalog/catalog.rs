//! Capability catalog: the tools and tool sets a picker session works from

use std::collections::{BTreeSet, HashMap, HashSet};

use super::error::{CatalogError, CatalogResult};
use crate::types::{CapabilityId, Selection, Tool, ToolId, ToolSet, ToolSetId, ToolSetMember};

/// Immutable snapshot of every tool and tool set known to the editor
///
/// Tool sets that contain themselves (directly or through nested sets) are kept
/// but excluded from [`Catalog::tool_sets`], so nothing downstream recurses into them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tools: Vec<Tool>,
    tool_sets: Vec<ToolSet>,
    tool_index: HashMap<ToolId, usize>,
    set_index: HashMap<ToolSetId, usize>,
    cyclic: HashSet<ToolSetId>,
}

impl Catalog {
    /// Build a catalog from raw entries.
    ///
    /// Duplicate ids keep their first occurrence. Use [`CatalogBuilder`] to reject
    /// duplicates and cycles instead.
    pub fn new(tools: Vec<Tool>, tool_sets: Vec<ToolSet>) -> Self {
        let mut catalog = Catalog::default();

        for tool in tools {
            if catalog.tool_index.contains_key(&tool.id) {
                continue;
            }
            catalog.tool_index.insert(tool.id.clone(), catalog.tools.len());
            catalog.tools.push(tool);
        }

        for set in tool_sets {
            if catalog.set_index.contains_key(&set.id) {
                continue;
            }
            catalog.set_index.insert(set.id.clone(), catalog.tool_sets.len());
            catalog.tool_sets.push(set);
        }

        catalog.cyclic = catalog
            .tool_sets
            .iter()
            .filter(|set| catalog.reaches_itself(&set.id))
            .map(|set| set.id.clone())
            .collect();

        catalog
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.tool_sets.is_empty()
    }

    /// Raw entries, cyclic tool sets included
    pub fn into_parts(self) -> (Vec<Tool>, Vec<ToolSet>) {
        (self.tools, self.tool_sets)
    }

    /// All tools in registration order
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Tool sets that can be assembled (cyclic sets are skipped)
    pub fn tool_sets(&self) -> impl Iterator<Item = &ToolSet> {
        self.tool_sets
            .iter()
            .filter(|set| !self.cyclic.contains(&set.id))
    }

    /// Tool sets excluded because they contain themselves
    pub fn excluded_tool_sets(&self) -> Vec<&ToolSetId> {
        let mut excluded: Vec<_> = self.cyclic.iter().collect();
        excluded.sort();
        excluded
    }

    pub fn tool(&self, id: &ToolId) -> Option<&Tool> {
        self.tool_index.get(id).map(|&idx| &self.tools[idx])
    }

    pub fn tool_set(&self, id: &ToolSetId) -> Option<&ToolSet> {
        self.set_index.get(id).map(|&idx| &self.tool_sets[idx])
    }

    /// Whether an identity is selectable in this catalog
    pub fn contains(&self, id: &CapabilityId) -> bool {
        match id {
            CapabilityId::Tool(tool_id) => self.tool_index.contains_key(tool_id),
            CapabilityId::ToolSet(set_id) => {
                self.set_index.contains_key(set_id) && !self.cyclic.contains(set_id)
            }
        }
    }

    /// Every tool reachable from a tool set, in member order, without duplicates.
    ///
    /// Nested sets are flattened; unknown members and cyclic sets are skipped.
    pub fn tools_of(&self, set_id: &ToolSetId) -> Vec<&Tool> {
        let mut out = Vec::new();
        let mut seen_tools = HashSet::new();
        let mut seen_sets = HashSet::new();
        self.collect_tools(set_id, &mut seen_sets, &mut seen_tools, &mut out);
        out
    }

    fn collect_tools<'a>(
        &'a self,
        set_id: &ToolSetId,
        seen_sets: &mut HashSet<ToolSetId>,
        seen_tools: &mut HashSet<ToolId>,
        out: &mut Vec<&'a Tool>,
    ) {
        if self.cyclic.contains(set_id) || !seen_sets.insert(set_id.clone()) {
            return;
        }
        let Some(set) = self.tool_set(set_id) else {
            return;
        };
        for member in &set.members {
            match member {
                ToolSetMember::Tool(tool_id) => {
                    if let Some(tool) = self.tool(tool_id) {
                        if seen_tools.insert(tool_id.clone()) {
                            out.push(tool);
                        }
                    }
                }
                ToolSetMember::ToolSet(nested) => {
                    self.collect_tools(nested, seen_sets, seen_tools, out)
                }
            }
        }
    }

    /// True when every known member shares the set's origin
    pub fn is_homogeneous(&self, set_id: &ToolSetId) -> bool {
        let Some(set) = self.tool_set(set_id) else {
            return false;
        };
        set.members.iter().all(|member| match member {
            ToolSetMember::Tool(id) => self
                .tool(id)
                .map_or(true, |tool| tool.source.same_origin(&set.source)),
            ToolSetMember::ToolSet(id) => self
                .tool_set(id)
                .map_or(true, |nested| nested.source.same_origin(&set.source)),
        })
    }

    /// Tools directly owned by tool sets of different origins
    pub fn conflicting_memberships(&self) -> Vec<&ToolId> {
        let mut owners: HashMap<&ToolId, Vec<&ToolSet>> = HashMap::new();
        for set in self.tool_sets() {
            for member in &set.members {
                if let ToolSetMember::Tool(id) = member {
                    owners.entry(id).or_default().push(set);
                }
            }
        }

        let conflicting: BTreeSet<&ToolId> = owners
            .into_iter()
            .filter(|(_, sets)| {
                sets.iter()
                    .any(|set| !set.source.same_origin(&sets[0].source))
            })
            .map(|(id, _)| id)
            .collect();

        conflicting.into_iter().collect()
    }

    /// Selection used when the caller has none.
    ///
    /// Covers every referenceable tool and every assemblable tool set, each at its
    /// declared default. Tools only reachable through a set appear when they are
    /// enabled by default.
    pub fn default_selection(&self) -> Selection {
        let tools = self
            .tools
            .iter()
            .filter(|tool| tool.can_be_referenced || tool.default_enabled)
            .map(|tool| (CapabilityId::from(&tool.id), tool.default_enabled));
        let sets = self
            .tool_sets()
            .map(|set| (CapabilityId::from(&set.id), set.default_enabled));

        tools.chain(sets).collect()
    }

    fn reaches_itself(&self, start: &ToolSetId) -> bool {
        let mut stack: Vec<&ToolSetId> = self.nested_sets(start).collect();
        let mut visited = HashSet::new();

        while let Some(id) = stack.pop() {
            if id == start {
                return true;
            }
            if visited.insert(id) {
                stack.extend(self.nested_sets(id));
            }
        }

        false
    }

    fn nested_sets<'a>(&'a self, id: &ToolSetId) -> impl Iterator<Item = &'a ToolSetId> + 'a {
        self.tool_set(id)
            .into_iter()
            .flat_map(|set| set.members.iter())
            .filter_map(|member| match member {
                ToolSetMember::ToolSet(nested) => Some(nested),
                ToolSetMember::Tool(_) => None,
            })
    }
}

/// Validating catalog builder
///
/// Members must be registered before the tool sets that contain them, so a set
/// can only ever close a cycle by listing itself.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    tools: Vec<Tool>,
    tool_sets: Vec<ToolSet>,
    tool_ids: HashSet<ToolId>,
    set_ids: HashSet<ToolSetId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tool(&mut self, tool: Tool) -> CatalogResult<&mut Self> {
        if !self.tool_ids.insert(tool.id.clone()) {
            return Err(CatalogError::DuplicateTool(tool.id));
        }
        self.tools.push(tool);
        Ok(self)
    }

    pub fn add_tool_set(&mut self, set: ToolSet) -> CatalogResult<&mut Self> {
        if self.set_ids.contains(&set.id) {
            return Err(CatalogError::DuplicateToolSet(set.id));
        }

        for member in &set.members {
            match member {
                ToolSetMember::Tool(id) => {
                    if !self.tool_ids.contains(id) {
                        return Err(CatalogError::unknown_member(&set.id, id.as_str()));
                    }
                }
                ToolSetMember::ToolSet(id) if *id == set.id => {
                    return Err(CatalogError::CyclicToolSet(set.id.clone()));
                }
                ToolSetMember::ToolSet(id) => {
                    if !self.set_ids.contains(id) {
                        return Err(CatalogError::unknown_member(&set.id, id.as_str()));
                    }
                }
            }
        }

        self.set_ids.insert(set.id.clone());
        self.tool_sets.push(set);
        Ok(self)
    }

    pub fn build(self) -> Catalog {
        Catalog::new(self.tools, self.tool_sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolSource;

    fn internal_tool(id: &str) -> Tool {
        Tool::new(id, id, ToolSource::internal())
    }

    #[test]
    fn test_duplicates_keep_first() {
        let catalog = Catalog::new(
            vec![
                internal_tool("read"),
                Tool::new("read", "Other", ToolSource::user()),
            ],
            vec![],
        );

        assert_eq!(catalog.tools().count(), 1);
        assert_eq!(catalog.tool(&ToolId::new("read")).unwrap().display_name, "read");
    }

    #[test]
    fn test_cyclic_sets_are_excluded() {
        let catalog = Catalog::new(
            vec![internal_tool("read")],
            vec![
                ToolSet::new("a", "a", ToolSource::user()).with_tool_set("b"),
                ToolSet::new("b", "b", ToolSource::user())
                    .with_tool_set("a")
                    .with_tool("read"),
                ToolSet::new("outer", "outer", ToolSource::user()).with_tool_set("a"),
            ],
        );

        let assembled: Vec<_> = catalog.tool_sets().map(|s| s.id.as_str()).collect();
        assert_eq!(assembled, vec!["outer"]);
        assert_eq!(
            catalog.excluded_tool_sets(),
            vec![&ToolSetId::new("a"), &ToolSetId::new("b")]
        );
        assert!(!catalog.contains(&CapabilityId::ToolSet(ToolSetId::new("a"))));

        // Flattening through a cyclic set stops at the cycle
        assert!(catalog.tools_of(&ToolSetId::new("outer")).is_empty());
    }

    #[test]
    fn test_tools_of_flattens_nested_sets() {
        let catalog = Catalog::new(
            vec![internal_tool("read"), internal_tool("edit"), internal_tool("fetch")],
            vec![
                ToolSet::new("files", "files", ToolSource::internal()).with_tools(["read", "edit"]),
                ToolSet::new("all", "all", ToolSource::user())
                    .with_tool("fetch")
                    .with_tool_set("files")
                    .with_tool("read")
                    .with_tool("missing"),
            ],
        );

        let tools: Vec<_> = catalog
            .tools_of(&ToolSetId::new("all"))
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(tools, vec!["fetch", "read", "edit"]);
    }

    #[test]
    fn test_homogeneity() {
        let catalog = Catalog::new(
            vec![
                internal_tool("read"),
                Tool::new("gh_issue", "issue", ToolSource::mcp("col", "gh", "GitHub")),
            ],
            vec![
                ToolSet::new("files", "files", ToolSource::internal()).with_tool("read"),
                ToolSet::new("mixed", "mixed", ToolSource::internal())
                    .with_tools(["read", "gh_issue"]),
            ],
        );

        assert!(catalog.is_homogeneous(&ToolSetId::new("files")));
        assert!(!catalog.is_homogeneous(&ToolSetId::new("mixed")));
        assert!(!catalog.is_homogeneous(&ToolSetId::new("missing")));
    }

    #[test]
    fn test_conflicting_memberships() {
        let catalog = Catalog::new(
            vec![internal_tool("read"), internal_tool("edit")],
            vec![
                ToolSet::new("files", "files", ToolSource::internal()).with_tools(["read", "edit"]),
                ToolSet::new("mine", "mine", ToolSource::user()).with_tool("read"),
                ToolSet::new("more", "more", ToolSource::internal()).with_tool("edit"),
            ],
        );

        assert_eq!(catalog.conflicting_memberships(), vec![&ToolId::new("read")]);
    }

    #[test]
    fn test_default_selection_honors_declared_defaults() {
        let catalog = Catalog::new(
            vec![
                internal_tool("read").enabled_by_default(),
                internal_tool("edit"),
                internal_tool("hidden").unreferenceable(),
                internal_tool("member").unreferenceable().enabled_by_default(),
            ],
            vec![ToolSet::new("files", "files", ToolSource::internal()).with_tools(["hidden", "member"])],
        );

        let defaults = catalog.default_selection();
        assert_eq!(defaults.len(), 4);
        assert_eq!(defaults.get(&ToolId::new("member").into()), Some(true));
        assert_eq!(defaults.get(&ToolId::new("read").into()), Some(true));
        assert_eq!(defaults.get(&ToolId::new("edit").into()), Some(false));
        assert_eq!(defaults.get(&ToolSetId::new("files").into()), Some(false));
        assert!(!defaults.contains(&ToolId::new("hidden").into()));
    }

    #[test]
    fn test_builder_validation() {
        let mut builder = Catalog::builder();
        builder.add_tool(internal_tool("read")).unwrap();

        assert_eq!(
            builder.add_tool(internal_tool("read")).unwrap_err(),
            CatalogError::DuplicateTool(ToolId::new("read"))
        );
        assert!(matches!(
            builder.add_tool_set(ToolSet::new("s", "s", ToolSource::user()).with_tool("nope")),
            Err(CatalogError::UnknownMember { .. })
        ));
        assert_eq!(
            builder
                .add_tool_set(ToolSet::new("s", "s", ToolSource::user()).with_tool_set("s"))
                .unwrap_err(),
            CatalogError::CyclicToolSet(ToolSetId::new("s"))
        );

        builder
            .add_tool_set(ToolSet::new("s", "s", ToolSource::user()).with_tool("read"))
            .unwrap();
        assert_eq!(
            builder
                .add_tool_set(ToolSet::new("s", "s", ToolSource::user()))
                .unwrap_err(),
            CatalogError::DuplicateToolSet(ToolSetId::new("s"))
        );

        let catalog = builder.build();
        assert_eq!(catalog.tool_sets().count(), 1);
        assert!(catalog.excluded_tool_sets().is_empty());
    }
}
