//! Schema snapshot of referenceable tool names
//!
//! Chat mode files validate their `tools` list against the names the catalog
//! currently offers. The snapshot is recomputed from a catalog and handed to
//! whoever owns schema registration; it is never patched in place.

use std::collections::HashSet;
use serde::Serialize;
use serde_json::{json, Value};

use super::catalog::Catalog;

/// Enum values and descriptions for the tool-name schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSchemaSnapshot {
    pub enum_values: Vec<String>,
    pub enum_descriptions: Vec<String>,
}

impl ToolSchemaSnapshot {
    /// Collect referenceable tool names, then tool set names.
    ///
    /// Names already seen are skipped so the enum never repeats a value.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut snapshot = Self::default();
        let mut seen = HashSet::new();

        for tool in catalog.tools().filter(|tool| tool.can_be_referenced) {
            let Some(name) = tool.reference_name.as_deref() else {
                continue;
            };
            if seen.insert(name.to_string()) {
                snapshot.enum_values.push(name.to_string());
                snapshot
                    .enum_descriptions
                    .push(tool.description().unwrap_or_default().to_string());
            }
        }

        for set in catalog.tool_sets() {
            if seen.insert(set.reference_name.clone()) {
                snapshot.enum_values.push(set.reference_name.clone());
                snapshot
                    .enum_descriptions
                    .push(set.description.clone().unwrap_or_default());
            }
        }

        snapshot
    }

    pub fn len(&self) -> usize {
        self.enum_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enum_values.is_empty()
    }

    /// JSON schema for an array of tool names
    pub fn to_json_schema(&self) -> Value {
        json!({
            "type": "array",
            "items": {
                "type": "string",
                "enum": self.enum_values,
                "enumDescriptions": self.enum_descriptions,
            }
        })
    }
}

impl Catalog {
    /// Snapshot of the names this catalog offers to chat mode schemas
    pub fn schema_snapshot(&self) -> ToolSchemaSnapshot {
        ToolSchemaSnapshot::from_catalog(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Tool, ToolSet, ToolSource};

    #[test]
    fn test_snapshot_from_catalog() {
        let catalog = Catalog::new(
            vec![
                Tool::new("vscode.fetch", "Fetch", ToolSource::internal())
                    .with_reference_name("fetch")
                    .with_description("Fetch a web page"),
                Tool::new("vscode.hidden", "Hidden", ToolSource::internal())
                    .with_reference_name("hidden")
                    .unreferenceable(),
                Tool::new("vscode.noname", "No Name", ToolSource::internal()),
            ],
            vec![ToolSet::new("web", "web", ToolSource::internal())
                .with_description("Web tools")
                .with_tool("vscode.fetch")],
        );

        let snapshot = catalog.schema_snapshot();
        assert_eq!(snapshot.enum_values, vec!["fetch", "web"]);
        assert_eq!(snapshot.enum_descriptions, vec!["Fetch a web page", "Web tools"]);

        let schema = snapshot.to_json_schema();
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["enum"], json!(["fetch", "web"]));
    }

    #[test]
    fn test_snapshot_skips_repeated_names() {
        let catalog = Catalog::new(
            vec![Tool::new("a", "A", ToolSource::internal()).with_reference_name("search")],
            vec![ToolSet::new("s", "search", ToolSource::user())],
        );

        let snapshot = catalog.schema_snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.enum_descriptions, vec![""]);
    }

    #[test]
    fn test_snapshot_is_recomputed_not_shared() {
        let before = Catalog::empty().schema_snapshot();
        let after = Catalog::new(
            vec![Tool::new("a", "A", ToolSource::internal()).with_reference_name("a")],
            vec![],
        )
        .schema_snapshot();

        assert!(before.is_empty());
        assert_eq!(after.len(), 1);
    }
}
