//! Catalog providers
//!
//! The picker asks its provider for a fresh catalog on every rebuild, so a
//! provider that swaps its catalog (after an MCP refresh, say) is picked up
//! without reopening the picker.

use std::sync::Arc;
use parking_lot::RwLock;

use super::catalog::Catalog;

/// Source of catalog snapshots
pub trait CatalogProvider: Send + Sync {
    /// Current catalog
    fn catalog(&self) -> Arc<Catalog>;
}

/// In-memory catalog provider
///
/// Useful for tests and for hosts that push catalog updates themselves.
#[derive(Debug, Default)]
pub struct MemoryCatalogProvider {
    catalog: RwLock<Arc<Catalog>>,
}

impl MemoryCatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Replace the catalog wholesale
    pub fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write() = Arc::new(catalog);
    }
}

impl CatalogProvider for MemoryCatalogProvider {
    fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().clone()
    }
}

/// Merges the catalogs of several providers
///
/// Providers are read in order; when two contribute the same id, the first wins.
pub struct ChainCatalogProvider {
    providers: Vec<Arc<dyn CatalogProvider>>,
}

impl ChainCatalogProvider {
    pub fn new(providers: Vec<Arc<dyn CatalogProvider>>) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &[Arc<dyn CatalogProvider>] {
        &self.providers
    }
}

impl CatalogProvider for ChainCatalogProvider {
    fn catalog(&self) -> Arc<Catalog> {
        let mut tools = Vec::new();
        let mut tool_sets = Vec::new();

        for provider in &self.providers {
            let (more_tools, more_sets) = Catalog::clone(&provider.catalog()).into_parts();
            tools.extend(more_tools);
            tool_sets.extend(more_sets);
        }

        Arc::new(Catalog::new(tools, tool_sets))
    }
}
