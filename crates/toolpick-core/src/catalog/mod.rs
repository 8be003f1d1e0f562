//! Capability catalog
//!
//! The catalog is the read-only view of every tool and tool set the editor
//! knows about. It validates tool set containment, answers membership
//! questions for the picker, and produces the default selection and the
//! schema snapshot used by chat mode files.

mod catalog;
mod error;
mod provider;
mod schema;

pub use catalog::{Catalog, CatalogBuilder};
pub use error::{CatalogError, CatalogResult};
pub use provider::{CatalogProvider, ChainCatalogProvider, MemoryCatalogProvider};
pub use schema::ToolSchemaSnapshot;
