//! Catalog error types

use thiserror::Error;

use crate::types::{ToolId, ToolSetId};

/// Errors raised while building a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate tool id: {0}")]
    DuplicateTool(ToolId),

    #[error("Duplicate tool set id: {0}")]
    DuplicateToolSet(ToolSetId),

    #[error("Tool set {set} references unknown member {member}")]
    UnknownMember { set: ToolSetId, member: String },

    #[error("Tool set {0} would contain itself")]
    CyclicToolSet(ToolSetId),
}

impl CatalogError {
    pub fn unknown_member(set: &ToolSetId, member: impl Into<String>) -> Self {
        Self::UnknownMember {
            set: set.clone(),
            member: member.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
