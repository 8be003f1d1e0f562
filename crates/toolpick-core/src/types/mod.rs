//! Core types shared by the catalog and the picker
//!
//! This module contains the capability model (tools, tool sets, sources),
//! the selection map and the picker's dismissal signal.

mod source;
mod tool;
mod selection;
mod dismiss;

pub use source::ToolSource;
pub use tool::{Icon, Tool, ToolId, ToolSet, ToolSetId, ToolSetMember};
pub use selection::{CapabilityId, CapabilityKind, Selection, SelectionRecord};
pub use dismiss::DismissSignal;
