//! Tool limit warning

use std::fmt;

use super::tree::PickerTree;

/// Too many tools are checked for reliable tool calling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolLimitWarning {
    pub enabled: usize,
    pub limit: usize,
}

impl fmt::Display for ToolLimitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tools are enabled. You may experience degraded tool calling above {} tools.",
            self.enabled, self.limit
        )
    }
}

/// Checked tool rows, counting every appearance
pub fn checked_tool_count(tree: &PickerTree) -> usize {
    tree.tool_rows().filter(|t| t.checked).count()
}

/// Warning when the checked tools exceed `limit`; a missing or zero limit disables it
pub fn tool_limit_warning(tree: &PickerTree, limit: Option<usize>) -> Option<ToolLimitWarning> {
    let limit = limit.filter(|&l| l > 0)?;
    let enabled = checked_tool_count(tree);
    (enabled > limit).then_some(ToolLimitWarning { enabled, limit })
}
