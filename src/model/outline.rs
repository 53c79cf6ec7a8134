//! Table-of-contents entries.

use serde::{Deserialize, Serialize};

/// One bookmark from the document outline, flattened in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting level (1 = top level)
    pub level: u32,
    /// Bookmark title
    pub title: String,
    /// Target page (1-indexed), if the destination could be resolved
    pub target_page: Option<u32>,
}

impl TocEntry {
    /// Create a new entry.
    pub fn new(level: u32, title: impl Into<String>, target_page: Option<u32>) -> Self {
        Self {
            level,
            title: title.into(),
            target_page,
        }
    }
}
