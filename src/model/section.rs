//! Document sections produced by segmentation.

use serde::{Deserialize, Serialize};

use super::ContentType;

/// Why a section starts where it does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryReason {
    /// First section of the document
    DocumentStart,
    /// The content type differs from the previous page
    ContentTypeChange { from: ContentType, to: ContentType },
    /// Text block count jumped relative to the previous page
    TextDensityShift { delta: i64 },
    /// The page has a header and the previous page did not
    HeaderIntroduced,
}

/// A contiguous run of pages with a coherent content profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Page numbers in ascending order, never empty
    pub pages: Vec<u32>,
    /// What opened this section
    pub boundary_reason: BoundaryReason,
}

impl Section {
    /// First page of the section.
    pub fn first_page(&self) -> u32 {
        self.pages.first().copied().unwrap_or(0)
    }

    /// Last page of the section.
    pub fn last_page(&self) -> u32 {
        self.pages.last().copied().unwrap_or(0)
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the section has no pages. Segmentation never returns one.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Inclusive page range covered by the section.
    pub fn range(&self) -> (u32, u32) {
        (self.first_page(), self.last_page())
    }
}
