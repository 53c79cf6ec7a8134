//! Document access abstraction.
//!
//! The analyzers never touch a PDF library directly. They read per-page
//! snapshots through [`DocumentSource`], which keeps the heuristics testable
//! against in-memory documents and isolates the concrete backend.

mod memory;

#[cfg(feature = "lopdf-backend")]
mod pdf;

pub use memory::{MemorySource, PageBuilder};

#[cfg(feature = "lopdf-backend")]
pub use pdf::LopdfSource;

use crate::error::Result;
use crate::model::{BBox, PageLayout, TextSpan, TocEntry};

/// An image placed on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Estimated encoded size in bytes
    pub estimated_byte_size: u64,
}

/// Read-only view of a single page, as delivered by a backend.
///
/// Coordinates use a top-left origin with `y` growing downward.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageSnapshot {
    /// Full extracted text
    pub text: String,
    /// Bounding box of each text block
    pub text_blocks: Vec<BBox>,
    /// Positioned text spans
    pub spans: Vec<TextSpan>,
    /// Images placed on the page
    pub images: Vec<ImageInfo>,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Rotation in degrees
    pub rotation: i32,
    /// Interactive form widgets
    pub form_field_count: usize,
}

/// Abstract interface for document access.
///
/// Implementations must be safe to read from several threads at once; the
/// analysis pipeline requests pages in parallel and never mutates the source.
pub trait DocumentSource: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Snapshot of a page (1-indexed).
    ///
    /// A failure here is page-local: return
    /// [`Error::PageExtractionFailed`](crate::Error::PageExtractionFailed)
    /// and the pipeline degrades the page instead of aborting.
    fn page(&self, page_number: u32) -> Result<PageSnapshot>;

    /// Page geometry, if the source can still read it after
    /// [`page`](Self::page) failed. `None` means unknown.
    fn page_layout(&self, _page_number: u32) -> Option<PageLayout> {
        None
    }

    /// Flattened outline. Sources without an outline return an empty list.
    fn table_of_contents(&self) -> Result<Vec<TocEntry>>;
}
