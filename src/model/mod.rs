//! Data model for page features and analysis results.
//!
//! Every type here is a value: it is derived from a document snapshot,
//! recomputed for each analysis and never patched in place.

mod analysis;
mod classification;
mod features;
mod outline;
mod section;
mod span;

pub use analysis::{
    ContentSummary, DocumentAnalysis, LayoutComplexity, PageLayout, PageWarning,
    ProcessingStrategy, StructureInfo,
};
pub use classification::{ContentType, PageClassification, PageHint, TableCandidate};
pub use features::PageFeatures;
pub use outline::TocEntry;
pub use section::{BoundaryReason, Section};
pub use span::{BBox, TextSpan};
