//! # pdfsift
//!
//! Heuristic content analysis and segmentation for PDF documents.
//!
//! This library turns raw per-page primitives (positioned text spans, image
//! sizes, page geometry) into a structured view of a document: a content
//! type per page, table candidates, text quality and OCR need, a document
//! quality score with recommendations, and a content-aware split into
//! sections.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{analyze_file, render};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let analysis = analyze_file("document.pdf")?;
//!
//!     println!("Quality: {:.0}", analysis.quality_score);
//!     for section in &analysis.sections {
//!         println!("pages {:?}", section.range());
//!     }
//!
//!     let json = render::to_json(&analysis, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Page classification**: text, image, table, form or mixed
//! - **Table detection**: row grouping plus pluggable 1-D column grouping
//! - **OCR triage**: text quality and image density per page
//! - **Segmentation**: sections and range snapping along content boundaries
//! - **Split planning**: page ranges, sections, content types, bookmarks
//! - **Parallel processing**: Uses Rayon for multi-page documents
//!
//! Any backend can feed the analyzers by implementing
//! [`source::DocumentSource`]; the `lopdf-backend` feature (on by default)
//! provides [`source::LopdfSource`] for real files.

pub mod analysis;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod render;
pub mod source;
pub mod split;

// Re-export commonly used types
pub use analysis::{analyze, analyze_with_cancel, classify_page, CancellationToken};
pub use config::{AnalysisConfig, OcrConfig, QualityConfig, SegmentConfig, TableConfig};
pub use detect::{is_pdf_bytes, sniff_bytes, sniff_path};
pub use error::{Error, Result};
pub use model::{
    BBox, BoundaryReason, ContentSummary, ContentType, DocumentAnalysis, LayoutComplexity,
    PageClassification, PageFeatures, PageHint, ProcessingStrategy, Section, TableCandidate,
    TextSpan, TocEntry,
};
pub use render::JsonFormat;
pub use source::{DocumentSource, MemorySource, PageBuilder, PageSnapshot};

#[cfg(feature = "lopdf-backend")]
pub use source::LopdfSource;

#[cfg(feature = "lopdf-backend")]
use std::path::Path;

use analysis::{Segmenter, TableDetector};

/// Detect table candidates in one page's spans.
///
/// Returns `Ok(vec![])` when there is no tabular structure and an error
/// when the spans cannot be analyzed.
///
/// # Example
///
/// ```
/// use pdfsift::{detect_tables, AnalysisConfig, BBox, TextSpan};
///
/// let spans: Vec<TextSpan> = (0..3)
///     .flat_map(|row| {
///         let y = 100.0 + row as f32 * 20.0;
///         [
///             TextSpan::new("name", BBox::new(72.0, y, 120.0, y + 10.0), 10.0),
///             TextSpan::new("value", BBox::new(300.0, y, 340.0, y + 10.0), 10.0),
///         ]
///     })
///     .collect();
///
/// let tables = detect_tables(&spans, &AnalysisConfig::default())?;
/// assert_eq!(tables.len(), 1);
/// assert_eq!(tables[0].row_count, 3);
/// # Ok::<(), pdfsift::Error>(())
/// ```
pub fn detect_tables(spans: &[TextSpan], config: &AnalysisConfig) -> Result<Vec<TableCandidate>> {
    TableDetector::with_config(config.table.clone()).detect(spans)
}

/// Split classified pages into sections.
///
/// The result partitions the pages: every page is in exactly one section,
/// and sections are ordered by first page. Boundaries follow
/// `config.segment`, the same rules [`analyze`] applies.
pub fn segment(classifications: &[PageClassification], config: &AnalysisConfig) -> Vec<Section> {
    Segmenter::with_config(config.segment.clone()).segment(classifications)
}

/// Expand a requested page range to the surrounding content boundaries.
///
/// Fails with [`Error::InvalidRange`] unless `1 <= start <= end <= pages`.
pub fn snap_range(
    classifications: &[PageClassification],
    start: u32,
    end: u32,
    config: &AnalysisConfig,
) -> Result<(u32, u32)> {
    Segmenter::with_config(config.segment.clone()).snap_range(classifications, start, end)
}

/// Analyze a PDF file with default settings.
///
/// # Example
///
/// ```no_run
/// use pdfsift::analyze_file;
///
/// let analysis = analyze_file("document.pdf").unwrap();
/// println!("Pages needing OCR: {:?}", analysis.ocr_pages());
/// ```
#[cfg(feature = "lopdf-backend")]
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<DocumentAnalysis> {
    Sift::new().analyze_file(path)
}

/// Analyze a PDF held in memory with default settings.
#[cfg(feature = "lopdf-backend")]
pub fn analyze_bytes(data: &[u8]) -> Result<DocumentAnalysis> {
    Sift::new().analyze_bytes(data)
}

/// Builder for analyzing documents.
///
/// # Example
///
/// ```no_run
/// use pdfsift::{Sift, CancellationToken};
///
/// let token = CancellationToken::new();
/// let analysis = Sift::new()
///     .sequential()
///     .with_margins(72.0, 72.0)
///     .with_cancellation(token.clone())
///     .analyze_file("document.pdf")?;
/// # Ok::<(), pdfsift::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sift {
    config: AnalysisConfig,
    token: CancellationToken,
}

impl Sift {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.config = self.config.sequential();
        self
    }

    /// Set header and footer margins.
    pub fn with_margins(mut self, header: f32, footer: f32) -> Self {
        self.config = self.config.with_margins(header, footer);
        self
    }

    /// Abort the analysis when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze any document source.
    pub fn analyze<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<DocumentAnalysis> {
        analyze_with_cancel(source, &self.config, &self.token)
    }

    /// Open and analyze a PDF file.
    #[cfg(feature = "lopdf-backend")]
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentAnalysis> {
        let source = LopdfSource::open(path)?;
        self.analyze(&source)
    }

    /// Analyze a PDF held in memory.
    #[cfg(feature = "lopdf-backend")]
    pub fn analyze_bytes(&self, data: &[u8]) -> Result<DocumentAnalysis> {
        let source = LopdfSource::from_bytes(data)?;
        self.analyze(&source)
    }
}
