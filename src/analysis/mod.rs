//! Heuristic content analysis.
//!
//! Per-page stages ([`features`], [`text_quality`], [`tables`], [`classify`])
//! depend only on their own page. Document stages ([`segment`], [`quality`])
//! need the complete, ordered classification sequence. [`pipeline`] wires
//! them together.

pub mod classify;
pub mod features;
pub mod pipeline;
pub mod quality;
pub mod segment;
pub mod tables;
pub mod text_quality;

pub use classify::{classify_content, classify_page, classify_page_checked, page_hint};
pub use features::{extract_features, from_snapshot};
pub use pipeline::{
    analyze, analyze_with_cancel, layout_complexity, processing_strategy, CancellationToken,
};
pub use quality::{quality_score, recommendations, text_density, Recommendation, RecommendationInputs};
pub use segment::Segmenter;
pub use tables::{has_tabular_text, text_column_count, AlignmentBuckets, ColumnGrouping, KMeans1d, SpanRow, TableDetector};
pub use text_quality::{
    image_density, looks_scanned, needs_ocr, ocr_confidence, recommended_dpi, scan_likelihood,
    text_quality,
};
