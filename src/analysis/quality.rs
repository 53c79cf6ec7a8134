//! Document-level quality score and recommendations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::QualityConfig;
use crate::model::{ContentSummary, PageLayout};

/// Score a document in `[0, 100]`.
///
/// `text_density` is the average number of text blocks per page. Every page
/// whose size differs from the first page by more than the tolerance costs
/// a fixed penalty; the penalties accumulate. Pages of unknown size (see
/// [`PageLayout::is_known`]) take no part in the size comparison.
pub fn quality_score(layouts: &[PageLayout], text_density: f64, config: &QualityConfig) -> f64 {
    if layouts.is_empty() {
        return 0.0;
    }

    let mut score = 100.0;

    if text_density < config.min_text_density {
        score -= config.low_density_penalty;
    }

    let mut known = layouts.iter().filter(|l| l.is_known());
    let Some(first) = known.next() else {
        return score.clamp(0.0, 100.0);
    };
    let mismatched = known
        .filter(|l| {
            (l.width - first.width).abs() > config.page_size_tolerance
                || (l.height - first.height).abs() > config.page_size_tolerance
        })
        .count();
    score -= mismatched as f64 * config.size_mismatch_penalty;

    score.clamp(0.0, 100.0)
}

/// Average text blocks per page, 0 for an empty document.
pub fn text_density(block_counts: impl IntoIterator<Item = usize>) -> f64 {
    let (pages, blocks) = block_counts
        .into_iter()
        .fold((0usize, 0usize), |(p, b), count| (p + 1, b + count));
    if pages == 0 {
        0.0
    } else {
        blocks as f64 / pages as f64
    }
}

/// A suggestion derived from the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// The document is long enough to benefit from splitting
    TooLong,
    /// More image pages than text pages
    ImageHeavy,
    /// At least one table candidate was found
    TablesDetected,
    /// The quality score is below the acceptable level
    LowQuality,
    /// A long document without an outline
    MissingNavigation,
}

impl Recommendation {
    /// Human-readable message.
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::TooLong => {
                "Long document: consider splitting it for better processing"
            }
            Recommendation::ImageHeavy => {
                "Image-heavy document: use compression to reduce its size"
            }
            Recommendation::TablesDetected => {
                "Tables detected: use dedicated table extraction for better results"
            }
            Recommendation::LowQuality => {
                "Quality below the recommended level: consider reprocessing from the source document"
            }
            Recommendation::MissingNavigation => {
                "Long document without bookmarks: add an outline for easier navigation"
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Facts the recommendations are derived from.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInputs<'a> {
    pub total_pages: u32,
    pub summary: &'a ContentSummary,
    pub quality_score: f64,
    pub has_toc: bool,
}

/// All applicable recommendations, in a fixed order.
pub fn recommendations(inputs: &RecommendationInputs<'_>, config: &QualityConfig) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if inputs.total_pages > config.long_document_pages {
        out.push(Recommendation::TooLong);
    }
    if inputs.summary.image_pages > inputs.summary.text_pages {
        out.push(Recommendation::ImageHeavy);
    }
    if inputs.summary.tables_detected > 0 {
        out.push(Recommendation::TablesDetected);
    }
    if inputs.quality_score < config.min_quality_score {
        out.push(Recommendation::LowQuality);
    }
    if !inputs.has_toc && inputs.total_pages > config.navigation_pages {
        out.push(Recommendation::MissingNavigation);
    }

    out
}
