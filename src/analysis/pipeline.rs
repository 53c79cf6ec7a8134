//! Whole-document analysis.
//!
//! Pages are processed independently, in parallel when enabled. The
//! segmentation and scoring passes then fold over the complete, ordered
//! classification sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::{AnalysisConfig, OcrConfig};
use crate::error::{Error, Result};
use crate::model::{
    ContentSummary, DocumentAnalysis, LayoutComplexity, PageClassification, PageLayout,
    PageWarning, ProcessingStrategy, StructureInfo,
};
use crate::source::DocumentSource;

use super::classify::{assemble, classify_page_checked};
use super::features::extract_features;
use super::quality::{quality_score, recommendations, text_density, RecommendationInputs};
use super::segment::Segmenter;
use super::text_quality::ocr_confidence;

/// Shared flag for aborting an analysis from another thread.
///
/// Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Result of the per-page pass for one page.
struct PageOutcome {
    classification: PageClassification,
    layout: PageLayout,
    warnings: Vec<PageWarning>,
}

/// Analyze every page of a document.
pub fn analyze<S>(source: &S, config: &AnalysisConfig) -> Result<DocumentAnalysis>
where
    S: DocumentSource + ?Sized,
{
    analyze_with_cancel(source, config, &CancellationToken::new())
}

/// Analyze a document, aborting with [`Error::Cancelled`] once `token` is
/// cancelled. A cancelled run never returns a partial analysis.
pub fn analyze_with_cancel<S>(
    source: &S,
    config: &AnalysisConfig,
    token: &CancellationToken,
) -> Result<DocumentAnalysis>
where
    S: DocumentSource + ?Sized,
{
    let total_pages = source.page_count();
    log::debug!(
        "analyze: {} pages ({})",
        total_pages,
        if config.parallel { "parallel" } else { "sequential" }
    );

    let outcomes: Vec<PageOutcome> = if config.parallel {
        (1..=total_pages)
            .into_par_iter()
            .map(|n| process_page(source, n, config, token))
            .collect::<Result<_>>()?
    } else {
        (1..=total_pages)
            .map(|n| process_page(source, n, config, token))
            .collect::<Result<_>>()?
    };

    let outline = source.table_of_contents()?;
    token.check()?;

    let mut classifications = Vec::with_capacity(outcomes.len());
    let mut page_layouts = Vec::with_capacity(outcomes.len());
    let mut page_warnings = Vec::new();
    for outcome in outcomes {
        classifications.push(outcome.classification);
        page_layouts.push(outcome.layout);
        page_warnings.extend(outcome.warnings);
    }

    let sections = Segmenter::with_config(config.segment.clone()).segment(&classifications);
    let content_summary = ContentSummary::from_classifications(&classifications);
    let density = text_density(classifications.iter().map(|c| c.text_block_count));
    let score = quality_score(&page_layouts, density, &config.quality);

    let recommendations: Vec<String> = recommendations(
        &RecommendationInputs {
            total_pages,
            summary: &content_summary,
            quality_score: score,
            has_toc: !outline.is_empty(),
        },
        &config.quality,
    )
    .iter()
    .map(|r| r.message().to_string())
    .collect();

    let needs_ocr = classifications.iter().any(|c| c.needs_ocr);
    let ocr_confidence = ocr_confidence(classifications.iter().map(|c| c.scan_likelihood));
    let layout_complexity = layout_complexity(&classifications);
    let processing_strategy =
        processing_strategy(needs_ocr, layout_complexity, &classifications, &config.ocr);

    log::debug!(
        "analyze: {} sections, score {:.1}, strategy {:?}",
        sections.len(),
        score,
        processing_strategy
    );

    Ok(DocumentAnalysis {
        total_pages,
        page_classifications: classifications,
        quality_score: score,
        recommendations,
        needs_ocr,
        ocr_confidence,
        sections,
        content_summary,
        structure: StructureInfo {
            has_bookmarks: !outline.is_empty(),
            outline,
            page_layouts,
        },
        layout_complexity,
        processing_strategy,
        page_warnings,
    })
}

fn process_page<S>(
    source: &S,
    page_number: u32,
    config: &AnalysisConfig,
    token: &CancellationToken,
) -> Result<PageOutcome>
where
    S: DocumentSource + ?Sized,
{
    token.check()?;

    let snapshot = source.page(page_number);
    let fallback_layout = match &snapshot {
        Err(err) if err.is_recoverable() => source.page_layout(page_number),
        _ => None,
    };
    let (features, warning) = extract_features(page_number, snapshot, fallback_layout, config)?;
    let mut warnings: Vec<PageWarning> = warning.into_iter().collect();

    let classification = match classify_page_checked(&features, config) {
        Ok(classification) => classification,
        Err(err) if err.is_recoverable() => {
            log::warn!("page {}: {}", page_number, err);
            warnings.push(PageWarning {
                page_number,
                message: err.to_string(),
            });
            assemble(&features, config, Vec::new())
        }
        Err(err) => return Err(err),
    };

    Ok(PageOutcome {
        classification,
        layout: PageLayout {
            page: page_number,
            width: features.page_width,
            height: features.page_height,
            rotation: features.rotation,
        },
        warnings,
    })
}

/// `Complex` when any page has a table candidate or several text columns.
pub fn layout_complexity(pages: &[PageClassification]) -> LayoutComplexity {
    if pages.iter().any(PageClassification::is_complex_layout) {
        LayoutComplexity::Complex
    } else {
        LayoutComplexity::Simple
    }
}

/// Pick the downstream strategy; the first applicable one wins.
pub fn processing_strategy(
    needs_ocr: bool,
    complexity: LayoutComplexity,
    pages: &[PageClassification],
    config: &OcrConfig,
) -> ProcessingStrategy {
    if needs_ocr {
        ProcessingStrategy::OcrEnhanced
    } else if complexity == LayoutComplexity::Complex {
        ProcessingStrategy::LayoutPreservation
    } else if pages
        .iter()
        .any(|p| p.image_density > config.high_quality_image_density)
    {
        ProcessingStrategy::HighQualityImages
    } else {
        ProcessingStrategy::Standard
    }
}
