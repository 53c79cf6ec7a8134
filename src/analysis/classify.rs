//! Page content classification.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::model::{ContentType, PageClassification, PageFeatures, PageHint, TableCandidate};

use super::tables::{has_tabular_text, text_column_count, KMeans1d, TableDetector};
use super::text_quality::{image_density, needs_ocr, recommended_dpi, scan_likelihood, text_quality};

const IMAGE_HEAVY_IMAGES: usize = 3;
const TEXT_HEAVY_WORDS: usize = 200;

/// Preview label for a page; the first match wins.
///
/// At least 3 images is `ImageHeavy`, more than 200 words is `TextHeavy`,
/// any rotation is `Rotated`, and everything else is `Mixed`. A page that
/// could not be extracted is `Unknown`.
pub fn page_hint(features: &PageFeatures) -> PageHint {
    if features.extraction_failed {
        PageHint::Unknown
    } else if features.image_count >= IMAGE_HEAVY_IMAGES {
        PageHint::ImageHeavy
    } else if features.word_count() > TEXT_HEAVY_WORDS {
        PageHint::TextHeavy
    } else if features.rotation != 0 {
        PageHint::Rotated
    } else {
        PageHint::Mixed
    }
}

/// Map page counts to a content type.
///
/// Rules are checked in order and the first match wins:
///
/// 1. more than 10 blocks and more than 500 chars of text: `Text`
/// 2. at least 3 images and fewer than 5 blocks: `Image`
/// 3. at least one table candidate: `Table`
/// 4. at most 2 blocks and at most 1 image: `Form` (includes empty pages)
/// 5. otherwise: `Mixed`
pub fn classify_content(
    text_block_count: usize,
    image_count: usize,
    table_count: usize,
    text_length: usize,
) -> ContentType {
    if text_block_count > 10 && text_length > 500 {
        ContentType::Text
    } else if image_count >= 3 && text_block_count < 5 {
        ContentType::Image
    } else if table_count >= 1 {
        ContentType::Table
    } else if text_block_count <= 2 && image_count <= 1 {
        ContentType::Form
    } else {
        ContentType::Mixed
    }
}

/// Classify one page.
///
/// Table detection failures do not fail the page; the page simply has no
/// candidates. Use [`classify_page_checked`] to observe the failure.
pub fn classify_page(features: &PageFeatures, config: &AnalysisConfig) -> PageClassification {
    match classify_page_checked(features, config) {
        Ok(classification) => classification,
        Err(err) => {
            log::warn!("page {}: {}", features.page_number, err);
            assemble(features, config, Vec::new())
        }
    }
}

/// Classify one page, surfacing table detection errors.
pub fn classify_page_checked(
    features: &PageFeatures,
    config: &AnalysisConfig,
) -> Result<PageClassification> {
    if features.extraction_failed {
        return Ok(assemble(features, config, Vec::new()));
    }
    let tables = TableDetector::with_config(config.table.clone()).detect(&features.text_spans)?;
    Ok(assemble(features, config, tables))
}

/// Build a classification from features and already detected tables.
pub(crate) fn assemble(
    features: &PageFeatures,
    config: &AnalysisConfig,
    table_candidates: Vec<TableCandidate>,
) -> PageClassification {
    let density = image_density(&features.image_size_estimates, &config.ocr);

    let (content_type, quality) = if features.extraction_failed {
        (ContentType::Mixed, 0.0)
    } else {
        (
            classify_content(
                features.text_block_count,
                features.image_count,
                table_candidates.len(),
                features.text_length(),
            ),
            text_quality(&features.text, &config.ocr),
        )
    };

    PageClassification {
        page_number: features.page_number,
        content_type,
        table_candidates,
        text_quality: quality,
        image_density: density,
        needs_ocr: needs_ocr(quality, density, &config.ocr),
        text_block_count: features.text_block_count,
        image_count: features.image_count,
        word_count: features.word_count(),
        column_count: text_column_count(
            &features.text_spans,
            config.max_text_columns,
            &KMeans1d::default(),
        ),
        has_header: features.has_header,
        has_footer: features.has_footer,
        form_field_count: features.form_field_count,
        recommended_dpi: recommended_dpi(density, &config.ocr),
        hint: page_hint(features),
        tabular_text: has_tabular_text(&features.text),
        scan_likelihood: scan_likelihood(features, &config.ocr),
        degraded: features.extraction_failed,
    }
}
