//! Page snapshot normalization.

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::model::{PageFeatures, PageLayout, PageWarning};
use crate::source::PageSnapshot;

/// Normalize one page's snapshot into [`PageFeatures`].
///
/// A page-local extraction failure does not fail the document: the page
/// becomes a degraded placeholder and the failure comes back as a warning.
/// Any other error is returned as is. `fallback_layout` supplies the page
/// geometry for a degraded page when the source still knows it.
pub fn extract_features(
    page_number: u32,
    snapshot: Result<PageSnapshot>,
    fallback_layout: Option<PageLayout>,
    config: &AnalysisConfig,
) -> Result<(PageFeatures, Option<PageWarning>)> {
    match snapshot {
        Ok(snapshot) => Ok((from_snapshot(page_number, snapshot, config), None)),
        Err(err) if err.is_recoverable() => {
            log::warn!("page {} degraded: {}", page_number, err);
            let warning = PageWarning {
                page_number,
                message: err.to_string(),
            };
            Ok((PageFeatures::degraded(page_number, fallback_layout), Some(warning)))
        }
        Err(err) => Err(err),
    }
}

/// Build features from a successfully extracted snapshot.
pub fn from_snapshot(page_number: u32, snapshot: PageSnapshot, config: &AnalysisConfig) -> PageFeatures {
    let footer_line = snapshot.height - config.footer_margin;
    let has_header = snapshot.spans.iter().any(|s| s.y() < config.header_margin);
    let has_footer = snapshot.spans.iter().any(|s| s.y() > footer_line);

    PageFeatures {
        page_number,
        text: snapshot.text,
        text_block_count: snapshot.text_blocks.len(),
        text_spans: snapshot.spans,
        image_count: snapshot.images.len(),
        image_size_estimates: snapshot
            .images
            .iter()
            .map(|i| i.estimated_byte_size)
            .collect(),
        page_width: snapshot.width,
        page_height: snapshot.height,
        rotation: snapshot.rotation,
        has_header,
        has_footer,
        form_field_count: snapshot.form_field_count,
        extraction_failed: false,
    }
}
