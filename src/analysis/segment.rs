//! Content-aware document segmentation.
//!
//! Both operations walk the page sequence in order, comparing each page with
//! its immediate neighbour, so they run after every page is classified.

use crate::config::SegmentConfig;
use crate::error::{Error, Result};
use crate::model::{BoundaryReason, PageClassification, Section};

/// Groups classified pages into sections and snaps page ranges.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmentConfig,
}

impl Segmenter {
    /// Create a segmenter with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a segmenter with custom thresholds.
    pub fn with_config(config: SegmentConfig) -> Self {
        Self { config }
    }

    /// Why `current` would open a new section after `previous`, if it would.
    pub fn boundary(
        &self,
        previous: &PageClassification,
        current: &PageClassification,
    ) -> Option<BoundaryReason> {
        if previous.content_type != current.content_type {
            return Some(BoundaryReason::ContentTypeChange {
                from: previous.content_type,
                to: current.content_type,
            });
        }

        let delta = current.text_block_count as i64 - previous.text_block_count as i64;
        if delta.unsigned_abs() > self.config.max_block_delta as u64 {
            return Some(BoundaryReason::TextDensityShift { delta });
        }

        if current.has_header && !previous.has_header {
            return Some(BoundaryReason::HeaderIntroduced);
        }

        None
    }

    /// Split the page sequence into maximal runs between boundaries.
    ///
    /// The sections partition the input pages: each page appears in exactly
    /// one section, in ascending order.
    pub fn segment(&self, pages: &[PageClassification]) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::new();
        let mut previous: Option<&PageClassification> = None;

        for page in pages {
            let reason = match previous {
                None => Some(BoundaryReason::DocumentStart),
                Some(prev) => self.boundary(prev, page),
            };
            match (reason, sections.last_mut()) {
                (None, Some(section)) => section.pages.push(page.page_number),
                (reason, _) => {
                    let boundary_reason = reason.unwrap_or(BoundaryReason::DocumentStart);
                    log::debug!(
                        "Segmenter: section starts at page {} ({:?})",
                        page.page_number,
                        boundary_reason
                    );
                    sections.push(Section {
                        pages: vec![page.page_number],
                        boundary_reason,
                    });
                }
            }
            previous = Some(page);
        }

        sections
    }

    /// Expand `[start, end]` to the surrounding run of same-typed pages.
    ///
    /// `start` moves back while the preceding page has the same content type
    /// and page `start` has no header. `end` moves forward while the next
    /// page has the same content type and no header.
    pub fn snap_range(&self, pages: &[PageClassification], start: u32, end: u32) -> Result<(u32, u32)> {
        let total = pages.len() as u32;
        if start == 0 || start > end || end > total {
            return Err(Error::InvalidRange(format!(
                "{}-{} is outside 1-{}",
                start, end, total
            )));
        }

        // Page n lives at index n - 1
        let page = |n: u32| &pages[(n - 1) as usize];

        let mut snapped_start = start;
        while snapped_start > 1 {
            let current = page(snapped_start);
            if page(snapped_start - 1).content_type != current.content_type || current.has_header {
                break;
            }
            snapped_start -= 1;
        }

        let mut snapped_end = end;
        while snapped_end < total {
            let next = page(snapped_end + 1);
            if next.content_type != page(snapped_end).content_type || next.has_header {
                break;
            }
            snapped_end += 1;
        }

        Ok((snapped_start, snapped_end))
    }
}
