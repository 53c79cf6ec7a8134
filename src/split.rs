//! Split planning.
//!
//! Every function here returns a plan: which pages go into which output
//! part. Writing the parts is left to a document backend.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::Segmenter;
use crate::config::SegmentConfig;
use crate::error::{Error, Result};
use crate::model::{ContentType, PageClassification, Section, TocEntry};

/// Longest label derived from a bookmark title.
const MAX_LABEL_LEN: usize = 50;

/// An inclusive, 1-indexed page range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Pages in the range, ascending.
    pub fn pages(&self) -> Vec<u32> {
        (self.start..=self.end).collect()
    }

    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// One output document of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPart {
    /// Short name for the part, usable in a file name
    pub label: String,
    /// Pages in output order
    pub pages: Vec<u32>,
}

impl SplitPart {
    fn from_range(label: impl Into<String>, range: PageRange) -> Self {
        Self {
            label: label.into(),
            pages: range.pages(),
        }
    }
}

/// Parse a selection such as `"1-3,5,8-"` against a document of `total` pages.
///
/// A missing start means page 1 and a missing end means the last page.
/// Every range must lie within `1..=total` and must not run backwards.
pub fn parse_page_ranges(selection: &str, total: u32) -> Result<Vec<PageRange>> {
    let mut ranges = Vec::new();

    for item in selection.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(Error::InvalidRange(format!("empty item in {:?}", selection)));
        }

        let range = match item.split_once('-') {
            Some((start, end)) => {
                let start = parse_bound(start, 1, item)?;
                let end = parse_bound(end, total, item)?;
                PageRange::new(start, end)
            }
            None => {
                let page = parse_bound(item, 0, item)?;
                PageRange::new(page, page)
            }
        };

        if range.start < 1 || range.end > total || range.start > range.end {
            return Err(Error::InvalidRange(format!(
                "{} is outside 1-{}",
                item, total
            )));
        }
        ranges.push(range);
    }

    Ok(ranges)
}

fn parse_bound(text: &str, default: u32, item: &str) -> Result<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(default);
    }
    text.parse()
        .map_err(|_| Error::InvalidRange(format!("{:?} is not a page range", item)))
}

/// Sorted, de-duplicated pages covered by `ranges`.
pub fn selected_pages(ranges: &[PageRange]) -> Vec<u32> {
    let mut pages: Vec<u32> = ranges.iter().flat_map(PageRange::pages).collect();
    pages.sort_unstable();
    pages.dedup();
    pages
}

/// Consecutive chunks of `n` pages; the last chunk may be shorter.
pub fn every_n_pages(total: u32, n: u32) -> Result<Vec<SplitPart>> {
    if n == 0 {
        return Err(Error::InvalidRange("chunk size must be at least 1".to_string()));
    }
    Ok((1..=total)
        .step_by(n as usize)
        .map(|start| {
            let range = PageRange::new(start, start.saturating_add(n - 1).min(total));
            SplitPart::from_range(format!("pages_{}", range), range)
        })
        .collect())
}

/// One part per section.
pub fn by_sections(sections: &[Section]) -> Vec<SplitPart> {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| SplitPart {
            label: format!("section_{}", i + 1),
            pages: section.pages.clone(),
        })
        .collect()
}

/// One part per content type, in order of first appearance.
pub fn by_content_type(pages: &[PageClassification]) -> Vec<SplitPart> {
    let mut order: Vec<ContentType> = Vec::new();
    let mut groups: HashMap<ContentType, Vec<u32>> = HashMap::new();

    for page in pages {
        groups
            .entry(page.content_type)
            .or_insert_with(|| {
                order.push(page.content_type);
                Vec::new()
            })
            .push(page.page_number);
    }

    order
        .into_iter()
        .filter_map(|content_type| {
            groups.remove(&content_type).map(|pages| SplitPart {
                label: content_type.as_str().to_string(),
                pages,
            })
        })
        .collect()
}

/// One part per distinct bookmark target page.
///
/// Targets are ordered by page, and when several bookmarks point at the same
/// page the first one in outline order names the part. A part runs from its
/// page up to the page before the next target, and the last part runs to the
/// end of the document, so parts never overlap.
pub fn by_bookmarks(toc: &[TocEntry], total: u32) -> Vec<SplitPart> {
    let mut targets: Vec<(&TocEntry, u32)> = toc
        .iter()
        .filter_map(|entry| entry.target_page.map(|p| (entry, p)))
        .filter(|(_, page)| (1..=total).contains(page))
        .collect();
    // Stable, so outline order breaks ties
    targets.sort_by_key(|&(_, page)| page);
    targets.dedup_by_key(|&mut (_, page)| page);

    targets
        .iter()
        .enumerate()
        .map(|(i, (entry, start))| {
            let end = targets.get(i + 1).map_or(total, |(_, next)| next - 1);
            SplitPart::from_range(sanitize_label(&entry.title, i + 1), PageRange::new(*start, end))
        })
        .collect()
}

/// Snap each requested range to the surrounding content before splitting.
pub fn smart_ranges(
    pages: &[PageClassification],
    ranges: &[PageRange],
    config: &SegmentConfig,
) -> Result<Vec<SplitPart>> {
    let segmenter = Segmenter::with_config(config.clone());
    ranges
        .iter()
        .map(|range| {
            let (start, end) = segmenter.snap_range(pages, range.start, range.end)?;
            let snapped = PageRange::new(start, end);
            Ok(SplitPart::from_range(format!("pages_{}", snapped), snapped))
        })
        .collect()
}

/// One part per range, as given.
pub fn by_ranges(ranges: &[PageRange]) -> Vec<SplitPart> {
    ranges
        .iter()
        .map(|&range| SplitPart::from_range(format!("pages_{}", range), range))
        .collect()
}

fn sanitize_label(title: &str, index: usize) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(MAX_LABEL_LEN)
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        format!("bookmark_{}", index)
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(types: &[ContentType]) -> Vec<PageClassification> {
        types
            .iter()
            .enumerate()
            .map(|(i, &content_type)| PageClassification {
                page_number: i as u32 + 1,
                content_type,
                table_candidates: vec![],
                text_quality: 1.0,
                image_density: 0.0,
                needs_ocr: false,
                text_block_count: 3,
                image_count: 0,
                word_count: 0,
                column_count: 1,
                has_header: false,
                has_footer: false,
                form_field_count: 0,
                recommended_dpi: 150,
                hint: crate::model::PageHint::Mixed,
                tabular_text: false,
                scan_likelihood: 0.1,
                degraded: false,
            })
            .collect()
    }

    #[test]
    fn test_parse_page_ranges() {
        let ranges = parse_page_ranges("1-3, 5,8-", 10).unwrap();
        assert_eq!(
            ranges,
            vec![PageRange::new(1, 3), PageRange::new(5, 5), PageRange::new(8, 10)]
        );
        assert_eq!(parse_page_ranges("-2", 4).unwrap(), vec![PageRange::new(1, 2)]);
    }

    #[test]
    fn test_parse_page_ranges_rejects_invalid() {
        for selection in ["0", "11", "4-2", "1-11", "a", "1,,2", "", "1-x"] {
            assert!(
                matches!(parse_page_ranges(selection, 10), Err(Error::InvalidRange(_))),
                "{:?} should be rejected",
                selection
            );
        }
    }

    #[test]
    fn test_selected_pages_dedup() {
        let ranges = parse_page_ranges("3-5,1,4", 6).unwrap();
        assert_eq!(selected_pages(&ranges), vec![1, 3, 4, 5]);
    }

    #[test]
    fn test_every_n_pages() {
        let parts = every_n_pages(7, 3).unwrap();
        let pages: Vec<_> = parts.iter().map(|p| p.pages.clone()).collect();
        assert_eq!(pages, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert_eq!(parts[2].label, "pages_7");
        assert!(every_n_pages(7, 0).is_err());
        assert!(every_n_pages(0, 2).unwrap().is_empty());
    }

    #[test]
    fn test_by_content_type_first_seen_order() {
        use ContentType::*;
        let pages = classified(&[Form, Text, Text, Form, Image]);
        let parts = by_content_type(&pages);
        let labels: Vec<_> = parts.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["form", "text", "image"]);
        assert_eq!(parts[0].pages, vec![1, 4]);
        assert_eq!(parts[1].pages, vec![2, 3]);
    }

    #[test]
    fn test_by_bookmarks() {
        let toc = vec![
            TocEntry::new(1, "Introduction", Some(1)),
            TocEntry::new(2, "Unresolved", None),
            TocEntry::new(1, "Results: 2024/Q1", Some(4)),
            TocEntry::new(1, "", Some(9)),
        ];
        let parts = by_bookmarks(&toc, 10);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].pages, vec![1, 2, 3]);
        assert_eq!(parts[1].label, "Results 2024Q1");
        assert_eq!(parts[1].pages, (4..=8).collect::<Vec<_>>());
        assert_eq!(parts[2].label, "bookmark_3");
        assert_eq!(parts[2].pages, vec![9, 10]);
    }

    #[test]
    fn test_bookmarks_out_of_order() {
        let toc = vec![
            TocEntry::new(1, "Appendix", Some(8)),
            TocEntry::new(1, "Summary", Some(2)),
            TocEntry::new(2, "Key figures", Some(2)),
            TocEntry::new(1, "Method", Some(5)),
        ];
        let parts = by_bookmarks(&toc, 10);

        let labels: Vec<_> = parts.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Summary", "Method", "Appendix"]);
        assert_eq!(parts[0].pages, vec![2, 3, 4]);
        assert_eq!(parts[1].pages, vec![5, 6, 7]);
        assert_eq!(parts[2].pages, vec![8, 9, 10]);

        let mut pages: Vec<u32> = parts.iter().flat_map(|p| p.pages.clone()).collect();
        let len = pages.len();
        pages.dedup();
        assert_eq!(pages.len(), len);
    }

    #[test]
    fn test_smart_ranges_snap() {
        use ContentType::*;
        let pages = classified(&[Form, Text, Text, Text, Text, Image]);
        let config = SegmentConfig::default();
        let parts =
            smart_ranges(&pages, &[PageRange::new(3, 3), PageRange::new(6, 6)], &config).unwrap();
        assert_eq!(parts[0].pages, vec![2, 3, 4, 5]);
        assert_eq!(parts[0].label, "pages_2-5");
        assert_eq!(parts[1].pages, vec![6]);

        assert!(smart_ranges(&pages, &[PageRange::new(5, 9)], &config).is_err());
    }
}
