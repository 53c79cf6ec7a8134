//! Document-level analysis result.

use serde::{Deserialize, Serialize};

use super::{ContentType, PageClassification, Section, TocEntry};

/// How involved the page layouts are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutComplexity {
    /// Single-column pages without tables
    #[default]
    Simple,
    /// At least one page has a table or several columns
    Complex,
}

/// Downstream processing strategy suggested by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStrategy {
    /// Nothing special needed
    #[default]
    Standard,
    /// Text should be recovered with OCR
    OcrEnhanced,
    /// Tables or columns must be preserved
    LayoutPreservation,
    /// Image-heavy pages need a high-quality pipeline
    HighQualityImages,
}

/// Per-type page counts and detection totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentSummary {
    pub text_pages: usize,
    pub image_pages: usize,
    pub table_pages: usize,
    pub form_pages: usize,
    pub mixed_pages: usize,
    /// Table candidates across all pages
    pub tables_detected: usize,
    /// Form widgets across all pages
    pub forms_detected: usize,
}

impl ContentSummary {
    /// Tally classifications.
    pub fn from_classifications(pages: &[PageClassification]) -> Self {
        let mut summary = Self::default();
        for page in pages {
            match page.content_type {
                ContentType::Text => summary.text_pages += 1,
                ContentType::Image => summary.image_pages += 1,
                ContentType::Table => summary.table_pages += 1,
                ContentType::Form => summary.form_pages += 1,
                ContentType::Mixed => summary.mixed_pages += 1,
            }
            summary.tables_detected += page.table_count();
            summary.forms_detected += page.form_field_count;
        }
        summary
    }
}

/// Geometry of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page: u32,
    pub width: f32,
    pub height: f32,
    pub rotation: i32,
}

impl PageLayout {
    /// Whether the page size was actually read. Pages that failed
    /// extraction without a readable size carry zero dimensions.
    pub fn is_known(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Navigation structure of the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructureInfo {
    /// The document has a non-empty outline
    pub has_bookmarks: bool,
    /// Flattened outline
    pub outline: Vec<TocEntry>,
    /// Geometry of every page, in page order
    pub page_layouts: Vec<PageLayout>,
}

/// A recorded, non-fatal problem with one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWarning {
    pub page_number: u32,
    pub message: String,
}

/// Full analysis of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Number of pages in the document
    pub total_pages: u32,

    /// One classification per page, ordered by page number
    pub page_classifications: Vec<PageClassification>,

    /// Document quality score in `[0, 100]`
    pub quality_score: f64,

    /// Ordered, human-readable recommendations
    pub recommendations: Vec<String>,

    /// Whether any page would benefit from OCR
    pub needs_ocr: bool,

    /// Mean per-page scan likelihood in `[0, 1]`; 0 for an empty document
    pub ocr_confidence: f64,

    /// Content-aware sections partitioning the document
    pub sections: Vec<Section>,

    /// Per-type totals
    pub content_summary: ContentSummary,

    /// Bookmarks and page geometry
    pub structure: StructureInfo,

    /// Overall layout complexity
    pub layout_complexity: LayoutComplexity,

    /// Suggested downstream processing
    pub processing_strategy: ProcessingStrategy,

    /// Pages that degraded or had partial failures
    pub page_warnings: Vec<PageWarning>,
}

impl DocumentAnalysis {
    /// Classification for a page (1-indexed).
    pub fn page(&self, page_number: u32) -> Option<&PageClassification> {
        if page_number == 0 {
            return None;
        }
        self.page_classifications.get((page_number - 1) as usize)
    }

    /// Pages that would benefit from OCR.
    pub fn ocr_pages(&self) -> Vec<u32> {
        self.page_classifications
            .iter()
            .filter(|p| p.needs_ocr)
            .map(|p| p.page_number)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableCandidate;

    fn page(n: u32, content_type: ContentType, tables: usize, forms: usize) -> PageClassification {
        PageClassification {
            page_number: n,
            content_type,
            table_candidates: vec![
                TableCandidate {
                    row_count: 3,
                    column_count: 2,
                    confidence: 0.8,
                };
                tables
            ],
            text_quality: 1.0,
            image_density: 0.0,
            needs_ocr: false,
            text_block_count: 0,
            image_count: 0,
            word_count: 0,
            column_count: 1,
            has_header: false,
            has_footer: false,
            form_field_count: forms,
            recommended_dpi: 150,
            hint: crate::model::PageHint::Mixed,
            tabular_text: false,
            scan_likelihood: 0.1,
            degraded: false,
        }
    }

    #[test]
    fn test_content_summary_tally() {
        let pages = vec![
            page(1, ContentType::Text, 0, 0),
            page(2, ContentType::Table, 2, 0),
            page(3, ContentType::Form, 0, 4),
            page(4, ContentType::Text, 0, 0),
        ];
        let summary = ContentSummary::from_classifications(&pages);
        assert_eq!(summary.text_pages, 2);
        assert_eq!(summary.table_pages, 1);
        assert_eq!(summary.form_pages, 1);
        assert_eq!(summary.image_pages, 0);
        assert_eq!(summary.tables_detected, 2);
        assert_eq!(summary.forms_detected, 4);
    }
}
