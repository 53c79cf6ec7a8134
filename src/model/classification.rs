//! Page-level classification results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The dominant kind of content on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Dense running text
    Text,
    /// Image-dominated page (scans, photo pages)
    Image,
    /// Page with at least one table candidate
    Table,
    /// Sparse page; also what an empty page classifies as
    Form,
    /// Anything else
    Mixed,
}

impl ContentType {
    /// Lowercase name used in reports and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Table => "table",
            ContentType::Form => "form",
            ContentType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse label for page previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageHint {
    ImageHeavy,
    TextHeavy,
    Rotated,
    Mixed,
    /// The page could not be extracted
    Unknown,
}

impl PageHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageHint::ImageHeavy => "image_heavy",
            PageHint::TextHeavy => "text_heavy",
            PageHint::Rotated => "rotated",
            PageHint::Mixed => "mixed",
            PageHint::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heuristically detected tabular region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableCandidate {
    /// Number of rows grouped by vertical position
    pub row_count: usize,
    /// Number of column groups
    pub column_count: usize,
    /// Detector confidence in `[0, 1]`
    pub confidence: f64,
}

/// Classification of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageClassification {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Dominant content type
    pub content_type: ContentType,

    /// Detected table candidates
    pub table_candidates: Vec<TableCandidate>,

    /// Structural quality of the extracted text, `[0, 1]`
    pub text_quality: f64,

    /// Normalized image data volume, `[0, 1]`
    pub image_density: f64,

    /// Whether OCR would likely improve this page
    pub needs_ocr: bool,

    /// Text blocks on the page
    pub text_block_count: usize,

    /// Images on the page
    pub image_count: usize,

    /// Words in the extracted text
    pub word_count: usize,

    /// Number of text columns (1 when there is no text)
    pub column_count: usize,

    /// Header region contains text
    pub has_header: bool,

    /// Footer region contains text
    pub has_footer: bool,

    /// Interactive form widgets
    pub form_field_count: usize,

    /// Suggested rasterization DPI for downstream processing
    pub recommended_dpi: u32,

    /// Preview label
    pub hint: PageHint,

    /// The plain text is laid out in aligned, multi-word rows
    pub tabular_text: bool,

    /// Likelihood that the page is a scan without a text layer
    pub scan_likelihood: f64,

    /// The page's features were a placeholder after an extraction failure
    pub degraded: bool,
}

impl PageClassification {
    /// Number of table candidates.
    pub fn table_count(&self) -> usize {
        self.table_candidates.len()
    }

    /// Whether the page contributes to a complex layout.
    pub fn is_complex_layout(&self) -> bool {
        !self.table_candidates.is_empty() || self.column_count > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_serde_names() {
        let json = serde_json::to_string(&ContentType::Image).unwrap();
        assert_eq!(json, "\"image\"");
        let parsed: ContentType = serde_json::from_str("\"form\"").unwrap();
        assert_eq!(parsed, ContentType::Form);
        assert_eq!(ContentType::Mixed.to_string(), "mixed");
        assert_eq!(serde_json::to_string(&PageHint::ImageHeavy).unwrap(), "\"image_heavy\"");
        assert_eq!(PageHint::TextHeavy.to_string(), "text_heavy");
    }
}
