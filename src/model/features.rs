//! Normalized per-page features.

use serde::{Deserialize, Serialize};

use super::{PageLayout, TextSpan};

/// Everything the analyzers need to know about one page.
///
/// Built once from a page snapshot and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFeatures {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Full extracted text
    pub text: String,

    /// Number of text blocks reported by the backend
    pub text_block_count: usize,

    /// Positioned text spans, in backend order
    pub text_spans: Vec<TextSpan>,

    /// Number of images placed on the page
    pub image_count: usize,

    /// Estimated byte size of each image
    pub image_size_estimates: Vec<u64>,

    /// Page width in points
    pub page_width: f32,

    /// Page height in points
    pub page_height: f32,

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,

    /// Whether any span sits inside the top margin
    pub has_header: bool,

    /// Whether any span sits inside the bottom margin
    pub has_footer: bool,

    /// Number of interactive form widgets
    pub form_field_count: usize,

    /// Set when the backend failed on this page and the features are a placeholder
    pub extraction_failed: bool,
}

impl PageFeatures {
    /// Create an empty feature set for a page of the given size.
    pub fn empty(page_number: u32, page_width: f32, page_height: f32) -> Self {
        Self {
            page_number,
            text: String::new(),
            text_block_count: 0,
            text_spans: Vec::new(),
            image_count: 0,
            image_size_estimates: Vec::new(),
            page_width,
            page_height,
            rotation: 0,
            has_header: false,
            has_footer: false,
            form_field_count: 0,
            extraction_failed: false,
        }
    }

    /// Placeholder for a page whose extraction failed.
    ///
    /// Geometry comes from `layout` when the source could still read it and
    /// is zero otherwise.
    pub fn degraded(page_number: u32, layout: Option<PageLayout>) -> Self {
        let (width, height, rotation) = layout.map_or((0.0, 0.0, 0), |l| (l.width, l.height, l.rotation));
        Self {
            rotation,
            extraction_failed: true,
            ..Self::empty(page_number, width, height)
        }
    }

    /// Length of the extracted text in characters.
    pub fn text_length(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Sum of all image size estimates.
    pub fn total_image_bytes(&self) -> u64 {
        self.image_size_estimates.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_length_counts_chars() {
        let mut features = PageFeatures::empty(1, 612.0, 792.0);
        features.text = "héllo wörld".to_string();
        assert_eq!(features.text_length(), 11);
        assert_eq!(features.word_count(), 2);
    }

    #[test]
    fn test_degraded_placeholder() {
        let features = PageFeatures::degraded(4, None);
        assert_eq!(features.page_number, 4);
        assert_eq!(features.page_width, 0.0);
        assert!(features.extraction_failed);
        assert!(features.text.is_empty());
        assert_eq!(features.image_count, 0);
        assert_eq!(features.total_image_bytes(), 0);
    }

    #[test]
    fn test_degraded_keeps_known_geometry() {
        let layout = PageLayout {
            page: 2,
            width: 595.0,
            height: 842.0,
            rotation: 90,
        };
        let features = PageFeatures::degraded(2, Some(layout));
        assert!(features.extraction_failed);
        assert_eq!((features.page_width, features.page_height), (595.0, 842.0));
        assert_eq!(features.rotation, 90);
    }
}
