//! Analysis configuration.
//!
//! All thresholds live in one immutable [`AnalysisConfig`] value that is
//! passed explicitly to every analyzer. Defaults reproduce the reference
//! heuristics.

/// Options for analyzing documents.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Table detection thresholds
    pub table: TableConfig,

    /// Text quality and OCR thresholds
    pub ocr: OcrConfig,

    /// Document score and recommendation thresholds
    pub quality: QualityConfig,

    /// Segmentation thresholds
    pub segment: SegmentConfig,

    /// Distance from the top edge that counts as header area
    pub header_margin: f32,

    /// Distance from the bottom edge that counts as footer area
    pub footer_margin: f32,

    /// Maximum number of text columns reported per page
    pub max_text_columns: usize,

    /// Whether to process pages in parallel
    pub parallel: bool,
}

impl AnalysisConfig {
    /// Create new analysis options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set table detection options.
    pub fn with_table_config(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    /// Set OCR decision options.
    pub fn with_ocr_config(mut self, ocr: OcrConfig) -> Self {
        self.ocr = ocr;
        self
    }

    /// Set quality scoring options.
    pub fn with_quality_config(mut self, quality: QualityConfig) -> Self {
        self.quality = quality;
        self
    }

    /// Set segmentation options.
    pub fn with_segment_config(mut self, segment: SegmentConfig) -> Self {
        self.segment = segment;
        self
    }

    /// Set header and footer margins.
    pub fn with_margins(mut self, header: f32, footer: f32) -> Self {
        self.header_margin = header;
        self.footer_margin = footer;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            ocr: OcrConfig::default(),
            quality: QualityConfig::default(),
            segment: SegmentConfig::default(),
            header_margin: 100.0,
            footer_margin: 100.0,
            max_text_columns: 3,
            parallel: true,
        }
    }
}

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    /// Fewer spans than this never form a table
    pub min_spans: usize,
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of column groups to consider as table
    pub min_columns: usize,
    /// Upper bound on column groups requested from the grouping strategy
    pub max_column_clusters: usize,
    /// Vertical distance from the row anchor within which spans share a row
    pub row_tolerance: f32,
    /// Confidence attached to every candidate
    pub confidence: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_spans: 4,
            min_rows: 3,
            min_columns: 2,
            max_column_clusters: 10,
            row_tolerance: 5.0,
            confidence: 0.8,
        }
    }
}

/// Text quality and OCR-need thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    /// Average line length below which text counts as fragmented
    pub min_avg_line_length: f64,
    /// Multiplier applied to fragmented text
    pub fragmented_penalty: f64,
    /// Share of symbol characters above which text counts as noisy
    pub max_symbol_ratio: f64,
    /// Multiplier applied to noisy text
    pub noise_penalty: f64,
    /// Pages with quality below this may need OCR
    pub quality_threshold: f64,
    /// Pages with image density above this may need OCR
    pub density_threshold: f64,
    /// Image bytes that map to a density of 1.0
    pub density_reference_bytes: u64,
    /// Density above which pages get the high DPI
    pub high_dpi_density: f64,
    /// Density above which the high-quality image strategy applies
    pub high_quality_image_density: f64,
    /// DPI for image-heavy pages
    pub high_dpi: u32,
    /// DPI for other pages
    pub standard_dpi: u32,
    /// Pages with less trimmed text than this may be scans
    pub scan_max_text_chars: usize,
    /// Text characters per square point below which a page may be a scan
    pub scan_max_text_per_area: f64,
    /// Scan likelihood of a page that matches the scan profile
    pub scan_likely: f64,
    /// Scan likelihood of any other page
    pub scan_unlikely: f64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_avg_line_length: 10.0,
            fragmented_penalty: 0.7,
            max_symbol_ratio: 0.3,
            noise_penalty: 0.8,
            quality_threshold: 0.3,
            density_threshold: 0.5,
            density_reference_bytes: 1024 * 1024,
            high_dpi_density: 0.5,
            high_quality_image_density: 0.7,
            high_dpi: 300,
            standard_dpi: 150,
            scan_max_text_chars: 100,
            scan_max_text_per_area: 0.001,
            scan_likely: 0.9,
            scan_unlikely: 0.1,
        }
    }
}

/// Document quality score and recommendation thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityConfig {
    /// Average text blocks per page below which the score is penalized
    pub min_text_density: f64,
    /// Penalty for low text density
    pub low_density_penalty: f64,
    /// Width/height difference from the first page that counts as inconsistent
    pub page_size_tolerance: f32,
    /// Penalty per inconsistent page
    pub size_mismatch_penalty: f64,
    /// Documents longer than this get a split recommendation
    pub long_document_pages: u32,
    /// Scores below this get a reprocessing recommendation
    pub min_quality_score: f64,
    /// Documents longer than this without bookmarks get a navigation recommendation
    pub navigation_pages: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_text_density: 0.5,
            low_density_penalty: 20.0,
            page_size_tolerance: 50.0,
            size_mismatch_penalty: 10.0,
            long_document_pages: 50,
            min_quality_score: 70.0,
            navigation_pages: 10,
        }
    }
}

/// Section boundary thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConfig {
    /// Text block count change between neighbors that opens a new section
    pub max_block_delta: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self { max_block_delta: 5 }
    }
}
