//! Extracted-text quality and OCR-need scoring.

use crate::config::OcrConfig;
use crate::model::PageFeatures;

/// Score how well a page's text was likely extracted, in `[0, 1]`.
///
/// Short average lines suggest fragmented extraction; a high share of
/// symbol characters suggests OCR noise. Both multiply the score down.
pub fn text_quality(text: &str, config: &OcrConfig) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let mut quality = 1.0;

    let (line_count, line_chars) = text
        .lines()
        .map(|line| line.trim().chars().count())
        .filter(|&len| len > 0)
        .fold((0usize, 0usize), |(n, total), len| (n + 1, total + len));
    let avg_line_length = if line_count == 0 {
        0.0
    } else {
        line_chars as f64 / line_count as f64
    };
    if avg_line_length < config.min_avg_line_length {
        quality *= config.fragmented_penalty;
    }

    let total = text.chars().count();
    let symbols = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    if symbols as f64 / total as f64 > config.max_symbol_ratio {
        quality *= config.noise_penalty;
    }

    quality.clamp(0.0, 1.0)
}

/// Normalized image data volume: total bytes over the reference size, capped at 1.
pub fn image_density(image_sizes: &[u64], config: &OcrConfig) -> f64 {
    if config.density_reference_bytes == 0 {
        return if image_sizes.iter().any(|&s| s > 0) { 1.0 } else { 0.0 };
    }
    let total: u64 = image_sizes.iter().sum();
    (total as f64 / config.density_reference_bytes as f64).min(1.0)
}

/// A page needs OCR when its text is poor and it carries substantial image data.
pub fn needs_ocr(text_quality: f64, image_density: f64, config: &OcrConfig) -> bool {
    text_quality < config.quality_threshold && image_density > config.density_threshold
}

/// Rasterization DPI suggested for downstream processing.
pub fn recommended_dpi(image_density: f64, config: &OcrConfig) -> u32 {
    if image_density > config.high_dpi_density {
        config.high_dpi
    } else {
        config.standard_dpi
    }
}

/// Whether the page looks like a scan: little text, at least one image,
/// and almost no text for its area.
pub fn looks_scanned(features: &PageFeatures, config: &OcrConfig) -> bool {
    let area = f64::from(features.page_width) * f64::from(features.page_height);
    let text_per_area = if area > 0.0 {
        features.text_length() as f64 / area
    } else {
        0.0
    };
    features.text.trim().chars().count() < config.scan_max_text_chars
        && features.image_count > 0
        && text_per_area < config.scan_max_text_per_area
}

/// Per-page scan likelihood: `scan_likely` for scan-looking pages,
/// `scan_unlikely` otherwise.
pub fn scan_likelihood(features: &PageFeatures, config: &OcrConfig) -> f64 {
    if looks_scanned(features, config) {
        config.scan_likely
    } else {
        config.scan_unlikely
    }
}

/// Document OCR confidence: the mean of the per-page scan likelihoods,
/// 0 for an empty document.
pub fn ocr_confidence(likelihoods: impl IntoIterator<Item = f64>) -> f64 {
    let (pages, total) = likelihoods
        .into_iter()
        .fold((0usize, 0.0), |(n, sum), l| (n + 1, sum + l));
    if pages == 0 {
        0.0
    } else {
        total / pages as f64
    }
}
