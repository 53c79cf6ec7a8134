//! Plain text report for analysis results.

use std::fmt::Write;

use crate::model::{BoundaryReason, DocumentAnalysis};

/// Render an analysis as a plain text report.
pub fn to_text(analysis: &DocumentAnalysis) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Pages:        {}", analysis.total_pages);
    let _ = writeln!(out, "Quality:      {:.0}/100", analysis.quality_score);
    let _ = writeln!(out, "Needs OCR:    {}", yes_no(analysis.needs_ocr));
    let _ = writeln!(out, "Scan score:   {:.2}", analysis.ocr_confidence);
    let _ = writeln!(out, "Layout:       {:?}", analysis.layout_complexity);
    let _ = writeln!(out, "Strategy:     {:?}", analysis.processing_strategy);
    let _ = writeln!(out, "Bookmarks:    {}", analysis.structure.outline.len());

    let summary = &analysis.content_summary;
    let _ = writeln!(
        out,
        "Content:      {} text, {} image, {} table, {} form, {} mixed",
        summary.text_pages,
        summary.image_pages,
        summary.table_pages,
        summary.form_pages,
        summary.mixed_pages
    );

    out.push_str("\nPages\n");
    for page in &analysis.page_classifications {
        let _ = writeln!(
            out,
            "  {:>4}  {:<6} {:<11} quality {:.2}  images {:.2}  tables {}{}",
            page.page_number,
            page.content_type.as_str(),
            page.hint.as_str(),
            page.text_quality,
            page.image_density,
            page.table_count(),
            if page.needs_ocr { "  [ocr]" } else { "" }
        );
    }

    out.push_str("\nSections\n");
    for (i, section) in analysis.sections.iter().enumerate() {
        let (first, last) = section.range();
        let _ = writeln!(
            out,
            "  {:>3}. pages {}-{}  ({})",
            i + 1,
            first,
            last,
            describe_boundary(&section.boundary_reason)
        );
    }

    if !analysis.recommendations.is_empty() {
        out.push_str("\nRecommendations\n");
        for recommendation in &analysis.recommendations {
            let _ = writeln!(out, "  - {}", recommendation);
        }
    }

    if !analysis.page_warnings.is_empty() {
        out.push_str("\nWarnings\n");
        for warning in &analysis.page_warnings {
            let _ = writeln!(out, "  page {}: {}", warning.page_number, warning.message);
        }
    }

    out
}

/// Short description of why a section starts.
pub fn describe_boundary(reason: &BoundaryReason) -> String {
    match reason {
        BoundaryReason::DocumentStart => "document start".to_string(),
        BoundaryReason::ContentTypeChange { from, to } => format!("{} -> {}", from, to),
        BoundaryReason::TextDensityShift { delta } => format!("text blocks {:+}", delta),
        BoundaryReason::HeaderIntroduced => "header introduced".to_string(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::model::ContentType;
    use crate::source::{MemorySource, PageBuilder};

    #[test]
    fn test_to_text() {
        let source = MemorySource::new()
            .with_page(PageBuilder::letter().line("Cover", 300.0))
            .with_page(PageBuilder::letter().images(4, 600_000))
            .with_failed_page("broken stream");
        let analysis = crate::analyze(&source, &AnalysisConfig::default()).unwrap();
        let report = to_text(&analysis);

        assert!(report.contains("Pages:        3"));
        assert!(report.contains("Needs OCR:    yes"));
        assert!(report.contains("form -> image"));
        assert!(report.contains("[ocr]"));
        assert!(report.contains("page 3: Extraction failed on page 3: broken stream"));
    }

    #[test]
    fn test_describe_boundary() {
        assert_eq!(
            describe_boundary(&BoundaryReason::TextDensityShift { delta: -8 }),
            "text blocks -8"
        );
        assert_eq!(
            describe_boundary(&BoundaryReason::ContentTypeChange {
                from: ContentType::Text,
                to: ContentType::Table
            }),
            "text -> table"
        );
    }
}
