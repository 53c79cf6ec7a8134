//! Markdown report for analysis results.

use crate::model::{DocumentAnalysis, PageClassification, Section};

use super::text::describe_boundary;

/// Render an analysis as a Markdown report.
pub fn to_markdown(analysis: &DocumentAnalysis) -> String {
    let mut output = String::new();

    output.push_str("# Document analysis\n\n");
    output.push_str(&format!("- **Pages:** {}\n", analysis.total_pages));
    output.push_str(&format!(
        "- **Quality score:** {:.0}/100\n",
        analysis.quality_score
    ));
    output.push_str(&format!(
        "- **Needs OCR:** {}\n",
        if analysis.needs_ocr { "yes" } else { "no" }
    ));
    output.push_str(&format!(
        "- **OCR confidence:** {:.2}\n",
        analysis.ocr_confidence
    ));
    output.push_str(&format!(
        "- **Processing strategy:** {:?}\n\n",
        analysis.processing_strategy
    ));

    render_pages(&mut output, &analysis.page_classifications);
    render_sections(&mut output, &analysis.sections);

    if !analysis.structure.outline.is_empty() {
        output.push_str("## Outline\n\n");
        for entry in &analysis.structure.outline {
            let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
            let target = entry
                .target_page
                .map(|p| format!(" (p. {})", p))
                .unwrap_or_default();
            output.push_str(&format!(
                "{}- {}{}\n",
                indent,
                escape_markdown(&entry.title),
                target
            ));
        }
        output.push('\n');
    }

    if !analysis.recommendations.is_empty() {
        output.push_str("## Recommendations\n\n");
        for recommendation in &analysis.recommendations {
            output.push_str(&format!("- {}\n", recommendation));
        }
        output.push('\n');
    }

    output.trim_end().to_string() + "\n"
}

fn render_pages(output: &mut String, pages: &[PageClassification]) {
    if pages.is_empty() {
        return;
    }

    output.push_str("## Pages\n\n");
    output.push_str("| Page | Type | Hint | Text quality | Image density | Tables | OCR |\n");
    output.push_str("| ---: | --- | --- | ---: | ---: | ---: | --- |\n");
    for page in pages {
        output.push_str(&format!(
            "| {} | {} | {} | {:.2} | {:.2} | {} | {} |\n",
            page.page_number,
            page.content_type,
            page.hint,
            page.text_quality,
            page.image_density,
            page.table_count(),
            if page.needs_ocr { "yes" } else { "" }
        ));
    }
    output.push('\n');
}

fn render_sections(output: &mut String, sections: &[Section]) {
    if sections.is_empty() {
        return;
    }

    output.push_str("## Sections\n\n");
    for (i, section) in sections.iter().enumerate() {
        let (first, last) = section.range();
        output.push_str(&format!(
            "{}. Pages {}-{}: {}\n",
            i + 1,
            first,
            last,
            describe_boundary(&section.boundary_reason)
        ));
    }
    output.push('\n');
}

fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
