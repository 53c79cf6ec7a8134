//! Integration tests for whole-document analysis.

use pdfsift::analysis::{classify_content, quality_score, text_density, Recommendation};
use pdfsift::model::PageLayout;
use pdfsift::render::{self, JsonFormat};
use pdfsift::{
    analyze, segment, snap_range, AnalysisConfig, BoundaryReason, CancellationToken, ContentType,
    DocumentAnalysis, Error, MemorySource, PageBuilder, PageHint, QualityConfig, SegmentConfig,
    Sift, TocEntry,
};

fn prose_page() -> PageBuilder {
    PageBuilder::letter().lines("A line of ordinary running text for the report.", 15, 100.0)
}

fn photo_page() -> PageBuilder {
    PageBuilder::letter()
        .images(4, 300_000)
        .line("Figure 1", 600.0)
        .line("Figure 2", 640.0)
}

fn form_page() -> PageBuilder {
    PageBuilder::letter().line("Signature:", 500.0).form_fields(2)
}

fn headed(page: PageBuilder) -> PageBuilder {
    page.line("ACME Corp annual report", 20.0)
}

fn run(source: &MemorySource) -> DocumentAnalysis {
    analyze(source, &AnalysisConfig::default()).unwrap()
}

#[test]
fn test_classification_rules() {
    assert_eq!(classify_content(15, 0, 0, 600), ContentType::Text);
    assert_eq!(classify_content(2, 4, 0, 40), ContentType::Image);
    assert_eq!(classify_content(0, 0, 0, 0), ContentType::Form);
    assert_eq!(classify_content(6, 1, 1, 100), ContentType::Table);
    assert_eq!(classify_content(6, 2, 0, 100), ContentType::Mixed);
}

#[test]
fn test_uniform_document_is_one_section() {
    let source = MemorySource::new().with_pages((0..5).map(|_| prose_page()));
    let analysis = run(&source);

    assert_eq!(analysis.sections.len(), 1);
    assert_eq!(analysis.sections[0].range(), (1, 5));
    assert_eq!(analysis.sections[0].boundary_reason, BoundaryReason::DocumentStart);
}

#[test]
fn test_uniform_pages_score_full_marks() {
    let layouts: Vec<PageLayout> = (1..=3)
        .map(|page| PageLayout {
            page,
            width: 612.0,
            height: 792.0,
            rotation: 0,
        })
        .collect();
    assert_eq!(quality_score(&layouts, 0.8, &QualityConfig::default()), 100.0);
    assert_eq!(quality_score(&layouts, 0.2, &QualityConfig::default()), 80.0);
    assert_eq!(text_density([1, 0, 2, 1]), 1.0);
}

#[test]
fn test_snap_expands_to_content_run() {
    let source = MemorySource::new()
        .with_page(form_page())
        .with_pages((0..4).map(|_| prose_page()))
        .with_page(photo_page());
    let analysis = run(&source);

    let types: Vec<_> = analysis
        .page_classifications
        .iter()
        .map(|p| p.content_type)
        .collect();
    assert_eq!(
        types,
        vec![
            ContentType::Form,
            ContentType::Text,
            ContentType::Text,
            ContentType::Text,
            ContentType::Text,
            ContentType::Image,
        ]
    );
    let config = AnalysisConfig::default();
    assert_eq!(snap_range(&analysis.page_classifications, 3, 3, &config).unwrap(), (2, 5));
    assert_eq!(snap_range(&analysis.page_classifications, 1, 6, &config).unwrap(), (1, 6));
    assert!(matches!(
        snap_range(&analysis.page_classifications, 0, 2, &config),
        Err(Error::InvalidRange(_))
    ));
}

#[test]
fn test_sections_partition_pages() {
    let source = MemorySource::new()
        .with_page(prose_page())
        .with_page(headed(prose_page()))
        .with_page(photo_page())
        .with_page(photo_page())
        .with_failed_page("damaged content stream")
        .with_page(form_page())
        .with_page(prose_page());
    let analysis = run(&source);

    let mut covered: Vec<u32> = analysis
        .sections
        .iter()
        .flat_map(|s| s.pages.iter().copied())
        .collect();
    let firsts: Vec<u32> = analysis.sections.iter().map(|s| s.first_page()).collect();
    assert!(firsts.windows(2).all(|w| w[0] < w[1]));
    covered.sort_unstable();
    assert_eq!(covered, (1..=7).collect::<Vec<_>>());

    for section in &analysis.sections {
        assert!(section
            .pages
            .windows(2)
            .all(|w| w[1] == w[0] + 1));
    }
    assert_eq!(
        segment(&analysis.page_classifications, &AnalysisConfig::default()),
        analysis.sections
    );
}

#[test]
fn test_segment_follows_analysis_config() {
    let dense = || {
        PageBuilder::letter().lines("A line of ordinary running text for the report.", 22, 100.0)
    };
    let source = MemorySource::new()
        .with_page(prose_page())
        .with_page(dense())
        .with_page(prose_page());
    let config =
        AnalysisConfig::default().with_segment_config(SegmentConfig { max_block_delta: 10 });
    let analysis = analyze(&source, &config).unwrap();
    let pages = &analysis.page_classifications;

    assert_eq!(analysis.sections.len(), 1);
    assert_eq!(segment(pages, &config), analysis.sections);
    assert_eq!(snap_range(pages, 3, 3, &config).unwrap(), (1, 3));

    let default = AnalysisConfig::default();
    assert_eq!(segment(pages, &default).len(), 3);
}

#[test]
fn test_header_starts_section() {
    let source = MemorySource::new()
        .with_page(prose_page())
        .with_page(headed(prose_page()))
        .with_page(headed(prose_page()));
    let analysis = run(&source);

    assert!(!analysis.page_classifications[0].has_header);
    assert!(analysis.page_classifications[1].has_header);
    assert_eq!(analysis.sections.len(), 2);
    assert_eq!(analysis.sections[1].boundary_reason, BoundaryReason::HeaderIntroduced);
}

#[test]
fn test_degraded_page_is_reported() {
    let source = MemorySource::new()
        .with_page(prose_page())
        .with_failed_page("unsupported filter");
    let analysis = run(&source);

    assert_eq!(analysis.total_pages, 2);
    let page = analysis.page(2).unwrap();
    assert!(page.degraded);
    assert_eq!(page.content_type, ContentType::Mixed);
    assert_eq!(analysis.page_warnings.len(), 1);
    assert!(analysis.page_warnings[0].message.contains("unsupported filter"));
}

#[test]
fn test_long_image_document_recommendations() {
    let source = MemorySource::new().with_pages((0..60).map(|_| photo_page()));
    let analysis = run(&source);

    let expected = [Recommendation::TooLong, Recommendation::ImageHeavy, Recommendation::MissingNavigation];
    for rec in expected {
        assert!(
            analysis.recommendations.iter().any(|r| r == rec.message()),
            "missing {:?}",
            rec
        );
    }
}

#[test]
fn test_bookmarks_suppress_navigation_hint() {
    let source = MemorySource::new()
        .with_pages((0..60).map(|_| prose_page()))
        .with_toc(vec![TocEntry::new(1, "Chapter 1", Some(1))]);
    let analysis = run(&source);

    assert!(analysis.structure.has_bookmarks);
    assert!(!analysis
        .recommendations
        .iter()
        .any(|r| r == Recommendation::MissingNavigation.message()));
}

#[test]
fn test_cancelled_before_start() {
    let token = CancellationToken::new();
    token.cancel();
    let source = MemorySource::new().with_pages((0..3).map(|_| prose_page()));
    let result = Sift::new().with_cancellation(token).analyze(&source);
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[test]
fn test_analysis_serializes() {
    let source = MemorySource::new()
        .with_page(prose_page())
        .with_page(photo_page());
    let analysis = run(&source);

    let json = render::to_json(&analysis, JsonFormat::Compact).unwrap();
    let back: DocumentAnalysis = serde_json::from_str(&json).unwrap();
    assert_eq!(back, analysis);

    let report = render::to_text(&analysis);
    assert!(report.contains("Sections"));
    let markdown = render::to_markdown(&analysis);
    assert!(markdown.starts_with('#'));
}

#[test]
fn test_failed_page_does_not_cost_quality() {
    let leading = MemorySource::new()
        .with_failed_page("damaged content stream")
        .with_page(prose_page())
        .with_page(prose_page());
    let middle = MemorySource::new()
        .with_page(prose_page())
        .with_failed_page("damaged content stream")
        .with_page(prose_page());

    for source in [leading, middle] {
        let analysis = run(&source);
        assert_eq!(analysis.quality_score, 100.0);
        assert_eq!(analysis.page_warnings.len(), 1);
    }
}

#[test]
fn test_page_hints_and_ocr_confidence() {
    let price_list = PageBuilder::letter()
        .line("Item  Qty  Price", 200.0)
        .line("Bolt  4  0.10", 214.0)
        .line("Washer  12  0.02", 228.0);
    let source = MemorySource::new()
        .with_page(prose_page())
        .with_page(photo_page())
        .with_page(price_list)
        .with_failed_page("damaged content stream");
    let analysis = run(&source);

    let hints: Vec<PageHint> = analysis.page_classifications.iter().map(|p| p.hint).collect();
    assert_eq!(
        hints,
        vec![PageHint::Mixed, PageHint::ImageHeavy, PageHint::Mixed, PageHint::Unknown]
    );
    assert!(analysis.page(3).unwrap().tabular_text);
    assert!(!analysis.page(1).unwrap().tabular_text);

    // Only the photo page looks scanned
    assert_eq!(analysis.page(2).unwrap().scan_likelihood, 0.9);
    assert!((analysis.ocr_confidence - 0.3).abs() < 1e-9);
}
