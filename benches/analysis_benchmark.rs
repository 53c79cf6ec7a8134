//! Benchmarks for pdfsift analysis.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdfsift::analysis::{AlignmentBuckets, ColumnGrouping, KMeans1d};
use pdfsift::{analyze, detect_tables, AnalysisConfig, BBox, MemorySource, PageBuilder, TextSpan};

/// A grid of `rows` x `cols` spans laid out like a table.
fn table_spans(rows: usize, cols: usize) -> Vec<TextSpan> {
    (0..rows)
        .flat_map(|r| {
            (0..cols).map(move |c| {
                let x = 72.0 + c as f32 * 90.0;
                let y = 100.0 + r as f32 * 16.0;
                TextSpan::new("cell", BBox::new(x, y, x + 24.0, y + 10.0), 10.0)
            })
        })
        .collect()
}

/// A document alternating prose, scanned and tabular pages.
fn mixed_document(page_count: usize) -> MemorySource {
    MemorySource::new().with_pages((0..page_count).map(|i| match i % 3 {
        0 => PageBuilder::letter().lines("Running text on a plain page of prose.", 20, 100.0),
        1 => PageBuilder::letter().images(3, 250_000),
        _ => {
            let mut page = PageBuilder::letter();
            for row in 0..6 {
                let y = 150.0 + row as f32 * 20.0;
                page = page
                    .span("label", 72.0, y)
                    .span("42", 300.0, y)
                    .span("ok", 450.0, y)
                    .end_line()
                    .block_at(72.0, y);
            }
            page
        }
    }))
}

/// Benchmark table detection at various grid sizes.
fn bench_table_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_detection");
    let config = AnalysisConfig::default();

    for (rows, cols) in [(5, 3), (40, 6), (200, 8)] {
        let spans = table_spans(rows, cols);
        group.bench_function(format!("{}x{}", rows, cols), |b| {
            b.iter(|| detect_tables(black_box(&spans), &config).unwrap());
        });
    }

    group.finish();
}

/// Compare the two column grouping strategies.
fn bench_column_grouping(c: &mut Criterion) {
    let positions: Vec<f32> = (0..500).map(|i| 72.0 + (i % 7) as f32 * 80.0 + (i % 3) as f32).collect();
    let strategies: [(&str, Box<dyn ColumnGrouping>); 2] = [
        ("kmeans", Box::new(KMeans1d::default())),
        ("buckets", Box::new(AlignmentBuckets::default())),
    ];

    let mut group = c.benchmark_group("column_grouping");
    for (name, strategy) in &strategies {
        group.bench_function(*name, |b| {
            b.iter(|| strategy.group(black_box(&positions), 10));
        });
    }
    group.finish();
}

/// Benchmark whole-document analysis, parallel and sequential.
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for page_count in [10, 100] {
        let source = mixed_document(page_count);
        let parallel = AnalysisConfig::default();
        let sequential = AnalysisConfig::default().sequential();

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            b.iter(|| analyze(black_box(&source), &parallel).unwrap());
        });
        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            b.iter(|| analyze(black_box(&source), &sequential).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_table_detection, bench_column_grouping, bench_analyze);
criterion_main!(benches);
