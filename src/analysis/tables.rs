//! Table detection using text position analysis.
//!
//! Spans are grouped into rows by vertical position, and their left edges are
//! grouped into columns by a pluggable 1-D [`ColumnGrouping`] strategy. A page
//! with enough rows and at least two column groups yields a table candidate.

use std::collections::HashMap;

use crate::config::TableConfig;
use crate::error::{Error, Result};
use crate::model::{TableCandidate, TextSpan};

/// A 1-D grouping strategy for horizontal span positions.
///
/// Implementations must be deterministic, and positions that are clearly
/// separated must never collapse into a single group.
pub trait ColumnGrouping: Send + Sync {
    /// Group `positions` into at most `max_groups` column centers, ascending.
    fn group(&self, positions: &[f32], max_groups: usize) -> Vec<f32>;
}

/// One-dimensional k-means with quantile seeding.
///
/// Seeds are spread evenly over the sorted distinct positions, so results do
/// not depend on input order or a random state. Clusters that end up empty
/// are dropped.
#[derive(Debug, Clone, Copy)]
pub struct KMeans1d {
    /// Upper bound on Lloyd iterations
    pub max_iterations: usize,
}

impl Default for KMeans1d {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

impl ColumnGrouping for KMeans1d {
    fn group(&self, positions: &[f32], max_groups: usize) -> Vec<f32> {
        let distinct = distinct_sorted(positions);
        let k = max_groups.min(distinct.len());
        if k == 0 {
            return vec![];
        }

        let mut centers: Vec<f32> = if k == 1 {
            vec![distinct[(distinct.len() - 1) / 2]]
        } else {
            (0..k)
                .map(|i| distinct[i * (distinct.len() - 1) / (k - 1)])
                .collect()
        };

        let mut assignment = vec![usize::MAX; positions.len()];
        for _ in 0..self.max_iterations {
            let mut changed = false;
            for (slot, &x) in assignment.iter_mut().zip(positions) {
                let nearest = nearest_center(&centers, x);
                if *slot != nearest {
                    *slot = nearest;
                    changed = true;
                }
            }
            if !changed {
                break;
            }

            let mut sums = vec![(0.0f64, 0usize); centers.len()];
            for (&cluster, &x) in assignment.iter().zip(positions) {
                sums[cluster].0 += x as f64;
                sums[cluster].1 += 1;
            }
            for (center, (sum, count)) in centers.iter_mut().zip(sums) {
                if count > 0 {
                    *center = (sum / count as f64) as f32;
                }
            }
        }

        let mut used: Vec<f32> = centers
            .iter()
            .enumerate()
            .filter(|(i, _)| assignment.contains(i))
            .map(|(_, c)| *c)
            .collect();
        used.sort_by(f32::total_cmp);
        used
    }
}

/// Left-edge alignment buckets.
///
/// Positions are snapped to buckets of `bucket_size` points; buckets closer
/// than `min_gap` are merged, then the closest neighbours are merged until at
/// most `max_groups` remain.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentBuckets {
    /// Width of one alignment bucket in points
    pub bucket_size: f32,
    /// Minimum distance between two column edges
    pub min_gap: f32,
}

impl Default for AlignmentBuckets {
    fn default() -> Self {
        Self {
            bucket_size: 5.0,
            min_gap: 15.0,
        }
    }
}

impl ColumnGrouping for AlignmentBuckets {
    fn group(&self, positions: &[f32], max_groups: usize) -> Vec<f32> {
        if max_groups == 0 || self.bucket_size <= 0.0 {
            return vec![];
        }

        let mut buckets: HashMap<i64, (f64, usize)> = HashMap::new();
        for &x in positions {
            let entry = buckets
                .entry((x / self.bucket_size).round() as i64)
                .or_insert((0.0, 0));
            entry.0 += x as f64;
            entry.1 += 1;
        }

        let mut keys: Vec<i64> = buckets.keys().copied().collect();
        keys.sort_unstable();

        // (weighted sum, count) per merged group, ascending by position
        let mut groups: Vec<(f64, usize)> = Vec::new();
        for key in keys {
            let (sum, count) = buckets[&key];
            match groups.last_mut() {
                Some(last) if (sum / count as f64) - (last.0 / last.1 as f64) < self.min_gap as f64 => {
                    last.0 += sum;
                    last.1 += count;
                }
                _ => groups.push((sum, count)),
            }
        }

        while groups.len() > max_groups {
            let closest = groups
                .windows(2)
                .enumerate()
                .map(|(i, w)| (i, w[1].0 / w[1].1 as f64 - w[0].0 / w[0].1 as f64))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let merged = groups.remove(closest + 1);
            groups[closest].0 += merged.0;
            groups[closest].1 += merged.1;
        }

        groups
            .into_iter()
            .map(|(sum, count)| (sum / count as f64) as f32)
            .collect()
    }
}

/// A row of text spans sharing a vertical position.
#[derive(Debug, Clone)]
pub struct SpanRow<'a> {
    /// Vertical position of the span that opened the row
    pub anchor_y: f32,
    /// Spans in this row, sorted by x
    pub spans: Vec<&'a TextSpan>,
}

/// Detects table candidates in a page's text spans.
pub struct TableDetector {
    config: TableConfig,
    grouping: Box<dyn ColumnGrouping>,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            config,
            grouping: Box::new(KMeans1d::default()),
        }
    }

    /// Replace the column grouping strategy.
    pub fn with_grouping<G: ColumnGrouping + 'static>(mut self, grouping: G) -> Self {
        self.grouping = Box::new(grouping);
        self
    }

    /// Detect tables in the given spans.
    ///
    /// Returns an empty list when the spans show no tabular structure, and
    /// an error when they cannot be analyzed at all.
    pub fn detect(&self, spans: &[TextSpan]) -> Result<Vec<TableCandidate>> {
        log::debug!("TableDetector: starting with {} spans", spans.len());

        if spans.len() < self.config.min_spans {
            log::debug!(
                "TableDetector: not enough spans ({} < {})",
                spans.len(),
                self.config.min_spans
            );
            return Ok(vec![]);
        }

        if let Some(bad) = spans.iter().find(|s| !s.bbox.is_finite()) {
            return Err(Error::TableDetection(format!(
                "non-finite coordinates for span {:?}",
                bad.text
            )));
        }

        let rows = self.group_into_rows(spans);
        log::debug!("TableDetector: grouped into {} rows", rows.len());

        if rows.len() < self.config.min_rows {
            log::debug!(
                "TableDetector: not enough rows ({} < {})",
                rows.len(),
                self.config.min_rows
            );
            return Ok(vec![]);
        }

        let columns = self.detect_columns(spans);
        log::debug!(
            "TableDetector: detected {} columns at positions: {:?}",
            columns.len(),
            columns
        );

        if columns.len() < self.config.min_columns {
            log::debug!(
                "TableDetector: not enough columns ({} < {})",
                columns.len(),
                self.config.min_columns
            );
            return Ok(vec![]);
        }

        Ok(vec![TableCandidate {
            row_count: rows.len(),
            column_count: columns.len(),
            confidence: self.config.confidence,
        }])
    }

    /// Group spans into rows by vertical position.
    ///
    /// A span joins the current row when it lies within the row tolerance of
    /// the row's anchor; otherwise it opens a new row.
    pub fn group_into_rows<'a>(&self, spans: &'a [TextSpan]) -> Vec<SpanRow<'a>> {
        let mut sorted: Vec<&TextSpan> = spans.iter().collect();
        sorted.sort_by(|a, b| a.y().total_cmp(&b.y()));

        let mut rows: Vec<SpanRow<'a>> = Vec::new();
        for span in sorted {
            match rows.last_mut() {
                Some(row) if (span.y() - row.anchor_y).abs() <= self.config.row_tolerance => {
                    row.spans.push(span);
                }
                _ => rows.push(SpanRow {
                    anchor_y: span.y(),
                    spans: vec![span],
                }),
            }
        }

        for row in &mut rows {
            row.spans.sort_by(|a, b| a.x().total_cmp(&b.x()));
        }
        rows
    }

    /// Column centers over all span left edges.
    fn detect_columns(&self, spans: &[TextSpan]) -> Vec<f32> {
        let positions: Vec<f32> = spans.iter().map(TextSpan::x).collect();
        let k = self
            .config
            .max_column_clusters
            .min(distinct_sorted(&positions).len());
        if k < self.config.min_columns {
            return vec![];
        }
        self.grouping.group(&positions, k)
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of text columns on a page, at most `max_columns`.
///
/// A page without spans has one column.
pub fn text_column_count(spans: &[TextSpan], max_columns: usize, grouping: &dyn ColumnGrouping) -> usize {
    if spans.is_empty() {
        return 1;
    }
    let positions: Vec<f32> = spans
        .iter()
        .map(TextSpan::x)
        .filter(|x| x.is_finite())
        .collect();
    grouping.group(&positions, max_columns).len().max(1)
}

/// Plain-text table hint, for pages whose spans carry no useful positions.
///
/// At least [`TABULAR_LINE_SHARE`] of the lines (blank lines included) must
/// hold three or more words separated by a double space or a tab. Text with
/// fewer than three lines never qualifies.
pub fn has_tabular_text(text: &str) -> bool {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < 3 {
        return false;
    }
    let aligned = lines
        .iter()
        .filter(|line| {
            line.split_whitespace().count() >= 3 && (line.contains("  ") || line.contains('\t'))
        })
        .count();
    aligned as f64 >= lines.len() as f64 * TABULAR_LINE_SHARE
}

/// Share of aligned lines that makes text look tabular.
pub const TABULAR_LINE_SHARE: f64 = 0.3;

fn distinct_sorted(values: &[f32]) -> Vec<f32> {
    let mut distinct: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    distinct.sort_by(f32::total_cmp);
    distinct.dedup();
    distinct
}

fn nearest_center(centers: &[f32], x: f32) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (i, &c) in centers.iter().enumerate() {
        let distance = (x - c).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text, BBox::new(x, y, x + 50.0, y + 10.0), 10.0)
    }

    fn grid(rows: usize, columns: &[f32]) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        for r in 0..rows {
            for (c, &x) in columns.iter().enumerate() {
                spans.push(make_span(&format!("r{}c{}", r, c), x, 100.0 + r as f32 * 20.0));
            }
        }
        spans
    }

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("B", 200.0, 102.0),
            make_span("A", 100.0, 100.0),
            make_span("C", 100.0, 120.0),
            make_span("D", 200.0, 124.0),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spans[0].text, "A");
        assert_eq!(rows[0].spans[1].text, "B");
        assert_eq!(rows[1].spans.len(), 2);
    }

    #[test]
    fn test_row_tolerance_uses_anchor() {
        let detector = TableDetector::new();
        // Each span is within 5 of its predecessor but drifts away from the anchor
        let spans = vec![
            make_span("a", 10.0, 100.0),
            make_span("b", 20.0, 104.0),
            make_span("c", 30.0, 108.0),
        ];
        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].spans[0].text, "c");
    }

    #[test]
    fn test_detect_simple_table() {
        let spans = grid(4, &[72.0, 200.0, 350.0]);
        let tables = TableDetector::new().detect(&spans).unwrap();
        assert_eq!(
            tables,
            vec![TableCandidate {
                row_count: 4,
                column_count: 3,
                confidence: 0.8
            }]
        );
    }

    #[test]
    fn test_fewer_than_four_spans() {
        let spans = grid(3, &[72.0]);
        assert!(TableDetector::new().detect(&spans).unwrap().is_empty());
    }

    #[test]
    fn test_no_table_single_column() {
        let spans = grid(6, &[72.0]);
        assert!(TableDetector::new().detect(&spans).unwrap().is_empty());
    }

    #[test]
    fn test_no_table_two_rows() {
        let spans = grid(2, &[72.0, 200.0, 300.0]);
        assert!(TableDetector::new().detect(&spans).unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_is_an_error() {
        let mut spans = grid(3, &[72.0, 200.0]);
        spans[2].bbox.x0 = f32::NAN;
        assert!(matches!(
            TableDetector::new().detect(&spans),
            Err(Error::TableDetection(_))
        ));
    }

    #[test]
    fn test_kmeans_separated_positions() {
        let positions = [72.0, 72.0, 72.5, 300.0, 301.0, 300.0, 500.0];
        let centers = KMeans1d::default().group(&positions, 3);
        assert_eq!(centers.len(), 3);
        assert!(centers[0] < 80.0 && centers[1] > 290.0 && centers[2] > 490.0);
    }

    #[test]
    fn test_kmeans_caps_groups() {
        let positions: Vec<f32> = (0..30).map(|i| i as f32 * 20.0).collect();
        let centers = KMeans1d::default().group(&positions, 10);
        assert!(centers.len() <= 10 && centers.len() >= 2);
        assert!(centers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_kmeans_is_order_independent() {
        let a = [10.0, 200.0, 15.0, 400.0, 210.0];
        let b = [400.0, 210.0, 15.0, 10.0, 200.0];
        let km = KMeans1d::default();
        assert_eq!(km.group(&a, 3), km.group(&b, 3));
    }

    #[test]
    fn test_alignment_buckets() {
        let positions = [72.0, 73.0, 71.0, 200.0, 201.0, 400.0];
        let buckets = AlignmentBuckets::default();
        assert_eq!(buckets.group(&positions, 10).len(), 3);
        assert_eq!(buckets.group(&positions, 2).len(), 2);
    }

    #[test]
    fn test_detector_with_alignment_buckets() {
        let spans = grid(3, &[72.0, 250.0]);
        let detector = TableDetector::new().with_grouping(AlignmentBuckets::default());
        let tables = detector.detect(&spans).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].column_count, 2);
    }

    #[test]
    fn test_text_column_count() {
        let km = KMeans1d::default();
        assert_eq!(text_column_count(&[], 3, &km), 1);
        let single = grid(5, &[72.0]);
        assert_eq!(text_column_count(&single, 3, &km), 1);
        let two = grid(5, &[72.0, 320.0]);
        assert_eq!(text_column_count(&two, 3, &km), 2);
        let many = grid(2, &[50.0, 150.0, 250.0, 350.0, 450.0]);
        assert_eq!(text_column_count(&many, 3, &km), 3);
    }

    #[test]
    fn test_tabular_text() {
        let table = "Item  Qty  Price\nApples  4  1.20\nPears\t9\t0.80\n";
        assert!(has_tabular_text(table));

        let prose = "This is a sentence.\nAnother sentence  follows here.\nAnd one more.\nThe end.";
        // One aligned line out of four is below the share
        assert!(!has_tabular_text(prose));

        assert!(!has_tabular_text("a  b  c\nd  e  f"));
        // Two words do not make a row
        assert!(!has_tabular_text("a  b\nc  d\ne  f"));
    }
}
