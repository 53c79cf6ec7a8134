//! In-memory document source.

use crate::error::{Error, Result};
use crate::model::{BBox, PageLayout, TextSpan, TocEntry};

use super::{DocumentSource, ImageInfo, PageSnapshot};

/// A document held entirely in memory.
///
/// Useful for callers that already have extracted primitives from another
/// backend, and for exercising the analyzers without PDF files.
///
/// # Example
///
/// ```
/// use pdfsift::source::{MemorySource, PageBuilder};
///
/// let source = MemorySource::new()
///     .with_page(PageBuilder::letter().line("Quarterly report", 60.0))
///     .with_failed_page("corrupt content stream");
/// assert_eq!(pdfsift::source::DocumentSource::page_count(&source), 2);
/// ```
#[derive(Debug, Clone)]
struct FailedPage {
    reason: String,
    size: Option<(f32, f32)>,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<std::result::Result<PageSnapshot, FailedPage>>,
    toc: Vec<TocEntry>,
}

impl MemorySource {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn with_page(mut self, page: impl Into<PageSnapshot>) -> Self {
        self.pages.push(Ok(page.into()));
        self
    }

    /// Append several pages.
    pub fn with_pages<I, P>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PageSnapshot>,
    {
        self.pages.extend(pages.into_iter().map(|p| Ok(p.into())));
        self
    }

    /// Append a page whose extraction fails with the given reason.
    pub fn with_failed_page(mut self, reason: impl Into<String>) -> Self {
        self.pages.push(Err(FailedPage {
            reason: reason.into(),
            size: None,
        }));
        self
    }

    /// Append a failing page whose size is still known.
    pub fn with_failed_page_sized(mut self, reason: impl Into<String>, width: f32, height: f32) -> Self {
        self.pages.push(Err(FailedPage {
            reason: reason.into(),
            size: Some((width, height)),
        }));
        self
    }

    /// Set the outline.
    pub fn with_toc(mut self, toc: Vec<TocEntry>) -> Self {
        self.toc = toc;
        self
    }
}

impl DocumentSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, page_number: u32) -> Result<PageSnapshot> {
        let total = self.page_count();
        if page_number == 0 || page_number > total {
            return Err(Error::PageOutOfRange(page_number, total));
        }
        match &self.pages[(page_number - 1) as usize] {
            Ok(snapshot) => Ok(snapshot.clone()),
            Err(failed) => Err(Error::PageExtractionFailed {
                page: page_number,
                reason: failed.reason.clone(),
            }),
        }
    }

    fn page_layout(&self, page_number: u32) -> Option<PageLayout> {
        let index = page_number.checked_sub(1)? as usize;
        let (width, height, rotation) = match self.pages.get(index)? {
            Ok(snapshot) => (snapshot.width, snapshot.height, snapshot.rotation),
            Err(failed) => {
                let (width, height) = failed.size?;
                (width, height, 0)
            }
        };
        Some(PageLayout {
            page: page_number,
            width,
            height,
            rotation,
        })
    }

    fn table_of_contents(&self) -> Result<Vec<TocEntry>> {
        Ok(self.toc.clone())
    }
}

/// Builder for [`PageSnapshot`] values.
///
/// Text added through [`line`](Self::line) or [`span`](Self::span) is also
/// appended to the page text, so the snapshot stays self-consistent.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    snapshot: PageSnapshot,
}

impl PageBuilder {
    /// Start a page of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            snapshot: PageSnapshot {
                width,
                height,
                ..PageSnapshot::default()
            },
        }
    }

    /// Start a US Letter page (612 x 792 points).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Start an A4 page (595 x 842 points).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Add a span at `(x, y)` with a 12pt font. Does not add a block.
    pub fn span(mut self, text: &str, x: f32, y: f32) -> Self {
        let width = text.chars().count() as f32 * 6.0;
        self.snapshot
            .spans
            .push(TextSpan::new(text, BBox::new(x, y, x + width, y + 12.0), 12.0));
        if !self.snapshot.text.is_empty() && !self.snapshot.text.ends_with('\n') {
            self.snapshot.text.push(' ');
        }
        self.snapshot.text.push_str(text);
        self
    }

    /// Add a one-line text block at the left margin.
    pub fn line(self, text: &str, y: f32) -> Self {
        self.span(text, 72.0, y).end_line().block_at(72.0, y)
    }

    /// Add `count` one-line blocks of `text`, spaced 14pt apart from `start_y`.
    pub fn lines(mut self, text: &str, count: usize, start_y: f32) -> Self {
        for i in 0..count {
            self = self.line(text, start_y + i as f32 * 14.0);
        }
        self
    }

    /// Terminate the current text line.
    pub fn end_line(mut self) -> Self {
        if !self.snapshot.text.is_empty() {
            self.snapshot.text.push('\n');
        }
        self
    }

    /// Record a text block whose top-left corner is `(x, y)`.
    pub fn block_at(mut self, x: f32, y: f32) -> Self {
        self.snapshot
            .text_blocks
            .push(BBox::new(x, y, x + 200.0, y + 12.0));
        self
    }

    /// Add `count` empty text blocks without text.
    pub fn blocks(mut self, count: usize) -> Self {
        for i in 0..count {
            self = self.block_at(72.0, 200.0 + i as f32 * 14.0);
        }
        self
    }

    /// Replace the page text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.snapshot.text = text.into();
        self
    }

    /// Add an image of the given encoded size.
    pub fn image(mut self, estimated_byte_size: u64) -> Self {
        self.snapshot.images.push(ImageInfo {
            estimated_byte_size,
        });
        self
    }

    /// Add `count` images of the given encoded size.
    pub fn images(mut self, count: usize, estimated_byte_size: u64) -> Self {
        for _ in 0..count {
            self = self.image(estimated_byte_size);
        }
        self
    }

    /// Set page rotation.
    pub fn rotation(mut self, degrees: i32) -> Self {
        self.snapshot.rotation = degrees;
        self
    }

    /// Set the number of form widgets.
    pub fn form_fields(mut self, count: usize) -> Self {
        self.snapshot.form_field_count = count;
        self
    }

    /// Finish the page.
    pub fn build(self) -> PageSnapshot {
        self.snapshot
    }
}

impl From<PageBuilder> for PageSnapshot {
    fn from(builder: PageBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_pages() {
        let source = MemorySource::new()
            .with_page(PageBuilder::letter().line("Hello", 120.0))
            .with_failed_page("broken");

        assert_eq!(source.page_count(), 2);
        let first = source.page(1).unwrap();
        assert_eq!(first.text, "Hello\n");
        assert_eq!(first.text_blocks.len(), 1);
        assert_eq!(first.spans.len(), 1);

        assert!(matches!(
            source.page(2),
            Err(Error::PageExtractionFailed { page: 2, .. })
        ));
        assert!(matches!(source.page(0), Err(Error::PageOutOfRange(0, 2))));
        assert!(matches!(source.page(3), Err(Error::PageOutOfRange(3, 2))));
    }

    #[test]
    fn test_failed_page_layout() {
        let source = MemorySource::new()
            .with_failed_page("broken")
            .with_failed_page_sized("broken", 595.0, 842.0)
            .with_page(PageBuilder::letter().rotation(90));

        assert_eq!(source.page_layout(1), None);
        let sized = source.page_layout(2).unwrap();
        assert_eq!((sized.page, sized.width, sized.height), (2, 595.0, 842.0));
        assert_eq!(source.page_layout(3).unwrap().rotation, 90);
        assert_eq!(source.page_layout(0), None);
        assert_eq!(source.page_layout(4), None);
    }

    #[test]
    fn test_page_builder_spans_share_a_line() {
        let page = PageBuilder::letter()
            .span("Name", 72.0, 200.0)
            .span("Age", 200.0, 200.0)
            .end_line()
            .build();
        assert_eq!(page.text, "Name Age\n");
        assert_eq!(page.spans.len(), 2);
        assert!(page.text_blocks.is_empty());
    }

    #[test]
    fn test_page_builder_images_and_toc() {
        let source = MemorySource::new()
            .with_page(PageBuilder::a4().images(3, 2048).rotation(90))
            .with_toc(vec![TocEntry::new(1, "Intro", Some(1))]);
        let page = source.page(1).unwrap();
        assert_eq!(page.images.len(), 3);
        assert_eq!(page.rotation, 90);
        assert_eq!(page.width, 595.0);
        assert_eq!(source.table_of_contents().unwrap().len(), 1);
    }
}
