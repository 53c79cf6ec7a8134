//! [`DocumentSource`] backed by `lopdf`.
//!
//! Interprets page content streams for positioned text, groups the spans
//! into lines and blocks, and inspects page resources for images and form
//! widgets. Positions are converted to a top-left origin.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use ::lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};
use crate::model::{BBox, PageLayout, TextSpan, TocEntry};

use super::{DocumentSource, ImageInfo, PageSnapshot};

/// Default leading when a content stream never sets `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// Ascender share of the font size, used to place the top of a span.
const ASCENT_RATIO: f32 = 0.8;

/// Average glyph advance as a share of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// Outline nesting beyond this is treated as a cycle.
const MAX_OUTLINE_DEPTH: u32 = 64;

/// A PDF opened read-only through `lopdf`.
///
/// The underlying document is never mutated, so one source can serve
/// parallel page requests.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_path(path)?;
        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        Self::from_document(doc)
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Self::from_document(doc)
    }

    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        let pages = doc.get_pages();
        log::debug!("LopdfSource: opened document with {} pages", pages.len());
        Ok(Self { doc, pages })
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        self.pages
            .get(&page_number)
            .copied()
            .ok_or(Error::PageOutOfRange(page_number, self.pages.len() as u32))
    }

    fn snapshot(&self, page_number: u32, page_id: ObjectId) -> Result<PageSnapshot> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let media_box = self.media_box(page_dict);
        let width = media_box.x1 - media_box.x0;
        let height = media_box.y1 - media_box.y0;
        let rotation = self.rotation(page_dict);

        let spans = self
            .page_spans(page_id, page_dict, &media_box)
            .map_err(|e| Error::PageExtractionFailed {
                page: page_number,
                reason: e.to_string(),
            })?;

        let blocks = group_into_blocks(spans.clone());
        let text = blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(PageSnapshot {
            text,
            text_blocks: blocks.iter().map(|b| b.bbox).collect(),
            spans,
            images: self.page_images(page_dict),
            width,
            height,
            rotation,
            form_field_count: self.widget_count(page_dict),
        })
    }

    /// Look up a page attribute, following `/Parent` for inheritable keys.
    fn inherited<'a>(&'a self, page_dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut dict = page_dict;
        for _ in 0..MAX_OUTLINE_DEPTH {
            if let Ok(value) = dict.get(key) {
                return self.resolve(value);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(r) => self.doc.get_object(*r).ok(),
            other => Some(other),
        }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(obj)? {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    fn rotation(&self, page_dict: &Dictionary) -> i32 {
        self.inherited(page_dict, b"Rotate")
            .and_then(get_number)
            .map(|r| r as i32)
            .unwrap_or(0)
    }

    fn media_box(&self, page_dict: &Dictionary) -> BBox {
        let letter = BBox::new(0.0, 0.0, 612.0, 792.0);
        let Some(Object::Array(array)) = self.inherited(page_dict, b"MediaBox") else {
            return letter;
        };
        let coords: Vec<f32> = array
            .iter()
            .filter_map(|o| self.resolve(o).and_then(get_number))
            .collect();
        if coords.len() < 4 {
            return letter;
        }
        BBox::new(
            coords[0].min(coords[2]),
            coords[1].min(coords[3]),
            coords[0].max(coords[2]),
            coords[1].max(coords[3]),
        )
    }

    /// Get page content stream.
    fn page_content(&self, page_dict: &Dictionary) -> Result<Vec<u8>> {
        let Ok(contents) = page_dict.get(b"Contents") else {
            // A page without content is blank, not broken
            return Ok(Vec::new());
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => Ok(s.decompressed_content()?),
                Object::Array(arr) => self.concat_streams(arr),
                _ => Err(Error::DocumentUnreadable(
                    "invalid content stream".to_string(),
                )),
            },
            Object::Array(arr) => self.concat_streams(arr),
            _ => Err(Error::DocumentUnreadable(
                "invalid content stream".to_string(),
            )),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    content.extend_from_slice(&s.decompressed_content()?);
                    content.push(b' ');
                }
            }
        }
        Ok(content)
    }

    fn page_spans(
        &self,
        page_id: ObjectId,
        page_dict: &Dictionary,
        media_box: &BBox,
    ) -> Result<Vec<TextSpan>> {
        let content = self.page_content(page_dict)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let fonts = self.doc.get_page_fonts(page_id)?;
        let operations = ::lopdf::content::Content::decode(&content)?.operations;

        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text_object = false;

        for op in operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_object = true;
                    matrix.reset();
                }
                "ET" => in_text_object = false,
                "Tf" => {
                    if let [Object::Name(name), size, ..] = op.operands.as_slice() {
                        font_name = name.clone();
                        font_size = get_number(size).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number) {
                        matrix.leading = leading;
                    }
                }
                "Td" => {
                    if let [tx, ty, ..] = op.operands.as_slice() {
                        matrix.translate(get_number(tx).unwrap_or(0.0), get_number(ty).unwrap_or(0.0));
                    }
                }
                "TD" => {
                    if let [tx, ty, ..] = op.operands.as_slice() {
                        let ty = get_number(ty).unwrap_or(0.0);
                        matrix.leading = -ty;
                        matrix.translate(get_number(tx).unwrap_or(0.0), ty);
                    }
                }
                "Tm" => {
                    let n: Vec<f32> = op.operands.iter().filter_map(get_number).collect();
                    if n.len() >= 6 {
                        matrix.set(n[0], n[1], n[2], n[3], n[4], n[5]);
                    }
                }
                "T*" => matrix.next_line(),
                "Tj" | "TJ" | "'" | "\"" => {
                    if op.operator == "'" || op.operator == "\"" {
                        matrix.next_line();
                    }
                    if !in_text_object {
                        continue;
                    }
                    let encoding = fonts
                        .get(&font_name)
                        .and_then(|f| f.get_font_encoding(&self.doc).ok());
                    let decode = |bytes: &[u8]| match encoding {
                        Some(ref enc) => LopdfDocument::decode_text(enc, bytes).unwrap_or_default(),
                        None => decode_text_simple(bytes),
                    };

                    let text = match (op.operator.as_str(), op.operands.as_slice()) {
                        ("TJ", [Object::Array(items), ..]) => decode_tj_array(items, decode),
                        ("\"", [_, _, Object::String(bytes, _), ..]) => decode(bytes),
                        (_, [Object::String(bytes, _), ..]) => decode(bytes),
                        _ => String::new(),
                    };

                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    let size = (font_size * matrix.scale()).abs().max(1.0);
                    let (x, baseline) = matrix.position();
                    let x0 = x - media_box.x0;
                    let y0 = media_box.y1 - baseline - size * ASCENT_RATIO;
                    let width = text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO;
                    spans.push(TextSpan::new(
                        text,
                        BBox::new(x0, y0, x0 + width, y0 + size),
                        size,
                    ));
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    /// Image XObjects on the page, sized by their encoded stream length.
    fn page_images(&self, page_dict: &Dictionary) -> Vec<ImageInfo> {
        let Some(resources) = self
            .inherited(page_dict, b"Resources")
            .and_then(|r| self.resolve_dict(r))
        else {
            return Vec::new();
        };
        let Some(xobjects) = resources
            .get(b"XObject")
            .ok()
            .and_then(|x| self.resolve_dict(x))
        else {
            return Vec::new();
        };

        xobjects
            .iter()
            .filter_map(|(_, obj)| match self.resolve(obj)? {
                Object::Stream(stream) => Some(stream),
                _ => None,
            })
            .filter(|stream| {
                matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(n)) if n.as_slice() == b"Image")
            })
            .map(|stream| ImageInfo {
                estimated_byte_size: stream.content.len() as u64,
            })
            .collect()
    }

    fn widget_count(&self, page_dict: &Dictionary) -> usize {
        let Some(Object::Array(annots)) = page_dict.get(b"Annots").ok().and_then(|a| self.resolve(a))
        else {
            return 0;
        };
        annots
            .iter()
            .filter_map(|a| self.resolve_dict(a))
            .filter(|d| matches!(d.get(b"Subtype"), Ok(Object::Name(n)) if n.as_slice() == b"Widget"))
            .count()
    }

    /// Walk outline items depth-first, flattening them in reading order.
    fn collect_outline(
        &self,
        first: ObjectId,
        level: u32,
        visited: &mut HashSet<ObjectId>,
        out: &mut Vec<TocEntry>,
    ) {
        if level > MAX_OUTLINE_DEPTH {
            return;
        }
        let mut current = Some(first);
        while let Some(item_ref) = current {
            if !visited.insert(item_ref) {
                log::warn!("LopdfSource: outline cycle at {:?}", item_ref);
                return;
            }
            let Ok(item) = self.doc.get_dictionary(item_ref) else {
                return;
            };

            let title = item
                .get(b"Title")
                .ok()
                .and_then(|t| self.resolve(t))
                .and_then(pdf_string)
                .unwrap_or_default();
            out.push(TocEntry::new(level, title, self.outline_target(item)));

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.collect_outline(child, level + 1, visited, out);
            }
            current = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// Get destination page from outline item.
    fn outline_target(&self, item: &Dictionary) -> Option<u32> {
        if let Ok(dest) = item.get(b"Dest") {
            return self.destination_page(dest);
        }
        let action = item.get(b"A").ok().and_then(|a| self.resolve_dict(a))?;
        self.destination_page(action.get(b"D").ok()?)
    }

    fn destination_page(&self, dest: &Object) -> Option<u32> {
        let Object::Array(dest_array) = self.resolve(dest)? else {
            // Named destinations are not resolved
            return None;
        };
        let page_ref = dest_array.first()?.as_reference().ok()?;
        self.pages
            .iter()
            .find(|(_, id)| **id == page_ref)
            .map(|(num, _)| *num)
    }
}

impl DocumentSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, page_number: u32) -> Result<PageSnapshot> {
        let page_id = self.page_id(page_number)?;
        self.snapshot(page_number, page_id).map_err(|e| match e {
            Error::PageExtractionFailed { .. } | Error::PageOutOfRange(..) => e,
            other => Error::PageExtractionFailed {
                page: page_number,
                reason: other.to_string(),
            },
        })
    }

    fn page_layout(&self, page_number: u32) -> Option<PageLayout> {
        let page_id = self.page_id(page_number).ok()?;
        let page_dict = self.doc.get_dictionary(page_id).ok()?;
        let media_box = self.media_box(page_dict);
        Some(PageLayout {
            page: page_number,
            width: media_box.width(),
            height: media_box.height(),
            rotation: self.rotation(page_dict),
        })
    }

    fn table_of_contents(&self) -> Result<Vec<TocEntry>> {
        let mut entries = Vec::new();
        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|o| self.resolve_dict(o))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|f| f.as_reference().ok());

        if let Some(first) = first {
            self.collect_outline(first, 1, &mut HashSet::new(), &mut entries);
        }
        Ok(entries)
    }
}

/// Text positioning state inside a `BT`/`ET` object.
#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line, which `Td` and `T*` move from
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    fn reset(&mut self) {
        *self = Self {
            leading: self.leading,
            ..Self::default()
        };
    }

    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Decode a `TJ` array, turning wide negative kerning into word spaces.
fn decode_tj_array<F: Fn(&[u8]) -> String>(items: &[Object], decode: F) -> String {
    // In thousandths of text space; ~0.2em reads as a word gap
    const SPACE_THRESHOLD: f32 = 200.0;

    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            other => {
                let Some(adjustment) = get_number(other) else {
                    continue;
                };
                if -adjustment > SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(char::is_whitespace)
                    && !combined.chars().last().is_some_and(is_spaceless_script_char)
                {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

/// A visual line of spans sharing a baseline.
#[derive(Debug, Clone)]
struct Line {
    spans: Vec<TextSpan>,
    bbox: BBox,
    font_size: f32,
}

impl Line {
    fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A paragraph-like group of consecutive lines.
#[derive(Debug, Clone)]
struct Block {
    lines: Vec<Line>,
    bbox: BBox,
}

impl Block {
    fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Group spans into lines by vertical position, then lines into blocks by
/// the gap between them.
fn group_into_blocks(mut spans: Vec<TextSpan>) -> Vec<Block> {
    spans.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Line> = Vec::new();
    for span in spans {
        let tolerance = span.font_size * 0.4;
        match lines.last_mut() {
            Some(line) if (span.bbox.y0 - line.bbox.y0).abs() <= tolerance => {
                line.bbox = line.bbox.union(&span.bbox);
                line.font_size = line.font_size.max(span.font_size);
                line.spans.push(span);
            }
            _ => lines.push(Line {
                bbox: span.bbox,
                font_size: span.font_size,
                spans: vec![span],
            }),
        }
    }
    for line in &mut lines {
        line.spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }

    let mut blocks: Vec<Block> = Vec::new();
    for line in lines {
        match blocks.last_mut() {
            Some(block) if !should_break_block(block, &line) => {
                block.bbox = block.bbox.union(&line.bbox);
                block.lines.push(line);
            }
            _ => blocks.push(Block {
                bbox: line.bbox,
                lines: vec![line],
            }),
        }
    }
    blocks
}

fn should_break_block(block: &Block, line: &Line) -> bool {
    let Some(previous) = block.lines.last() else {
        return true;
    };
    let gap = line.bbox.y0 - previous.bbox.y1;
    let size_change = (line.font_size - previous.font_size).abs() > previous.font_size * 0.2;
    gap > previous.font_size * 1.5 || size_change
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, UTF-8 or Latin-1).
fn pdf_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}

/// Chinese and Japanese text does not separate words with spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF      // CJK Unified Ideographs
        | 0x3400..=0x4DBF    // Extension A
        | 0x20000..=0x2EBEF  // Extensions B-F
        | 0x3040..=0x30FF    // Hiragana, Katakana
        | 0x3000..=0x303F)   // CJK punctuation
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}
