//! JSON rendering of segmented documents and extracted content.

use serde::Serialize;

use crate::content::DocumentContent;
use crate::error::{Error, Result};
use crate::model::{Bounds, Document, LineId, Page, WordId, ZoneId, ZoneLabel};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct DocumentView<'a> {
    pages: Vec<PageView<'a>>,
}

#[derive(Serialize)]
struct PageView<'a> {
    number: u32,
    zones: Vec<ZoneView<'a>>,
}

#[derive(Serialize)]
struct ZoneView<'a> {
    label: Option<ZoneLabel>,
    bounds: Option<&'a Bounds>,
    lines: Vec<LineView<'a>>,
}

#[derive(Serialize)]
struct LineView<'a> {
    bounds: Option<&'a Bounds>,
    words: Vec<WordView<'a>>,
}

#[derive(Serialize)]
struct WordView<'a> {
    text: String,
    bounds: Option<&'a Bounds>,
}

impl<'a> PageView<'a> {
    fn new(page: &'a Page) -> Self {
        Self {
            number: page.number,
            zones: page.zone_ids().iter().map(|&z| zone_view(page, z)).collect(),
        }
    }
}

fn zone_view(page: &Page, id: ZoneId) -> ZoneView<'_> {
    let zone = page.zone(id);
    ZoneView {
        label: zone.label(),
        bounds: zone.bounds(),
        lines: zone.lines().iter().map(|&l| line_view(page, l)).collect(),
    }
}

fn line_view(page: &Page, id: LineId) -> LineView<'_> {
    let line = page.line(id);
    LineView {
        bounds: line.bounds(),
        words: line.words().iter().map(|&w| word_view(page, w)).collect(),
    }
}

fn word_view(page: &Page, id: WordId) -> WordView<'_> {
    WordView {
        text: page.word_text(id),
        bounds: page.word(id).bounds(),
    }
}

fn serialize<T: Serialize>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a document to JSON as a page → zone → line → word tree.
///
/// Zones appear in page order; chunks are folded into their word's text.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let view = DocumentView {
        pages: doc.pages.iter().map(PageView::new).collect(),
    };
    serialize(&view, format)
}

/// Convert extracted content to JSON.
pub fn content_to_json(content: &DocumentContent, format: JsonFormat) -> Result<String> {
    serialize(content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Section;
    use crate::model::Chunk;

    fn document() -> Document {
        let mut page = Page::new(1);
        let a = page.add_chunk(Chunk::new(Bounds::new(0.0, 0.0, 12.0, 10.0), "He"));
        let b = page.add_chunk(Chunk::new(Bounds::new(12.0, 0.0, 18.0, 10.0), "llo"));
        let word = page.add_word(vec![a, b]);
        let line = page.add_line(vec![word]);
        page.add_zone(vec![line], Some(ZoneLabel::BodyContent));
        let mut doc = Document::new();
        doc.add_page(page);
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&document(), JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n')); // Pretty has newlines

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let zone = &value["pages"][0]["zones"][0];
        assert_eq!(zone["label"], "body_content");
        assert_eq!(zone["lines"][0]["words"][0]["text"], "Hello");
        assert_eq!(zone["bounds"]["width"], 30.0);
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&document(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_content_to_json() {
        let mut content = DocumentContent::new();
        let mut section = Section::new("Introduction", 1);
        section.paragraphs.push("Text.".to_string());
        content.sections.push(section);

        let json = content_to_json(&content, JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sections"][0]["title"], "Introduction");
        assert_eq!(value["sections"][0]["paragraphs"][0], "Text.");
    }
}
