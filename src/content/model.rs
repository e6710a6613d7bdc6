//! Content structure produced by the logical structure extractor.

use serde::{Deserialize, Serialize};

use crate::model::{Page, ZoneId, ZoneLabel};

/// Role of a content part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    /// Section header
    Header,
    /// Body paragraph
    Paragraph,
}

/// One kept zone, flattened to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Header or paragraph
    pub kind: PartKind,
    /// Text of the zone
    pub text: String,
    /// Page number the zone comes from
    pub page: u32,
    /// Mean line height of the zone
    pub line_height: f64,
}

impl ContentPart {
    /// Create a paragraph part.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: PartKind::Paragraph,
            text: text.into(),
            page: 0,
            line_height: 0.0,
        }
    }

    /// Create a header part with its line height.
    pub fn header(text: impl Into<String>, line_height: f64) -> Self {
        Self {
            kind: PartKind::Header,
            text: text.into(),
            page: 0,
            line_height,
        }
    }

    /// Build a part from a labeled zone; `BodyHeader` zones become headers.
    pub fn from_zone(page: &Page, zone: ZoneId, label: ZoneLabel) -> Self {
        let heights: Vec<f64> = page
            .zone_lines(zone)
            .filter_map(|(_, line)| line.bounds().map(|b| b.height))
            .collect();
        let line_height = if heights.is_empty() {
            0.0
        } else {
            heights.iter().sum::<f64>() / heights.len() as f64
        };
        Self {
            kind: if label == ZoneLabel::BodyHeader {
                PartKind::Header
            } else {
                PartKind::Paragraph
            },
            text: page.zone_text(zone),
            page: page.number,
            line_height,
        }
    }

    /// Whether the part is a header.
    pub fn is_header(&self) -> bool {
        self.kind == PartKind::Header
    }
}

/// A section: a header, its paragraphs and nested subsections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Header text
    pub title: String,
    /// Nesting level (1 = top level)
    pub level: u8,
    /// Paragraphs before the first subsection
    pub paragraphs: Vec<String>,
    /// Nested sections
    pub subsections: Vec<Section>,
}

impl Section {
    /// Create an empty section.
    pub fn new(title: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            level,
            paragraphs: Vec::new(),
            subsections: Vec::new(),
        }
    }

    /// Number of sections in this subtree, this one included.
    pub fn section_count(&self) -> usize {
        1 + self
            .subsections
            .iter()
            .map(Section::section_count)
            .sum::<usize>()
    }
}

/// The logical content of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    /// Paragraphs before the first header
    pub preamble: Vec<String>,
    /// Top-level sections
    pub sections: Vec<Section>,
}

impl DocumentContent {
    /// Create empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there is no content at all.
    pub fn is_empty(&self) -> bool {
        self.preamble.is_empty() && self.sections.is_empty()
    }

    /// Total number of sections at any depth.
    pub fn section_count(&self) -> usize {
        self.sections.iter().map(Section::section_count).sum()
    }

    /// Plain text: headers and paragraphs separated by blank lines.
    pub fn plain_text(&self) -> String {
        fn walk(section: &Section, out: &mut Vec<String>) {
            out.push(section.title.clone());
            out.extend(section.paragraphs.iter().cloned());
            for sub in &section.subsections {
                walk(sub, out);
            }
        }

        let mut blocks = self.preamble.clone();
        for section in &self.sections {
            walk(section, &mut blocks);
        }
        blocks.join("\n\n")
    }
}
