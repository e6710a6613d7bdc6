//! Plain text rendering.

use crate::content::{DocumentContent, Section};
use crate::model::Document;

/// Convert a document to plain text, zones in page order.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text().trim().to_string()
}

/// Convert extracted content to plain text.
///
/// Section titles are prefixed with one `#` per nesting level so the outline
/// survives.
pub fn content_to_text(content: &DocumentContent) -> String {
    fn walk(section: &Section, out: &mut Vec<String>) {
        out.push(format!(
            "{} {}",
            "#".repeat(section.level.max(1) as usize),
            section.title
        ));
        out.extend(section.paragraphs.iter().cloned());
        for sub in &section.subsections {
            walk(sub, out);
        }
    }

    let mut blocks = content.preamble.clone();
    for section in &content.sections {
        walk(section, &mut blocks);
    }
    blocks.join("\n\n")
}
