//! Synthetic pages shared by the integration tests.

#![allow(dead_code)]

use docstrum::{Bounds, Chunk, Document, Page, SegmenterOptions};

pub const CHAR_WIDTH: f64 = 6.0;
pub const CHAR_HEIGHT: f64 = 10.0;
pub const WORD_GAP: f64 = 4.0;
pub const LINE_PITCH: f64 = 14.0;

const WORDS: &[&str] = &[
    "document", "layout", "analysis", "groups", "glyphs", "into", "words", "lines", "and",
    "zones", "using", "nearest", "neighbor", "distances", "between", "connected", "components",
    "the", "angle", "histogram", "gives", "text", "orientation", "while", "spacing", "peaks",
    "give", "character", "line", "distance", "estimates", "for", "every", "page",
];

/// Configuration the regression fixture was tuned with.
pub fn fixture_options() -> SegmenterOptions {
    SegmenterOptions::new()
        .with_spacing_histogram(2.0, 10.0, 2.0)
        .with_max_line_size_scale(1.5)
        .with_word_distance_multiplier(0.5)
        .with_min_horizontal_distance_multiplier(1.5)
        .with_max_vertical_distance_multiplier(1.3)
        .with_max_vertical_merge_distance_multiplier(0.5)
        .with_component_distance_character_multiplier(3.0)
}

/// Width of a line of monospaced text.
pub fn text_width(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let chars: usize = words.iter().map(|w| w.chars().count()).sum();
    chars as f64 * CHAR_WIDTH + words.len().saturating_sub(1) as f64 * WORD_GAP
}

/// Lay out one line of text, one chunk per character, starting at `(x, top)`.
pub fn add_text_line(page: &mut Page, text: &str, x: f64, top: f64) {
    let mut cursor = x;
    for word in text.split_whitespace() {
        for ch in word.chars() {
            page.add_chunk(Chunk::new(
                Bounds::new(cursor, top, CHAR_WIDTH, CHAR_HEIGHT),
                ch.to_string(),
            ));
            cursor += CHAR_WIDTH;
        }
        cursor += WORD_GAP;
    }
}

/// `count` lines of filler text no wider than `max_width`.
pub fn filler_lines(count: usize, max_width: f64, seed: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(count);
    let mut next = seed;
    for _ in 0..count {
        let mut line = String::new();
        loop {
            let word = WORDS[next % WORDS.len()];
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate) > max_width {
                break;
            }
            line = candidate;
            next += 1;
        }
        lines.push(line);
    }
    lines
}

/// A journal-style page: a 3-line full-width header above two 16-line
/// columns, the left one opening with an 8-word `ABSTRACT` line.
pub fn two_column_page(number: u32) -> Page {
    let mut page = Page::new(number);

    for (i, line) in filler_lines(3, 430.0, 0).iter().enumerate() {
        add_text_line(&mut page, line, 50.0, 60.0 + i as f64 * LINE_PITCH);
    }

    let column_top = 118.0;
    let mut left = vec!["ABSTRACT We model how text on a page".to_string()];
    left.extend(filler_lines(15, 230.0, 7));
    for (i, line) in left.iter().enumerate() {
        add_text_line(&mut page, line, 50.0, column_top + i as f64 * LINE_PITCH);
    }

    for (i, line) in filler_lines(16, 230.0, 13).iter().enumerate() {
        add_text_line(&mut page, line, 310.0, column_top + i as f64 * LINE_PITCH);
    }

    page
}

/// A document of `pages` two-column pages.
pub fn two_column_document(pages: u32) -> Document {
    let mut doc = Document::new();
    for number in 1..=pages {
        doc.add_page(two_column_page(number));
    }
    doc
}
