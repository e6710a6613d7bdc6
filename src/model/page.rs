//! Page-level types.
//!
//! A page owns an arena of chunks, words, lines and zones. Containers refer
//! to their children through typed handles, so restructuring ("replace this
//! zone with two new zones") is an edit of handle lists rather than a rewrite
//! of a nested tree. Zones that are removed from the page's zone sequence stay
//! in the arena but are no longer reachable through the ordered accessors.

use serde::{Deserialize, Serialize};

use super::{Bounds, BoundsBuilder, ZoneLabel};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Position of the element in its page arena.
            pub fn index(self) -> usize {
                self.0
            }

            #[allow(dead_code)]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index)
            }
        }
    };
}

handle!(
    /// Handle to a [`Chunk`] in a page arena.
    ChunkId
);
handle!(
    /// Handle to a [`Word`] in a page arena.
    WordId
);
handle!(
    /// Handle to a [`Line`] in a page arena.
    LineId
);
handle!(
    /// Handle to a [`Zone`] in a page arena.
    ZoneId
);

/// Smallest positioned text fragment, as produced by a document decoder.
///
/// Chunks are never modified once created; restructuring only moves their
/// handles between words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    text: String,
    bounds: Option<Bounds>,
}

impl Chunk {
    /// Create a chunk with bounds.
    pub fn new(bounds: Bounds, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bounds: Some(bounds),
        }
    }

    /// Create a chunk for which the decoder produced no bounds.
    ///
    /// Such a chunk is rejected by the segmenter.
    pub fn without_bounds(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bounds: None,
        }
    }

    /// The chunk text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The chunk bounds, if the decoder provided any.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }
}

/// A word: chunks separated by less than the word spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub(crate) chunks: Vec<ChunkId>,
    pub(crate) bounds: Option<Bounds>,
}

impl Word {
    /// Chunks of the word, left to right.
    pub fn chunks(&self) -> &[ChunkId] {
        &self.chunks
    }

    /// Union of the chunk bounds.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }
}

/// A text line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub(crate) words: Vec<WordId>,
    pub(crate) bounds: Option<Bounds>,
}

impl Line {
    /// Words of the line, in reading order.
    pub fn words(&self) -> &[WordId] {
        &self.words
    }

    /// Union of the word bounds.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }
}

/// A block of lines sharing a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub(crate) lines: Vec<LineId>,
    pub(crate) label: Option<ZoneLabel>,
    pub(crate) bounds: Option<Bounds>,
}

impl Zone {
    /// Lines of the zone, top to bottom.
    pub fn lines(&self) -> &[LineId] {
        &self.lines
    }

    /// The role label, or `None` while unlabeled.
    pub fn label(&self) -> Option<ZoneLabel> {
        self.label
    }

    /// Replace the role label.
    pub fn set_label(&mut self, label: ZoneLabel) {
        self.label = Some(label);
    }

    /// Drop the role label.
    pub fn clear_label(&mut self) {
        self.label = None;
    }

    /// Union of the line bounds.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }
}

/// A single page in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    chunks: Vec<Chunk>,
    words: Vec<Word>,
    lines: Vec<Line>,
    zones: Vec<Zone>,
    zone_order: Vec<ZoneId>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Create an unsegmented page holding `chunks`.
    pub fn from_chunks(number: u32, chunks: Vec<Chunk>) -> Self {
        Self {
            number,
            chunks,
            ..Default::default()
        }
    }

    /// Add a chunk to the arena.
    pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkId {
        self.chunks.push(chunk);
        ChunkId(self.chunks.len() - 1)
    }

    /// Get a chunk. Panics if the handle belongs to another page.
    pub fn chunk(&self, id: ChunkId) -> &Chunk {
        &self.chunks[id.0]
    }

    /// Get a word. Panics if the handle belongs to another page.
    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id.0]
    }

    /// Get a line. Panics if the handle belongs to another page.
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    /// Get a zone. Panics if the handle belongs to another page.
    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.0]
    }

    /// Get a zone for relabeling.
    pub fn zone_mut(&mut self, id: ZoneId) -> &mut Zone {
        &mut self.zones[id.0]
    }

    pub(crate) fn line_mut(&mut self, id: LineId) -> &mut Line {
        &mut self.lines[id.0]
    }

    pub(crate) fn word_mut(&mut self, id: WordId) -> &mut Word {
        &mut self.words[id.0]
    }

    /// All chunks in the arena, in insertion order.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (ChunkId(i), chunk))
    }

    /// Number of chunks in the arena.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Handles of the page's zones, in page order.
    pub fn zone_ids(&self) -> &[ZoneId] {
        &self.zone_order
    }

    /// Zones of the page, in page order.
    pub fn zones(&self) -> impl Iterator<Item = (ZoneId, &Zone)> {
        self.zone_order.iter().map(move |&id| (id, self.zone(id)))
    }

    /// Number of zones on the page.
    pub fn zone_count(&self) -> usize {
        self.zone_order.len()
    }

    /// Lines of a zone, in order.
    pub fn zone_lines(&self, id: ZoneId) -> impl Iterator<Item = (LineId, &Line)> {
        self.zone(id)
            .lines
            .iter()
            .map(move |&line| (line, self.line(line)))
    }

    /// Words of a line, in order.
    pub fn line_words(&self, id: LineId) -> impl Iterator<Item = (WordId, &Word)> {
        self.line(id)
            .words
            .iter()
            .map(move |&word| (word, self.word(word)))
    }

    /// Chunks of a word, in order.
    pub fn word_chunks(&self, id: WordId) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.word(id)
            .chunks
            .iter()
            .map(move |&chunk| (chunk, self.chunk(chunk)))
    }

    /// Total number of lines across the page's zones.
    pub fn line_count(&self) -> usize {
        self.zones().map(|(_, zone)| zone.lines.len()).sum()
    }

    /// Total number of words across the page's zones.
    pub fn word_count(&self) -> usize {
        self.zones()
            .flat_map(|(_, zone)| zone.lines.iter())
            .map(|&line| self.line(line).words.len())
            .sum()
    }

    /// Check if the page has no zones.
    pub fn is_empty(&self) -> bool {
        self.zone_order.is_empty()
    }

    /// Union of the zone bounds, computed on demand.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut builder = BoundsBuilder::new();
        for (_, zone) in self.zones() {
            builder.expand_opt(zone.bounds());
        }
        builder.bounds()
    }

    /// Create a word from chunks. Its bounds are computed immediately.
    pub fn add_word(&mut self, chunks: Vec<ChunkId>) -> WordId {
        let bounds = self.union_of(chunks.iter().map(|&c| self.chunk(c).bounds()));
        self.words.push(Word { chunks, bounds });
        WordId(self.words.len() - 1)
    }

    /// Create a line from words. Its bounds are computed immediately.
    pub fn add_line(&mut self, words: Vec<WordId>) -> LineId {
        let bounds = self.union_of(words.iter().map(|&w| self.word(w).bounds()));
        self.lines.push(Line { words, bounds });
        LineId(self.lines.len() - 1)
    }

    /// Create a zone that is not yet part of the page's zone sequence.
    pub fn create_zone(&mut self, lines: Vec<LineId>, label: Option<ZoneLabel>) -> ZoneId {
        let bounds = self.union_of(lines.iter().map(|&l| self.line(l).bounds()));
        self.zones.push(Zone {
            lines,
            label,
            bounds,
        });
        ZoneId(self.zones.len() - 1)
    }

    /// Create a zone and append it to the page's zone sequence.
    pub fn add_zone(&mut self, lines: Vec<LineId>, label: Option<ZoneLabel>) -> ZoneId {
        let id = self.create_zone(lines, label);
        self.zone_order.push(id);
        id
    }

    /// Remove a zone from the page's zone sequence.
    ///
    /// Returns `false` if the zone was not part of the sequence.
    pub fn remove_zone(&mut self, id: ZoneId) -> bool {
        match self.zone_order.iter().position(|&z| z == id) {
            Some(pos) => {
                self.zone_order.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Put `replacements` in place of `old` in the zone sequence.
    pub fn replace_zone(&mut self, old: ZoneId, replacements: &[ZoneId]) -> bool {
        match self.zone_order.iter().position(|&z| z == old) {
            Some(pos) => {
                self.zone_order
                    .splice(pos..=pos, replacements.iter().copied());
                true
            }
            None => false,
        }
    }

    /// Split a zone in two by a line predicate.
    ///
    /// Lines for which `predicate` returns `true` move to the second zone, the
    /// others stay in the first; both keep the original label and relative
    /// line order. Nothing changes, and `None` is returned, unless both parts
    /// are non-empty. The caller is responsible for re-resolving reading order.
    pub fn split_zone<F>(&mut self, id: ZoneId, mut predicate: F) -> Option<(ZoneId, ZoneId)>
    where
        F: FnMut(&Page, LineId) -> bool,
    {
        if !self.zone_order.contains(&id) {
            return None;
        }
        let this: &Page = self;
        let (second, first): (Vec<LineId>, Vec<LineId>) = this
            .zone(id)
            .lines
            .iter()
            .partition(|&&line| predicate(this, line));
        if first.is_empty() || second.is_empty() {
            return None;
        }

        let label = self.zone(id).label;
        let first = self.create_zone(first, label);
        let second = self.create_zone(second, label);
        self.replace_zone(id, &[first, second]);
        Some((first, second))
    }

    /// Replace the zone sequence, e.g. with a resolved reading order.
    pub fn set_zone_order(&mut self, order: Vec<ZoneId>) {
        self.zone_order = order;
    }

    /// Recompute every word, line and zone bounds bottom-up.
    pub fn recompute_bounds(&mut self) {
        for i in 0..self.words.len() {
            let bounds = self.union_of(self.words[i].chunks.iter().map(|&c| self.chunk(c).bounds()));
            self.words[i].bounds = bounds;
        }
        for i in 0..self.lines.len() {
            let bounds = self.union_of(self.lines[i].words.iter().map(|&w| self.word(w).bounds()));
            self.lines[i].bounds = bounds;
        }
        for i in 0..self.zones.len() {
            let bounds = self.union_of(self.zones[i].lines.iter().map(|&l| self.line(l).bounds()));
            self.zones[i].bounds = bounds;
        }
    }

    fn union_of<'a>(&self, bounds: impl Iterator<Item = Option<&'a Bounds>>) -> Option<Bounds> {
        let mut builder = BoundsBuilder::new();
        for b in bounds {
            builder.expand_opt(b);
        }
        builder.bounds()
    }

    /// Text of a word: its chunks concatenated.
    pub fn word_text(&self, id: WordId) -> String {
        self.word_chunks(id).map(|(_, chunk)| chunk.text()).collect()
    }

    /// Text of a line: its words separated by single spaces.
    pub fn line_text(&self, id: LineId) -> String {
        self.line(id)
            .words
            .iter()
            .map(|&w| self.word_text(w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text of a zone: its lines separated by newlines.
    pub fn zone_text(&self, id: ZoneId) -> String {
        self.zone(id)
            .lines
            .iter()
            .map(|&l| self.line_text(l))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get plain text content of the page, zones in page order.
    pub fn plain_text(&self) -> String {
        self.zone_order
            .iter()
            .map(|&z| self.zone_text(z))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> (Page, ZoneId) {
        let mut page = Page::new(1);
        let mut lines = Vec::new();
        for (row, text) in ["John Smith", "Department of Physics", "University of Nowhere"]
            .iter()
            .enumerate()
        {
            let y = 10.0 + row as f64 * 14.0;
            let mut words = Vec::new();
            let mut x = 10.0;
            for token in text.split(' ') {
                let width = token.len() as f64 * 6.0;
                let chunk = page.add_chunk(Chunk::new(Bounds::new(x, y, width, 10.0), token));
                words.push(page.add_word(vec![chunk]));
                x += width + 4.0;
            }
            lines.push(page.add_line(words));
        }
        let zone = page.add_zone(lines, Some(ZoneLabel::MetAuthor));
        (page, zone)
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(3);
        assert_eq!(page.number, 3);
        assert!(page.is_empty());
        assert!(page.bounds().is_none());
    }

    #[test]
    fn test_bounds_contain_descendants() {
        let (page, zone) = sample_page();
        let zone_bounds = *page.zone(zone).bounds().unwrap();
        for (line_id, line) in page.zone_lines(zone) {
            assert!(zone_bounds.contains(line.bounds().unwrap()));
            for (word_id, word) in page.line_words(line_id) {
                assert!(zone_bounds.contains(word.bounds().unwrap()));
                for (_, chunk) in page.word_chunks(word_id) {
                    assert!(zone_bounds.contains(chunk.bounds().unwrap()));
                }
            }
        }
        assert_eq!(page.bounds(), Some(zone_bounds));
    }

    #[test]
    fn test_recompute_bounds() {
        let (mut page, zone) = sample_page();
        let expected = page.zone(zone).bounds().copied();
        let line = page.zone(zone).lines()[1];
        page.zones[zone.index()].bounds = None;
        page.lines[line.index()].bounds = Some(Bounds::new(0.0, 0.0, 1.0, 1.0));

        page.recompute_bounds();
        assert_eq!(page.zone(zone).bounds().copied(), expected);
        let zone_bounds = *page.zone(zone).bounds().unwrap();
        for (_, line) in page.zone_lines(zone) {
            assert!(zone_bounds.contains(line.bounds().unwrap()));
        }
        assert_eq!(page.line(line).bounds().unwrap().top(), 24.0);
    }

    #[test]
    fn test_text() {
        let (page, zone) = sample_page();
        assert_eq!(
            page.zone_text(zone),
            "John Smith\nDepartment of Physics\nUniversity of Nowhere"
        );
    }

    #[test]
    fn test_split_zone() {
        let (mut page, zone) = sample_page();
        let (first, second) = page
            .split_zone(zone, |p, line| p.line_text(line).contains("of"))
            .unwrap();

        assert_eq!(page.zone_ids(), &[first, second]);
        assert_eq!(page.zone(first).lines().len(), 1);
        assert_eq!(page.zone(second).lines().len(), 2);
        assert_eq!(page.line_count(), 3);
        assert_eq!(page.zone(second).label(), Some(ZoneLabel::MetAuthor));
    }

    #[test]
    fn test_split_zone_requires_two_parts() {
        let (mut page, zone) = sample_page();
        assert!(page.split_zone(zone, |_, _| true).is_none());
        assert!(page.split_zone(zone, |_, _| false).is_none());
        assert_eq!(page.zone_ids(), &[zone]);
    }

    #[test]
    fn test_relabel_replaces() {
        let (mut page, zone) = sample_page();
        page.zone_mut(zone).set_label(ZoneLabel::MetAffiliation);
        assert_eq!(page.zone(zone).label(), Some(ZoneLabel::MetAffiliation));
        page.zone_mut(zone).clear_label();
        assert_eq!(page.zone(zone).label(), None);
    }

    #[test]
    fn test_remove_and_replace_zone() {
        let (mut page, zone) = sample_page();
        let lines = page.zone(zone).lines().to_vec();
        let replacement = page.create_zone(lines, None);
        assert!(page.replace_zone(zone, &[replacement]));
        assert_eq!(page.zone_ids(), &[replacement]);
        assert!(!page.remove_zone(zone));
        assert!(page.remove_zone(replacement));
        assert!(page.is_empty());
    }
}
