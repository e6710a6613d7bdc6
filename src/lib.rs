//! # docstrum
//!
//! Geometric page segmentation and logical structure analysis for documents
//! whose text has been extracted as positioned chunks.
//!
//! Each page starts as a flat list of [`Chunk`]s (a glyph or short run of
//! text with a bounding box). The Docstrum segmenter groups them bottom-up
//! into words, lines and zones; the hierarchical resolver puts zones into
//! reading order; the content extractor turns labeled zones into a tree of
//! sections.
//!
//! ## Quick Start
//!
//! ```
//! use docstrum::{Bounds, Chunk, Docstrum, Page};
//!
//! fn main() -> docstrum::Result<()> {
//!     let chunks = "Hello world"
//!         .chars()
//!         .enumerate()
//!         .filter(|(_, c)| !c.is_whitespace())
//!         .map(|(i, c)| Chunk::new(Bounds::new(i as f64 * 6.0, 0.0, 6.0, 10.0), c.to_string()))
//!         .collect();
//!
//!     let analysis = Docstrum::new().analyze_page(Page::from_chunks(1, chunks))?;
//!     assert_eq!(analysis.to_text(), "Hello world");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Docstrum segmentation**: nearest-neighbor clustering of chunks into
//!   words, lines and zones, robust to skew
//! - **Reading order**: recursive XY-cut over zone bounds
//! - **Zone classification**: generic k-NN classifier over layout features
//! - **Logical structure**: content filtering, header detection, text
//!   cleanup and section nesting
//! - **Parallel processing**: uses Rayon for multi-page documents

pub mod classify;
pub mod content;
pub mod enhance;
pub mod error;
pub mod model;
pub mod order;
pub mod render;
pub mod segment;

// Re-export commonly used types
pub use classify::{Exemplar, KnnClassifier, KnnModel};
pub use content::{DocumentContent, LogicalStructureExtractor, Section};
pub use enhance::AuthorAffiliationSplitter;
pub use error::{Error, Result};
pub use model::{
    Bounds, BoundsBuilder, Chunk, Document, LabelCategory, Line, Page, Word, Zone, ZoneLabel,
};
pub use order::{HierarchicalReadingOrderResolver, ResolverOptions};
pub use render::JsonFormat;
pub use segment::{DocstrumSegmenter, SegmenterOptions};

/// Segment every page of a document and resolve its reading order with
/// default options.
///
/// # Example
///
/// ```
/// use docstrum::{segment, Document};
///
/// let doc = segment(&Document::new()).unwrap();
/// assert!(doc.is_empty());
/// ```
pub fn segment(document: &Document) -> Result<Document> {
    Ok(Docstrum::new().analyze(document)?.document)
}

/// Extract plain text from chunked pages, zones in reading order.
pub fn extract_text(document: &Document) -> Result<String> {
    Ok(Docstrum::new().analyze(document)?.to_text())
}

/// Builder for segmenting and ordering documents.
///
/// # Example
///
/// ```
/// use docstrum::{Docstrum, Document, ResolverOptions};
///
/// let analysis = Docstrum::new()
///     .sequential()
///     .with_resolver_options(ResolverOptions::new().with_min_gap(2.0))
///     .analyze(&Document::new())?;
/// assert_eq!(analysis.document().page_count(), 0);
/// # Ok::<(), docstrum::Error>(())
/// ```
pub struct Docstrum {
    segmenter_options: SegmenterOptions,
    resolver_options: ResolverOptions,
}

impl Docstrum {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            segmenter_options: SegmenterOptions::default(),
            resolver_options: ResolverOptions::default(),
        }
    }

    /// Set segmentation options.
    pub fn with_segmenter_options(mut self, options: SegmenterOptions) -> Self {
        self.segmenter_options = options;
        self
    }

    /// Set reading-order options.
    pub fn with_resolver_options(mut self, options: ResolverOptions) -> Self {
        self.resolver_options = options;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.segmenter_options = self.segmenter_options.sequential();
        self
    }

    /// Segment and order a document; the input is left unchanged.
    pub fn analyze(self, document: &Document) -> Result<Analysis> {
        let segmenter = DocstrumSegmenter::new(self.segmenter_options);
        let mut document = segmenter.segment_document(document)?;
        HierarchicalReadingOrderResolver::new(self.resolver_options).resolve(&mut document)?;
        Ok(Analysis { document })
    }

    /// Segment and order a single page.
    pub fn analyze_page(self, page: Page) -> Result<Analysis> {
        let mut document = Document::new();
        document.add_page(page);
        self.analyze(&document)
    }
}

impl Default for Docstrum {
    fn default() -> Self {
        Self::new()
    }
}

/// A segmented, ordered document.
pub struct Analysis {
    /// The segmented document
    pub document: Document,
}

impl Analysis {
    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take the document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Run a logical structure extractor over the zones. Kept zones are
    /// labeled in place.
    pub fn extract_content(&mut self, extractor: &LogicalStructureExtractor) -> Result<DocumentContent> {
        extractor.extract(&mut self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(lines: &[&str]) -> Page {
        let mut chunks = Vec::new();
        for (row, text) in lines.iter().enumerate() {
            for (col, c) in text.chars().enumerate() {
                if !c.is_whitespace() {
                    chunks.push(Chunk::new(
                        Bounds::new(col as f64 * 6.0, row as f64 * 14.0, 6.0, 10.0),
                        c.to_string(),
                    ));
                }
            }
        }
        Page::from_chunks(1, chunks)
    }

    #[test]
    fn test_docstrum_builder() {
        let builder = Docstrum::new()
            .sequential()
            .with_resolver_options(ResolverOptions::new().with_reorder_contents(false));
        assert!(!builder.segmenter_options.parallel);
        assert!(!builder.resolver_options.reorder_contents);
    }

    #[test]
    fn test_docstrum_builder_default() {
        let builder = Docstrum::default();
        assert!(builder.segmenter_options.parallel);
        assert!(builder.resolver_options.reorder_contents);
    }

    #[test]
    fn test_analyze_page() {
        let analysis = Docstrum::new()
            .analyze_page(page_of(&["first line", "second line"]))
            .unwrap();
        assert_eq!(analysis.document().zone_count(), 1);
        assert_eq!(analysis.to_text(), "first line\nsecond line");
    }

    #[test]
    fn test_analyze_leaves_input_unchanged() {
        let mut doc = Document::new();
        doc.add_page(page_of(&["some text"]));
        let before = doc.pages[0].chunk_count();

        let segmented = segment(&doc).unwrap();
        assert_eq!(doc.zone_count(), 0);
        assert_eq!(doc.pages[0].chunk_count(), before);
        assert_eq!(segmented.zone_count(), 1);
    }

    #[test]
    fn test_extract_text() {
        let mut doc = Document::new();
        doc.add_page(page_of(&["hello world"]));
        assert_eq!(extract_text(&doc).unwrap(), "hello world");
    }

    #[test]
    fn test_analyze_invalid_chunk() {
        let page = Page::from_chunks(1, vec![Chunk::without_bounds("x")]);
        let result = Docstrum::new().analyze_page(page);
        assert!(matches!(result, Err(Error::Analysis(_))));
    }
}
