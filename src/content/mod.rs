//! Logical structure extraction.
//!
//! Turns segmented, ordered zones into a section tree in four fixed stages:
//! a [`ContentFilter`] picks the body zones, a [`HeaderExtractor`] labels
//! them as headers or paragraphs, a [`ContentCleaner`] repairs their text and
//! a [`ContentConverter`] nests the result into [`Section`]s.
//!
//! ```
//! use docstrum::content::LogicalStructureExtractor;
//! use docstrum::Document;
//!
//! let extractor = LogicalStructureExtractor::rule_based().unwrap();
//! let content = extractor.extract(&mut Document::new()).unwrap();
//! assert!(content.is_empty());
//! ```

mod cleaning;
mod convert;
mod filter;
mod headers;
mod model;

pub use cleaning::{CleanerOptions, ContentCleaner, TextContentCleaner};
pub use convert::{ContentConverter, SectionConverter};
pub use filter::{CategoryContentFilter, ContentFilter, KnnContentFilter, DEFAULT_NEIGHBORS};
pub use headers::{FontSizeHeaderExtractor, HeaderExtractor, HeightStatistics, KnnHeaderExtractor};
pub use model::{ContentPart, DocumentContent, PartKind, Section};

use std::sync::Arc;

use crate::classify::{KnnClassifier, KnnModel};
use crate::error::{Error, Result};
use crate::model::{Document, ZoneLabel};

/// Extracts the logical content of a segmented document.
pub struct LogicalStructureExtractor {
    filter: Box<dyn ContentFilter>,
    headers: Box<dyn HeaderExtractor>,
    cleaner: Box<dyn ContentCleaner>,
    converter: Box<dyn ContentConverter>,
}

impl LogicalStructureExtractor {
    /// Assemble an extractor from its four stages.
    pub fn new(
        filter: Box<dyn ContentFilter>,
        headers: Box<dyn HeaderExtractor>,
        cleaner: Box<dyn ContentCleaner>,
        converter: Box<dyn ContentConverter>,
    ) -> Self {
        Self {
            filter,
            headers,
            cleaner,
            converter,
        }
    }

    /// k-NN variant: a content filter over `filter_model` and a header
    /// extractor over `header_model`, both on layout features.
    pub fn knn(
        filter_model: Arc<KnnModel<ZoneLabel>>,
        header_model: Arc<KnnModel<ZoneLabel>>,
    ) -> Result<Self> {
        Ok(Self::new(
            Box::new(KnnContentFilter::new(filter_model)),
            Box::new(KnnHeaderExtractor::new(header_model, KnnClassifier::new())),
            Box::new(TextContentCleaner::new(CleanerOptions::default())?),
            Box::new(SectionConverter::new()),
        ))
    }

    /// Rule-based variant: label categories and line heights, no models.
    pub fn rule_based() -> Result<Self> {
        Ok(Self::new(
            Box::new(CategoryContentFilter::body()),
            Box::new(FontSizeHeaderExtractor::new()),
            Box::new(TextContentCleaner::new(CleanerOptions::default())?),
            Box::new(SectionConverter::new()),
        ))
    }

    /// Run the four stages over every page, zones in page order.
    ///
    /// Kept zones get their header label written back.
    pub fn extract(&self, document: &mut Document) -> Result<DocumentContent> {
        let mut parts = Vec::new();
        for page in &mut document.pages {
            let zones = page.zone_ids().to_vec();
            for zone in zones {
                let keep = self.filter.keep(page, zone).map_err(|e| {
                    Error::analysis(format!("{} filter on page {}", self.filter.name(), page.number), &e)
                })?;
                if !keep {
                    continue;
                }
                let label = self.headers.label(page, zone).map_err(|e| {
                    Error::analysis(
                        format!("{} header extractor on page {}", self.headers.name(), page.number),
                        &e,
                    )
                })?;
                page.zone_mut(zone).set_label(label);
                parts.push(ContentPart::from_zone(page, zone, label));
            }
        }

        let kept = parts.len();
        let parts = self.cleaner.clean(parts);
        let content = self.converter.convert(parts);
        log::debug!(
            "Extracted {} parts into {} sections ({} cleaner, {} converter)",
            kept,
            content.section_count(),
            self.cleaner.name(),
            self.converter.name()
        );
        Ok(content)
    }
}
