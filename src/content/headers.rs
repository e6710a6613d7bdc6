//! Header extraction: labels kept zones as section headers or body content.

use std::collections::HashMap;
use std::sync::Arc;

use crate::classify::{KnnClassifier, KnnModel, LayoutFeatures, ZoneFeatureExtractor};
use crate::error::Result;
use crate::model::{Page, ZoneId, ZoneLabel};

use super::filter::DEFAULT_NEIGHBORS;

/// Labels a kept zone.
pub trait HeaderExtractor: Send + Sync {
    /// Name of the extractor, for diagnostics.
    fn name(&self) -> &str;

    /// The label to write back to `zone`, usually
    /// [`ZoneLabel::BodyHeader`] or [`ZoneLabel::BodyContent`].
    fn label(&self, page: &Page, zone: ZoneId) -> Result<ZoneLabel>;
}

/// k-NN header extractor.
pub struct KnnHeaderExtractor {
    model: Arc<KnnModel<ZoneLabel>>,
    classifier: KnnClassifier,
    features: Box<dyn ZoneFeatureExtractor>,
    neighbors: usize,
}

impl KnnHeaderExtractor {
    /// Create an extractor over `model` with the given classifier.
    pub fn new(model: Arc<KnnModel<ZoneLabel>>, classifier: KnnClassifier) -> Self {
        Self {
            model,
            classifier,
            features: Box::new(LayoutFeatures),
            neighbors: DEFAULT_NEIGHBORS,
        }
    }

    /// Use a different feature extractor; it must match the model's training data.
    pub fn with_features(mut self, features: Box<dyn ZoneFeatureExtractor>) -> Self {
        self.features = features;
        self
    }

    /// Set the number of neighbors.
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.neighbors = k;
        self
    }
}

impl HeaderExtractor for KnnHeaderExtractor {
    fn name(&self) -> &str {
        "knn"
    }

    fn label(&self, page: &Page, zone: ZoneId) -> Result<ZoneLabel> {
        let features = self.features.features(page, zone);
        self.classifier
            .classify(&features, self.model.as_ref(), self.neighbors)
    }
}

/// Line height statistics of a page.
#[derive(Debug, Clone, Default)]
pub struct HeightStatistics {
    /// Body text line height (most common)
    pub body_height: f64,
    histogram: HashMap<i64, usize>,
}

impl HeightStatistics {
    /// Collect the line heights of every zone on a page.
    pub fn from_page(page: &Page) -> Self {
        let mut stats = Self::default();
        for (id, _) in page.zones() {
            for (_, line) in page.zone_lines(id) {
                if let Some(bounds) = line.bounds() {
                    stats.add_height(bounds.height);
                }
            }
        }
        stats.analyze();
        stats
    }

    /// Add a line height observation.
    pub fn add_height(&mut self, height: f64) {
        let key = (height * 10.0).round() as i64; // 0.1 precision
        *self.histogram.entry(key).or_insert(0) += 1;
    }

    /// Calculate the body height.
    pub fn analyze(&mut self) {
        // Most common height; the smaller one wins ties.
        let Some((&body_key, _)) = self
            .histogram
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        else {
            return;
        };
        self.body_height = body_key as f64 / 10.0;
    }
}

/// Rule-based header extractor: short zones with lines noticeably taller
/// than the page's body text are headers.
#[derive(Debug, Clone)]
pub struct FontSizeHeaderExtractor {
    /// Minimum ratio of the zone's line height to the body line height
    pub min_height_ratio: f64,
    /// Zones with more lines are never headers
    pub max_lines: usize,
}

impl FontSizeHeaderExtractor {
    /// Create an extractor with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum height ratio.
    pub fn with_min_height_ratio(mut self, ratio: f64) -> Self {
        self.min_height_ratio = ratio;
        self
    }

    /// Set the maximum number of lines of a header zone.
    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = lines;
        self
    }
}

impl Default for FontSizeHeaderExtractor {
    fn default() -> Self {
        Self {
            min_height_ratio: 1.2,
            max_lines: 3,
        }
    }
}

impl HeaderExtractor for FontSizeHeaderExtractor {
    fn name(&self) -> &str {
        "font_size"
    }

    fn label(&self, page: &Page, zone: ZoneId) -> Result<ZoneLabel> {
        let lines: Vec<f64> = page
            .zone_lines(zone)
            .filter_map(|(_, line)| line.bounds().map(|b| b.height))
            .collect();
        if lines.is_empty() || lines.len() > self.max_lines {
            return Ok(ZoneLabel::BodyContent);
        }
        let height = lines.iter().sum::<f64>() / lines.len() as f64;
        let stats = HeightStatistics::from_page(page);
        if stats.body_height > 0.0 && height >= stats.body_height * self.min_height_ratio {
            Ok(ZoneLabel::BodyHeader)
        } else {
            Ok(ZoneLabel::BodyContent)
        }
    }
}
