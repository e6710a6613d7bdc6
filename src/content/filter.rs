//! Content filters: decide which zones belong to the body text.

use std::sync::Arc;

use crate::classify::{KnnClassifier, KnnModel, LayoutFeatures, ZoneFeatureExtractor};
use crate::error::Result;
use crate::model::{Page, ZoneId, ZoneLabel};

/// Decides whether a zone is part of the document's content.
pub trait ContentFilter: Send + Sync {
    /// Name of the filter, for diagnostics.
    fn name(&self) -> &str;

    /// Whether `zone` should be kept.
    fn keep(&self, page: &Page, zone: ZoneId) -> Result<bool>;
}

/// Number of neighbors consulted by the k-NN content stages.
pub const DEFAULT_NEIGHBORS: usize = 5;

/// k-NN filter: keeps zones the model classifies as [`ZoneLabel::BodyContent`].
///
/// Only unlabeled zones and zones with a body label are candidates; anything
/// already labeled as metadata, references or other is dropped without
/// consulting the model.
pub struct KnnContentFilter {
    model: Arc<KnnModel<ZoneLabel>>,
    classifier: KnnClassifier,
    features: Box<dyn ZoneFeatureExtractor>,
    neighbors: usize,
}

impl KnnContentFilter {
    /// Create a filter over `model` with layout features.
    pub fn new(model: Arc<KnnModel<ZoneLabel>>) -> Self {
        Self {
            model,
            classifier: KnnClassifier::new(),
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

impl ContentFilter for KnnContentFilter {
    fn name(&self) -> &str {
        "knn"
    }

    fn keep(&self, page: &Page, zone: ZoneId) -> Result<bool> {
        if !is_candidate(page.zone(zone).label()) {
            return Ok(false);
        }
        let features = self.features.features(page, zone);
        let label = self
            .classifier
            .classify(&features, self.model.as_ref(), self.neighbors)?;
        Ok(label == ZoneLabel::BodyContent)
    }
}

fn is_candidate(label: Option<ZoneLabel>) -> bool {
    label.map_or(true, |l| l.is_body())
}

/// Rule-based filter keeping zones whose label refines a generic label.
#[derive(Debug, Clone)]
pub struct CategoryContentFilter {
    general: ZoneLabel,
    exclude: Vec<ZoneLabel>,
    keep_unlabeled: bool,
}

impl CategoryContentFilter {
    /// Keep zones whose label refines `general` (e.g. [`ZoneLabel::GenBody`]).
    pub fn new(general: ZoneLabel) -> Self {
        Self {
            general: general.general(),
            exclude: Vec::new(),
            keep_unlabeled: true,
        }
    }

    /// Body text without junk, tables, figures and equations.
    pub fn body() -> Self {
        Self::new(ZoneLabel::GenBody).excluding(&[
            ZoneLabel::BodyJunk,
            ZoneLabel::BodyTable,
            ZoneLabel::BodyFigure,
            ZoneLabel::BodyEquation,
        ])
    }

    /// Drop zones with any of `labels`.
    pub fn excluding(mut self, labels: &[ZoneLabel]) -> Self {
        self.exclude.extend_from_slice(labels);
        self
    }

    /// Whether unlabeled zones are kept.
    pub fn with_unlabeled(mut self, keep: bool) -> Self {
        self.keep_unlabeled = keep;
        self
    }
}

impl Default for CategoryContentFilter {
    fn default() -> Self {
        Self::body()
    }
}

impl ContentFilter for CategoryContentFilter {
    fn name(&self) -> &str {
        "category"
    }

    fn keep(&self, page: &Page, zone: ZoneId) -> Result<bool> {
        Ok(match page.zone(zone).label() {
            None => self.keep_unlabeled,
            Some(label) => label.general() == self.general && !self.exclude.contains(&label),
        })
    }
}
