//! Zone classification: a generic k-NN classifier and zone features.

pub mod features;
mod knn;

pub use features::{Features, LayoutFeatures, ZoneFeatureExtractor, LAYOUT_FEATURE_NAMES};
pub use knn::{
    DistanceMetric, Euclidean, Exemplar, FeatureVector, KnnClassifier, KnnModel, Manhattan,
    Normalization,
};
