//! Zone feature extraction for the content classifiers.

use serde::{Deserialize, Serialize};

use super::FeatureVector;
use crate::model::{Page, ZoneId};

/// Names of the features produced by [`LayoutFeatures`], in order.
pub const LAYOUT_FEATURE_NAMES: [&str; 15] = [
    "relative_x",
    "relative_y",
    "relative_width",
    "relative_height",
    "line_count",
    "mean_line_height",
    "relative_line_height",
    "char_count",
    "word_count",
    "mean_word_length",
    "uppercase_ratio",
    "digit_ratio",
    "punctuation_ratio",
    "starts_with_digit",
    "ends_with_period",
];

/// A named feature vector describing one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    values: Vec<f64>,
}

impl Features {
    /// Wrap raw feature values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Consume into the raw values.
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl FeatureVector for Features {
    fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Computes the feature vector of a zone.
pub trait ZoneFeatureExtractor: Send + Sync {
    /// Compute features of `zone` in the context of its page.
    fn features(&self, page: &Page, zone: ZoneId) -> Features;
}

/// Geometry and character-class features (see [`LAYOUT_FEATURE_NAMES`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutFeatures;

impl ZoneFeatureExtractor for LayoutFeatures {
    fn features(&self, page: &Page, zone: ZoneId) -> Features {
        let page_bounds = page.bounds().unwrap_or_default();
        let zone_bounds = page.zone(zone).bounds().copied().unwrap_or_default();
        let ratio = |value: f64, total: f64| if total > 0.0 { value / total } else { 0.0 };

        let line_heights: Vec<f64> = page
            .zone_lines(zone)
            .filter_map(|(_, line)| line.bounds().map(|b| b.height))
            .collect();
        let mean_line_height = mean(&line_heights);
        let page_line_heights: Vec<f64> = page
            .zones()
            .flat_map(|(id, _)| page.zone_lines(id))
            .filter_map(|(_, line)| line.bounds().map(|b| b.height))
            .collect();

        let text = page.zone_text(zone);
        let letters = text.chars().filter(|c| c.is_alphabetic()).count() as f64;
        let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        let char_count = chars.len() as f64;
        let uppercase = chars.iter().filter(|c| c.is_uppercase()).count() as f64;
        let digits = chars.iter().filter(|c| c.is_ascii_digit()).count() as f64;
        let punctuation = chars.iter().filter(|c| c.is_ascii_punctuation()).count() as f64;
        let word_count = text.split_whitespace().count() as f64;
        let trimmed = text.trim();

        Features::new(vec![
            ratio(zone_bounds.left() - page_bounds.left(), page_bounds.width),
            ratio(zone_bounds.top() - page_bounds.top(), page_bounds.height),
            ratio(zone_bounds.width, page_bounds.width),
            ratio(zone_bounds.height, page_bounds.height),
            page.zone(zone).lines().len() as f64,
            mean_line_height,
            ratio(mean_line_height, mean(&page_line_heights)),
            char_count,
            word_count,
            ratio(char_count, word_count),
            ratio(uppercase, letters),
            ratio(digits, char_count),
            ratio(punctuation, char_count),
            flag(trimmed.starts_with(|c: char| c.is_ascii_digit())),
            flag(trimmed.ends_with('.')),
        ])
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
