//! Segmenter options and configuration.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Options for the Docstrum page segmenter.
///
/// Angles are in radians. Distance multipliers are applied to the
/// character and line spacing estimated for each page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterOptions {
    /// Bucket width of the orientation histogram
    pub angle_histogram_resolution: f64,

    /// Smoothing window of the orientation histogram
    pub angle_histogram_smoothing_window_length: f64,

    /// Smoothing standard deviation of the orientation histogram
    pub angle_histogram_smoothing_window_std_deviation: f64,

    /// Bucket width of the spacing histograms
    pub spacing_histogram_resolution: f64,

    /// Smoothing window of the spacing histograms
    pub spacing_histogram_smoothing_window_length: f64,

    /// Smoothing standard deviation of the spacing histograms
    pub spacing_histogram_smoothing_window_std_deviation: f64,

    /// Lines whose heights differ by more than this ratio never share a zone
    pub max_line_size_scale: f64,

    /// Lower clamp of the line-size scale used to normalize distances
    pub min_line_size_scale: f64,

    /// Gap (in character spacings) above which a new word starts
    pub word_distance_multiplier: f64,

    /// Horizontal distance (in character spacings) allowed between lines of a zone
    pub min_horizontal_distance_multiplier: f64,

    /// Vertical distance (in line spacings) allowed between lines of a zone
    pub max_vertical_distance_multiplier: f64,

    /// Vertical gap (in line spacings) below which zones are merged
    pub max_vertical_merge_distance_multiplier: f64,

    /// Perpendicular distance (in line spacings) allowed between components of a line
    pub max_vertical_component_distance_multiplier: f64,

    /// Neighbor search radius and in-line component distance, in character sizes
    pub component_distance_character_multiplier: f64,

    /// Number of nearest neighbors sampled per component
    pub neighbor_count: usize,

    /// Maximum deviation from the page orientation for collinear neighbors
    pub angle_tolerance: f64,

    /// Above this many zones, a page is reduced to a single zone
    pub max_zones_per_page: usize,

    /// Whether to segment pages in parallel
    pub parallel: bool,
}

impl SegmenterOptions {
    /// Create new segmenter options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set spacing histogram resolution, smoothing window length and standard deviation.
    pub fn with_spacing_histogram(mut self, resolution: f64, window: f64, std_dev: f64) -> Self {
        self.spacing_histogram_resolution = resolution;
        self.spacing_histogram_smoothing_window_length = window;
        self.spacing_histogram_smoothing_window_std_deviation = std_dev;
        self
    }

    /// Set angle histogram resolution, smoothing window length and standard deviation.
    pub fn with_angle_histogram(mut self, resolution: f64, window: f64, std_dev: f64) -> Self {
        self.angle_histogram_resolution = resolution;
        self.angle_histogram_smoothing_window_length = window;
        self.angle_histogram_smoothing_window_std_deviation = std_dev;
        self
    }

    /// Set the maximum line size scale.
    pub fn with_max_line_size_scale(mut self, scale: f64) -> Self {
        self.max_line_size_scale = scale;
        self
    }

    /// Set the minimum line size scale.
    pub fn with_min_line_size_scale(mut self, scale: f64) -> Self {
        self.min_line_size_scale = scale;
        self
    }

    /// Set the word distance multiplier.
    pub fn with_word_distance_multiplier(mut self, multiplier: f64) -> Self {
        self.word_distance_multiplier = multiplier;
        self
    }

    /// Set the horizontal line-to-line multiplier for zone formation.
    pub fn with_min_horizontal_distance_multiplier(mut self, multiplier: f64) -> Self {
        self.min_horizontal_distance_multiplier = multiplier;
        self
    }

    /// Set the vertical line-to-line multiplier for zone formation.
    pub fn with_max_vertical_distance_multiplier(mut self, multiplier: f64) -> Self {
        self.max_vertical_distance_multiplier = multiplier;
        self
    }

    /// Set the zone merge multiplier.
    pub fn with_max_vertical_merge_distance_multiplier(mut self, multiplier: f64) -> Self {
        self.max_vertical_merge_distance_multiplier = multiplier;
        self
    }

    /// Set the perpendicular multiplier for line formation.
    pub fn with_max_vertical_component_distance_multiplier(mut self, multiplier: f64) -> Self {
        self.max_vertical_component_distance_multiplier = multiplier;
        self
    }

    /// Set the component distance multiplier.
    pub fn with_component_distance_character_multiplier(mut self, multiplier: f64) -> Self {
        self.component_distance_character_multiplier = multiplier;
        self
    }

    /// Set the number of neighbors sampled per component.
    pub fn with_neighbor_count(mut self, count: usize) -> Self {
        self.neighbor_count = count;
        self
    }

    /// Set the collinearity tolerance in radians.
    pub fn with_angle_tolerance(mut self, radians: f64) -> Self {
        self.angle_tolerance = radians;
        self
    }

    /// Set the zone count above which a page collapses into one zone.
    pub fn with_max_zones_per_page(mut self, max: usize) -> Self {
        self.max_zones_per_page = max;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            angle_histogram_resolution: 0.5_f64.to_radians(),
            angle_histogram_smoothing_window_length: 5.0_f64.to_radians(),
            angle_histogram_smoothing_window_std_deviation: 1.0_f64.to_radians(),
            spacing_histogram_resolution: 0.5,
            spacing_histogram_smoothing_window_length: 2.5,
            spacing_histogram_smoothing_window_std_deviation: 0.5,
            max_line_size_scale: 2.5,
            min_line_size_scale: 0.9,
            word_distance_multiplier: 0.2,
            min_horizontal_distance_multiplier: 1.5,
            max_vertical_distance_multiplier: 1.2,
            max_vertical_merge_distance_multiplier: 0.5,
            max_vertical_component_distance_multiplier: 1.2,
            component_distance_character_multiplier: 3.0,
            neighbor_count: 5,
            angle_tolerance: PI / 6.0,
            max_zones_per_page: 300,
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segmenter_options_builder() {
        let options = SegmenterOptions::new()
            .with_spacing_histogram(2.0, 10.0, 2.0)
            .with_max_line_size_scale(1.5)
            .with_word_distance_multiplier(0.5)
            .sequential();

        assert_eq!(options.spacing_histogram_resolution, 2.0);
        assert_eq!(options.spacing_histogram_smoothing_window_length, 10.0);
        assert_eq!(options.max_line_size_scale, 1.5);
        assert_eq!(options.word_distance_multiplier, 0.5);
        assert!(!options.parallel);
    }

    #[test]
    fn test_defaults_from_partial_json() {
        let options: SegmenterOptions =
            serde_json::from_str(r#"{"max_line_size_scale": 1.5, "parallel": false}"#).unwrap();
        assert_eq!(options.max_line_size_scale, 1.5);
        assert!(!options.parallel);
        assert_eq!(options.neighbor_count, 5);
        assert_eq!(options.max_zones_per_page, 300);
    }
}
