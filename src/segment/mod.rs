//! Page segmentation.
//!
//! This module turns a page of positioned chunks into zones, lines and
//! words using the Docstrum algorithm.

mod component;
mod docstrum;
pub mod histogram;
mod options;

pub use docstrum::{DocstrumSegmenter, PageMetrics};
pub use histogram::{Histogram, Peak, TieBreak};
pub use options::SegmenterOptions;
