//! Reading-order resolution.
//!
//! Zones are ordered by a recursive XY-cut over their bounds: the page is
//! split at the widest full-width horizontal whitespace band first, then at
//! the widest full-height vertical band, until no band is left. Inside every
//! zone, lines are ordered top-down and words and chunks left to right.
//!
//! The order is recomputed from geometry alone on every call, so resolving
//! an already resolved page changes nothing. Code that changes zone
//! membership (see [`crate::model::Page::split_zone`]) must resolve again.

mod xy_cut;

pub use xy_cut::{CutDirection, ReadingOrderTree};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Bounds, Document, Page, ZoneId};

/// Options for reading-order resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Narrowest whitespace band that separates zones
    pub min_gap: f64,

    /// Whether to re-sort lines, words and chunks inside each zone
    pub reorder_contents: bool,
}

impl ResolverOptions {
    /// Create new resolver options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the narrowest separating whitespace band.
    pub fn with_min_gap(mut self, min_gap: f64) -> Self {
        self.min_gap = min_gap;
        self
    }

    /// Enable or disable re-sorting of zone contents.
    pub fn with_reorder_contents(mut self, reorder: bool) -> Self {
        self.reorder_contents = reorder;
        self
    }
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            min_gap: 0.0,
            reorder_contents: true,
        }
    }
}

/// Hierarchical reading-order resolver.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalReadingOrderResolver {
    options: ResolverOptions,
}

impl HierarchicalReadingOrderResolver {
    /// Create a resolver with the given options.
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// The resolver options.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve the reading order of every page.
    ///
    /// Stops at the first page that fails; pages before it stay resolved.
    pub fn resolve(&self, document: &mut Document) -> Result<()> {
        for page in document.pages.iter_mut() {
            self.resolve_page(page)?;
        }
        Ok(())
    }

    /// Resolve the reading order of a page.
    ///
    /// Fails with [`Error::Analysis`], leaving the page untouched, if a zone
    /// has missing or invalid bounds.
    pub fn resolve_page(&self, page: &mut Page) -> Result<()> {
        let tree = self.reading_order_tree(page)?;
        page.set_zone_order(tree.zones());
        if self.options.reorder_contents {
            reorder_contents(page);
        }
        Ok(())
    }

    /// The XY-cut partition of a page's zones.
    pub fn reading_order_tree(&self, page: &Page) -> Result<ReadingOrderTree> {
        let zones = zone_bounds(page)?;
        Ok(xy_cut::xy_cut(&zones, self.options.min_gap))
    }
}

fn zone_bounds(page: &Page) -> Result<Vec<(ZoneId, Bounds)>> {
    page.zones()
        .map(|(id, zone)| {
            let bounds = zone.bounds().ok_or_else(|| {
                Error::Analysis(format!(
                    "zone {} on page {} has no bounds",
                    id.index(),
                    page.number
                ))
            })?;
            bounds.validate().map_err(|e| {
                Error::analysis(format!("zone {} on page {}", id.index(), page.number), &e)
            })?;
            Ok((id, *bounds))
        })
        .collect()
}

/// Elements without bounds sort last; ties keep arena order.
fn position_order(a: Option<&Bounds>, b: Option<&Bounds>, vertical_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let (a1, a2, b1, b2) = if vertical_first {
                (a.top(), a.left(), b.top(), b.left())
            } else {
                (a.left(), a.top(), b.left(), b.top())
            };
            a1.total_cmp(&b1).then(a2.total_cmp(&b2))
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn reorder_contents(page: &mut Page) {
    let zone_ids = page.zone_ids().to_vec();
    for zone in zone_ids {
        let mut lines = page.zone(zone).lines().to_vec();
        lines.sort_by(|&a, &b| {
            position_order(page.line(a).bounds(), page.line(b).bounds(), true).then(a.cmp(&b))
        });

        for &line in &lines {
            let mut words = page.line(line).words().to_vec();
            words.sort_by(|&a, &b| {
                position_order(page.word(a).bounds(), page.word(b).bounds(), false).then(a.cmp(&b))
            });

            for &word in &words {
                let mut chunks = page.word(word).chunks().to_vec();
                chunks.sort_by(|&a, &b| {
                    position_order(page.chunk(a).bounds(), page.chunk(b).bounds(), false)
                        .then(a.cmp(&b))
                });
                page.word_mut(word).chunks = chunks;
            }
            page.line_mut(line).words = words;
        }
        page.zone_mut(zone).lines = lines;
    }
}
