//! Recursive XY-cut over zone bounds.

use std::cmp::Ordering;

use crate::model::{Bounds, ZoneId};

/// Direction of a whitespace cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutDirection {
    /// Horizontal cut (splits top/bottom)
    Horizontal,
    /// Vertical cut (splits left/right)
    Vertical,
}

/// Binary partition of a page's zones produced by XY-cut.
///
/// An in-order traversal yields the reading order: top before bottom,
/// left before right.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingOrderTree {
    /// Zones that cannot be separated by a whitespace gap, in (top, left) order.
    Leaf {
        /// Zones of the leaf
        zones: Vec<ZoneId>,
    },
    /// A cut at a whitespace gap.
    Node {
        /// Direction of the cut
        direction: CutDirection,
        /// Position of the cut (middle of the gap)
        position: f64,
        /// Zones above or left of the cut
        first: Box<ReadingOrderTree>,
        /// Zones below or right of the cut
        second: Box<ReadingOrderTree>,
    },
}

impl ReadingOrderTree {
    /// Zones in reading order.
    pub fn zones(&self) -> Vec<ZoneId> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect(&self, out: &mut Vec<ZoneId>) {
        match self {
            ReadingOrderTree::Leaf { zones } => out.extend_from_slice(zones),
            ReadingOrderTree::Node { first, second, .. } => {
                first.collect(out);
                second.collect(out);
            }
        }
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        match self {
            ReadingOrderTree::Leaf { .. } => 1,
            ReadingOrderTree::Node { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    /// Height of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            ReadingOrderTree::Leaf { .. } => 1,
            ReadingOrderTree::Node { first, second, .. } => 1 + first.depth().max(second.depth()),
        }
    }
}

/// A gap in a projection profile.
struct Gap {
    width: f64,
    position: f64,
}

/// Partition `zones` recursively. Horizontal cuts are tried before vertical ones.
pub(crate) fn xy_cut(zones: &[(ZoneId, Bounds)], min_gap: f64) -> ReadingOrderTree {
    if zones.len() > 1 {
        for direction in [CutDirection::Horizontal, CutDirection::Vertical] {
            if let Some(gap) = widest_gap(zones, direction, min_gap) {
                log::debug!(
                    "{:?} cut at {:.1} (gap {:.1}) over {} zones",
                    direction,
                    gap.position,
                    gap.width,
                    zones.len()
                );
                let (first, second) = split(zones, direction, gap.position);
                return ReadingOrderTree::Node {
                    direction,
                    position: gap.position,
                    first: Box::new(xy_cut(&first, min_gap)),
                    second: Box::new(xy_cut(&second, min_gap)),
                };
            }
        }
    }

    let mut leaf = zones.to_vec();
    leaf.sort_by(top_left);
    ReadingOrderTree::Leaf {
        zones: leaf.into_iter().map(|(id, _)| id).collect(),
    }
}

fn interval(bounds: &Bounds, direction: CutDirection) -> (f64, f64) {
    match direction {
        CutDirection::Horizontal => (bounds.top(), bounds.bottom()),
        CutDirection::Vertical => (bounds.left(), bounds.right()),
    }
}

/// Widest non-empty gap of at least `min_gap` between the projections; the
/// first one wins ties.
fn widest_gap(zones: &[(ZoneId, Bounds)], direction: CutDirection, min_gap: f64) -> Option<Gap> {
    let mut intervals: Vec<(f64, f64)> = zones.iter().map(|(_, b)| interval(b, direction)).collect();
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut best: Option<Gap> = None;
    let mut reach = intervals[0].1;
    for &(start, end) in intervals.iter().skip(1) {
        let width = start - reach;
        if width > 0.0 && width >= min_gap && best.as_ref().map_or(true, |g| width > g.width) {
            best = Some(Gap {
                width,
                position: reach + width / 2.0,
            });
        }
        reach = reach.max(end);
    }
    best
}

fn split(
    zones: &[(ZoneId, Bounds)],
    direction: CutDirection,
    position: f64,
) -> (Vec<(ZoneId, Bounds)>, Vec<(ZoneId, Bounds)>) {
    zones
        .iter()
        .copied()
        .partition(|(_, b)| interval(b, direction).0 < position)
}

fn top_left(a: &(ZoneId, Bounds), b: &(ZoneId, Bounds)) -> Ordering {
    a.1.top()
        .total_cmp(&b.1.top())
        .then(a.1.left().total_cmp(&b.1.left()))
        .then(a.0.cmp(&b.0))
}
