//! Connected components, their nearest neighbors and fitted component lines.
//!
//! A component is the center of one chunk. All directional quantities are
//! expressed relative to an orientation `theta`: `along` is the coordinate in
//! the text direction, `across` the coordinate perpendicular to it.

use std::cmp::Ordering;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::model::{Bounds, ChunkId};

/// A chunk reduced to its center and extent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Component {
    pub chunk: ChunkId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Component {
    pub fn new(chunk: ChunkId, bounds: &Bounds) -> Self {
        let (x, y) = bounds.center();
        Self {
            chunk,
            x,
            y,
            width: bounds.width,
            height: bounds.height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    /// Character size used for the neighbor search radius.
    pub fn size(&self) -> f64 {
        self.width.max(self.height)
    }

    pub fn distance(&self, other: &Component) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Direction to `other`, folded into `(-pi/2, pi/2]`.
    pub fn angle(&self, other: &Component) -> f64 {
        line_angle(other.x - self.x, other.y - self.y)
    }

    pub fn along(&self, theta: f64) -> f64 {
        self.x * theta.cos() + self.y * theta.sin()
    }

    pub fn across(&self, theta: f64) -> f64 {
        -self.x * theta.sin() + self.y * theta.cos()
    }

    /// Half of the extent projected on the text direction.
    pub fn half_extent(&self, theta: f64) -> f64 {
        (self.width * theta.cos().abs() + self.height * theta.sin().abs()) / 2.0
    }

    /// Extent projected on the perpendicular of the text direction.
    pub fn thickness(&self, theta: f64) -> f64 {
        self.width * theta.sin().abs() + self.height * theta.cos().abs()
    }
}

/// Angle of the direction `(dx, dy)` folded into `(-pi/2, pi/2]`.
///
/// Text lines are symmetric, so a direction and its opposite are the same.
pub(crate) fn line_angle(dx: f64, dy: f64) -> f64 {
    let angle = dy.atan2(dx);
    if angle <= -FRAC_PI_2 {
        angle + PI
    } else if angle > FRAC_PI_2 {
        angle - PI
    } else {
        angle
    }
}

/// Smallest difference between two line angles, modulo pi.
pub(crate) fn angle_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(PI);
    d.min(PI - d)
}

/// Sort components top-down, then left to right.
pub(crate) fn sort_components(components: &mut [Component]) {
    components.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Neighbor {
    pub index: usize,
    pub distance: f64,
    pub angle: f64,
}

/// The `k` nearest neighbors of every component within `radius`.
///
/// `components` must be sorted by [`sort_components`]; the scan stops as
/// soon as the vertical offset alone exceeds the radius. Neighbors are
/// ordered by distance, then by index.
pub(crate) fn find_neighbors(components: &[Component], k: usize, radius: f64) -> Vec<Vec<Neighbor>> {
    components
        .iter()
        .enumerate()
        .map(|(i, component)| {
            let mut candidates = Vec::new();
            let mut consider = |j: usize| {
                let other = &components[j];
                let distance = component.distance(other);
                if distance <= radius {
                    candidates.push(Neighbor {
                        index: j,
                        distance,
                        angle: component.angle(other),
                    });
                }
            };
            for j in (0..i).rev() {
                if component.y - components[j].y > radius {
                    break;
                }
                consider(j);
            }
            for j in i + 1..components.len() {
                if components[j].y - component.y > radius {
                    break;
                }
                consider(j);
            }
            candidates.sort_by(|a, b| {
                a.distance
                    .total_cmp(&b.distance)
                    .then(a.index.cmp(&b.index))
            });
            candidates.truncate(k);
            candidates
        })
        .collect()
}

/// Disjoint sets over `0..n`.
#[derive(Debug, Clone)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// All sets, ordered by their smallest member; members ascending.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut slot_of_root = vec![usize::MAX; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for x in 0..n {
            let root = self.find(x);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[slot_of_root[root]].push(x);
        }
        groups
    }
}

/// A straight line fitted through the centers of its components.
#[derive(Debug, Clone)]
pub(crate) struct ComponentLine {
    /// Component indices, ordered along the text direction
    pub members: Vec<usize>,
    /// Fitted angle
    pub angle: f64,
    /// Orientation the line was fitted against
    theta: f64,
    /// Extent along `theta`, component edges included
    start: f64,
    end: f64,
    /// Across coordinate of the fitted line at its midpoint
    mid_across: f64,
    /// Mean component thickness
    pub height: f64,
}

impl ComponentLine {
    /// Fit a line through `members` by least squares in the frame of `theta`.
    pub fn fit(mut members: Vec<usize>, components: &[Component], theta: f64) -> Self {
        members.sort_by(|&a, &b| {
            components[a]
                .along(theta)
                .total_cmp(&components[b].along(theta))
                .then(a.cmp(&b))
        });

        let n = members.len() as f64;
        let (mut su, mut sv, mut suu, mut suv) = (0.0, 0.0, 0.0, 0.0);
        let (mut start, mut end) = (f64::INFINITY, f64::NEG_INFINITY);
        let mut thickness = 0.0;
        for &m in &members {
            let c = &components[m];
            let (u, v) = (c.along(theta), c.across(theta));
            su += u;
            sv += v;
            suu += u * u;
            suv += u * v;
            let half = c.half_extent(theta);
            start = start.min(u - half);
            end = end.max(u + half);
            thickness += c.thickness(theta);
        }

        let denominator = n * suu - su * su;
        let slope = if members.len() > 1 && denominator.abs() > f64::EPSILON {
            (n * suv - su * sv) / denominator
        } else {
            0.0
        };
        let intercept = (sv - slope * su) / n;
        let mid_along = (start + end) / 2.0;

        Self {
            members,
            angle: theta + slope.atan(),
            theta,
            start,
            end,
            mid_across: intercept + slope * mid_along,
            height: thickness / n,
        }
    }

    /// Extent along the text direction.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Gap between the extents along the text direction; negative when they overlap.
    pub fn horizontal_distance(&self, other: &ComponentLine) -> f64 {
        self.start.max(other.start) - self.end.min(other.end)
    }

    /// Distance between the fitted midpoints, perpendicular to the text direction.
    pub fn vertical_distance(&self, other: &ComponentLine) -> f64 {
        (other.mid_across - self.mid_across).abs()
    }

    /// Split into words: a new word starts where the gap between consecutive
    /// components exceeds `max_gap`.
    pub fn words(&self, components: &[Component], max_gap: f64) -> Vec<Vec<usize>> {
        let mut words: Vec<Vec<usize>> = Vec::new();
        let mut previous: Option<&Component> = None;
        for &m in &self.members {
            let c = &components[m];
            let split = match previous {
                Some(p) => {
                    let gap = (c.along(self.theta) - p.along(self.theta))
                        - (c.half_extent(self.theta) + p.half_extent(self.theta));
                    gap > max_gap
                }
                None => true,
            };
            if split {
                words.push(vec![m]);
            } else if let Some(word) = words.last_mut() {
                word.push(m);
            }
            previous = Some(c);
        }
        words
    }
}
