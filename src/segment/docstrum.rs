//! Docstrum page segmenter.
//!
//! Groups the chunks of a page into words, lines and zones from the
//! statistics of nearest-neighbor pairs: the dominant neighbor angle gives
//! the text orientation, the dominant neighbor distances along and across
//! it give the character and line spacing, and every later grouping
//! threshold is a multiple of those two spacings.

use std::f64::consts::{FRAC_PI_2, PI};

use rayon::prelude::*;

use super::component::{
    angle_difference, find_neighbors, sort_components, Component, ComponentLine, Neighbor,
    UnionFind,
};
use super::histogram::Histogram;
use super::SegmenterOptions;
use crate::error::{Error, Result};
use crate::model::{Bounds, BoundsBuilder, Chunk, Document, Page};

/// Page-level statistics every grouping threshold is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMetrics {
    /// Dominant text direction in radians (0 for horizontal text)
    pub orientation: f64,
    /// Typical center distance between consecutive characters
    pub character_spacing: f64,
    /// Typical distance between consecutive lines
    pub line_spacing: f64,
}

/// Docstrum segmenter: chunks → words → lines → zones.
#[derive(Debug, Clone, Default)]
pub struct DocstrumSegmenter {
    options: SegmenterOptions,
}

struct ZoneDraft {
    lines: Vec<usize>,
    bounds: Bounds,
}

impl DocstrumSegmenter {
    /// Create a segmenter with the given options.
    pub fn new(options: SegmenterOptions) -> Self {
        Self { options }
    }

    /// The segmenter options.
    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    /// Segment every page of a document.
    ///
    /// Pages are independent; with `parallel` set they are segmented on the
    /// rayon pool. The result keeps page order, and the first failing page
    /// fails the whole document.
    pub fn segment_document(&self, document: &Document) -> Result<Document> {
        let pages = if self.options.parallel {
            document
                .pages
                .par_iter()
                .map(|page| self.segment_page(page))
                .collect::<Result<Vec<_>>>()?
        } else {
            document
                .pages
                .iter()
                .map(|page| self.segment_page(page))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Document { pages })
    }

    /// Segment a page.
    ///
    /// Returns a new page holding the same chunks grouped into unlabeled
    /// zones. Fails with [`Error::Analysis`] if any chunk lacks valid bounds.
    pub fn segment_page(&self, page: &Page) -> Result<Page> {
        let components = self.components(page)?;
        let chunks: Vec<Chunk> = page.chunks().map(|(_, chunk)| chunk.clone()).collect();
        let mut segmented = Page::from_chunks(page.number, chunks);
        if components.is_empty() {
            return Ok(segmented);
        }

        let neighbors = find_neighbors(
            &components,
            self.options.neighbor_count.max(1),
            self.search_radius(&components),
        );
        let mut metrics = self.estimate_metrics(&components, &neighbors);
        let lines = self.build_lines(&components, &neighbors, &mut metrics);
        log::debug!(
            "Page {}: orientation {:.4} rad, character spacing {:.2}, line spacing {:.2}",
            page.number,
            metrics.orientation,
            metrics.character_spacing,
            metrics.line_spacing
        );

        let line_bounds: Vec<Bounds> = lines
            .iter()
            .map(|line| line_bounds(line, &components))
            .collect();
        let zones = self.build_zones(&lines, &metrics);
        let zones = self.merge_zones(zones, &line_bounds, &metrics);
        let (lines, zones) = self.merge_lines(lines, zones, &components, &metrics);

        self.emit(&mut segmented, &components, &lines, zones, &metrics);
        Ok(segmented)
    }

    /// Estimate orientation and spacing of a page without grouping it.
    pub fn page_metrics(&self, page: &Page) -> Result<Option<PageMetrics>> {
        let components = self.components(page)?;
        if components.is_empty() {
            return Ok(None);
        }
        let neighbors = find_neighbors(
            &components,
            self.options.neighbor_count.max(1),
            self.search_radius(&components),
        );
        let mut metrics = self.estimate_metrics(&components, &neighbors);
        self.build_lines(&components, &neighbors, &mut metrics);
        Ok(Some(metrics))
    }

    /// Validate every chunk and reduce it to a component.
    fn components(&self, page: &Page) -> Result<Vec<Component>> {
        let mut components = Vec::with_capacity(page.chunk_count());
        for (id, chunk) in page.chunks() {
            let bounds = chunk.bounds().ok_or_else(|| {
                Error::Analysis(format!(
                    "chunk {} on page {} has no bounds",
                    id.index(),
                    page.number
                ))
            })?;
            bounds.validate().map_err(|e| {
                Error::analysis(format!("chunk {} on page {}", id.index(), page.number), &e)
            })?;
            components.push(Component::new(id, bounds));
        }
        sort_components(&mut components);
        Ok(components)
    }

    fn search_radius(&self, components: &[Component]) -> f64 {
        let mut sizes: Vec<f64> = components.iter().map(Component::size).collect();
        sizes.sort_by(f64::total_cmp);
        let median = sizes[sizes.len() / 2];
        median * self.options.component_distance_character_multiplier
    }

    fn estimate_metrics(&self, components: &[Component], neighbors: &[Vec<Neighbor>]) -> PageMetrics {
        let orientation = self.estimate_orientation(neighbors);
        let tolerance = self.options.angle_tolerance;

        let mut along_samples = Vec::new();
        let mut across_samples = Vec::new();
        for (i, list) in neighbors.iter().enumerate() {
            let c = &components[i];
            if let Some(n) = list
                .iter()
                .find(|n| angle_difference(n.angle, orientation) <= tolerance)
            {
                along_samples.push((components[n.index].along(orientation) - c.along(orientation)).abs());
            }
            if let Some(n) = list
                .iter()
                .find(|n| angle_difference(n.angle, orientation + FRAC_PI_2) <= tolerance)
            {
                across_samples.push((components[n.index].across(orientation) - c.across(orientation)).abs());
            }
        }

        let count = components.len() as f64;
        let mean_width = components.iter().map(|c| c.width).sum::<f64>() / count;
        let mean_height = components.iter().map(|c| c.height).sum::<f64>() / count;

        PageMetrics {
            orientation,
            character_spacing: self.spacing_peak(&along_samples).unwrap_or(mean_width),
            line_spacing: self.spacing_peak(&across_samples).unwrap_or(mean_height),
        }
    }

    /// Peak of the circularly smoothed histogram of nearest-neighbor angles.
    fn estimate_orientation(&self, neighbors: &[Vec<Neighbor>]) -> f64 {
        let mut histogram = Histogram::new(
            -FRAC_PI_2,
            FRAC_PI_2,
            self.options.angle_histogram_resolution,
        );
        for nearest in neighbors.iter().filter_map(|list| list.first()) {
            histogram.add(nearest.angle);
        }
        histogram.circular_gaussian_smooth(
            self.options.angle_histogram_smoothing_window_length,
            self.options.angle_histogram_smoothing_window_std_deviation,
        );
        histogram.peak().map(|p| p.value).unwrap_or(0.0)
    }

    fn spacing_peak(&self, samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let mut histogram = Histogram::from_samples(samples, self.options.spacing_histogram_resolution);
        histogram.gaussian_smooth(
            self.options.spacing_histogram_smoothing_window_length,
            self.options.spacing_histogram_smoothing_window_std_deviation,
        );
        histogram.peak().map(|p| p.value)
    }

    /// Join collinear neighbors into lines, then refine the orientation to
    /// the length-weighted mean angle of the fitted lines.
    fn build_lines(
        &self,
        components: &[Component],
        neighbors: &[Vec<Neighbor>],
        metrics: &mut PageMetrics,
    ) -> Vec<ComponentLine> {
        let theta = metrics.orientation;
        let max_along = metrics.character_spacing * self.options.component_distance_character_multiplier;
        let max_across = metrics.line_spacing * self.options.max_vertical_component_distance_multiplier;

        let mut sets = UnionFind::new(components.len());
        for (i, list) in neighbors.iter().enumerate() {
            let c = &components[i];
            for n in list {
                if angle_difference(n.angle, theta) > self.options.angle_tolerance {
                    continue;
                }
                let other = &components[n.index];
                let along = (other.along(theta) - c.along(theta)).abs();
                let across = (other.across(theta) - c.across(theta)).abs();
                if along <= max_along && across <= max_across {
                    sets.union(i, n.index);
                }
            }
        }
        let groups = sets.groups();

        let fitted: Vec<ComponentLine> = groups
            .iter()
            .map(|members| ComponentLine::fit(members.clone(), components, theta))
            .collect();
        let (weighted, total) = fitted
            .iter()
            .filter(|line| line.members.len() > 1)
            .fold((0.0, 0.0), |(sum, len), line| {
                (sum + line.angle * line.length(), len + line.length())
            });
        if total > 0.0 {
            metrics.orientation = fold_angle(weighted / total);
        }

        groups
            .into_iter()
            .map(|members| ComponentLine::fit(members, components, metrics.orientation))
            .collect()
    }

    /// Group lines into zones; returns line indices per zone.
    fn build_zones(&self, lines: &[ComponentLine], metrics: &PageMetrics) -> Vec<Vec<usize>> {
        let total_length: f64 = lines.iter().map(ComponentLine::length).sum();
        let mean_height = if total_length > 0.0 {
            lines.iter().map(|l| l.height * l.length()).sum::<f64>() / total_length
        } else {
            lines.iter().map(|l| l.height).sum::<f64>() / lines.len() as f64
        };
        let max_horizontal = metrics.character_spacing * self.options.min_horizontal_distance_multiplier;
        let max_vertical = metrics.line_spacing * self.options.max_vertical_distance_multiplier;

        let mut sets = UnionFind::new(lines.len());
        for i in 0..lines.len() {
            for j in i + 1..lines.len() {
                let (a, b) = (&lines[i], &lines[j]);
                let small = a.height.min(b.height);
                let large = a.height.max(b.height);
                if large > small * self.options.max_line_size_scale {
                    continue;
                }
                let scale = if mean_height > 0.0 {
                    (small / mean_height)
                        .max(self.options.min_line_size_scale)
                        .min(self.options.max_line_size_scale)
                } else {
                    1.0
                };
                let horizontal = a.horizontal_distance(b) / scale;
                let vertical = a.vertical_distance(b) / scale;
                if horizontal <= max_horizontal && vertical <= max_vertical {
                    sets.union(i, j);
                }
            }
        }
        sets.groups()
    }

    /// Absorb contained zones and merge zones separated by a small vertical gap.
    fn merge_zones(
        &self,
        zones: Vec<Vec<usize>>,
        line_bounds: &[Bounds],
        metrics: &PageMetrics,
    ) -> Vec<Vec<usize>> {
        let tolerance = metrics.character_spacing / 2.0;
        let merge_distance = metrics.line_spacing * self.options.max_vertical_merge_distance_multiplier;

        let mut drafts: Vec<Option<ZoneDraft>> = zones
            .into_iter()
            .map(|lines| {
                let bounds = lines
                    .iter()
                    .map(|&l| &line_bounds[l])
                    .collect::<BoundsBuilder>()
                    .bounds()
                    .unwrap_or_default();
                Some(ZoneDraft { lines, bounds })
            })
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..drafts.len() {
                for j in i + 1..drafts.len() {
                    let merge = match (&drafts[i], &drafts[j]) {
                        (Some(a), Some(b)) => {
                            a.bounds.contains_with_tolerance(&b.bounds, tolerance)
                                || b.bounds.contains_with_tolerance(&a.bounds, tolerance)
                                || (a.bounds.horizontal_gap(&b.bounds) < 0.0
                                    && a.bounds.vertical_gap(&b.bounds) < merge_distance)
                        }
                        _ => false,
                    };
                    if !merge {
                        continue;
                    }
                    if let Some(absorbed) = drafts[j].take() {
                        if let Some(target) = drafts[i].as_mut() {
                            target.bounds = target.bounds.expand(&absorbed.bounds);
                            target.lines.extend(absorbed.lines);
                        }
                        changed = true;
                    }
                }
            }
        }

        drafts.into_iter().flatten().map(|d| d.lines).collect()
    }

    /// Fuse lines of a zone lying within the merge distance of each other vertically.
    fn merge_lines(
        &self,
        lines: Vec<ComponentLine>,
        zones: Vec<Vec<usize>>,
        components: &[Component],
        metrics: &PageMetrics,
    ) -> (Vec<ComponentLine>, Vec<Vec<usize>>) {
        let merge_distance = metrics.line_spacing * self.options.max_vertical_merge_distance_multiplier;
        let mut merged_lines = Vec::new();
        let mut merged_zones = Vec::with_capacity(zones.len());

        for zone in zones {
            let mut sets = UnionFind::new(zone.len());
            for a in 0..zone.len() {
                for b in a + 1..zone.len() {
                    if lines[zone[a]].vertical_distance(&lines[zone[b]]) <= merge_distance {
                        sets.union(a, b);
                    }
                }
            }
            let mut zone_lines = Vec::new();
            for group in sets.groups() {
                if group.len() == 1 {
                    merged_lines.push(lines[zone[group[0]]].clone());
                } else {
                    let members = group
                        .iter()
                        .flat_map(|&g| lines[zone[g]].members.iter().copied())
                        .collect();
                    merged_lines.push(ComponentLine::fit(members, components, metrics.orientation));
                }
                zone_lines.push(merged_lines.len() - 1);
            }
            merged_zones.push(zone_lines);
        }
        (merged_lines, merged_zones)
    }

    /// Write words, lines and zones into the page arena in top-down order.
    fn emit(
        &self,
        page: &mut Page,
        components: &[Component],
        lines: &[ComponentLine],
        mut zones: Vec<Vec<usize>>,
        metrics: &PageMetrics,
    ) {
        let word_gap = metrics.character_spacing * self.options.word_distance_multiplier;
        let line_bounds: Vec<Bounds> = lines.iter().map(|l| line_bounds(l, components)).collect();

        if zones.len() > self.options.max_zones_per_page {
            log::debug!(
                "Page {}: {} zones exceed the limit of {}, grouping all lines into one zone",
                page.number,
                zones.len(),
                self.options.max_zones_per_page
            );
            zones = vec![zones.into_iter().flatten().collect()];
        }

        for zone in zones.iter_mut() {
            zone.sort_by(|&a, &b| top_left_order(&line_bounds[a], &line_bounds[b]));
        }
        let zone_bounds: Vec<Bounds> = zones
            .iter()
            .map(|zone| {
                zone.iter()
                    .map(|&l| &line_bounds[l])
                    .collect::<BoundsBuilder>()
                    .bounds()
                    .unwrap_or_default()
            })
            .collect();
        let mut order: Vec<usize> = (0..zones.len()).collect();
        order.sort_by(|&a, &b| top_left_order(&zone_bounds[a], &zone_bounds[b]));

        for z in order {
            let mut line_ids = Vec::with_capacity(zones[z].len());
            for &l in &zones[z] {
                let word_ids = lines[l]
                    .words(components, word_gap)
                    .into_iter()
                    .map(|word| page.add_word(word.into_iter().map(|c| components[c].chunk).collect()))
                    .collect();
                line_ids.push(page.add_line(word_ids));
            }
            page.add_zone(line_ids, None);
        }
    }
}

fn line_bounds(line: &ComponentLine, components: &[Component]) -> Bounds {
    let mut builder = BoundsBuilder::new();
    for &m in &line.members {
        builder.expand(&components[m].bounds());
    }
    builder.bounds().unwrap_or_default()
}

fn top_left_order(a: &Bounds, b: &Bounds) -> std::cmp::Ordering {
    a.top().total_cmp(&b.top()).then(a.left().total_cmp(&b.left()))
}

fn fold_angle(angle: f64) -> f64 {
    let folded = angle.rem_euclid(PI);
    if folded > FRAC_PI_2 {
        folded - PI
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_line(page: &mut Page, text: &str, x: f64, y: f64) {
        let mut cursor = x;
        for word in text.split(' ') {
            for ch in word.chars() {
                page.add_chunk(Chunk::new(Bounds::new(cursor, y, 6.0, 10.0), ch.to_string()));
                cursor += 6.0;
            }
            cursor += 4.0;
        }
    }

    #[test]
    fn test_empty_page() {
        let segmented = DocstrumSegmenter::default()
            .segment_page(&Page::new(1))
            .unwrap();
        assert_eq!(segmented.zone_count(), 0);
    }

    #[test]
    fn test_single_chunk() {
        let mut page = Page::new(1);
        page.add_chunk(Chunk::new(Bounds::new(10.0, 10.0, 6.0, 10.0), "x"));
        let segmented = DocstrumSegmenter::default().segment_page(&page).unwrap();
        assert_eq!(segmented.zone_count(), 1);
        assert_eq!(segmented.line_count(), 1);
        assert_eq!(segmented.word_count(), 1);
    }

    #[test]
    fn test_words_and_lines() {
        let mut page = Page::new(1);
        text_line(&mut page, "hello big world", 20.0, 20.0);
        text_line(&mut page, "second line here", 20.0, 34.0);
        let segmented = DocstrumSegmenter::default().segment_page(&page).unwrap();

        assert_eq!(segmented.zone_count(), 1);
        assert_eq!(segmented.plain_text(), "hello big world\nsecond line here");
    }

    #[test]
    fn test_metrics_of_horizontal_text() {
        let mut page = Page::new(1);
        for row in 0..4 {
            text_line(&mut page, "the quick brown fox jumps", 20.0, 20.0 + row as f64 * 14.0);
        }
        let metrics = DocstrumSegmenter::default()
            .page_metrics(&page)
            .unwrap()
            .unwrap();
        assert!(metrics.orientation.abs() < 1e-6);
        assert!((metrics.character_spacing - 6.0).abs() <= 0.5);
        assert!((metrics.line_spacing - 14.0).abs() <= 0.5);
    }

    #[test]
    fn test_missing_bounds_fails() {
        let mut page = Page::new(2);
        text_line(&mut page, "valid text", 20.0, 20.0);
        page.add_chunk(Chunk::without_bounds("?"));
        let err = DocstrumSegmenter::default().segment_page(&page).unwrap_err();
        assert!(matches!(err, Error::Analysis(_)));
    }

    #[test]
    fn test_zone_limit_collapses_page() {
        let mut page = Page::new(1);
        text_line(&mut page, "top", 20.0, 20.0);
        text_line(&mut page, "bottom", 20.0, 400.0);
        let segmenter = DocstrumSegmenter::new(SegmenterOptions::new().with_max_zones_per_page(1));
        let segmented = segmenter.segment_page(&page).unwrap();
        assert_eq!(segmented.zone_count(), 1);
        assert_eq!(segmented.line_count(), 2);
        let zone = segmented.zone_ids()[0];
        assert_eq!(segmented.zone(zone).label(), None);
        assert_eq!(segmented.plain_text(), "top\nbottom");
    }
}
