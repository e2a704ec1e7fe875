//! Connected component labeling and the [`LabelMap`] type.
//!
//! Labeling is run-length based: each row is split into horizontal runs of
//! foreground pixels, runs overlapping runs of the previous row are merged
//! with union-find, and labels are flattened to 1..n in raster order of first
//! appearance.

#[cfg(test)]
mod tests;

use crate::common::{Buffer2, Mask};
use crate::config::Connectivity;

// ============================================================================
// LabelMap
// ============================================================================

/// A 2D map of region labels. 0 is background, positive values are regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: Buffer2<u32>,
}

impl LabelMap {
    pub fn new(labels: Buffer2<u32>) -> Self {
        Self { labels }
    }

    /// All-background map.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            labels: Buffer2::new_filled(width, height, 0),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.labels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.labels.height()
    }

    /// Raw labels in row-major order.
    #[inline]
    pub fn labels(&self) -> &[u32] {
        self.labels.pixels()
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer2<u32> {
        &self.labels
    }

    #[inline]
    pub fn into_buffer(self) -> Buffer2<u32> {
        self.labels
    }

    /// Largest label value present (0 for an all-background map).
    pub fn max_label(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }

    /// Sorted distinct positive labels.
    pub fn distinct_labels(&self) -> Vec<u32> {
        let mut present = vec![false; self.max_label() as usize + 1];
        for &l in self.labels.iter() {
            present[l as usize] = true;
        }
        present
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &p)| p)
            .map(|(l, _)| l as u32)
            .collect()
    }

    /// Number of distinct positive labels.
    pub fn num_labels(&self) -> usize {
        self.distinct_labels().len()
    }

    /// Pixel count per label value, indexed by label (index 0 is background).
    pub fn areas(&self) -> Vec<usize> {
        let mut areas = vec![0usize; self.max_label() as usize + 1];
        for &l in self.labels.iter() {
            areas[l as usize] += 1;
        }
        areas
    }

    /// Binary footprint of one label.
    pub fn footprint(&self, label: u32) -> Mask {
        self.labels.map(|&l| l == label)
    }

    /// Apply a label lookup table. Labels beyond the table map to 0.
    pub fn remap(&self, table: &[u32]) -> Self {
        Self {
            labels: self
                .labels
                .map(|&l| table.get(l as usize).copied().unwrap_or(0)),
        }
    }
}

impl std::ops::Index<usize> for LabelMap {
    type Output = u32;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.labels[idx]
    }
}

impl std::ops::Index<(usize, usize)> for LabelMap {
    type Output = u32;

    #[inline]
    fn index(&self, xy: (usize, usize)) -> &Self::Output {
        &self.labels[xy]
    }
}

// ============================================================================
// Run-Length Encoding
// ============================================================================

/// A horizontal run of foreground pixels.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u32, // Starting x coordinate (inclusive)
    end: u32,   // Ending x coordinate (exclusive)
    label: u32, // Provisional label
}

impl Run {
    /// Search window in the previous row, end exclusive.
    #[inline]
    fn search_window(&self, connectivity: Connectivity) -> (u32, u32) {
        match connectivity {
            Connectivity::Four => (self.start, self.end),
            Connectivity::Eight => (self.start.saturating_sub(1), self.end + 1),
        }
    }
}

#[inline]
fn runs_connected(prev: &Run, curr: &Run, connectivity: Connectivity) -> bool {
    match connectivity {
        Connectivity::Four => prev.start < curr.end && prev.end > curr.start,
        Connectivity::Eight => prev.start < curr.end + 1 && prev.end + 1 > curr.start,
    }
}

fn extract_runs_from_row(row: &[bool], runs: &mut Vec<Run>) {
    let mut x = 0;
    while x < row.len() {
        if !row[x] {
            x += 1;
            continue;
        }
        let start = x;
        while x < row.len() && row[x] {
            x += 1;
        }
        runs.push(Run {
            start: start as u32,
            end: x as u32,
            label: 0,
        });
    }
}

/// Merge current row's runs with previous row's runs via union-find.
fn merge_runs_with_prev(
    curr_runs: &mut [Run],
    prev_runs: &[Run],
    connectivity: Connectivity,
    uf: &mut UnionFind,
) {
    let mut prev_idx = 0;
    for run in curr_runs.iter_mut() {
        let (search_start, search_end) = run.search_window(connectivity);

        while prev_idx < prev_runs.len() && prev_runs[prev_idx].end <= search_start {
            prev_idx += 1;
        }

        let mut assigned_label = None;
        let mut check_idx = prev_idx;
        while check_idx < prev_runs.len() && prev_runs[check_idx].start < search_end {
            let prev_run = &prev_runs[check_idx];
            if runs_connected(prev_run, run, connectivity) {
                match assigned_label {
                    Some(label) if label != prev_run.label => uf.union(label, prev_run.label),
                    None => assigned_label = Some(prev_run.label),
                    _ => {}
                }
            }
            check_idx += 1;
        }

        run.label = assigned_label.unwrap_or_else(|| uf.make_set());
    }
}

/// Label connected components of `mask`.
///
/// Labels are dense (1..=n) and numbered in raster order of each component's
/// first pixel.
pub fn label_components(mask: &Mask, connectivity: Connectivity) -> LabelMap {
    let width = mask.width();
    let height = mask.height();
    let mut labels = Buffer2::new_filled(width, height, 0u32);

    if width == 0 || height == 0 {
        return LabelMap::new(labels);
    }

    let mut uf = UnionFind::new();
    let mut prev_runs: Vec<Run> = Vec::with_capacity(width / 4);
    let mut curr_runs: Vec<Run> = Vec::with_capacity(width / 4);

    for y in 0..height {
        curr_runs.clear();
        extract_runs_from_row(mask.row(y), &mut curr_runs);

        if curr_runs.is_empty() {
            prev_runs.clear();
            continue;
        }

        merge_runs_with_prev(&mut curr_runs, &prev_runs, connectivity, &mut uf);

        let row = labels.row_mut(y);
        for run in &curr_runs {
            row[run.start as usize..run.end as usize].fill(run.label);
        }

        std::mem::swap(&mut prev_runs, &mut curr_runs);
    }

    uf.flatten_labels(labels.pixels_mut());
    LabelMap::new(labels)
}

/// Drop connected components with fewer than `min_area` pixels.
pub fn remove_small_objects(mask: &Mask, min_area: usize, connectivity: Connectivity) -> Mask {
    if min_area <= 1 {
        return mask.clone();
    }
    let components = label_components(mask, connectivity);
    let areas = components.areas();
    let keep: Vec<bool> = areas
        .iter()
        .enumerate()
        .map(|(label, &area)| label != 0 && area >= min_area)
        .collect();
    components.buffer().map(|&l| keep[l as usize])
}

// ============================================================================
// Union-Find
// ============================================================================

#[derive(Debug)]
struct UnionFind {
    parent: Vec<u32>,
    next_label: u32,
}

impl UnionFind {
    fn new() -> Self {
        Self {
            parent: Vec::with_capacity(256),
            next_label: 1,
        }
    }

    #[inline]
    fn make_set(&mut self) -> u32 {
        let label = self.next_label;
        self.parent.push(label);
        self.next_label += 1;
        label
    }

    /// Find root with two-pass path compression.
    #[inline]
    fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        loop {
            let parent = self.parent[(root - 1) as usize];
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = label;
        while current != root {
            let idx = (current - 1) as usize;
            let parent = self.parent[idx];
            self.parent[idx] = root;
            current = parent;
        }

        root
    }

    #[inline]
    fn union(&mut self, a: u32, b: u32) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            let (smaller, larger) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[(larger - 1) as usize] = smaller;
        }
    }

    /// Flatten provisional labels to sequential 1..n.
    ///
    /// Roots are always the smallest provisional label of their set, and
    /// provisional labels are issued in raster order, so the final numbering
    /// follows raster order of each component's first run.
    fn flatten_labels(&mut self, labels: &mut [u32]) -> usize {
        if self.parent.is_empty() {
            return 0;
        }

        let len = self.parent.len();
        let mut label_map = vec![0u32; len + 1];
        let mut num_labels = 0u32;

        for i in 1..=len as u32 {
            let root = self.find(i);
            if label_map[root as usize] == 0 {
                num_labels += 1;
                label_map[root as usize] = num_labels;
            }
            label_map[i as usize] = label_map[root as usize];
        }

        for l in labels.iter_mut() {
            if *l != 0 {
                *l = label_map[*l as usize];
            }
        }

        num_labels as usize
    }
}
