//! Per-region measurements of a finalized label map.

use crate::bbox::Aabb;
use crate::labeling::LabelMap;

/// Measurements of one labeled region. Areas are in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionProps {
    pub label: u32,
    pub area: usize,
    pub bbox: Aabb,
    /// Mean pixel position `(x, y)`.
    pub centroid: (f32, f32),
}

/// Aggregate area over all regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSummary {
    pub min: usize,
    pub mean: f64,
    pub max: usize,
}

/// Region table plus area summary. `summary` is `None` when no region
/// exists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionStats {
    pub regions: Vec<RegionProps>,
    pub summary: Option<AreaSummary>,
}

impl RegionStats {
    /// Measure every positive label of `labels`, in ascending label order.
    pub fn from_labels(labels: &LabelMap) -> Self {
        let n = labels.max_label() as usize + 1;
        let width = labels.width();

        let mut areas = vec![0usize; n];
        let mut sums = vec![(0u64, 0u64); n];
        let mut boxes = vec![Aabb::empty(); n];
        for (idx, &l) in labels.labels().iter().enumerate() {
            if l == 0 {
                continue;
            }
            let (x, y) = (idx % width, idx / width);
            let l = l as usize;
            areas[l] += 1;
            sums[l].0 += x as u64;
            sums[l].1 += y as u64;
            boxes[l].include(x, y);
        }

        let regions: Vec<RegionProps> = (1..n)
            .filter(|&l| areas[l] > 0)
            .map(|l| {
                let area = areas[l];
                RegionProps {
                    label: l as u32,
                    area,
                    bbox: boxes[l],
                    centroid: (
                        (sums[l].0 as f64 / area as f64) as f32,
                        (sums[l].1 as f64 / area as f64) as f32,
                    ),
                }
            })
            .collect();

        let summary = summarize(&regions);
        Self { regions, summary }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region areas in label order.
    pub fn areas(&self) -> Vec<usize> {
        self.regions.iter().map(|r| r.area).collect()
    }
}

fn summarize(regions: &[RegionProps]) -> Option<AreaSummary> {
    let min = regions.iter().map(|r| r.area).min()?;
    let max = regions.iter().map(|r| r.area).max()?;
    let total: usize = regions.iter().map(|r| r.area).sum();
    Some(AreaSummary {
        min,
        mean: total as f64 / regions.len() as f64,
        max,
    })
}
