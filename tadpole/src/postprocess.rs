//! Label post-processing: dense renumbering, rim recovery and area filtering.

use rayon::prelude::*;

use crate::bbox::Aabb;
use crate::common::{Buffer2, Mask};
use crate::config::{Config, Connectivity};
use crate::labeling::{LabelMap, label_components};

/// Finalized labels plus what each step changed.
#[derive(Debug, Clone)]
pub struct PostProcessed {
    pub labels: LabelMap,
    /// Labels present after the first dense renumbering.
    pub relabeled: usize,
    /// Labels dropped by the final area filter.
    pub removed_small: usize,
}

/// Renumber the positive labels to `1..=K` in ascending order of their
/// current value.
pub fn relabel_sequential(labels: &LabelMap) -> LabelMap {
    let mut table = vec![0u32; labels.max_label() as usize + 1];
    for (new, old) in labels.distinct_labels().into_iter().enumerate() {
        table[old as usize] = new as u32 + 1;
    }
    labels.remap(&table)
}

/// Grow every label by one 4-connected step.
///
/// Footprints are taken from the input map and written in ascending label
/// order, so where two grown footprints meet the larger label wins.
pub fn expand_labels(labels: &LabelMap) -> LabelMap {
    let width = labels.width();
    let height = labels.height();

    let mut pixels_by_label: Vec<Vec<usize>> =
        vec![Vec::new(); labels.max_label() as usize + 1];
    for (idx, &l) in labels.labels().iter().enumerate() {
        if l != 0 {
            pixels_by_label[l as usize].push(idx);
        }
    }

    let grown: Vec<Vec<usize>> = pixels_by_label
        .par_iter()
        .map(|pixels| {
            let mut out = Vec::with_capacity(pixels.len() * 2);
            for &idx in pixels {
                let (x, y) = (idx % width, idx / width);
                out.push(idx);
                if x > 0 {
                    out.push(idx - 1);
                }
                if x + 1 < width {
                    out.push(idx + 1);
                }
                if y > 0 {
                    out.push(idx - width);
                }
                if y + 1 < height {
                    out.push(idx + width);
                }
            }
            out
        })
        .collect();

    let mut output = labels.buffer().clone();
    for (label, footprint) in grown.iter().enumerate().skip(1) {
        for &idx in footprint {
            output[idx] = label as u32;
        }
    }
    LabelMap::new(output)
}

/// Keep only the largest connected piece of every label.
///
/// Overlapping rim growth can cut a label in two; the smaller pieces are
/// returned to background. Equal-sized pieces resolve to the one met first
/// in raster order.
pub fn keep_largest_components(labels: &LabelMap, connectivity: Connectivity) -> LabelMap {
    let width = labels.width();
    let mut bounds = vec![Aabb::empty(); labels.max_label() as usize + 1];
    for (idx, &l) in labels.labels().iter().enumerate() {
        if l != 0 {
            bounds[l as usize].include(idx % width, idx / width);
        }
    }

    let to_clear: Vec<usize> = bounds
        .par_iter()
        .enumerate()
        .skip(1)
        .filter(|(_, b)| !b.is_empty())
        .flat_map_iter(|(label, &b)| minor_pieces(labels, label as u32, b, connectivity))
        .collect();

    let mut output = labels.buffer().clone();
    for idx in to_clear {
        output[idx] = 0;
    }
    LabelMap::new(output)
}

/// Pixel indices of every piece of `label` other than its largest.
fn minor_pieces(
    labels: &LabelMap,
    label: u32,
    b: Aabb,
    connectivity: Connectivity,
) -> Vec<usize> {
    let (w, h) = (b.width(), b.height());
    let local: Mask =
        Buffer2::from_fn(w, h, |x, y| labels[(x + b.x_min, y + b.y_min)] == label);

    let pieces = label_components(&local, connectivity);
    if pieces.max_label() <= 1 {
        return Vec::new();
    }

    let areas = pieces.areas();
    let largest = (1..areas.len())
        .max_by(|&p, &q| areas[p].cmp(&areas[q]).then(q.cmp(&p)))
        .unwrap_or(1) as u32;

    pieces
        .labels()
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p != 0 && p != largest)
        .map(|(i, _)| (i / w + b.y_min) * labels.width() + i % w + b.x_min)
        .collect()
}

/// Zero every label with fewer than `min_area` pixels.
pub fn remove_small_labels(labels: &LabelMap, min_area: usize) -> LabelMap {
    let areas = labels.areas();
    let table: Vec<u32> = areas
        .iter()
        .enumerate()
        .map(|(label, &area)| if area >= min_area { label as u32 } else { 0 })
        .collect();
    labels.remap(&table)
}

/// Run the full post-processing chain on raw watershed labels.
///
/// Dense renumbering, one-step rim growth, largest-piece selection, area
/// filtering and a final renumbering so labels are exactly `1..=K`.
pub fn postprocess(raw: &LabelMap, config: &Config) -> PostProcessed {
    let relabeled = relabel_sequential(raw);
    let relabeled_count = relabeled.num_labels();

    let expanded = expand_labels(&relabeled);
    let single = keep_largest_components(&expanded, config.connectivity);
    let before_filter = single.num_labels();
    let filtered = remove_small_labels(&single, config.min_area_final);
    let removed_small = before_filter - filtered.num_labels();
    let labels = relabel_sequential(&filtered);

    tracing::debug!(
        relabeled = relabeled_count,
        removed_small,
        final_labels = labels.num_labels(),
        min_area = config.min_area_final,
        "Post-processed labels"
    );

    PostProcessed {
        labels,
        relabeled: relabeled_count,
        removed_small,
    }
}
