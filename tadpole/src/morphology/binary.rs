//! Binary morphology: dilation, erosion and hole filling.

use rayon::prelude::*;

use super::Disk;
use crate::common::{Buffer2, Mask};
use crate::config::{Connectivity, neighbors};

/// Per-row prefix counts of set pixels; `prefix[y][x]` counts `row[..x]`.
fn row_prefix_counts(mask: &Mask) -> Vec<Vec<u32>> {
    (0..mask.height())
        .into_par_iter()
        .map(|y| {
            let mut prefix = Vec::with_capacity(mask.width() + 1);
            let mut acc = 0u32;
            prefix.push(0);
            for &v in mask.row(y) {
                acc += v as u32;
                prefix.push(acc);
            }
            prefix
        })
        .collect()
}

/// Dilate a binary mask with a disk of the given radius.
///
/// Each output row is the OR over the disk's row spans of the horizontally
/// dilated source rows, so rows are computed independently in parallel.
pub fn dilate(mask: &Mask, radius: usize) -> Mask {
    if radius == 0 || mask.is_empty() {
        return mask.clone();
    }

    let width = mask.width();
    let height = mask.height();
    let disk = Disk::new(radius);
    let prefix = row_prefix_counts(mask);

    let mut output = Mask::new_filled(width, height, false);
    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (dy, hw) in disk.spans() {
                let Some(sy) = y.checked_add_signed(dy) else {
                    continue;
                };
                if sy >= height {
                    continue;
                }
                let counts = &prefix[sy];
                if counts[width] == 0 {
                    continue;
                }
                for (x, out) in out_row.iter_mut().enumerate() {
                    if *out {
                        continue;
                    }
                    let lo = x.saturating_sub(hw);
                    let hi = (x + hw + 1).min(width);
                    *out = counts[hi] > counts[lo];
                }
            }
        });

    output
}

/// Erode a binary mask with a disk of the given radius.
///
/// A pixel survives when every in-image pixel under the disk is set.
pub fn erode(mask: &Mask, radius: usize) -> Mask {
    if radius == 0 || mask.is_empty() {
        return mask.clone();
    }
    let inverted = mask.map(|&v| !v);
    dilate(&inverted, radius).map(|&v| !v)
}

/// Fill background regions not connected to the image border.
///
/// Background connectivity is the complement of `connectivity`, so holes
/// fully enclosed by an 8-connected outline are filled.
pub fn fill_holes(mask: &Mask, connectivity: Connectivity) -> Mask {
    let width = mask.width();
    let height = mask.height();
    if mask.is_empty() {
        return mask.clone();
    }

    let background_connectivity = connectivity.complement();
    let mut outside = Buffer2::new_filled(width, height, false);
    let mut stack: Vec<usize> = Vec::new();

    let seed = |idx: usize, outside: &mut Buffer2<bool>, stack: &mut Vec<usize>| {
        if !mask[idx] && !outside[idx] {
            outside[idx] = true;
            stack.push(idx);
        }
    };

    for x in 0..width {
        seed(x, &mut outside, &mut stack);
        seed((height - 1) * width + x, &mut outside, &mut stack);
    }
    for y in 0..height {
        seed(y * width, &mut outside, &mut stack);
        seed(y * width + width - 1, &mut outside, &mut stack);
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % width, idx / width);
        for n in neighbors(x, y, width, height, background_connectivity) {
            seed(n, &mut outside, &mut stack);
        }
    }

    outside.map(|&o| !o)
}
