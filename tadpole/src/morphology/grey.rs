//! Grey-level erosion, dilation, opening and white top-hat with a flat disk.
//!
//! Each output row is the pixel-wise extreme over the disk's row spans of
//! horizontally filtered source rows. The horizontal filter is a sliding
//! window extreme using a monotonic deque, so the cost per pixel is
//! proportional to the disk diameter and independent of its area.

use std::collections::VecDeque;

use rayon::prelude::*;

use super::Disk;
use crate::common::Buffer2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

impl Extreme {
    /// `a` replaces `b` in the deque when it is at least as extreme.
    #[inline]
    fn dominates(self, a: f32, b: f32) -> bool {
        match self {
            Extreme::Min => a <= b,
            Extreme::Max => a >= b,
        }
    }

    #[inline]
    fn pick(self, a: f32, b: f32) -> f32 {
        match self {
            Extreme::Min => a.min(b),
            Extreme::Max => a.max(b),
        }
    }

    fn identity(self) -> f32 {
        match self {
            Extreme::Min => f32::INFINITY,
            Extreme::Max => f32::NEG_INFINITY,
        }
    }
}

/// Sliding window extreme over `[x - hw, x + hw]` clipped to the row.
fn window_extreme(
    row: &[f32],
    hw: usize,
    op: Extreme,
    deque: &mut VecDeque<usize>,
    out: &mut [f32],
) {
    debug_assert_eq!(row.len(), out.len());
    let n = row.len();
    deque.clear();
    let mut next = 0;

    for (x, slot) in out.iter_mut().enumerate() {
        let hi = (x + hw).min(n - 1);
        while next <= hi {
            while deque
                .back()
                .is_some_and(|&b| op.dominates(row[next], row[b]))
            {
                deque.pop_back();
            }
            deque.push_back(next);
            next += 1;
        }

        let lo = x.saturating_sub(hw);
        while deque.front().is_some_and(|&f| f < lo) {
            deque.pop_front();
        }

        *slot = row[deque[0]];
    }
}

fn flat_filter(image: &Buffer2<f32>, radius: usize, op: Extreme) -> Buffer2<f32> {
    if radius == 0 || image.is_empty() {
        return image.clone();
    }

    let width = image.width();
    let height = image.height();
    let disk = Disk::new(radius);
    let mut output = Buffer2::new_filled(width, height, op.identity());

    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each_init(
            || (VecDeque::with_capacity(2 * radius + 1), vec![0.0f32; width]),
            |(deque, filtered), (y, out_row)| {
                for (dy, hw) in disk.spans() {
                    let Some(sy) = y.checked_add_signed(dy) else {
                        continue;
                    };
                    if sy >= height {
                        continue;
                    }
                    window_extreme(image.row(sy), hw, op, deque, filtered);
                    for (out, &v) in out_row.iter_mut().zip(filtered.iter()) {
                        *out = op.pick(*out, v);
                    }
                }
            },
        );

    output
}

/// Grey erosion: minimum over the disk neighbourhood.
pub fn grey_erode(image: &Buffer2<f32>, radius: usize) -> Buffer2<f32> {
    flat_filter(image, radius, Extreme::Min)
}

/// Grey dilation: maximum over the disk neighbourhood.
pub fn grey_dilate(image: &Buffer2<f32>, radius: usize) -> Buffer2<f32> {
    flat_filter(image, radius, Extreme::Max)
}

/// Grey opening: erosion followed by dilation with the same disk.
///
/// Removes bright structures that the disk does not fit inside.
pub fn grey_opening(image: &Buffer2<f32>, radius: usize) -> Buffer2<f32> {
    grey_dilate(&grey_erode(image, radius), radius)
}

/// White top-hat: `image - opening(image)`, clamped at zero.
pub fn white_top_hat(image: &Buffer2<f32>, radius: usize) -> Buffer2<f32> {
    let opened = grey_opening(image, radius);
    image.zip_map(&opened, |&v, &o| (v - o).max(0.0))
}
