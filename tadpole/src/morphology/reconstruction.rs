//! Grey-level morphological reconstruction by erosion.

use crate::common::{Buffer2, LevelQueue};
use crate::config::{Connectivity, neighbors};

/// Reconstruct `mask` from above, starting at `seed`.
///
/// `seed` must be pointwise `>= mask`. The result is the largest image below
/// `seed` whose regional minima all come from `seed`: every basin of `mask`
/// that no seed minimum reaches is filled up to its spill level.
///
/// Implemented as an ordered propagation: pixels are processed from the
/// lowest current value upward, and each neighbour is lowered to
/// `max(level, mask[neighbour])` when that improves it.
pub fn reconstruct_by_erosion(
    seed: &Buffer2<f32>,
    mask: &Buffer2<f32>,
    connectivity: Connectivity,
) -> Buffer2<f32> {
    assert!(seed.same_shape(mask), "seed and mask shape mismatch");
    debug_assert!(
        seed.iter().zip(mask.iter()).all(|(&s, &m)| s >= m),
        "seed must lie above mask"
    );

    let width = seed.width();
    let height = seed.height();
    let mut result = seed.clone();

    let Some((_, seed_max)) = seed.min_max() else {
        return result;
    };

    // Pixels already at the global maximum can never lower a neighbour.
    let mut queue = LevelQueue::with_capacity(seed.len() / 4);
    for (idx, &v) in seed.iter().enumerate() {
        if v < seed_max {
            queue.push(v, idx);
        }
    }

    while let Some((level, idx)) = queue.pop() {
        if level > result[idx] {
            continue;
        }
        let (x, y) = (idx % width, idx / width);
        for n in neighbors(x, y, width, height, connectivity) {
            let candidate = level.max(mask[n]);
            if candidate < result[n] {
                result[n] = candidate;
                queue.push(candidate, n);
            }
        }
    }

    result
}
