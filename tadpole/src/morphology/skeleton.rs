//! Topology-preserving thinning of binary masks to one-pixel-wide medial
//! lines, after Zhang-Suen.

use crate::common::Mask;

/// Neighbourhood in Zhang-Suen order P2..P9: N, NE, E, SE, S, SW, W, NW.
const RING: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

#[inline]
fn ring_values(mask: &Mask, x: usize, y: usize) -> [bool; 8] {
    RING.map(|(dx, dy)| {
        match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
            (Some(nx), Some(ny)) if nx < mask.width() && ny < mask.height() => mask[(nx, ny)],
            _ => false,
        }
    })
}

/// Yokoi 8-connectivity number: count of 8-connected foreground arcs around
/// the centre. Removing the centre keeps the topology iff this is 1.
fn connectivity_number(p: [bool; 8]) -> usize {
    let q = p.map(|v| !v);
    [0, 2, 4, 6]
        .into_iter()
        .filter(|&k| q[k] && !(q[k + 1] && q[(k + 2) % 8]))
        .count()
}

/// Whether a foreground pixel is deletable in the given sub-iteration.
///
/// Zhang-Suen directional rules with two guards: the neighbour count starts
/// at 3 (Lü-Wang), so the last pixels of a two-pixel-thick diagonal run are
/// kept, and the crossing test is the Yokoi number, which also accepts
/// centres whose neighbours touch only diagonally.
fn deletable(p: [bool; 8], first_pass: bool) -> bool {
    let neighbours = p.iter().filter(|&&v| v).count();
    if !(3..=6).contains(&neighbours) {
        return false;
    }

    if connectivity_number(p) != 1 {
        return false;
    }

    let [n, _, e, _, s, _, w, _] = p;
    if first_pass {
        !(n && e && s) && !(e && s && w)
    } else {
        !(n && e && w) && !(n && s && w)
    }
}

/// Thin `mask` to its topological skeleton.
///
/// Each sub-iteration collects candidates on a snapshot, then removes them
/// in raster order, re-checking every candidate against the pixels already
/// removed. A 2x2 block therefore keeps a connected remnant instead of
/// vanishing in one parallel step.
///
/// Pixels outside the image count as background, so shapes touching the
/// border are thinned toward their interior like any other shape.
pub fn skeletonize(mask: &Mask) -> Mask {
    let mut skeleton = mask.clone();
    let width = mask.width();
    let height = mask.height();
    let mut candidates: Vec<usize> = Vec::new();
    let mut iterations = 0usize;

    loop {
        let mut changed = false;
        for first_pass in [true, false] {
            candidates.clear();
            for y in 0..height {
                for x in 0..width {
                    if skeleton[(x, y)] && deletable(ring_values(&skeleton, x, y), first_pass) {
                        candidates.push(y * width + x);
                    }
                }
            }
            for &idx in &candidates {
                let (x, y) = (idx % width, idx / width);
                if deletable(ring_values(&skeleton, x, y), first_pass) {
                    skeleton[idx] = false;
                    changed = true;
                }
            }
        }
        iterations += 1;
        if !changed {
            break;
        }
    }

    tracing::trace!(
        iterations,
        input_pixels = mask.count_ones(),
        skeleton_pixels = skeleton.count_ones(),
        "Skeletonized mask"
    );

    skeleton
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use super::*;
    use crate::config::Connectivity;
    use crate::labeling::label_components;
    use crate::morphology::fill_holes;

    fn filled_rect(width: usize, height: usize, xs: Range<usize>, ys: Range<usize>) -> Mask {
        Mask::from_fn(width, height, |x, y| xs.contains(&x) && ys.contains(&y))
    }

    #[test]
    fn test_empty_mask_stays_empty() {
        let mask = Mask::new_filled(6, 6, false);
        assert_eq!(skeletonize(&mask), mask);
    }

    #[test]
    fn test_isolated_pixel_survives() {
        let mut mask = Mask::new_filled(5, 5, false);
        mask[(2, 2)] = true;
        assert_eq!(skeletonize(&mask), mask);
    }

    #[test]
    fn test_one_pixel_line_is_unchanged_in_the_middle() {
        let mask = filled_rect(12, 5, 1..11, 2..3);
        let skeleton = skeletonize(&mask);
        for x in 2..10 {
            assert!(skeleton[(x, 2)], "x = {x}");
        }
    }

    #[test]
    fn test_thick_bar_thins_to_connected_line() {
        let mask = filled_rect(24, 11, 2..22, 2..9);

        let skeleton = skeletonize(&mask);

        let count = skeleton.count_ones();
        assert!(count > 0);
        assert!(count <= 30, "skeleton too thick: {count} pixels");
        assert!(skeleton.iter().zip(mask.iter()).all(|(&s, &m)| !s || m));
        assert_eq!(
            label_components(&skeleton, Connectivity::Eight).num_labels(),
            1
        );
    }

    #[test]
    fn test_square_block_keeps_connected_remnant() {
        let mask = filled_rect(6, 6, 2..4, 2..4);

        let skeleton = skeletonize(&mask);

        assert!(skeleton.count_ones() > 0);
        assert!(skeleton.iter().zip(mask.iter()).all(|(&s, &m)| !s || m));
        assert_eq!(
            label_components(&skeleton, Connectivity::Eight).num_labels(),
            1
        );
    }

    #[test]
    fn test_thick_diagonal_band_thins_to_medial_line() {
        // Staircase two pixels wide, 36 rows long.
        let mask = Mask::from_fn(40, 40, |x, y| (2..38).contains(&y) && (x == y || x == y + 1));
        assert_eq!(mask.count_ones(), 72);

        let skeleton = skeletonize(&mask);

        let count = skeleton.count_ones();
        assert!((30..=40).contains(&count), "skeleton pixels {count}");
        assert!(skeleton.iter().zip(mask.iter()).all(|(&s, &m)| !s || m));
        assert_eq!(
            label_components(&skeleton, Connectivity::Eight).num_labels(),
            1
        );
        // Both ends of the run survive.
        assert!(skeleton[(2, 2)] || skeleton[(3, 2)]);
        assert!(skeleton[(37, 37)] || skeleton[(38, 37)]);
    }

    #[test]
    fn test_connectivity_number_counts_diagonal_contacts() {
        // N, E, NW, SE: N and E touch diagonally, so one arc.
        let p = [true, false, true, true, false, false, false, true];
        assert_eq!(connectivity_number(p), 1);
        // NW and SE alone are two separate arcs.
        let p = [false, false, false, true, false, false, false, true];
        assert_eq!(connectivity_number(p), 2);
    }

    #[test]
    fn test_ring_keeps_its_hole() {
        let outer = filled_rect(24, 24, 2..22, 2..22);
        let inner = filled_rect(24, 24, 6..18, 6..18);
        let ring = outer.zip_map(&inner, |&o, &i| o && !i);

        let skeleton = skeletonize(&ring);

        assert_eq!(
            label_components(&skeleton, Connectivity::Eight).num_labels(),
            1
        );
        let filled = fill_holes(&skeleton, Connectivity::Eight);
        assert!(filled[(12, 12)]);
        assert!(filled.count_ones() > skeleton.count_ones());
    }
}
