//! Minima imposition and priority-flood watershed.

use crate::common::{Buffer2, LevelQueue, Mask};
use crate::config::{Connectivity, neighbors};
use crate::labeling::LabelMap;
use crate::morphology::reconstruct_by_erosion;

/// Label written to pixels reached by two or more basins at once.
pub const RIDGE: u32 = 0;

/// Force `markers` to be the only regional minima of `surface`.
///
/// Marker pixels drop to 0, every other pixel is lifted to at least
/// `surface + 1` and basins without a marker are filled to their spill
/// level. The relative order of non-marker values is preserved along
/// flooding paths.
pub fn impose_minima(
    surface: &Buffer2<f32>,
    markers: &Mask,
    connectivity: Connectivity,
) -> Buffer2<f32> {
    assert!(surface.same_shape(markers), "surface and marker shape mismatch");

    let high = surface.min_max().map_or(0.0, |(_, hi)| hi) + 2.0;
    let seed = markers.map(|&m| if m { 0.0 } else { high });
    let bound = surface.zip_map(&seed, |&s, &f| (s + 1.0).min(f));

    reconstruct_by_erosion(&seed, &bound, connectivity)
}

/// Flood `surface` from the labeled `markers`.
///
/// Pixels are claimed in increasing surface order, ties first-in first-out.
/// Flooding moves between 4-neighbours. A pixel whose already labeled
/// neighbours carry two different labels becomes a ridge pixel
/// ([`RIDGE`]) and stops the flood there.
pub fn watershed(surface: &Buffer2<f32>, markers: &LabelMap) -> LabelMap {
    assert!(
        surface.width() == markers.width() && surface.height() == markers.height(),
        "surface and marker shape mismatch"
    );

    let width = surface.width();
    let height = surface.height();
    let mut labels = markers.buffer().clone();
    let mut queued = labels.map(|&l| l != 0);
    let mut queue = LevelQueue::with_capacity(width + height);

    for idx in 0..labels.len() {
        if labels[idx] == 0 {
            continue;
        }
        let (x, y) = (idx % width, idx / width);
        for n in neighbors(x, y, width, height, Connectivity::Four) {
            if !queued[n] {
                queued[n] = true;
                queue.push(surface[n], n);
            }
        }
    }

    let mut ridge_pixels = 0usize;
    while let Some((_, idx)) = queue.pop() {
        let (x, y) = (idx % width, idx / width);

        let mut claim = None;
        let mut contested = false;
        for n in neighbors(x, y, width, height, Connectivity::Four) {
            let l = labels[n];
            if l == RIDGE {
                continue;
            }
            match claim {
                None => claim = Some(l),
                Some(c) if c != l => contested = true,
                _ => {}
            }
        }

        let Some(label) = claim else {
            continue;
        };
        if contested {
            ridge_pixels += 1;
            continue;
        }

        labels[idx] = label;
        for n in neighbors(x, y, width, height, Connectivity::Four) {
            if !queued[n] {
                queued[n] = true;
                queue.push(surface[n], n);
            }
        }
    }

    tracing::trace!(ridge_pixels, "Watershed flood complete");

    LabelMap::new(labels)
}
