//! Marker-controlled watershed segmentation.
//!
//! The corrected intensity image is turned into a gradient surface, the
//! markers are imposed as its only minima, and the padded surface is flooded.
//! Basins reaching the padding frame are background and are cleared before
//! the padding is cropped away.

mod flood;
mod gradient;


pub use flood::{RIDGE, impose_minima, watershed};
pub use gradient::gradient_magnitude;

use crate::common::Buffer2;
use crate::config::{Config, Connectivity};
use crate::labeling::{LabelMap, label_components};
use crate::markers::Markers;

/// Width of the replicated frame added around the surface before flooding.
const PAD: usize = 1;

/// Products of one watershed run.
#[derive(Debug, Clone)]
pub struct WatershedOutput {
    /// Rescaled gradient magnitude before minima imposition.
    pub gradient: Buffer2<f32>,
    /// Basins that do not touch the border; ridge and background are 0.
    pub labels: LabelMap,
    /// Basins produced by the flood, including border basins.
    pub basins: usize,
    /// Basins removed because they reached the padding frame.
    pub border_basins: usize,
}

/// Segment `corrected` into catchment basins seeded by `markers`.
///
/// With no marker pixels at all the result is an all-background map.
pub fn segment_watershed(
    corrected: &Buffer2<f32>,
    markers: &Markers,
    config: &Config,
) -> WatershedOutput {
    let gradient = gradient_magnitude(corrected);
    let combined = markers.combined();

    if combined.count_ones() == 0 {
        tracing::debug!("No markers, skipping watershed flood");
        return WatershedOutput {
            labels: LabelMap::empty(corrected.width(), corrected.height()),
            gradient,
            basins: 0,
            border_basins: 0,
        };
    }

    let imposed = impose_minima(&gradient, &combined, Connectivity::Eight);

    let padded_surface = imposed.padded_replicate(PAD);
    let padded_markers = combined.padded_constant(PAD, false);
    let marker_labels = label_components(&padded_markers, config.connectivity);

    let flooded = watershed(&padded_surface, &marker_labels);
    let basins = flooded.num_labels();

    let (cleared, border_basins) = clear_frame(&flooded);
    let labels = LabelMap::new(cleared.into_buffer().cropped(PAD));

    tracing::debug!(
        markers = marker_labels.num_labels(),
        basins,
        border_basins,
        "Watershed segmentation"
    );

    WatershedOutput {
        gradient,
        labels,
        basins,
        border_basins,
    }
}

/// Zero every label with a pixel on the outermost ring of `labels`.
fn clear_frame(labels: &LabelMap) -> (LabelMap, usize) {
    let width = labels.width();
    let height = labels.height();
    let mut touches = vec![false; labels.max_label() as usize + 1];

    let frame = (0..width)
        .flat_map(|x| [(x, 0), (x, height - 1)])
        .chain((0..height).flat_map(|y| [(0, y), (width - 1, y)]));
    for xy in frame {
        touches[labels[xy] as usize] = true;
    }
    touches[0] = false;

    let table: Vec<u32> = touches
        .iter()
        .enumerate()
        .map(|(label, &t)| if t { 0 } else { label as u32 })
        .collect();
    let removed = touches.iter().filter(|&&t| t).count();

    (labels.remap(&table), removed)
}
