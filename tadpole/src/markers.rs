//! Foreground and background marker generation for the watershed.

use crate::common::{Mask, mask_union, masks_overlap};
use crate::config::Config;
use crate::labeling::remove_small_objects;
use crate::morphology::{dilate, erode, skeletonize};

/// Disjoint marker sets seeding the watershed flood.
#[derive(Debug, Clone, PartialEq)]
pub struct Markers {
    /// Shrunk organism interiors, one blob per organism that survives erosion.
    pub foreground: Mask,
    /// Skeleton of the background, pushed away from organism boundaries.
    pub background: Mask,
}

impl Markers {
    /// Both marker sets merged into one mask.
    pub fn combined(&self) -> Mask {
        mask_union(&self.foreground, &self.background)
    }

    pub fn is_empty(&self) -> bool {
        self.foreground.count_ones() == 0 && self.background.count_ones() == 0
    }
}

/// Derive foreground and background markers from a refined mask.
///
/// Foreground: erode, then drop small remnants. Organisms too thin to
/// survive erosion get no marker and end up in the background basin.
///
/// Background: dilate, invert, thin to a skeleton, then drop small skeleton
/// fragments so a jagged outline does not splinter the background into
/// many minima.
pub fn generate_markers(refined: &Mask, config: &Config) -> Markers {
    let eroded = erode(refined, config.foreground_erode_radius);
    let foreground =
        remove_small_objects(&eroded, config.min_area_foreground, config.connectivity);

    let candidate_background = dilate(refined, config.background_dilate_radius).map(|&v| !v);
    let skeleton = skeletonize(&candidate_background);
    let background = remove_small_objects(
        &skeleton,
        config.min_area_background_skeleton,
        config.connectivity,
    );

    debug_assert!(
        !masks_overlap(&foreground, &background),
        "foreground and background markers overlap"
    );

    tracing::debug!(
        foreground_pixels = foreground.count_ones(),
        background_pixels = background.count_ones(),
        skeleton_pixels = skeleton.count_ones(),
        "Generated markers"
    );

    Markers {
        foreground,
        background,
    }
}
