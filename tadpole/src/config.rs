//! Configuration types for segmentation.
//!
//! This module defines the flat [`Config`] struct and associated types used by
//! the segmentation pipeline. Parameters are grouped by comments into the
//! pipeline stage that consumes them.

// ============================================================================
// Enums
// ============================================================================

/// Pixel connectivity for connected component analysis.
///
/// Determines which pixels are considered neighbors when grouping mask pixels
/// into components (small-object removal, marker labeling, final
/// single-component check).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// 4-connectivity: only horizontal and vertical neighbors.
    Four,
    /// 8-connectivity: includes diagonal neighbors.
    /// Required to keep one-pixel-wide skeleton lines in one piece.
    #[default]
    Eight,
}

impl Connectivity {
    /// Neighbor offsets `(dx, dy)` for this connectivity.
    #[inline]
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &FOUR_OFFSETS,
            Connectivity::Eight => &EIGHT_OFFSETS,
        }
    }

    /// Connectivity to use for the complement of a mask labeled with `self`.
    #[inline]
    pub fn complement(self) -> Self {
        match self {
            Connectivity::Four => Connectivity::Eight,
            Connectivity::Eight => Connectivity::Four,
        }
    }
}

const FOUR_OFFSETS: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

const EIGHT_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterate the in-bounds neighbors of `(x, y)` as linear indices.
#[inline]
pub(crate) fn neighbors(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    connectivity: Connectivity,
) -> impl Iterator<Item = usize> {
    connectivity.offsets().iter().filter_map(move |&(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some(ny * width + nx)
    })
}

// ============================================================================
// Channel weights
// ============================================================================

/// Linear channel combination used to build the contrast image.
///
/// Channel weights are chosen so foreground and background separate
/// maximally. The default averages red and green and subtracts blue, which
/// suits dark-olive organisms on a blue background. Substitute other weights
/// for other colour pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ChannelWeights {
    fn default() -> Self {
        Self {
            r: 0.5,
            g: 0.5,
            b: -1.0,
        }
    }
}

impl ChannelWeights {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> f32 {
        self.r * rgb[0] + self.g * rgb[1] + self.b * rgb[2]
    }

    pub fn validate(&self) {
        assert!(
            self.r.is_finite() && self.g.is_finite() && self.b.is_finite(),
            "channel weights must be finite, got {:?}",
            self
        );
        assert!(
            self.r != 0.0 || self.g != 0.0 || self.b != 0.0,
            "channel weights must not all be zero"
        );
    }
}

// ============================================================================
// Config
// ============================================================================

/// Segmentation pipeline configuration.
///
/// Radii are disk structuring element radii in pixels, areas are pixel counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // -- Contrast enhancement --
    pub channel_weights: ChannelWeights,

    // -- Illumination correction --
    /// Top-hat disk radius, about half the expected organism width.
    pub top_hat_radius: usize,

    // -- Binarization --
    /// Histogram bins for Otsu's method.
    pub threshold_bins: usize,

    // -- Mask refinement --
    pub close_gap_radius: usize,
    pub min_area_binary: usize,

    // -- Marker generation --
    pub foreground_erode_radius: usize,
    pub min_area_foreground: usize,
    pub background_dilate_radius: usize,
    pub min_area_background_skeleton: usize,

    // -- Post-processing --
    pub min_area_final: usize,

    /// Connectivity for component analysis.
    pub connectivity: Connectivity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_weights: ChannelWeights::default(),
            top_hat_radius: 12,
            threshold_bins: 256,
            close_gap_radius: 1,
            min_area_binary: 25,
            foreground_erode_radius: 5,
            min_area_foreground: 25,
            background_dilate_radius: 3,
            min_area_background_skeleton: 25,
            min_area_final: 50,
            connectivity: Connectivity::Eight,
        }
    }
}

impl Config {
    /// Validate the configuration. Panics on invalid parameters.
    pub fn validate(&self) {
        self.channel_weights.validate();
        assert!(
            self.threshold_bins >= 2,
            "threshold_bins must be at least 2, got {}",
            self.threshold_bins
        );
        assert!(
            self.top_hat_radius > 0,
            "top_hat_radius must be positive, got {}",
            self.top_hat_radius
        );
    }
}
