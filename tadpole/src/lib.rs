//! Tadpole - segmentation of touching organisms in colour micrographs.
//!
//! Bright organisms on a blue-dominated dish are separated with a
//! marker-controlled watershed:
//! - Colour-difference contrast enhancement
//! - White top-hat illumination correction
//! - Otsu binarization and mask refinement
//! - Foreground / background marker generation
//! - Watershed on the gradient surface, then label post-processing
//! - Per-region area statistics
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tadpole::{Config, RgbImage, Segmenter};
//!
//! let image = RgbImage::from_u8(width, height, 3, &pixels)?;
//!
//! let segmenter = Segmenter::from_config(Config::default());
//! let result = segmenter.segment(&image)?;
//!
//! println!("Found {} organisms", result.num_regions());
//! for region in &result.stats.regions {
//!     println!("label {} area {}", region.label, region.area);
//! }
//! ```

mod bbox;
pub(crate) mod common;
mod config;
pub mod contrast;
mod error;
pub mod illumination;
mod image;
pub mod labeling;
pub mod markers;
pub mod mask_refine;
pub mod morphology;
mod pipeline;
pub mod postprocess;
mod stats;
pub mod threshold;
pub mod watershed;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Core types
// ============================================================================

pub use bbox::Aabb;
pub use common::{Buffer2, Mask, rescale_intensity};
pub use error::{InputError, Result, SegmentError};
pub use image::RgbImage;
pub use labeling::LabelMap;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{ChannelWeights, Config, Connectivity};

// ============================================================================
// Pipeline
// ============================================================================

pub use markers::Markers;
pub use pipeline::{
    Diagnostics, NoopObserver, Segmentation, Segmenter, Stage, StageObserver, StageOutput, segment,
};
pub use stats::{AreaSummary, RegionProps, RegionStats};
pub use watershed::WatershedOutput;
