//! The segmentation pipeline and its [`Segmenter`] entry point.
//!
//! Stages run strictly in order, each consuming the previous stage's product:
//! contrast enhancement, illumination correction, binarization, mask
//! refinement, marker generation, watershed, post-processing and statistics.
//! Observers see every intermediate product but never alter the flow.


use std::fmt;

use crate::common::{Buffer2, Mask};
use crate::config::Config;
use crate::contrast::enhance_contrast;
use crate::error::Result;
use crate::illumination::correct_illumination;
use crate::image::RgbImage;
use crate::labeling::{LabelMap, label_components};
use crate::markers::{Markers, generate_markers};
use crate::mask_refine::refine_mask;
use crate::postprocess::postprocess;
use crate::stats::RegionStats;
use crate::threshold::{binarize, otsu_threshold};
use crate::watershed::segment_watershed;

// =============================================================================
// Stages and observers
// =============================================================================

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Input validation before any processing.
    Input,
    ContrastEnhancement,
    IlluminationCorrection,
    Binarization,
    MaskRefinement,
    MarkerGeneration,
    /// Gradient surface computed inside the watershed stage.
    Gradient,
    Watershed,
    PostProcessing,
    Statistics,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::ContrastEnhancement => "contrast enhancement",
            Stage::IlluminationCorrection => "illumination correction",
            Stage::Binarization => "binarization",
            Stage::MaskRefinement => "mask refinement",
            Stage::MarkerGeneration => "marker generation",
            Stage::Gradient => "gradient",
            Stage::Watershed => "watershed",
            Stage::PostProcessing => "post-processing",
            Stage::Statistics => "statistics",
        };
        f.write_str(name)
    }
}

/// Borrowed product of one stage.
#[derive(Debug, Clone, Copy)]
pub enum StageOutput<'a> {
    Intensity(&'a Buffer2<f32>),
    Mask(&'a Mask),
    Markers(&'a Markers),
    Labels(&'a LabelMap),
    Stats(&'a RegionStats),
}

/// Receives every intermediate product, e.g. for debug rendering.
pub trait StageObserver {
    fn on_stage(&mut self, stage: Stage, output: StageOutput<'_>);
}

impl<F> StageObserver for F
where
    F: FnMut(Stage, StageOutput<'_>),
{
    fn on_stage(&mut self, stage: Stage, output: StageOutput<'_>) {
        self(stage, output)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn on_stage(&mut self, _stage: Stage, _output: StageOutput<'_>) {}
}

// =============================================================================
// Results
// =============================================================================

/// Counts and values collected along the pipeline for tuning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Otsu threshold, `None` for a flat intensity image.
    pub otsu_threshold: Option<f32>,
    /// Foreground pixels right after binarization.
    pub foreground_pixels: usize,
    /// Foreground pixels after mask refinement.
    pub refined_pixels: usize,
    /// Connected foreground marker blobs.
    pub foreground_markers: usize,
    /// Connected background skeleton pieces.
    pub background_markers: usize,
    /// Basins produced by flooding, border basins included.
    pub watershed_basins: usize,
    /// Basins left after clearing those touching the border.
    pub interior_basins: usize,
    /// Labels after the first dense renumbering.
    pub relabeled: usize,
    /// Labels dropped by the final area filter.
    pub removed_small: usize,
    /// Final number of regions.
    pub final_regions: usize,
}

/// Output of a segmentation run.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Final labels: 0 is background, regions are exactly `1..=K`.
    pub labels: LabelMap,
    pub stats: RegionStats,
    pub diagnostics: Diagnostics,
}

impl Segmentation {
    /// Number of regions K.
    pub fn num_regions(&self) -> usize {
        self.stats.len()
    }
}

// =============================================================================
// Segmenter
// =============================================================================

/// Organism segmenter wrapping a [`Config`].
///
/// ```rust,ignore
/// use tadpole::{Config, RgbImage, Segmenter};
///
/// let image = RgbImage::from_u8(width, height, 3, &pixels)?;
/// let segmentation = Segmenter::from_config(Config {
///     min_area_final: 80,
///     ..Default::default()
/// })
/// .segment(&image)?;
/// println!("{} organisms", segmentation.num_regions());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Segmenter {
    config: Config,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment one image.
    pub fn segment(&self, image: &RgbImage) -> Result<Segmentation> {
        self.segment_with_observer(image, &mut NoopObserver)
    }

    /// Segment one image, reporting every intermediate product to `observer`.
    pub fn segment_with_observer(
        &self,
        image: &RgbImage,
        observer: &mut dyn StageObserver,
    ) -> Result<Segmentation> {
        let config = &self.config;
        config.validate();

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Segmenting image"
        );

        let mut diagnostics = Diagnostics::default();

        // Step 1: colour channels to a single foreground response
        let intensity = enhance_contrast(image, &config.channel_weights)?;
        observer.on_stage(Stage::ContrastEnhancement, StageOutput::Intensity(&intensity));

        // Step 2: flatten uneven illumination
        let corrected = correct_illumination(&intensity, config.top_hat_radius);
        observer.on_stage(
            Stage::IlluminationCorrection,
            StageOutput::Intensity(&corrected),
        );

        // Step 3: global threshold
        let threshold = otsu_threshold(&corrected, config.threshold_bins);
        if threshold.is_none() {
            tracing::debug!("Flat intensity image, no Otsu threshold");
        }
        let binary = binarize(&corrected, threshold);
        diagnostics.otsu_threshold = threshold;
        diagnostics.foreground_pixels = binary.count_ones();
        observer.on_stage(Stage::Binarization, StageOutput::Mask(&binary));

        // Step 4: clean the mask
        let refined = refine_mask(&binary, config);
        diagnostics.refined_pixels = refined.count_ones();
        observer.on_stage(Stage::MaskRefinement, StageOutput::Mask(&refined));

        // Step 5: foreground and background markers
        let markers = generate_markers(&refined, config);
        diagnostics.foreground_markers =
            label_components(&markers.foreground, config.connectivity).num_labels();
        diagnostics.background_markers =
            label_components(&markers.background, config.connectivity).num_labels();
        observer.on_stage(Stage::MarkerGeneration, StageOutput::Markers(&markers));

        // Step 6: flood
        let flooded = segment_watershed(&corrected, &markers, config);
        diagnostics.watershed_basins = flooded.basins;
        diagnostics.interior_basins = flooded.basins - flooded.border_basins;
        observer.on_stage(Stage::Gradient, StageOutput::Intensity(&flooded.gradient));
        observer.on_stage(Stage::Watershed, StageOutput::Labels(&flooded.labels));

        // Step 7: dense labels, rim recovery, area filter
        let processed = postprocess(&flooded.labels, config);
        diagnostics.relabeled = processed.relabeled;
        diagnostics.removed_small = processed.removed_small;
        observer.on_stage(Stage::PostProcessing, StageOutput::Labels(&processed.labels));

        // Step 8: measurements
        let stats = RegionStats::from_labels(&processed.labels);
        diagnostics.final_regions = stats.len();
        observer.on_stage(Stage::Statistics, StageOutput::Stats(&stats));

        tracing::info!(
            regions = stats.len(),
            threshold = ?diagnostics.otsu_threshold,
            min_area = ?stats.summary.map(|s| s.min),
            max_area = ?stats.summary.map(|s| s.max),
            "Segmentation complete"
        );

        Ok(Segmentation {
            labels: processed.labels,
            stats,
            diagnostics,
        })
    }
}

/// Segment `image` with `config`.
pub fn segment(image: &RgbImage, config: &Config) -> Result<Segmentation> {
    Segmenter::from_config(config.clone()).segment(image)
}
