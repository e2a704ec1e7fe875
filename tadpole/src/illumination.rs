//! Illumination correction with a white top-hat filter.

use crate::common::{Buffer2, rescale_intensity};
use crate::morphology::white_top_hat;

/// Remove slow background trends from `intensity`.
///
/// Subtracts the grey opening with a disk of `radius` and stretches the
/// result back to `[0, 1]`. Bright structures the disk cannot fit inside
/// are kept; wider plateaus and gradients are flattened.
pub fn correct_illumination(intensity: &Buffer2<f32>, radius: usize) -> Buffer2<f32> {
    let top_hat = white_top_hat(intensity, radius);
    let corrected = rescale_intensity(&top_hat);

    tracing::debug!(
        radius,
        mean = corrected.iter().sum::<f32>() / corrected.len().max(1) as f32,
        "Illumination corrected"
    );

    corrected
}
