//! Common utilities for tadpole.

mod level_queue;

pub use ::common::buffer2::Buffer2;

pub(crate) use level_queue::LevelQueue;

/// Binary mask: `true` marks foreground (or marker) pixels.
pub type Mask = Buffer2<bool>;

/// Check whether two masks share any set pixel.
pub fn masks_overlap(a: &Mask, b: &Mask) -> bool {
    assert!(a.same_shape(b), "mask shape mismatch");
    a.iter().zip(b.iter()).any(|(&x, &y)| x && y)
}

/// Pixel-wise logical OR of two masks.
pub fn mask_union(a: &Mask, b: &Mask) -> Mask {
    a.zip_map(b, |&x, &y| x || y)
}

/// Rescale samples linearly so the observed minimum maps to 0 and the
/// maximum to exactly 1. A constant buffer maps to all zeros.
pub fn rescale_intensity(image: &Buffer2<f32>) -> Buffer2<f32> {
    match image.min_max() {
        Some((lo, hi)) if hi - lo > f32::EPSILON => {
            let span = hi - lo;
            image.map(|&v| ((v - lo) / span).clamp(0.0, 1.0))
        }
        _ => Buffer2::new_filled(image.width(), image.height(), 0.0),
    }
}
