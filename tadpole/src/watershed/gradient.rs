//! Sobel gradient magnitude with border clamping.

use rayon::prelude::*;

use crate::common::{Buffer2, rescale_intensity};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Gradient magnitude `sqrt(gx² + gy²)` of `image`, rescaled to `[0, 1]`.
///
/// Out-of-image taps repeat the nearest edge pixel.
pub fn gradient_magnitude(image: &Buffer2<f32>) -> Buffer2<f32> {
    let w = image.width();
    let h = image.height();
    let mut magnitude = Buffer2::new_filled(w, h, 0.0f32);
    if image.is_empty() {
        return magnitude;
    }

    magnitude
        .pixels_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out_row)| {
            let rows = [
                image.row(y.saturating_sub(1)),
                image.row(y),
                image.row((y + 1).min(h - 1)),
            ];
            for (x, out) in out_row.iter_mut().enumerate() {
                let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];

                let mut sum_x = 0.0;
                let mut sum_y = 0.0;
                for (ky, row) in rows.iter().enumerate() {
                    for (kx, &xi) in x_idx.iter().enumerate() {
                        sum_x += row[xi] * SOBEL_KERNEL_X[ky][kx];
                        sum_y += row[xi] * SOBEL_KERNEL_Y[ky][kx];
                    }
                }
                *out = (sum_x * sum_x + sum_y * sum_y).sqrt();
            }
        });

    rescale_intensity(&magnitude)
}
