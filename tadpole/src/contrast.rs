//! Colour contrast enhancement: RGB to a single foreground-response channel.

use crate::common::{Buffer2, rescale_intensity};
use crate::config::ChannelWeights;
use crate::error::{InputError, Result, SegmentError};
use crate::image::RgbImage;
use crate::pipeline::Stage;

/// Combine the three colour channels into one intensity image in `[0, 1]`.
///
/// Each channel is first stretched to its own observed range, then mixed
/// with `weights` and the mix is stretched again. With the default weights
/// (`0.5 r + 0.5 g - b`) a yellow-green foreground on blue background comes
/// out bright.
pub fn enhance_contrast(image: &RgbImage, weights: &ChannelWeights) -> Result<Buffer2<f32>> {
    let [r, g, b] = [0, 1, 2].map(|c| rescale_intensity(&image.channel(c)));

    let combined = Buffer2::from_fn(image.width(), image.height(), |x, y| {
        weights.apply([r[(x, y)], g[(x, y)], b[(x, y)]])
    });

    if let Some(idx) = combined.iter().position(|v| !v.is_finite()) {
        let (x, y) = combined.coords(idx);
        return Err(SegmentError::invalid_input(
            Stage::ContrastEnhancement,
            InputError::NonFiniteIntensity { x, y },
        ));
    }

    Ok(rescale_intensity(&combined))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_from_pixels(width: usize, height: usize, pixels: &[[u8; 3]]) -> RgbImage {
        let data: Vec<u8> = pixels.iter().flatten().copied().collect();
        RgbImage::from_u8(width, height, 3, &data).unwrap()
    }

    #[test]
    fn test_yellow_on_blue_is_bright() {
        let yellow = [230, 220, 40];
        let blue = [30, 60, 200];
        let image = image_from_pixels(3, 1, &[blue, yellow, blue]);

        let intensity = enhance_contrast(&image, &ChannelWeights::default()).unwrap();

        assert_eq!(intensity.pixels(), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_output_in_unit_range() {
        let pixels: Vec<[u8; 3]> = (0..16u8)
            .map(|i| [i * 13, 255 - i * 11, ((i as u32 * 37) % 251) as u8])
            .collect();
        let image = image_from_pixels(4, 4, &pixels);

        let intensity = enhance_contrast(&image, &ChannelWeights::default()).unwrap();

        let (lo, hi) = intensity.min_max().unwrap();
        assert_eq!(lo, 0.0);
        assert!((hi - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_image_is_zero() {
        let image = image_from_pixels(2, 2, &[[100, 150, 20]; 4]);
        let intensity = enhance_contrast(&image, &ChannelWeights::default()).unwrap();
        assert!(intensity.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_custom_weights_select_channel() {
        let image = image_from_pixels(2, 1, &[[0, 0, 255], [0, 0, 0]]);

        let blue_response =
            enhance_contrast(&image, &ChannelWeights::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(blue_response.pixels(), &[1.0, 0.0]);

        let default_response = enhance_contrast(&image, &ChannelWeights::default()).unwrap();
        assert_eq!(default_response.pixels(), &[0.0, 1.0]);
    }

    #[test]
    fn test_overflowing_range_is_rejected() {
        let data = vec![f32::MAX, 0.0, 0.0, -f32::MAX, 0.0, 0.0];
        let image = RgbImage::from_f32(2, 1, 3, data).unwrap();

        let err = enhance_contrast(&image, &ChannelWeights::default()).unwrap_err();

        assert_eq!(err.stage(), Stage::ContrastEnhancement);
        assert!(matches!(
            err,
            SegmentError::InvalidInput {
                source: InputError::NonFiniteIntensity { x: 0, y: 0 },
                ..
            }
        ));
    }
}
