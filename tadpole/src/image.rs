//! Colour input image.
//!
//! [`RgbImage`] is the single entry point for pixel data. Samples are
//! converted to `f32` once, here; every later stage works in floating point.

use crate::common::Buffer2;
use crate::error::{InputError, Result, SegmentError};
use crate::pipeline::Stage;

const RGB_CHANNELS: usize = 3;

/// Decoded 3-channel image with interleaved `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbImage {
    pixels: Buffer2<[f32; 3]>,
}

impl RgbImage {
    /// Build from 8-bit interleaved samples, mapping 0..=255 to 0.0..=1.0.
    pub fn from_u8(width: usize, height: usize, channels: usize, data: &[u8]) -> Result<Self> {
        check_layout(width, height, channels, data.len())?;
        let pixels = data
            .chunks_exact(RGB_CHANNELS)
            .map(|px| {
                [
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                ]
            })
            .collect();
        Ok(Self {
            pixels: Buffer2::new(width, height, pixels),
        })
    }

    /// Build from floating-point interleaved samples.
    ///
    /// Samples may use any finite range; each channel is rescaled to its own
    /// min-max span during contrast enhancement.
    pub fn from_f32(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        check_layout(width, height, channels, data.len())?;
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            let pixel = pos / RGB_CHANNELS;
            return Err(SegmentError::invalid_input(
                Stage::Input,
                InputError::NonFinite {
                    x: pixel % width,
                    y: pixel / width,
                    channel: pos % RGB_CHANNELS,
                },
            ));
        }
        let pixels = data
            .chunks_exact(RGB_CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
            .collect();
        Ok(Self {
            pixels: Buffer2::new(width, height, pixels),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        *self.pixels.get(x, y)
    }

    #[inline]
    pub fn pixels(&self) -> &Buffer2<[f32; 3]> {
        &self.pixels
    }

    /// Extract one channel as a single-plane buffer.
    pub fn channel(&self, channel: usize) -> Buffer2<f32> {
        assert!(channel < RGB_CHANNELS, "channel index out of range");
        self.pixels.map(|px| px[channel])
    }
}

fn check_layout(width: usize, height: usize, channels: usize, len: usize) -> Result<()> {
    let error = if channels != RGB_CHANNELS {
        Some(InputError::ChannelCount { channels })
    } else if width == 0 || height == 0 {
        Some(InputError::EmptyImage { width, height })
    } else if len != width * height * channels {
        Some(InputError::BufferLength {
            len,
            width,
            height,
            channels,
        })
    } else {
        None
    };

    match error {
        Some(source) => Err(SegmentError::invalid_input(Stage::Input, source)),
        None => Ok(()),
    }
}
