//! Synthetic micrograph scenes: bright yellow organisms on a blue dish.
//!
//! ```rust,ignore
//! use crate::testing::synthetic::SceneBuilder;
//!
//! let image = SceneBuilder::new(80, 50)
//!     .disk(22.5, 25.5, 7.6)
//!     .disk(58.5, 25.5, 7.6)
//!     .illumination_gradient(0.4)
//!     .noise(0.05, 7)
//!     .build();
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{Buffer2, Mask};
use crate::image::RgbImage;

/// Organism colour, high red and green, low blue.
pub const FOREGROUND: [u8; 3] = [200, 210, 60];
/// Dish colour, high blue.
pub const BACKGROUND: [u8; 3] = [40, 70, 180];

/// Filled shape drawn in the foreground colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Disk { cx: f32, cy: f32, r: f32 },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
}

impl Shape {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        match *self {
            Shape::Disk { cx, cy, r } => {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                dx * dx + dy * dy <= r * r
            }
            Shape::Ellipse { cx, cy, rx, ry } => {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                dx * dx * ry * ry + dy * dy * rx * rx <= rx * rx * ry * ry
            }
        }
    }
}

/// Builder for a colour test image.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    width: usize,
    height: usize,
    shapes: Vec<Shape>,
    foreground: [f32; 3],
    background: [f32; 3],
    /// Fractional brightness loss from left to right edge.
    gradient: f32,
    /// Uniform additive noise amplitude and seed.
    noise: Option<(f32, u64)>,
}

impl SceneBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
            foreground: to_unit(FOREGROUND),
            background: to_unit(BACKGROUND),
            gradient: 0.0,
            noise: None,
        }
    }

    pub fn disk(mut self, cx: f32, cy: f32, r: f32) -> Self {
        self.shapes.push(Shape::Disk { cx, cy, r });
        self
    }

    pub fn ellipse(mut self, cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        self.shapes.push(Shape::Ellipse { cx, cy, rx, ry });
        self
    }

    /// Darken linearly towards the right edge, by `strength` at the last column.
    pub fn illumination_gradient(mut self, strength: f32) -> Self {
        self.gradient = strength;
        self
    }

    /// Add uniform noise in `[-amplitude, amplitude]` to every sample.
    pub fn noise(mut self, amplitude: f32, seed: u64) -> Self {
        self.noise = Some((amplitude, seed));
        self
    }

    /// Ground-truth foreground mask.
    pub fn shape_mask(&self) -> Mask {
        Buffer2::from_fn(self.width, self.height, |x, y| {
            self.shapes.iter().any(|s| s.contains(x, y))
        })
    }

    /// Drawn pixel count of each shape, in insertion order.
    pub fn drawn_areas(&self) -> Vec<usize> {
        self.shapes
            .iter()
            .map(|s| {
                (0..self.height)
                    .flat_map(|y| (0..self.width).map(move |x| (x, y)))
                    .filter(|&(x, y)| s.contains(x, y))
                    .count()
            })
            .collect()
    }

    pub fn build(&self) -> RgbImage {
        let mask = self.shape_mask();
        let mut rng = self.noise.map(|(_, seed)| StdRng::seed_from_u64(seed));
        let amplitude = self.noise.map_or(0.0, |(a, _)| a);
        let span = self.width.saturating_sub(1).max(1) as f32;

        let mut data = Vec::with_capacity(self.width * self.height * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                let base = if mask[(x, y)] {
                    self.foreground
                } else {
                    self.background
                };
                let k = 1.0 - self.gradient * x as f32 / span;
                for c in base {
                    let jitter = match rng.as_mut() {
                        Some(rng) if amplitude > 0.0 => rng.random_range(-amplitude..=amplitude),
                        _ => 0.0,
                    };
                    data.push((c * k + jitter).clamp(0.0, 1.0));
                }
            }
        }

        RgbImage::from_f32(self.width, self.height, 3, data).expect("synthetic scene is valid")
    }
}

fn to_unit(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|c| c as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_area_matches_mask() {
        let scene = SceneBuilder::new(40, 40).disk(20.5, 20.5, 7.6);
        let areas = scene.drawn_areas();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0], scene.shape_mask().count_ones());
        assert_eq!(areas[0], 180);
    }

    #[test]
    fn test_build_is_deterministic_per_seed() {
        let scene = SceneBuilder::new(16, 12).disk(8.0, 6.0, 3.0).noise(0.1, 3);
        assert_eq!(scene.build(), scene.build());
        assert_ne!(scene.build(), scene.clone().noise(0.1, 4).build());
    }

    #[test]
    fn test_colors_land_on_shapes() {
        let image = SceneBuilder::new(10, 10).disk(5.0, 5.0, 2.0).build();
        assert_eq!(image.get(5, 5), to_unit(FOREGROUND));
        assert_eq!(image.get(0, 0), to_unit(BACKGROUND));
    }
}
