//! Global Otsu thresholding.

use crate::common::{Buffer2, Mask};

/// Intensity histogram over the observed `[min, max]` range with equal-width
/// bins. The last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<u64>,
    min: f32,
    max: f32,
}

impl Histogram {
    pub fn from_image(image: &Buffer2<f32>, bins: usize) -> Self {
        assert!(bins >= 2, "histogram needs at least 2 bins");

        let mut counts = vec![0u64; bins];
        let Some((min, max)) = image.min_max() else {
            return Self {
                counts,
                min: 0.0,
                max: 0.0,
            };
        };

        let span = (max - min) as f64;
        if span > 0.0 {
            let scale = bins as f64 / span;
            for &v in image.iter() {
                let bin = (((v - min) as f64) * scale) as usize;
                counts[bin.min(bins - 1)] += 1;
            }
        } else {
            counts[0] = image.len() as u64;
        }

        Self { counts, min, max }
    }

    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Midpoint of bin `i`.
    pub fn bin_center(&self, i: usize) -> f32 {
        let width = (self.max - self.min) as f64 / self.bins() as f64;
        (self.min as f64 + (i as f64 + 0.5) * width) as f32
    }

    pub fn populated_bins(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

/// Otsu threshold of a histogram: the bin center maximizing the
/// between-class variance of the split "bins up to i" vs "bins after i".
///
/// Returns `None` when fewer than two bins are populated, because every
/// split is then degenerate. Ties resolve to the lowest bin.
pub fn otsu_threshold_from_histogram(histogram: &Histogram) -> Option<f32> {
    if histogram.populated_bins() < 2 {
        return None;
    }

    let counts = histogram.counts();
    let n = counts.len();
    let centers: Vec<f64> = (0..n).map(|i| histogram.bin_center(i) as f64).collect();

    // Cumulative weight and first moment from the left and from the right.
    let mut weight_lo = vec![0.0f64; n];
    let mut moment_lo = vec![0.0f64; n];
    let (mut w, mut m) = (0.0, 0.0);
    for i in 0..n {
        w += counts[i] as f64;
        m += counts[i] as f64 * centers[i];
        weight_lo[i] = w;
        moment_lo[i] = m;
    }

    let mut weight_hi = vec![0.0f64; n];
    let mut moment_hi = vec![0.0f64; n];
    let (mut w, mut m) = (0.0, 0.0);
    for i in (0..n).rev() {
        w += counts[i] as f64;
        m += counts[i] as f64 * centers[i];
        weight_hi[i] = w;
        moment_hi[i] = m;
    }

    let mut best: Option<(usize, f64)> = None;
    for i in 0..n - 1 {
        let (w1, w2) = (weight_lo[i], weight_hi[i + 1]);
        if w1 == 0.0 || w2 == 0.0 {
            continue;
        }
        let mean1 = moment_lo[i] / w1;
        let mean2 = moment_hi[i + 1] / w2;
        let variance = w1 * w2 * (mean1 - mean2) * (mean1 - mean2);
        if best.is_none_or(|(_, v)| variance > v) {
            best = Some((i, variance));
        }
    }

    best.map(|(i, _)| histogram.bin_center(i))
}

/// Otsu threshold of an intensity image using `bins` histogram bins.
pub fn otsu_threshold(image: &Buffer2<f32>, bins: usize) -> Option<f32> {
    otsu_threshold_from_histogram(&Histogram::from_image(image, bins))
}

/// Foreground where `intensity >= threshold`. A missing threshold yields an
/// all-background mask.
pub fn binarize(image: &Buffer2<f32>, threshold: Option<f32>) -> Mask {
    match threshold {
        Some(t) => image.map(|&v| v >= t),
        None => Mask::new_filled(image.width(), image.height(), false),
    }
}
