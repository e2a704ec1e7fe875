//! Mathematical morphology on masks and grey-level images.
//!
//! All operators use a flat disk structuring element and treat pixels outside
//! the image as neutral: they neither erode nor dilate. Skeletonization
//! treats them as background.

mod binary;
mod grey;
mod reconstruction;
mod skeleton;

pub use binary::{dilate, erode, fill_holes};
pub use grey::{grey_dilate, grey_erode, grey_opening, white_top_hat};
pub use reconstruction::reconstruct_by_erosion;
pub use skeleton::skeletonize;

/// Flat disk structuring element: all offsets with `dx² + dy² <= r²`.
///
/// Stored as one horizontal half-width per row offset, which is all the
/// separable row-span implementations need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    radius: usize,
    half_widths: Vec<usize>,
}

impl Disk {
    pub fn new(radius: usize) -> Self {
        let r2 = radius * radius;
        let half_widths = (0..=2 * radius)
            .map(|row| {
                let dy = row.abs_diff(radius);
                (r2 - dy * dy).isqrt()
            })
            .collect();
        Self {
            radius,
            half_widths,
        }
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Row spans as `(dy, half_width)` pairs, top to bottom.
    pub fn spans(&self) -> impl Iterator<Item = (isize, usize)> + '_ {
        let r = self.radius as isize;
        self.half_widths
            .iter()
            .enumerate()
            .map(move |(row, &hw)| (row as isize - r, hw))
    }

    /// Number of pixels in the element.
    pub fn area(&self) -> usize {
        self.half_widths.iter().map(|hw| 2 * hw + 1).sum()
    }

    pub fn contains(&self, dx: isize, dy: isize) -> bool {
        let r = self.radius as isize;
        if dy.abs() > r {
            return false;
        }
        dx.unsigned_abs() <= self.half_widths[(dy + r) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_radius_zero_is_single_pixel() {
        let disk = Disk::new(0);
        assert_eq!(disk.area(), 1);
        assert_eq!(disk.spans().collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[test]
    fn test_disk_radius_one_is_cross() {
        let disk = Disk::new(1);
        assert_eq!(disk.area(), 5);
        assert!(disk.contains(0, -1));
        assert!(disk.contains(1, 0));
        assert!(!disk.contains(1, 1));
    }

    #[test]
    fn test_disk_areas_match_lattice_counts() {
        // Lattice points inside x² + y² <= r².
        assert_eq!(Disk::new(2).area(), 13);
        assert_eq!(Disk::new(3).area(), 29);
        assert_eq!(Disk::new(5).area(), 81);
    }

    #[test]
    fn test_disk_is_symmetric() {
        let disk = Disk::new(4);
        for dy in -4..=4 {
            for dx in -4..=4 {
                assert_eq!(disk.contains(dx, dy), disk.contains(-dx, -dy));
                assert_eq!(disk.contains(dx, dy), disk.contains(dy, dx));
            }
        }
    }
}
