use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice;

/// Row-major 2D buffer of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Buffer2<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel in raster order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        debug_assert!(x < self.width && y < self.height);
        &self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Inverse of [`Buffer2::index`].
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn same_shape<U>(&self, other: &Buffer2<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.pixels.iter_mut()
    }

    /// Apply `f` to every pixel, producing a new buffer of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Buffer2<U> {
        Buffer2 {
            pixels: self.pixels.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Combine two same-shaped buffers pixel by pixel.
    pub fn zip_map<U, V>(&self, other: &Buffer2<U>, mut f: impl FnMut(&T, &U) -> V) -> Buffer2<V> {
        assert!(self.same_shape(other), "shape mismatch");
        Buffer2 {
            pixels: self
                .pixels
                .iter()
                .zip(other.pixels.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }

    /// Grow the buffer by `border` pixels on every side, replicating edge values.
    pub fn padded_replicate(&self, border: usize) -> Self {
        assert!(!self.is_empty(), "cannot pad an empty buffer");
        let max_x = self.width - 1;
        let max_y = self.height - 1;
        Self::from_fn(
            self.width + 2 * border,
            self.height + 2 * border,
            |x, y| {
                let sx = x.saturating_sub(border).min(max_x);
                let sy = y.saturating_sub(border).min(max_y);
                self.get(sx, sy).clone()
            },
        )
    }

    /// Grow the buffer by `border` pixels on every side, filling with `value`.
    pub fn padded_constant(&self, border: usize, value: T) -> Self {
        let width = self.width;
        let height = self.height;
        Self::from_fn(width + 2 * border, height + 2 * border, |x, y| {
            if x < border || y < border || x >= width + border || y >= height + border {
                value.clone()
            } else {
                self.get(x - border, y - border).clone()
            }
        })
    }

    /// Remove `border` pixels from every side. Inverse of the padding helpers.
    pub fn cropped(&self, border: usize) -> Self {
        assert!(
            self.width >= 2 * border && self.height >= 2 * border,
            "border larger than buffer"
        );
        Self::from_fn(
            self.width - 2 * border,
            self.height - 2 * border,
            |x, y| self.get(x + border, y + border).clone(),
        )
    }
}

impl<T: Default + Clone> Buffer2<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![T::default(); width * height],
            width,
            height,
        }
    }
}

impl Buffer2<f32> {
    /// Minimum and maximum sample, or `None` for an empty buffer.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.pixels.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

impl Buffer2<bool> {
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.pixels.iter().filter(|&&v| v).count()
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<T> Index<usize> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.pixels[idx]
    }
}

impl<T> IndexMut<usize> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.pixels[idx]
    }
}

impl<T> Deref for Buffer2<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl<T> DerefMut for Buffer2<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

impl<'a, T> IntoIterator for &'a Buffer2<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}

impl<T> From<Buffer2<T>> for Vec<T> {
    #[inline]
    fn from(buffer: Buffer2<T>) -> Self {
        buffer.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_dimensions() {
        let buf = Buffer2::new(3, 2, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.len(), 6);
        assert!(!buf.is_empty());
    }

    #[test]
    #[should_panic(expected = "pixels length must equal width * height")]
    fn test_new_panics_on_size_mismatch() {
        Buffer2::new(3, 2, vec![1, 2, 3]);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let buf = Buffer2::from_fn(3, 2, |x, y| y * 10 + x);
        assert_eq!(buf.pixels(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(buf[(2, 1)], 12);
    }

    #[test]
    fn test_coords_inverts_index() {
        let buf = Buffer2::<u8>::new_default(5, 3);
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(buf.coords(buf.index(x, y)), (x, y));
            }
        }
    }

    #[test]
    fn test_row_access() {
        let mut buf = Buffer2::new(3, 2, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(buf.row(1), &[4, 5, 6]);
        buf.row_mut(0)[1] = 9;
        assert_eq!(buf[(1, 0)], 9);
    }

    #[test]
    fn test_map_and_zip_map() {
        let a = Buffer2::new(2, 2, vec![1, 2, 3, 4]);
        let b = Buffer2::new(2, 2, vec![10, 20, 30, 40]);
        let doubled = a.map(|v| v * 2);
        assert_eq!(doubled.pixels(), &[2, 4, 6, 8]);
        let summed = a.zip_map(&b, |x, y| x + y);
        assert_eq!(summed.pixels(), &[11, 22, 33, 44]);
    }

    #[test]
    #[should_panic(expected = "shape mismatch")]
    fn test_zip_map_panics_on_shape_mismatch() {
        let a = Buffer2::new(2, 2, vec![1, 2, 3, 4]);
        let b = Buffer2::new(4, 1, vec![1, 2, 3, 4]);
        let _ = a.zip_map(&b, |x, y| x + y);
    }

    #[test]
    fn test_padded_replicate_copies_edges() {
        // 1 2
        // 3 4
        let buf = Buffer2::new(2, 2, vec![1, 2, 3, 4]);
        let padded = buf.padded_replicate(1);
        assert_eq!(padded.width(), 4);
        assert_eq!(padded.height(), 4);
        assert_eq!(
            padded.pixels(),
            &[1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn test_padded_constant_and_cropped_round_trip() {
        let buf = Buffer2::from_fn(4, 3, |x, y| x + y * 4);
        let padded = buf.padded_constant(2, 99);
        assert_eq!(padded[(0, 0)], 99);
        assert_eq!(padded[(2, 2)], 0);
        assert_eq!(padded.cropped(2), buf);
    }

    #[test]
    fn test_min_max() {
        let buf = Buffer2::new(2, 2, vec![0.5f32, -1.0, 3.0, 0.0]);
        assert_eq!(buf.min_max(), Some((-1.0, 3.0)));
        let empty: Buffer2<f32> = Buffer2::new_default(0, 0);
        assert_eq!(empty.min_max(), None);
    }

    #[test]
    fn test_count_ones() {
        let buf = Buffer2::new(3, 1, vec![true, false, true]);
        assert_eq!(buf.count_ones(), 2);
    }

    #[test]
    fn test_index_tuple_and_linear() {
        let mut buf = Buffer2::new(3, 2, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(buf[(2, 1)], 60);
        assert_eq!(buf[4], 50);
        buf[(0, 1)] = 7;
        assert_eq!(buf[3], 7);
    }
}
