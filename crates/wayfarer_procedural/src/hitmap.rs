//! # Hitmap
//!
//! Bit-packed occupancy grid, one bit per tile, 1 = occupied.
//!
//! ## Axis Order
//!
//! Every method takes `(x, y)` with `x` the column and `y` the row, and the
//! linear index is `y * width + x`. Rectangles are anchored at their top-left
//! tile and cover `[x, x + w) x [y, y + h)`.
//!
//! ## Placement Test
//!
//! [`Hitmap::fits`] is deliberately O(1): it enforces a one-tile margin from
//! every border and then samples only the four corners of the candidate
//! rectangle, pulled inward by [`CORNER_EPSILON`]. A rectangle wider or taller
//! than two tiles can therefore pass while an occupied cell sits strictly
//! inside it. Placement content is tuned against this behaviour; do not
//! replace it with a full scan.

/// Inward bias applied to sampled corners so that a rectangle ending exactly
/// on a tile boundary does not sample the neighbouring tile.
pub const CORNER_EPSILON: f64 = 0.000_01;

/// Bit-packed 2-D occupancy grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hitmap {
    width: usize,
    height: usize,
    body: Vec<u8>,
}

impl Hitmap {
    /// Creates an empty (all free) hitmap.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            body: vec![0; (width * height).div_ceil(8)],
        }
    }

    /// Width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Raw packed bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    #[inline]
    fn locate(&self, x: usize, y: usize) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let linear = y * self.width + x;
        Some((linear / 8, 1 << (linear % 8)))
    }

    /// Marks a tile occupied. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.body[index] |= mask;
        }
    }

    /// Marks a tile free. Out-of-bounds writes are ignored.
    #[inline]
    pub fn unset(&mut self, x: usize, y: usize) {
        if let Some((index, mask)) = self.locate(x, y) {
            self.body[index] &= !mask;
        }
    }

    /// Returns whether a tile is occupied.
    ///
    /// Everything outside the grid reads as occupied.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        match self.locate(x, y) {
            Some((index, mask)) => self.body[index] & mask != 0,
            None => true,
        }
    }

    /// Marks every tile of a rectangle occupied (clipped to the grid).
    pub fn fill_area(&mut self, x: usize, y: usize, w: usize, h: usize) {
        self.write_area(x, y, w, h, true);
    }

    /// Marks every tile of a rectangle free (clipped to the grid).
    pub fn clear_area(&mut self, x: usize, y: usize, w: usize, h: usize) {
        self.write_area(x, y, w, h, false);
    }

    fn write_area(&mut self, x: usize, y: usize, w: usize, h: usize, occupied: bool) {
        let end_x = (x + w).min(self.width);
        let end_y = (y + h).min(self.height);
        for row in y..end_y {
            for col in x..end_x {
                if occupied {
                    self.set(col, row);
                } else {
                    self.unset(col, row);
                }
            }
        }
    }

    /// Corner-sampled placement test for a `w x h` footprint at `(x, y)`.
    ///
    /// Fails when the rectangle leaves the one-tile border margin
    /// (`x >= 1`, `y >= 1`, `x + w <= width - 1`, `y + h <= height - 1`)
    /// or when any of its four sampled corners is occupied. Non-finite
    /// arguments never fit.
    #[must_use]
    pub fn fits(&self, x: f64, y: f64, w: f64, h: f64) -> bool {
        if ![x, y, w, h].iter().all(|v| v.is_finite()) {
            return false;
        }
        let max_x = self.width as f64 - 1.0;
        let max_y = self.height as f64 - 1.0;
        if x < 1.0 || y < 1.0 || x + w > max_x || y + h > max_y {
            return false;
        }

        let left = x + CORNER_EPSILON;
        let right = x + w - CORNER_EPSILON;
        let top = y + CORNER_EPSILON;
        let bottom = y + h - CORNER_EPSILON;

        !(self.sample(left, top)
            || self.sample(right, top)
            || self.sample(left, bottom)
            || self.sample(right, bottom))
    }

    #[inline]
    fn sample(&self, x: f64, y: f64) -> bool {
        self.get(x.floor() as usize, y.floor() as usize)
    }

    /// Pastes `source` into this grid with its origin at `(offset_x, offset_y)`.
    ///
    /// The copy is bit-for-bit: a free source cell clears the destination.
    /// Source cells that land outside this grid are dropped.
    pub fn apply(&mut self, source: &Hitmap, offset_x: i32, offset_y: i32) {
        for row in 0..source.height {
            for col in 0..source.width {
                let dx = col as i64 + i64::from(offset_x);
                let dy = row as i64 + i64::from(offset_y);
                if dx < 0 || dy < 0 {
                    continue;
                }
                let (dx, dy) = (dx as usize, dy as usize);
                if dx >= self.width || dy >= self.height {
                    continue;
                }
                if source.get(col, row) {
                    self.set(dx, dy);
                } else {
                    self.unset(dx, dy);
                }
            }
        }
    }

    /// Number of occupied tiles.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.body.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Row-major 2-D 0/1 rendering.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| u8::from(self.get(x, y))).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_length() {
        assert_eq!(Hitmap::new(100, 100).as_bytes().len(), 1250);
        assert_eq!(Hitmap::new(3, 3).as_bytes().len(), 2);
        assert_eq!(Hitmap::new(28, 28).as_bytes().len(), 98);
    }

    #[test]
    fn test_set_get_unset() {
        let mut hm = Hitmap::new(10, 10);
        assert!(!hm.get(3, 7));
        hm.set(3, 7);
        assert!(hm.get(3, 7));
        assert!(!hm.get(7, 3), "axes must not be swapped");
        hm.unset(3, 7);
        assert!(!hm.get(3, 7));
    }

    #[test]
    fn test_out_of_bounds_reads_occupied() {
        let mut hm = Hitmap::new(4, 4);
        assert!(hm.get(4, 0));
        assert!(hm.get(0, 4));
        hm.set(9, 9);
        assert_eq!(hm.occupied_count(), 0);
    }

    #[test]
    fn test_fill_then_clear_returns_to_empty() {
        let mut hm = Hitmap::new(20, 12);
        hm.fill_area(2, 3, 7, 5);
        assert_eq!(hm.occupied_count(), 35);
        hm.clear_area(2, 3, 7, 5);
        assert_eq!(hm.occupied_count(), 0);
        assert!(hm.to_rows().iter().flatten().all(|&v| v == 0));
    }

    #[test]
    fn test_fill_is_clipped() {
        let mut hm = Hitmap::new(5, 5);
        hm.fill_area(3, 3, 10, 10);
        assert_eq!(hm.occupied_count(), 4);
    }

    #[test]
    fn test_fits_margin() {
        let hm = Hitmap::new(10, 10);
        assert!(hm.fits(1.0, 1.0, 1.0, 1.0));
        assert!(hm.fits(8.0, 8.0, 1.0, 1.0));
        assert!(!hm.fits(0.5, 4.0, 1.0, 1.0));
        assert!(!hm.fits(4.0, 0.0, 1.0, 1.0));
        assert!(!hm.fits(8.5, 4.0, 1.0, 1.0));
        assert!(!hm.fits(4.0, 8.5, 1.0, 1.0));
    }

    #[test]
    fn test_fits_rejects_occupied_corners() {
        let mut hm = Hitmap::new(10, 10);
        hm.set(4, 4);
        assert!(!hm.fits(4.0, 4.0, 1.0, 1.0));
        assert!(!hm.fits(3.5, 3.5, 1.0, 1.0));
        assert!(!hm.fits(3.0, 3.0, 2.0, 2.0));
        // Ends exactly on the boundary of the occupied tile.
        assert!(hm.fits(3.0, 3.0, 1.0, 1.0));
        assert!(hm.fits(5.0, 5.0, 1.0, 1.0));
    }

    #[test]
    fn test_fits_only_samples_corners() {
        let mut hm = Hitmap::new(10, 10);
        hm.set(4, 4);
        // 3x3 footprint centred on the occupied tile: corners are all free.
        assert!(hm.fits(3.0, 3.0, 3.0, 3.0));
    }

    #[test]
    fn test_fits_rejects_non_finite() {
        let hm = Hitmap::new(10, 10);
        assert!(hm.fits(4.0, 4.0, 1.0, 1.0));
        assert!(!hm.fits(f64::NAN, f64::NAN, 1.0, 1.0));
        assert!(!hm.fits(4.0, f64::NAN, 1.0, 1.0));
        assert!(!hm.fits(4.0, 4.0, f64::NAN, 1.0));
        assert!(!hm.fits(f64::NEG_INFINITY, 4.0, 1.0, 1.0));
        assert!(!hm.fits(4.0, 4.0, 1.0, f64::INFINITY));
    }

    #[test]
    fn test_apply_is_bit_for_bit() {
        let mut dest = Hitmap::new(8, 8);
        dest.fill_area(0, 0, 8, 8);

        let mut stamp = Hitmap::new(3, 2);
        stamp.set(1, 0);

        dest.apply(&stamp, 2, 5);
        assert!(!dest.get(2, 5));
        assert!(dest.get(3, 5));
        assert!(!dest.get(4, 5));
        assert!(!dest.get(2, 6));
        assert!(dest.get(1, 5), "cells outside the stamp are untouched");
        assert_eq!(dest.occupied_count(), 64 - 5);
    }

    #[test]
    fn test_apply_clips_negative_and_overflowing_offsets() {
        let mut dest = Hitmap::new(4, 4);
        let mut stamp = Hitmap::new(3, 3);
        stamp.fill_area(0, 0, 3, 3);
        dest.apply(&stamp, -2, 3);
        assert_eq!(dest.occupied_count(), 1);
        assert!(dest.get(0, 3));
    }

    #[test]
    fn test_rows_layout() {
        let mut hm = Hitmap::new(3, 2);
        hm.set(2, 1);
        assert_eq!(hm.to_rows(), vec![vec![0, 0, 0], vec![0, 0, 1]]);
    }
}
