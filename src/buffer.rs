//! Fixed-size RGB565 pixel store
//!
//! [`PixelBuffer`] is the unit of storage shared by the rasterizer, the double
//! buffer and the tile flush. Pixels are kept row-major with a stride equal to
//! the width, and the store is never resized after creation.
//!
//! Coordinates are signed so that geometry code can hand in negative or
//! overflowing positions; anything outside `[0, width) x [0, height)` is
//! silently ignored.
//!
//! ## Example
//!
//! ```
//! use st77xx::{Color565, PixelBuffer};
//!
//! let mut buf = PixelBuffer::new(8, 8);
//! buf.set_pixel(3, 4, Color565::RED);
//! assert_eq!(buf.get_pixel(3, 4), Some(Color565::RED));
//!
//! // Out of range writes are ignored, reads report absence
//! buf.set_pixel(-1, 100, Color565::RED);
//! assert_eq!(buf.get_pixel(-1, 100), None);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::color::Color565;

/// Row-major RGB565 pixel store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    pixels: Vec<Color565>,
}

impl PixelBuffer {
    /// Allocate a buffer filled with black
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Color565::BLACK)
    }

    /// Allocate a buffer filled with `color`
    pub fn filled(width: u16, height: u16, color: Color565) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; usize::from(width) * usize::from(height)],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Fill the whole store
    pub fn clear(&mut self, color: Color565) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        Some(y as usize * usize::from(self.width) + x as usize)
    }

    /// Write one pixel; out of range coordinates are a no-op
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color565) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Read one pixel; `None` when out of range
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color565> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Fill the half-open span `[x0, x1)` of row `y`
    ///
    /// The span is clipped to the row; rows outside the buffer and empty
    /// spans are ignored.
    pub fn fill_span(&mut self, y: i32, x0: i32, x1: i32, color: Color565) {
        if y < 0 || y >= i32::from(self.height) {
            return;
        }
        let w = i32::from(self.width);
        let start = x0.clamp(0, w);
        let end = x1.clamp(0, w);
        if end <= start {
            return;
        }
        let row = y as usize * usize::from(self.width);
        self.pixels[row + start as usize..row + end as usize].fill(color);
    }

    /// Borrow row `y`
    pub fn row(&self, y: u16) -> Option<&[Color565]> {
        if y >= self.height {
            return None;
        }
        let start = usize::from(y) * usize::from(self.width);
        self.pixels.get(start..start + usize::from(self.width))
    }

    /// Borrow row `y` mutably
    pub fn row_mut(&mut self, y: u16) -> Option<&mut [Color565]> {
        if y >= self.height {
            return None;
        }
        let start = usize::from(y) * usize::from(self.width);
        let end = start + usize::from(self.width);
        self.pixels.get_mut(start..end)
    }

    /// All pixels, row-major
    pub fn as_slice(&self) -> &[Color565] {
        &self.pixels
    }

    /// All pixels, row-major, mutable
    pub fn as_mut_slice(&mut self) -> &mut [Color565] {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_size() {
        let buf = PixelBuffer::new(10, 4);
        assert_eq!(buf.as_slice().len(), 40);
        assert!(buf.as_slice().iter().all(|&c| c == Color565::BLACK));
    }

    #[test]
    fn test_set_get_in_bounds() {
        let mut buf = PixelBuffer::new(5, 3);
        for y in 0..3 {
            for x in 0..5 {
                let c = Color565::new((y * 5 + x) as u16);
                buf.set_pixel(x, y, c);
                assert_eq!(buf.get_pixel(x, y), Some(c));
            }
        }
        assert_eq!(buf.as_slice()[7], Color565::new(7));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut buf = PixelBuffer::new(4, 4);
        let before = buf.clone();
        for &(x, y) in &[(-1, 0), (0, -1), (4, 0), (0, 4), (i32::MIN, i32::MAX)] {
            buf.set_pixel(x, y, Color565::WHITE);
            assert_eq!(buf.get_pixel(x, y), None);
        }
        assert_eq!(buf, before);
    }

    #[test]
    fn test_clear() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.clear(Color565::BLUE);
        assert!(buf.as_slice().iter().all(|&c| c == Color565::BLUE));
    }

    #[test]
    fn test_fill_span_clips() {
        let mut buf = PixelBuffer::new(6, 2);
        buf.fill_span(1, -3, 2, Color565::RED);
        assert_eq!(
            buf.row(1),
            Some(
                &[
                    Color565::RED,
                    Color565::RED,
                    Color565::BLACK,
                    Color565::BLACK,
                    Color565::BLACK,
                    Color565::BLACK
                ][..]
            )
        );
        buf.fill_span(0, 4, 100, Color565::GREEN);
        assert_eq!(buf.get_pixel(3, 0), Some(Color565::BLACK));
        assert_eq!(buf.get_pixel(5, 0), Some(Color565::GREEN));

        let before = buf.clone();
        buf.fill_span(2, 0, 6, Color565::WHITE);
        buf.fill_span(0, 3, 3, Color565::WHITE);
        assert_eq!(buf, before);
    }

    #[test]
    fn test_row_out_of_range() {
        let buf = PixelBuffer::new(2, 2);
        assert!(buf.row(2).is_none());
        assert_eq!(buf.row(1).map(<[Color565]>::len), Some(2));
    }
}
