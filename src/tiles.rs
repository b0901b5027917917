//! Dirty-tile tracking
//!
//! [`DirtyTileTracker`] splits the panel into fixed-size tiles and remembers
//! which ones were touched since the last flush. A flush copies each dirty
//! tile out of a [`PixelBuffer`] and hands it to a [`RectSink`], normally the
//! display driver.
//!
//! Tiles on the right and bottom edges are clipped when the panel size is not
//! a multiple of the tile size.
//!
//! ## Example
//!
//! ```
//! use core::convert::Infallible;
//! use st77xx::{Color565, DirtyTileTracker, PixelBuffer, RectSink};
//!
//! struct CountingSink(usize);
//!
//! impl RectSink for CountingSink {
//!     type Error = Infallible;
//!
//!     fn push_rect(
//!         &mut self,
//!         _x: u16,
//!         _y: u16,
//!         w: u16,
//!         h: u16,
//!         _pixels: &[Color565],
//!     ) -> Result<(), Self::Error> {
//!         self.0 += usize::from(w) * usize::from(h);
//!         Ok(())
//!     }
//! }
//!
//! let buf = PixelBuffer::new(32, 32);
//! let mut tiles = match DirtyTileTracker::new(32, 32, 8, 8) {
//!     Ok(tiles) => tiles,
//!     Err(_) => return,
//! };
//! let mut sink = CountingSink(0);
//!
//! tiles.mark_dirty_rect(9, 9, 1, 1);
//! let stats = match tiles.flush(&buf, &mut sink) {
//!     Ok(stats) => stats,
//!     Err(never) => match never {},
//! };
//! assert_eq!(stats.tiles, 1);
//! assert_eq!(sink.0, 64);
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::PixelBuffer;
use crate::color::Color565;
use crate::error::BuilderError;

/// Default tile width
pub const DEFAULT_TILE_WIDTH: u16 = 16;
/// Default tile height
pub const DEFAULT_TILE_HEIGHT: u16 = 16;

/// Receiver of flushed tile rectangles
///
/// `pixels` holds exactly `w * h` colors in row-major order.
pub trait RectSink {
    /// Error returned by the sink
    type Error;

    /// Transmit one rectangle
    fn push_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        pixels: &[Color565],
    ) -> Result<(), Self::Error>;
}

/// Counters for one flush
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Tiles pushed to the sink
    pub tiles: usize,
    /// Pixel bytes pushed (two per pixel)
    pub bytes: usize,
}

/// Dirty flags for a grid of tiles
#[derive(Clone, Debug)]
pub struct DirtyTileTracker {
    width: u16,
    height: u16,
    tile_w: u16,
    tile_h: u16,
    tiles_x: u16,
    tiles_y: u16,
    dirty: Vec<bool>,
    scratch: Vec<Color565>,
}

impl DirtyTileTracker {
    /// Create a tracker for a `width x height` panel
    ///
    /// All tiles start clean. Tile sizes must be non-zero.
    pub fn new(width: u16, height: u16, tile_w: u16, tile_h: u16) -> Result<Self, BuilderError> {
        if tile_w == 0 || tile_h == 0 {
            return Err(BuilderError::InvalidTileSize {
                width: tile_w,
                height: tile_h,
            });
        }
        let tiles_x = width.div_ceil(tile_w);
        let tiles_y = height.div_ceil(tile_h);
        Ok(Self {
            width,
            height,
            tile_w,
            tile_h,
            tiles_x,
            tiles_y,
            dirty: vec![false; usize::from(tiles_x) * usize::from(tiles_y)],
            scratch: Vec::with_capacity(usize::from(tile_w) * usize::from(tile_h)),
        })
    }

    /// Regrid for a `width x height` panel, keeping the tile size
    ///
    /// Every tile of the new grid starts dirty.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.tiles_x = width.div_ceil(self.tile_w);
        self.tiles_y = height.div_ceil(self.tile_h);
        self.dirty.clear();
        self.dirty
            .resize(usize::from(self.tiles_x) * usize::from(self.tiles_y), true);
    }

    /// Number of tile columns
    pub fn tiles_x(&self) -> u16 {
        self.tiles_x
    }

    /// Number of tile rows
    pub fn tiles_y(&self) -> u16 {
        self.tiles_y
    }

    /// Nominal tile size
    pub fn tile_size(&self) -> (u16, u16) {
        (self.tile_w, self.tile_h)
    }

    /// Mark every tile intersecting `[x, x + w) x [y, y + h)`
    ///
    /// The rectangle is clipped to the panel; empty rectangles mark nothing.
    pub fn mark_dirty_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y) = (i64::from(x), i64::from(y));
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(self.width));
        let y1 = (y + i64::from(h)).min(i64::from(self.height));
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let tx0 = (x0 / i64::from(self.tile_w)) as usize;
        let ty0 = (y0 / i64::from(self.tile_h)) as usize;
        let tx1 = ((x1 - 1) / i64::from(self.tile_w)) as usize;
        let ty1 = ((y1 - 1) / i64::from(self.tile_h)) as usize;
        let stride = usize::from(self.tiles_x);
        for ty in ty0..=ty1 {
            self.dirty[ty * stride + tx0..=ty * stride + tx1].fill(true);
        }
    }

    /// Mark every tile
    pub fn mark_all(&mut self) {
        self.dirty.fill(true);
    }

    /// Whether tile `(tx, ty)` is dirty; out of range tiles are clean
    pub fn is_dirty(&self, tx: u16, ty: u16) -> bool {
        if tx >= self.tiles_x || ty >= self.tiles_y {
            return false;
        }
        self.dirty[usize::from(ty) * usize::from(self.tiles_x) + usize::from(tx)]
    }

    /// Number of dirty tiles
    pub fn dirty_count(&self) -> usize {
        self.dirty.iter().filter(|&&d| d).count()
    }

    /// Push every dirty tile of `buffer` to `sink`
    ///
    /// Tiles go out in row-major tile order. A tile's flag is cleared once the
    /// sink accepts it; on error the failing tile and every later one stay
    /// dirty and the error is returned immediately.
    pub fn flush<S: RectSink>(
        &mut self,
        buffer: &PixelBuffer,
        sink: &mut S,
    ) -> Result<FlushStats, S::Error> {
        let mut stats = FlushStats::default();
        let width = self.width.min(buffer.width());
        let height = self.height.min(buffer.height());

        for ty in 0..self.tiles_y {
            for tx in 0..self.tiles_x {
                let index = usize::from(ty) * usize::from(self.tiles_x) + usize::from(tx);
                if !self.dirty[index] {
                    continue;
                }
                let x = tx * self.tile_w;
                let y = ty * self.tile_h;
                if x >= width || y >= height {
                    // Nothing of this tile exists in a smaller buffer
                    self.dirty[index] = false;
                    continue;
                }
                let w = self.tile_w.min(width - x);
                let h = self.tile_h.min(height - y);

                self.scratch.clear();
                for row in y..y + h {
                    if let Some(line) = buffer.row(row) {
                        self.scratch
                            .extend_from_slice(&line[usize::from(x)..usize::from(x + w)]);
                    }
                }

                sink.push_rect(x, y, w, h, &self.scratch)?;
                self.dirty[index] = false;
                stats.tiles += 1;
                stats.bytes += usize::from(w) * usize::from(h) * 2;
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        rects: Vec<(u16, u16, u16, u16, Vec<Color565>)>,
        fail_after: Option<usize>,
    }

    impl RectSink for RecordingSink {
        type Error = ();

        fn push_rect(
            &mut self,
            x: u16,
            y: u16,
            w: u16,
            h: u16,
            pixels: &[Color565],
        ) -> Result<(), Self::Error> {
            if self.fail_after == Some(self.rects.len()) {
                return Err(());
            }
            assert_eq!(pixels.len(), usize::from(w) * usize::from(h));
            self.rects.push((x, y, w, h, pixels.to_vec()));
            Ok(())
        }
    }

    fn tracker(w: u16, h: u16, tw: u16, th: u16) -> DirtyTileTracker {
        DirtyTileTracker::new(w, h, tw, th).unwrap()
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        assert!(matches!(
            DirtyTileTracker::new(32, 32, 0, 8),
            Err(BuilderError::InvalidTileSize { width: 0, height: 8 })
        ));
    }

    #[test]
    fn test_resize_regrids_and_marks_all() {
        let mut t = tracker(135, 240, 16, 16);
        assert_eq!((t.tiles_x(), t.tiles_y()), (9, 15));
        t.resize(240, 135);
        assert_eq!((t.tiles_x(), t.tiles_y()), (15, 9));
        assert_eq!(t.tile_size(), (16, 16));
        assert_eq!(t.dirty_count(), 135);

        // Bottom edge tiles are 7 rows tall
        let buffer = PixelBuffer::new(240, 135);
        let mut sink = RecordingSink::default();
        let stats = t.flush(&buffer, &mut sink).unwrap();
        assert_eq!(stats.tiles, 135);
        assert_eq!(stats.bytes, 240 * 135 * 2);
    }

    #[test]
    fn test_mark_all_flush_full_frame() {
        let buf = PixelBuffer::new(32, 32);
        let mut tiles = tracker(32, 32, 8, 8);
        let mut sink = RecordingSink::default();

        tiles.mark_all();
        assert_eq!(tiles.dirty_count(), 16);
        let stats = tiles.flush(&buf, &mut sink);
        assert_eq!(stats, Ok(FlushStats { tiles: 16, bytes: 32 * 32 * 2 }));
        assert_eq!(sink.rects.len(), 16);

        let stats = tiles.flush(&buf, &mut sink);
        assert_eq!(stats, Ok(FlushStats::default()));
        assert_eq!(sink.rects.len(), 16);
    }

    #[test]
    fn test_mark_single_pixel() {
        let mut tiles = tracker(32, 32, 8, 8);
        tiles.mark_dirty_rect(9, 9, 1, 1);
        assert_eq!(tiles.dirty_count(), 1);
        assert!(tiles.is_dirty(1, 1));
    }

    #[test]
    fn test_mark_rect_on_tile_boundary() {
        let mut tiles = tracker(32, 32, 8, 8);
        // Ends exactly at x = 16, so column 2 stays clean
        tiles.mark_dirty_rect(8, 0, 8, 8);
        assert_eq!(tiles.dirty_count(), 1);
        assert!(tiles.is_dirty(1, 0));

        tiles.mark_dirty_rect(15, 15, 2, 2);
        assert!(tiles.is_dirty(1, 1) && tiles.is_dirty(2, 1));
        assert!(tiles.is_dirty(1, 2) && tiles.is_dirty(2, 2));
        assert_eq!(tiles.dirty_count(), 5);
    }

    #[test]
    fn test_mark_clamps_and_ignores_empty() {
        let mut tiles = tracker(32, 32, 8, 8);
        tiles.mark_dirty_rect(0, 0, 0, 10);
        tiles.mark_dirty_rect(40, 40, 5, 5);
        tiles.mark_dirty_rect(-20, -20, 5, 5);
        assert_eq!(tiles.dirty_count(), 0);

        tiles.mark_dirty_rect(-100, 30, 1000, 100);
        assert_eq!(tiles.dirty_count(), 4);
        assert!((0..4).all(|tx| tiles.is_dirty(tx, 3)));
    }

    #[test]
    fn test_edge_tiles_are_clipped() {
        let mut buf = PixelBuffer::new(20, 10);
        buf.set_pixel(19, 9, Color565::RED);
        let mut tiles = tracker(20, 10, 8, 8);
        assert_eq!((tiles.tiles_x(), tiles.tiles_y()), (3, 2));

        let mut sink = RecordingSink::default();
        tiles.mark_all();
        let stats = tiles.flush(&buf, &mut sink);
        assert_eq!(stats.map(|s| s.bytes), Ok(20 * 10 * 2));

        let dims: Vec<_> = sink.rects.iter().map(|r| (r.0, r.1, r.2, r.3)).collect();
        assert_eq!(
            dims,
            [
                (0, 0, 8, 8),
                (8, 0, 8, 8),
                (16, 0, 4, 8),
                (0, 8, 8, 2),
                (8, 8, 8, 2),
                (16, 8, 4, 2)
            ]
        );
        assert_eq!(sink.rects[5].4.last(), Some(&Color565::RED));
    }

    #[test]
    fn test_flush_extracts_tile_rows() {
        let mut buf = PixelBuffer::new(8, 4);
        for y in 0..4 {
            for x in 0..8 {
                buf.set_pixel(x, y, Color565::new((y * 8 + x) as u16));
            }
        }
        let mut tiles = tracker(8, 4, 4, 4);
        tiles.mark_dirty_rect(5, 1, 1, 1);
        let mut sink = RecordingSink::default();
        assert!(tiles.flush(&buf, &mut sink).is_ok());

        let expected: Vec<_> = [4, 5, 6, 7, 12, 13, 14, 15, 20, 21, 22, 23, 28, 29, 30, 31]
            .into_iter()
            .map(Color565::new)
            .collect();
        assert_eq!(sink.rects.len(), 1);
        assert_eq!(sink.rects[0].4, expected);
    }

    #[test]
    fn test_failed_push_keeps_tiles_dirty() {
        let buf = PixelBuffer::new(16, 16);
        let mut tiles = tracker(16, 16, 8, 8);
        tiles.mark_all();
        let mut sink = RecordingSink {
            fail_after: Some(1),
            ..RecordingSink::default()
        };
        assert_eq!(tiles.flush(&buf, &mut sink), Err(()));
        assert!(!tiles.is_dirty(0, 0));
        assert!(tiles.is_dirty(1, 0));
        assert_eq!(tiles.dirty_count(), 3);

        sink.fail_after = None;
        let stats = tiles.flush(&buf, &mut sink);
        assert_eq!(stats.map(|s| s.tiles), Ok(3));
    }
}
