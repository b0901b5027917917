//! Back/front frame pair
//!
//! Drawing goes to the back buffer only. [`DoubleBuffer::flip`] swaps the
//! roles; after a flip the buffer just drawn becomes the front buffer and is
//! read by the tile flush until the next flip.

use crate::buffer::PixelBuffer;
use crate::color::Color565;

/// Two equally sized [`PixelBuffer`]s with a back selector
#[derive(Clone, Debug)]
pub struct DoubleBuffer {
    buffers: [PixelBuffer; 2],
    back: usize,
}

impl DoubleBuffer {
    /// Allocate both buffers, cleared to black
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffers: [PixelBuffer::new(width, height), PixelBuffer::new(width, height)],
            back: 0,
        }
    }

    /// Width of both buffers
    pub fn width(&self) -> u16 {
        self.buffers[0].width()
    }

    /// Height of both buffers
    pub fn height(&self) -> u16 {
        self.buffers[0].height()
    }

    /// The writable buffer
    pub fn back(&self) -> &PixelBuffer {
        &self.buffers[self.back]
    }

    /// The writable buffer, mutably
    pub fn back_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffers[self.back]
    }

    /// The last completed frame
    pub fn front(&self) -> &PixelBuffer {
        &self.buffers[self.back ^ 1]
    }

    /// Swap back and front
    pub fn flip(&mut self) {
        self.back ^= 1;
    }

    /// Fill only the back buffer
    pub fn clear_back(&mut self, color: Color565) {
        self.back_mut().clear(color);
    }
}
