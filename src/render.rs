//! Frame loop: draw, flip, flush
//!
//! [`Renderer`] ties a [`Display`] to a [`DoubleBuffer`] and a
//! [`DirtyTileTracker`]. Each frame the caller draws into the back buffer and
//! marks what changed; the renderer flips and pushes only the dirty tiles of
//! the new front buffer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use core::sync::atomic::AtomicBool;
//! use st77xx::{Builder, Color565, Dimensions, Display, Interface, Renderer};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! # let interface = Interface::new(MockSpi, MockPin, MockPin, None::<MockPin>);
//! # let dims = match Dimensions::new(240, 240) {
//! #     Ok(dims) => dims,
//! #     Err(_) => return,
//! # };
//! # let config = match Builder::new().dimensions(dims).build() {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut delay);
//!
//! let mut renderer = match Renderer::new(display, 16, 16) {
//!     Ok(renderer) => renderer,
//!     Err(_) => return,
//! };
//! let stop = AtomicBool::new(false);
//! let mut x = 0;
//! let _ = renderer.run(&stop, &mut delay, 16, |gfx, tiles| {
//!     gfx.clear(Color565::BLACK);
//!     gfx.fill_rect(x, 100, 20, 20, Color565::RED);
//!     // Old and new position
//!     tiles.mark_dirty_rect(x - 2, 100, 24, 20);
//!     x = (x + 2) % 240;
//! });
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::display::Display;
use crate::double_buffer::DoubleBuffer;
use crate::error::{BuilderError, Error};
use crate::gfx::Gfx2D;
use crate::interface::DisplayInterface;
use crate::config::Rotation;
use crate::tiles::{DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, DirtyTileTracker};

/// Frames between throughput summaries
pub const STATS_LOG_INTERVAL: u64 = 60;

/// Running totals since the renderer was created
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames completed
    pub frames: u64,
    /// Pixel bytes pushed to the panel
    pub bytes: u64,
    /// Tiles pushed to the panel
    pub tiles: u64,
}

/// Double-buffered, dirty-tile frame renderer
pub struct Renderer<I>
where
    I: DisplayInterface,
{
    display: Display<I>,
    buffers: DoubleBuffer,
    tiles: DirtyTileTracker,
    stats: FrameStats,
}

impl<I> Renderer<I>
where
    I: DisplayInterface,
{
    /// Create a renderer sized to the display's logical size
    ///
    /// Every tile starts dirty so the first frame covers the whole panel.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidTileSize` for a zero tile size.
    pub fn new(display: Display<I>, tile_w: u16, tile_h: u16) -> Result<Self, BuilderError> {
        let size = display.size();
        let mut tiles = DirtyTileTracker::new(size.width, size.height, tile_w, tile_h)?;
        tiles.mark_all();
        Ok(Self {
            display,
            buffers: DoubleBuffer::new(size.width, size.height),
            tiles,
            stats: FrameStats::default(),
        })
    }

    /// Create a renderer with 16x16 tiles
    ///
    /// # Errors
    ///
    /// Never fails with the default tile size; the `Result` mirrors [`new`](Self::new).
    pub fn with_default_tiles(display: Display<I>) -> Result<Self, BuilderError> {
        Self::new(display, DEFAULT_TILE_WIDTH, DEFAULT_TILE_HEIGHT)
    }

    /// Rotate the display and resize the buffers to the new logical size
    ///
    /// Both buffers are cleared and every tile is marked dirty, so the next
    /// frame redraws the whole panel.
    ///
    /// # Errors
    ///
    /// Returns the display error if MADCTL could not be sent; the buffers are
    /// left untouched in that case.
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error<I>> {
        self.display.set_rotation(rotation)?;
        self.sync_size();
        Ok(())
    }

    // Catches rotations made through `display_mut`
    fn sync_size(&mut self) {
        let size = self.display.size();
        if size.width == self.buffers.width() && size.height == self.buffers.height() {
            return;
        }
        debug!("resizing buffers to {}x{}", size.width, size.height);
        self.buffers = DoubleBuffer::new(size.width, size.height);
        self.tiles.resize(size.width, size.height);
    }

    /// Render one frame
    ///
    /// `draw` gets the back buffer and the tile tracker; it must mark every
    /// area it changed. The buffers are then flipped and the dirty tiles of
    /// the new front buffer are pushed. Tiles that failed to push stay dirty.
    ///
    /// # Errors
    ///
    /// Returns the display error of the first tile that failed.
    pub fn frame<F>(&mut self, mut draw: F) -> Result<(), Error<I>>
    where
        F: FnMut(&mut Gfx2D<'_>, &mut DirtyTileTracker),
    {
        self.sync_size();
        {
            let mut gfx = Gfx2D::new(self.buffers.back_mut());
            draw(&mut gfx, &mut self.tiles);
        }
        self.buffers.flip();

        let flushed = self.tiles.flush(self.buffers.front(), &mut self.display)?;
        self.stats.frames += 1;
        self.stats.bytes += flushed.bytes as u64;
        self.stats.tiles += flushed.tiles as u64;
        debug!(
            "frame {}: {} tiles, {} bytes",
            self.stats.frames, flushed.tiles, flushed.bytes
        );
        if self.stats.frames % STATS_LOG_INTERVAL == 0 {
            info!(
                "{} frames, {} bytes pushed ({} per frame)",
                self.stats.frames,
                self.stats.bytes,
                self.stats.bytes / self.stats.frames
            );
        }
        Ok(())
    }

    /// Render frames until `stop` is set
    ///
    /// The flag is checked between frames only; a frame in flight always
    /// completes. After each frame the loop waits `frame_interval_ms`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first frame error.
    pub fn run<D, F>(
        &mut self,
        stop: &AtomicBool,
        delay: &mut D,
        frame_interval_ms: u32,
        mut draw: F,
    ) -> Result<(), Error<I>>
    where
        D: DelayNs,
        F: FnMut(&mut Gfx2D<'_>, &mut DirtyTileTracker),
    {
        while !stop.load(Ordering::Relaxed) {
            self.frame(&mut draw)?;
            delay.delay_ms(frame_interval_ms);
        }
        debug!("render loop stopped after {} frames", self.stats.frames);
        Ok(())
    }

    /// Totals so far
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Tile tracker, e.g. to mark areas outside of `frame`
    pub fn tiles_mut(&mut self) -> &mut DirtyTileTracker {
        &mut self.tiles
    }

    /// Borrow the display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Mutably borrow the display
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Give back the display
    pub fn into_display(self) -> Display<I> {
        self.display
    }
}
