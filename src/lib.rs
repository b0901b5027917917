//! ST7735/ST7789 RGB565 Rendering Pipeline
//!
//! A rasterizer, double buffer and dirty-tile tracker feeding a driver for the
//! ST7735 and ST7789 SPI color LCD controllers (panels up to 320x320).
//!
//! ## Features
//!
//! - `no_std` compatible (needs `alloc`)
//! - `embedded-hal` v1.0 support
//! - 2D primitives, gradients, blits and 5x7 text into RGB565 buffers
//! - Only changed tiles are sent to the panel
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Linux spidev + gpio-cdev transport (with `linux` feature)
//! - Hardware rotation with per-panel RAM offsets
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use st77xx::{
//!     Builder, Color565, ControllerFamily, Dimensions, Display, Interface, Renderer, Rotation,
//! };
//!
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
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, None::<MockPin>);
//! let dims = match Dimensions::new(135, 240) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new()
//!     .dimensions(dims)
//!     .family(ControllerFamily::St7789)
//!     .offsets(52, 40)
//!     .rotation(Rotation::Rotate90)
//!     .invert(true)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut delay);
//!
//! let mut renderer = match Renderer::new(display, 16, 16) {
//!     Ok(renderer) => renderer,
//!     Err(_) => return,
//! };
//! let _ = renderer.frame(|gfx, tiles| {
//!     gfx.fill_circle(120, 67, 30, Color565::CYAN);
//!     gfx.text(4, 4, "hello", Color565::WHITE, 2);
//!     tiles.mark_all();
//! });
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Frame buffer storage
pub mod buffer;
/// RGB565 color type and conversions
pub mod color;
/// ST7735/ST7789 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Back/front frame pair
pub mod double_buffer;
/// Error types for the driver
pub mod error;
/// 5x7 bitmap font
pub mod font;
/// Software rasterizer
pub mod gfx;
/// Hardware interface abstraction
pub mod interface;
/// Frame loop
pub mod render;
/// MADCTL and offset helpers for rotation
pub mod rotation;
/// Dirty tile tracking
pub mod tiles;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

/// Linux spidev and gpio-cdev transport (requires `linux` feature)
#[cfg(feature = "linux")]
pub mod linux;

pub use buffer::PixelBuffer;
pub use color::{Color565, Rgba, rgb};
pub use command::{Command, InitStep};
pub use config::{Builder, Config, ControllerFamily, Dimensions, Rotation};
pub use display::{Display, DriverState, Pixels};
pub use double_buffer::DoubleBuffer;
pub use error::{BuilderError, Error};
pub use gfx::{BlitOptions, Gfx2D, Point, Rect};
pub use interface::InterfaceError;
pub use interface::{DisplayInterface, Interface};
pub use render::{FrameStats, Renderer};
pub use tiles::{DirtyTileTracker, FlushStats, RectSink};
