//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration or tracker construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Drawing into a [`PixelBuffer`](crate::PixelBuffer) never fails; only the
//! hardware-facing side returns errors, and nothing is retried internally.
//!
//! ## Example
//!
//! ```
//! use st77xx::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(0, 240);
//! assert!(result.is_err());
//! ```

use crate::display::DriverState;
use crate::interface::DisplayInterface;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`]
    /// implementation. A failed write leaves the controller's address state
    /// unknown; the driver is faulted until [`init`](crate::Display::init)
    /// runs again.
    Interface(I::Error),
    /// Rectangle outside the logical (rotated) panel
    InvalidRegion {
        /// X coordinate
        x: u16,
        /// Y coordinate
        y: u16,
        /// Width
        w: u16,
        /// Height
        h: u16,
    },
    /// Pixel slice length does not match the rectangle
    PixelCountMismatch {
        /// `w * h`
        expected: usize,
        /// Slice length
        provided: usize,
    },
    /// The operation needs an initialized display
    NotReady(DriverState),
    /// The display was disposed and no longer owns its interface
    Disposed,
}

impl<I: DisplayInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Self::InvalidRegion { x, y, w, h } => f
                .debug_struct("InvalidRegion")
                .field("x", x)
                .field("y", y)
                .field("w", w)
                .field("h", h)
                .finish(),
            Self::PixelCountMismatch { expected, provided } => f
                .debug_struct("PixelCountMismatch")
                .field("expected", expected)
                .field("provided", provided)
                .finish(),
            Self::NotReady(state) => f.debug_tuple("NotReady").field(state).finish(),
            Self::Disposed => write!(f, "Disposed"),
        }
    }
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::InvalidRegion { x, y, w, h } => {
                write!(f, "Region outside panel: x={x}, y={y}, w={w}, h={h}")
            }
            Self::PixelCountMismatch { expected, provided } => {
                write!(
                    f,
                    "Pixel count mismatch: expected {expected} pixels, provided {provided}"
                )
            }
            Self::NotReady(state) => write!(f, "Display not ready (state {state:?})"),
            Self::Disposed => write!(f, "Display disposed"),
        }
    }
}

impl<I: DisplayInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur before the display is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width requested
        width: u16,
        /// Height requested
        height: u16,
    },
    /// Transfer size too small to carry one pixel
    InvalidMaxTransfer {
        /// Requested size in bytes
        bytes: usize,
    },
    /// Zero-sized tile
    InvalidTileSize {
        /// Tile width requested
        width: u16,
        /// Tile height requested
        height: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (each side 1..={})",
                crate::config::MAX_PANEL_SIDE
            ),
            Self::InvalidMaxTransfer { bytes } => {
                write!(f, "Invalid max transfer {bytes} bytes (at least 2)")
            }
            Self::InvalidTileSize { width, height } => {
                write!(f, "Invalid tile size {width}x{height}")
            }
        }
    }
}

impl core::error::Error for BuilderError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[derive(Debug)]
    struct NullInterface;

    impl DisplayInterface for NullInterface {
        type Error = u8;

        fn send_command(&mut self, _command: u8) -> Result<(), Self::Error> {
            Ok(())
        }

        fn send_data(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn reset<D: embedded_hal::delay::DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_backlight(&mut self, _on: bool) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_error_messages() {
        let e: Error<NullInterface> = Error::InvalidRegion { x: 1, y: 2, w: 3, h: 4 };
        assert_eq!(format!("{e}"), "Region outside panel: x=1, y=2, w=3, h=4");
        let e: Error<NullInterface> = Error::Interface(7);
        assert_eq!(format!("{e:?}"), "Interface(7)");
        let e: Error<NullInterface> = Error::NotReady(DriverState::Faulted);
        assert_eq!(format!("{e}"), "Display not ready (state Faulted)");
    }

    #[test]
    fn test_builder_error_messages() {
        let e = BuilderError::InvalidTileSize { width: 0, height: 8 };
        assert_eq!(format!("{e}"), "Invalid tile size 0x8");
        let e = BuilderError::InvalidDimensions { width: 400, height: 10 };
        assert_eq!(format!("{e}"), "Invalid dimensions 400x10 (each side 1..=320)");
    }
}
