//! Core display operations
//!
//! [`Display`] owns a [`DisplayInterface`] and speaks the ST77xx command set:
//! it runs the controller init table, manages rotation, and streams RGB565
//! rectangles into frame memory.
//!
//! ## States
//!
//! ```text
//! Uninitialized --init--> Ready --dispose--> Disposed
//!        |                  |
//!        +--transport error-+--> Faulted --init--> Ready
//! ```
//!
//! Pixel writes require `Ready`. A transport failure during `init` or a pixel
//! write moves the driver to `Faulted`; only [`Display::init`] or
//! [`Display::dispose`] are meaningful from there.

use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::color::Color565;
use crate::command::{Command, InitStep, init_sequence};
use crate::config::{Config, Dimensions, Rotation};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::rotation::{logical_offsets, madctl};
use crate::tiles::RectSink;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Wait after SLPIN before the next command, in milliseconds
pub const SLEEP_IN_DELAY_MS: u32 = 5;
/// Wait after SLPOUT before the next command, in milliseconds
pub const SLEEP_OUT_DELAY_MS: u32 = 120;

/// Lifecycle state of a [`Display`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverState {
    /// Created, `init` not yet run
    #[default]
    Uninitialized,
    /// Initialized and accepting pixel writes
    Ready,
    /// A transport write failed; run `init` again
    Faulted,
    /// The interface was handed back
    Disposed,
}

/// Pixel source for [`Display::push_rect`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pixels<'a> {
    /// Exactly `w * h` colors, row-major
    Slice(&'a [Color565]),
    /// One color for the whole rectangle
    Solid(Color565),
}

/// ST7735/ST7789 display driver
///
/// Geometry passed to the driver is in logical coordinates, i.e. after the
/// current rotation has been applied. Column and row offsets from the
/// [`Config`] are added on the wire.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface, `None` once disposed
    interface: Option<I>,
    /// Display configuration
    config: Config,
    /// Current rotation
    rotation: Rotation,
    /// Lifecycle state
    state: DriverState,
    /// Encoded pixel bytes for one chunk
    scratch: Vec<u8>,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    ///
    /// Nothing is sent until [`init`](Self::init) runs.
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface: Some(interface),
            rotation: config.rotation,
            config,
            state: DriverState::Uninitialized,
            scratch: Vec::new(),
        }
    }

    /// Reset and initialize the controller, then clear the panel
    ///
    /// Pulses RST, runs the family init table, and fills the whole panel with
    /// the configured clear color. May be called again to recover from
    /// [`DriverState::Faulted`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Disposed` after [`dispose`](Self::dispose), or
    /// `Error::Interface` if any write fails (the driver is then faulted).
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        if self.state == DriverState::Disposed {
            return Err(Error::Disposed);
        }
        match self.run_init(delay) {
            Ok(()) => {
                self.state = DriverState::Ready;
                let size = self.size();
                info!(
                    "{:?} ready: {}x{} at {} degrees",
                    self.config.family,
                    size.width,
                    size.height,
                    self.rotation.degrees()
                );
                Ok(())
            }
            Err(e) => {
                self.fault();
                Err(e)
            }
        }
    }

    fn run_init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface
            .as_mut()
            .ok_or(Error::Disposed)?
            .reset(delay)
            .map_err(Error::Interface)?;

        for step in init_sequence(self.config.family) {
            debug!("init step: {:?}", step);
            match *step {
                InitStep::Send(command) => self.send(command)?,
                InitStep::DelayMs(ms) => delay.delay_ms(ms),
                InitStep::ColorMode => {
                    self.send(Command::ColorMode(self.config.family.color_mode()))?;
                }
                InitStep::Inversion => self.send(inversion_command(self.config.invert))?,
                InitStep::Rotation => self.send(Command::MemoryAccessControl(madctl(
                    self.rotation,
                    self.config.bgr,
                )))?,
            }
        }

        let size = self.size();
        self.write_rect(
            0,
            0,
            size.width,
            size.height,
            Pixels::Solid(self.config.clear_color),
        )
    }

    /// Write a rectangle of pixels
    ///
    /// Issues CASET, RASET and RAMWR once, then streams the pixels big-endian
    /// in chunks of at most `max_transfer` bytes (rounded down to whole
    /// pixels). A zero-area rectangle sends nothing.
    ///
    /// # Errors
    ///
    /// - `Error::NotReady` / `Error::Disposed` unless the driver is ready
    /// - `Error::InvalidRegion` if the rectangle leaves the logical panel
    /// - `Error::PixelCountMismatch` if a slice is not `w * h` long
    /// - `Error::Interface` if a write fails (the driver is then faulted)
    pub fn push_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        pixels: Pixels<'_>,
    ) -> DisplayResult<I> {
        self.ensure_ready()?;
        if w == 0 || h == 0 {
            return Ok(());
        }

        let size = self.size();
        if u32::from(x) + u32::from(w) > u32::from(size.width)
            || u32::from(y) + u32::from(h) > u32::from(size.height)
        {
            return Err(Error::InvalidRegion { x, y, w, h });
        }
        if let Pixels::Slice(slice) = pixels {
            let expected = usize::from(w) * usize::from(h);
            if slice.len() != expected {
                return Err(Error::PixelCountMismatch {
                    expected,
                    provided: slice.len(),
                });
            }
        }

        let result = self.write_rect(x, y, w, h, pixels);
        if let Err(Error::Interface(_)) = &result {
            self.fault();
        }
        result
    }

    /// Fill the whole logical panel with one color
    pub fn fill_screen(&mut self, color: Color565) -> DisplayResult<I> {
        let size = self.size();
        self.push_rect(0, 0, size.width, size.height, Pixels::Solid(color))
    }

    /// Write a single pixel
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: Color565) -> DisplayResult<I> {
        self.push_rect(x, y, 1, 1, Pixels::Solid(color))
    }

    /// Change the rotation
    ///
    /// Before `init` (or while faulted) the rotation is only recorded and
    /// applied by the next `init`. When ready, MADCTL is sent immediately.
    /// The logical [`size`](Self::size) follows the new rotation.
    pub fn set_rotation(&mut self, rotation: Rotation) -> DisplayResult<I> {
        match self.state {
            DriverState::Disposed => return Err(Error::Disposed),
            DriverState::Uninitialized | DriverState::Faulted => {}
            DriverState::Ready => {
                self.command(Command::MemoryAccessControl(madctl(rotation, self.config.bgr)))?;
            }
        }
        self.rotation = rotation;
        debug!("rotation set to {} degrees", rotation.degrees());
        Ok(())
    }

    /// Turn color inversion on or off
    pub fn set_inversion(&mut self, on: bool) -> DisplayResult<I> {
        self.command(inversion_command(on))
    }

    /// Show or blank the panel; frame memory is kept
    pub fn set_display_on(&mut self, on: bool) -> DisplayResult<I> {
        self.command(if on {
            Command::DisplayOn
        } else {
            Command::DisplayOff
        })
    }

    /// Enter sleep mode
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.command(Command::SleepIn)?;
        delay.delay_ms(SLEEP_IN_DELAY_MS);
        Ok(())
    }

    /// Leave sleep mode
    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.command(Command::SleepOut)?;
        delay.delay_ms(SLEEP_OUT_DELAY_MS);
        Ok(())
    }

    /// Drive the backlight line; does nothing without one
    ///
    /// Allowed in every state except `Disposed`.
    pub fn set_backlight(&mut self, on: bool) -> DisplayResult<I> {
        self.interface
            .as_mut()
            .ok_or(Error::Disposed)?
            .set_backlight(on)
            .map_err(Error::Interface)
    }

    /// Release the interface
    ///
    /// Returns the interface on the first call and `None` afterwards.
    /// Dropping the returned value closes the bus and releases the lines.
    pub fn dispose(&mut self) -> Option<I> {
        match self.state {
            DriverState::Disposed => return None,
            DriverState::Uninitialized => {
                warn!("disposing a display that was never initialized");
            }
            DriverState::Ready | DriverState::Faulted => {}
        }
        self.state = DriverState::Disposed;
        self.interface.take()
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get display rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Logical size under the current rotation
    pub fn size(&self) -> Dimensions {
        self.config.dimensions.rotated(self.rotation)
    }

    /// Borrow the interface, `None` once disposed
    pub fn interface(&self) -> Option<&I> {
        self.interface.as_ref()
    }

    /// Mutably borrow the interface, `None` once disposed
    pub fn interface_mut(&mut self) -> Option<&mut I> {
        self.interface.as_mut()
    }

    fn ensure_ready(&self) -> DisplayResult<I> {
        match self.state {
            DriverState::Ready => Ok(()),
            DriverState::Disposed => Err(Error::Disposed),
            state => Err(Error::NotReady(state)),
        }
    }

    fn fault(&mut self) {
        if self.state != DriverState::Faulted {
            warn!("display faulted, init required");
        }
        self.state = DriverState::Faulted;
    }

    /// Send a command
    fn send(&mut self, command: Command) -> DisplayResult<I> {
        let interface = self.interface.as_mut().ok_or(Error::Disposed)?;
        command.send(interface).map_err(Error::Interface)
    }

    /// Send a command that needs a ready driver, faulting on failure
    fn command(&mut self, command: Command) -> DisplayResult<I> {
        self.ensure_ready()?;
        let result = self.send(command);
        if result.is_err() {
            self.fault();
        }
        result
    }

    /// Address window plus pixel stream, no state checks
    fn write_rect(&mut self, x: u16, y: u16, w: u16, h: u16, pixels: Pixels<'_>) -> DisplayResult<I> {
        let (col_offset, row_offset) =
            logical_offsets(self.rotation, self.config.col_offset, self.config.row_offset);
        let window = |start: u16, len: u16, offset: u16| {
            let first = start.checked_add(offset)?;
            Some((first, first.checked_add(len - 1)?))
        };
        let Some((x0, x1)) = window(x, w, col_offset) else {
            return Err(Error::InvalidRegion { x, y, w, h });
        };
        let Some((y0, y1)) = window(y, h, row_offset) else {
            return Err(Error::InvalidRegion { x, y, w, h });
        };

        let chunk = (self.config.max_transfer & !1).max(2);
        let interface = self.interface.as_mut().ok_or(Error::Disposed)?;
        Command::ColumnAddressSet { start: x0, end: x1 }
            .send(interface)
            .map_err(Error::Interface)?;
        Command::RowAddressSet { start: y0, end: y1 }
            .send(interface)
            .map_err(Error::Interface)?;
        Command::MemoryWrite
            .send(interface)
            .map_err(Error::Interface)?;

        match pixels {
            Pixels::Solid(color) => {
                let total = usize::from(w) * usize::from(h) * 2;
                let bytes = color.to_be_bytes();
                self.scratch.clear();
                for _ in 0..chunk.min(total) / 2 {
                    self.scratch.extend_from_slice(&bytes);
                }
                let mut remaining = total;
                while remaining > 0 {
                    let n = remaining.min(self.scratch.len());
                    interface
                        .send_data(&self.scratch[..n])
                        .map_err(Error::Interface)?;
                    remaining -= n;
                }
            }
            Pixels::Slice(slice) => {
                for run in slice.chunks(chunk / 2) {
                    self.scratch.clear();
                    for color in run {
                        self.scratch.extend_from_slice(&color.to_be_bytes());
                    }
                    interface
                        .send_data(&self.scratch)
                        .map_err(Error::Interface)?;
                }
            }
        }
        Ok(())
    }
}

fn inversion_command(on: bool) -> Command {
    if on {
        Command::InversionOn
    } else {
        Command::InversionOff
    }
}

impl<I> RectSink for Display<I>
where
    I: DisplayInterface,
{
    type Error = Error<I>;

    fn push_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        pixels: &[Color565],
    ) -> Result<(), Self::Error> {
        Display::push_rect(self, x, y, w, h, Pixels::Slice(pixels))
    }
}
