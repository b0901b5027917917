//! Display configuration types and builder

use crate::color::Color565;
use crate::rotation::swaps_axes;
pub use crate::error::BuilderError;

/// Largest panel side supported by the ST7735/ST7789 frame memory
pub const MAX_PANEL_SIDE: u16 = 320;

/// Default largest single transfer in bytes (Linux spidev `bufsiz`)
pub const DEFAULT_MAX_TRANSFER: usize = 4096;

/// Native panel dimensions (at [`Rotation::Rotate0`])
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (columns)
    pub width: u16,
    /// Height in pixels (rows)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if either side is zero or
    /// larger than [`MAX_PANEL_SIDE`].
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || height == 0 || width > MAX_PANEL_SIDE || height > MAX_PANEL_SIDE {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Logical size under `rotation`
    pub fn rotated(self, rotation: Rotation) -> Self {
        if swaps_axes(rotation) {
            Self {
                width: self.height,
                height: self.width,
            }
        } else {
            self
        }
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Rotation in degrees
    pub fn degrees(self) -> u16 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 => 270,
        }
    }
}

/// Controller family, selecting the init table and pixel format byte
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerFamily {
    /// Sitronix ST7735 / ST7735S / ST7735R
    St7735,
    /// Sitronix ST7789 / ST7789V
    #[default]
    St7789,
}

impl ControllerFamily {
    /// COLMOD payload selecting 16 bits per pixel
    pub fn color_mode(self) -> u8 {
        match self {
            Self::St7735 => 0x05,
            Self::St7789 => 0x55,
        }
    }

    /// Whether panels of this family are usually wired BGR
    pub fn default_bgr(self) -> bool {
        matches!(self, Self::St7789)
    }
}

/// Display configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Native panel dimensions
    pub dimensions: Dimensions,
    /// Controller family
    pub family: ControllerFamily,
    /// Rotation applied during init
    pub rotation: Rotation,
    /// Column offset of the visible area inside controller RAM
    pub col_offset: u16,
    /// Row offset of the visible area inside controller RAM
    pub row_offset: u16,
    /// Send INVON instead of INVOFF during init
    pub invert: bool,
    /// Set the BGR bit in MADCTL
    pub bgr: bool,
    /// Largest single data write in bytes
    pub max_transfer: usize,
    /// Color used for the clear at the end of init
    pub clear_color: Color565,
}

impl Config {
    /// Get the rotated dimensions based on rotation setting
    pub fn rotated_dimensions(&self) -> Dimensions {
        self.dimensions.rotated(self.rotation)
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use st77xx::{Builder, ControllerFamily, Dimensions, Rotation};
///
/// let dims = match Dimensions::new(240, 320) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new()
///     .dimensions(dims)
///     .family(ControllerFamily::St7789)
///     .rotation(Rotation::Rotate90)
///     .invert(true)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Controller family
    family: ControllerFamily,
    /// Display rotation
    rotation: Rotation,
    /// Column offset
    col_offset: u16,
    /// Row offset
    row_offset: u16,
    /// Display inversion
    invert: bool,
    /// BGR override; the family default applies when unset
    bgr: Option<bool>,
    /// Largest single data write in bytes
    max_transfer: usize,
    /// Clear color used at the end of init
    clear_color: Color565,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            family: ControllerFamily::St7789,
            rotation: Rotation::Rotate0,
            col_offset: 0,
            row_offset: 0,
            invert: false,
            bgr: None,
            max_transfer: DEFAULT_MAX_TRANSFER,
            clear_color: Color565::BLACK,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the controller family
    pub fn family(mut self, family: ControllerFamily) -> Self {
        self.family = family;
        self
    }

    /// Set display rotation
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set column and row offsets of the visible area
    ///
    /// Many 240x240 and 135x240 modules map a window of a larger RAM.
    pub fn offsets(mut self, col: u16, row: u16) -> Self {
        self.col_offset = col;
        self.row_offset = row;
        self
    }

    /// Enable or disable display inversion
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Force the BGR bit on or off
    pub fn bgr(mut self, bgr: bool) -> Self {
        self.bgr = Some(bgr);
        self
    }

    /// Set the largest single data write in bytes
    pub fn max_transfer(mut self, bytes: usize) -> Self {
        self.max_transfer = bytes;
        self
    }

    /// Set the color used to clear the panel during init
    pub fn clear_color(mut self, color: Color565) -> Self {
        self.clear_color = color;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set,
    /// or `BuilderError::InvalidMaxTransfer` if the transfer size cannot hold
    /// a single pixel.
    pub fn build(self) -> Result<Config, BuilderError> {
        if self.max_transfer < 2 {
            return Err(BuilderError::InvalidMaxTransfer {
                bytes: self.max_transfer,
            });
        }
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            family: self.family,
            rotation: self.rotation,
            col_offset: self.col_offset,
            row_offset: self.row_offset,
            invert: self.invert,
            bgr: self.bgr.unwrap_or_else(|| self.family.default_bgr()),
            max_transfer: self.max_transfer,
            clear_color: self.clear_color,
        })
    }
}
