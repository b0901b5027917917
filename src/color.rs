//! RGB565 color codec
//!
//! This module defines [`Color565`], the packed 16-bit pixel format streamed to
//! ST7735/ST7789 controllers, and [`Rgba`], the 8-bit-per-channel format used
//! for conversions and alpha blending.
//!
//! ## Bit Layout
//!
//! | Bits  | 15..11 | 10..5  | 4..0  |
//! |-------|--------|--------|-------|
//! | Field | Red    | Green  | Blue  |
//! | Width | 5      | 6      | 5     |
//!
//! Packing truncates the low bits of each 8-bit channel. Unpacking expands by
//! bit replication, so a round trip stays within 8 of the original value on
//! the 5-bit channels and within 4 on the green channel.
//!
//! ## Example
//!
//! ```
//! use st77xx::{Color565, Rgba};
//!
//! let orange = Color565::from_rgb(255, 128, 0);
//! assert_eq!(orange.raw(), 0xFC00);
//!
//! let back = orange.to_rgba();
//! assert_eq!(back, Rgba::opaque(255, 130, 0));
//!
//! // Half-transparent red over blue
//! let mixed = Color565::RED.blend(Color565::BLUE, 128);
//! let (r, _, b) = mixed.to_rgb();
//! assert!(r > 100 && b > 100);
//! ```

/// Packed RGB565 color
///
/// Always holds the full 16-bit word; there are no invalid values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color565(u16);

/// 8-bit RGBA color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Create a color with an explicit alpha value
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Color565 {
    /// Black (0x0000)
    pub const BLACK: Self = Self(0x0000);
    /// White (0xFFFF)
    pub const WHITE: Self = Self(0xFFFF);
    /// Pure red (0xF800)
    pub const RED: Self = Self(0xF800);
    /// Pure green (0x07E0)
    pub const GREEN: Self = Self(0x07E0);
    /// Pure blue (0x001F)
    pub const BLUE: Self = Self(0x001F);
    /// Yellow (0xFFE0)
    pub const YELLOW: Self = Self(0xFFE0);
    /// Cyan (0x07FF)
    pub const CYAN: Self = Self(0x07FF);
    /// Magenta (0xF81F)
    pub const MAGENTA: Self = Self(0xF81F);

    /// Wrap a raw RGB565 word
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw RGB565 word
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Pack 8-bit channels, truncating the low bits
    ///
    /// ## Example
    ///
    /// ```
    /// use st77xx::Color565;
    ///
    /// assert_eq!(Color565::from_rgb(255, 0, 0), Color565::RED);
    /// assert_eq!(Color565::from_rgb(0, 255, 0), Color565::GREEN);
    /// assert_eq!(Color565::from_rgb(0, 0, 255), Color565::BLUE);
    /// ```
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Pack a `0xRRGGBB` hex value
    pub const fn from_hex(hex: u32) -> Self {
        Self::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Pack already-reduced 5/6/5 channel values
    ///
    /// Out-of-range channel values are masked to their field width.
    pub const fn from_components(r5: u8, g6: u8, b5: u8) -> Self {
        Self(((r5 as u16 & 0x1F) << 11) | ((g6 as u16 & 0x3F) << 5) | (b5 as u16 & 0x1F))
    }

    /// Split into 5/6/5 channel values
    pub const fn components(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 11) & 0x1F) as u8,
            ((self.0 >> 5) & 0x3F) as u8,
            (self.0 & 0x1F) as u8,
        )
    }

    /// Expand to 8-bit channels by bit replication
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        let (r5, g6, b5) = self.components();
        ((r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2))
    }

    /// Expand to an opaque [`Rgba`]
    pub const fn to_rgba(self) -> Rgba {
        let (r, g, b) = self.to_rgb();
        Rgba::opaque(r, g, b)
    }

    /// Big-endian wire encoding (high byte first)
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Alpha-blend `self` over `dst`
    ///
    /// `alpha == 255` yields `self`, `alpha == 0` yields `dst`.
    pub fn blend(self, dst: Self, alpha: u8) -> Self {
        match alpha {
            255 => return self,
            0 => return dst,
            _ => {}
        }
        let (sr, sg, sb) = self.components();
        let (dr, dg, db) = dst.components();
        let a = u32::from(alpha);
        let inv = 255 - a;
        let mix = |s: u8, d: u8, max: u32| -> u8 {
            let s8 = u32::from(s) * 255 / max;
            let d8 = u32::from(d) * 255 / max;
            ((s8 * a + d8 * inv) / 255) as u8
        };
        Self::from_rgb(mix(sr, dr, 31), mix(sg, dg, 63), mix(sb, db, 31))
    }

    /// Multiply two colors channel by channel
    ///
    /// Modulating with [`Color565::WHITE`] is the identity; with
    /// [`Color565::BLACK`] it yields black.
    pub fn modulate(self, other: Self) -> Self {
        let (ar, ag, ab) = self.components();
        let (br, bg, bb) = other.components();
        let mul = |x: u8, y: u8, max: u16| (u16::from(x) * u16::from(y) / max) as u8;
        Self::from_components(mul(ar, br, 31), mul(ag, bg, 63), mul(ab, bb, 31))
    }
}

/// Shorthand for [`Color565::from_rgb`]
pub const fn rgb(r: u8, g: u8, b: u8) -> Color565 {
    Color565::from_rgb(r, g, b)
}

impl From<u16> for Color565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Color565> for u16 {
    fn from(color: Color565) -> Self {
        color.0
    }
}

impl From<Rgba> for Color565 {
    /// Alpha is dropped; blend explicitly when it matters.
    fn from(c: Rgba) -> Self {
        Self::from_rgb(c.r, c.g, c.b)
    }
}

#[cfg(feature = "graphics")]
impl From<embedded_graphics_core::pixelcolor::Rgb565> for Color565 {
    fn from(color: embedded_graphics_core::pixelcolor::Rgb565) -> Self {
        use embedded_graphics_core::pixelcolor::IntoStorage;
        Self(color.into_storage())
    }
}

#[cfg(feature = "graphics")]
impl From<Color565> for embedded_graphics_core::pixelcolor::Rgb565 {
    fn from(color: Color565) -> Self {
        embedded_graphics_core::pixelcolor::raw::RawU16::new(color.0).into()
    }
}
