//! Rotation helpers
//!
//! ST77xx controllers rotate in hardware: the MADCTL register (0x36) selects
//! row/column mirroring and row/column exchange, and the address window is
//! then given in logical (rotated) coordinates.
//!
//! ## Rotation Modes
//!
//! | Rotation | MADCTL bits | Byte   |
//! |----------|-------------|--------|
//! | 0°       | none        | `0x00` |
//! | 90°      | MV, MX      | `0x60` |
//! | 180°     | MY, MX      | `0xC0` |
//! | 270°     | MV, MY      | `0xA0` |
//!
//! The BGR bit (`0x08`) is OR'ed in when the panel is wired BGR.
//!
//! ## Example
//!
//! ```
//! use st77xx::{rotation::madctl, Rotation};
//!
//! assert_eq!(madctl(Rotation::Rotate0, false), 0x00);
//! assert_eq!(madctl(Rotation::Rotate90, true), 0x68);
//! ```

use crate::config::Rotation;

/// Row address order (mirror Y)
pub const MADCTL_MY: u8 = 0x80;
/// Column address order (mirror X)
pub const MADCTL_MX: u8 = 0x40;
/// Row/column exchange
pub const MADCTL_MV: u8 = 0x20;
/// BGR subpixel order
pub const MADCTL_BGR: u8 = 0x08;

/// MADCTL payload for `rotation`
pub fn madctl(rotation: Rotation, bgr: bool) -> u8 {
    let bits = match rotation {
        Rotation::Rotate0 => 0,
        Rotation::Rotate90 => MADCTL_MV | MADCTL_MX,
        Rotation::Rotate180 => MADCTL_MY | MADCTL_MX,
        Rotation::Rotate270 => MADCTL_MV | MADCTL_MY,
    };
    if bgr { bits | MADCTL_BGR } else { bits }
}

/// Whether `rotation` exchanges rows and columns
pub fn swaps_axes(rotation: Rotation) -> bool {
    matches!(rotation, Rotation::Rotate90 | Rotation::Rotate270)
}

/// Column and row offsets as seen in logical coordinates
///
/// Offsets are calibrated for the native orientation. When rows and columns
/// are exchanged the column offset applies to rows and vice versa.
pub fn logical_offsets(rotation: Rotation, col_offset: u16, row_offset: u16) -> (u16, u16) {
    if swaps_axes(rotation) {
        (row_offset, col_offset)
    } else {
        (col_offset, row_offset)
    }
}
