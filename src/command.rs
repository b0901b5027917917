//! ST7735/ST7789 command definitions
//!
//! This module defines the command bytes used by the ST77xx family, a typed
//! [`Command`] carrying each command's payload, and the per-family init
//! sequences expressed as [`InitStep`] tables.
//!
//! ## Command Structure
//!
//! Every command is framed by the data/command line:
//! 1. Set DC low (command mode)
//! 2. Send the opcode byte
//! 3. Set DC high (data mode)
//! 4. Send the payload bytes (if any)
//!
//! Multi-byte coordinates are sent big-endian.
//!
//! ## Example
//!
//! ```rust,no_run
//! use st77xx::command::Command;
//! use st77xx::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, None::<MockPin>);
//! // Address columns 0..=239, then open a memory write
//! let _ = Command::ColumnAddressSet { start: 0, end: 239 }.send(&mut interface);
//! let _ = Command::MemoryWrite.send(&mut interface);
//! let _ = interface.send_data(&[0xF8, 0x00]);
//! ```

use crate::config::ControllerFamily;
use crate::interface::DisplayInterface;

// System control commands

/// Software reset (0x01)
///
/// Wait at least 120 ms before sending sleep out.
pub const SOFT_RESET: u8 = 0x01;

/// Sleep in (0x10)
pub const SLEEP_IN: u8 = 0x10;

/// Sleep out (0x11)
///
/// Wait at least 120 ms before the next sleep in/out.
pub const SLEEP_OUT: u8 = 0x11;

/// Display inversion off (0x20)
pub const INVERSION_OFF: u8 = 0x20;

/// Display inversion on (0x21)
pub const INVERSION_ON: u8 = 0x21;

/// Display off (0x28)
pub const DISPLAY_OFF: u8 = 0x28;

/// Display on (0x29)
pub const DISPLAY_ON: u8 = 0x29;

// Memory commands

/// Column address set (0x2A)
///
/// Requires 4 bytes: [start_hi, start_lo, end_hi, end_lo], end inclusive.
pub const COLUMN_ADDRESS_SET: u8 = 0x2A;

/// Row address set (0x2B)
///
/// Requires 4 bytes: [start_hi, start_lo, end_hi, end_lo], end inclusive.
pub const ROW_ADDRESS_SET: u8 = 0x2B;

/// Memory write (0x2C)
///
/// Followed by the pixel stream. The address auto-increments across writes.
pub const MEMORY_WRITE: u8 = 0x2C;

/// Memory access control (0x36)
///
/// Requires 1 byte of MADCTL bits, see [`crate::rotation`].
pub const MEMORY_ACCESS_CONTROL: u8 = 0x36;

/// Interface pixel format (0x3A)
///
/// Requires 1 byte: 0x05 (ST7735) or 0x55 (ST7789) for 16 bits per pixel.
pub const COLOR_MODE: u8 = 0x3A;

// ST7735 panel registers

/// Frame rate control, normal mode (0xB1)
pub const FRMCTR1: u8 = 0xB1;
/// Frame rate control, idle mode (0xB2)
pub const FRMCTR2: u8 = 0xB2;
/// Frame rate control, partial mode (0xB3)
pub const FRMCTR3: u8 = 0xB3;
/// Display inversion control (0xB4)
pub const INVCTR: u8 = 0xB4;
/// Power control 1 (0xC0)
pub const PWCTR1: u8 = 0xC0;
/// Power control 2 (0xC1)
pub const PWCTR2: u8 = 0xC1;
/// Power control 3 (0xC2)
pub const PWCTR3: u8 = 0xC2;
/// Power control 4 (0xC3)
pub const PWCTR4: u8 = 0xC3;
/// Power control 5 (0xC4)
pub const PWCTR5: u8 = 0xC4;
/// VCOM control 1 (0xC5)
pub const VMCTR1: u8 = 0xC5;
/// Positive gamma correction (0xE0)
pub const GMCTRP1: u8 = 0xE0;
/// Negative gamma correction (0xE1)
pub const GMCTRN1: u8 = 0xE1;

// ST7789 panel registers

/// Porch setting (0xB2)
pub const PORCTRL: u8 = 0xB2;
/// Gate control (0xB7)
pub const GCTRL: u8 = 0xB7;
/// VCOM setting (0xBB)
pub const VCOMS: u8 = 0xBB;
/// LCM control (0xC0)
pub const LCMCTRL: u8 = 0xC0;
/// VDV and VRH command enable (0xC2)
pub const VDVVRHEN: u8 = 0xC2;
/// VRH set (0xC3)
pub const VRHS: u8 = 0xC3;
/// VDV set (0xC4)
pub const VDVS: u8 = 0xC4;
/// Frame rate control in normal mode (0xC6)
pub const FRCTRL2: u8 = 0xC6;
/// Power control 1 (0xD0)
pub const PWCTRL1: u8 = 0xD0;
/// Positive voltage gamma control (0xE0)
pub const PVGAMCTRL: u8 = 0xE0;
/// Negative voltage gamma control (0xE1)
pub const NVGAMCTRL: u8 = 0xE1;

/// A controller command with its payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Software reset
    SoftReset,
    /// Enter sleep mode
    SleepIn,
    /// Leave sleep mode
    SleepOut,
    /// Display inversion off
    InversionOff,
    /// Display inversion on
    InversionOn,
    /// Blank the panel without losing RAM
    DisplayOff,
    /// Show RAM contents
    DisplayOn,
    /// Column range of the address window, both ends inclusive
    ColumnAddressSet {
        /// First column
        start: u16,
        /// Last column
        end: u16,
    },
    /// Row range of the address window, both ends inclusive
    RowAddressSet {
        /// First row
        start: u16,
        /// Last row
        end: u16,
    },
    /// Open a memory write session
    MemoryWrite,
    /// MADCTL bits
    MemoryAccessControl(u8),
    /// COLMOD pixel format byte
    ColorMode(u8),
    /// Raw register write used by the panel tuning tables
    Register(u8, &'static [u8]),
}

impl Command {
    /// Opcode byte sent with DC low
    pub fn opcode(&self) -> u8 {
        match self {
            Self::SoftReset => SOFT_RESET,
            Self::SleepIn => SLEEP_IN,
            Self::SleepOut => SLEEP_OUT,
            Self::InversionOff => INVERSION_OFF,
            Self::InversionOn => INVERSION_ON,
            Self::DisplayOff => DISPLAY_OFF,
            Self::DisplayOn => DISPLAY_ON,
            Self::ColumnAddressSet { .. } => COLUMN_ADDRESS_SET,
            Self::RowAddressSet { .. } => ROW_ADDRESS_SET,
            Self::MemoryWrite => MEMORY_WRITE,
            Self::MemoryAccessControl(_) => MEMORY_ACCESS_CONTROL,
            Self::ColorMode(_) => COLOR_MODE,
            Self::Register(opcode, _) => *opcode,
        }
    }

    /// Payload bytes sent with DC high
    ///
    /// Fixed-size payloads are encoded into `buf`.
    pub fn payload<'a>(&'a self, buf: &'a mut [u8; 4]) -> &'a [u8] {
        match self {
            Self::ColumnAddressSet { start, end } | Self::RowAddressSet { start, end } => {
                buf[..2].copy_from_slice(&start.to_be_bytes());
                buf[2..].copy_from_slice(&end.to_be_bytes());
                &buf[..]
            }
            Self::MemoryAccessControl(value) | Self::ColorMode(value) => {
                buf[0] = *value;
                &buf[..1]
            }
            Self::Register(_, data) => *data,
            _ => &[],
        }
    }

    /// Write the opcode, then the payload if there is one
    pub fn send<I: DisplayInterface>(&self, interface: &mut I) -> Result<(), I::Error> {
        interface.send_command(self.opcode())?;
        let mut buf = [0u8; 4];
        let payload = self.payload(&mut buf);
        if !payload.is_empty() {
            interface.send_data(payload)?;
        }
        Ok(())
    }
}

/// One step of a controller init sequence
///
/// Steps that depend on the configuration are resolved by the driver when
/// the sequence runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStep {
    /// Send a fixed command
    Send(Command),
    /// Wait for the given number of milliseconds
    DelayMs(u32),
    /// Send COLMOD with the family's 16 bpp format byte
    ColorMode,
    /// Send INVON or INVOFF per configuration
    Inversion,
    /// Send MADCTL for the current rotation
    Rotation,
}

/// ST7735 init sequence (ST7735R/S "red tab" timing and gamma)
pub const ST7735_INIT: &[InitStep] = &[
    InitStep::Send(Command::SoftReset),
    InitStep::DelayMs(150),
    InitStep::Send(Command::SleepOut),
    InitStep::DelayMs(120),
    InitStep::ColorMode,
    InitStep::DelayMs(10),
    InitStep::Send(Command::Register(FRMCTR1, &[0x01, 0x2C, 0x2D])),
    InitStep::Send(Command::Register(FRMCTR2, &[0x01, 0x2C, 0x2D])),
    InitStep::Send(Command::Register(FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D])),
    InitStep::Send(Command::Register(INVCTR, &[0x07])),
    InitStep::Send(Command::Register(PWCTR1, &[0xA2, 0x02, 0x84])),
    InitStep::Send(Command::Register(PWCTR2, &[0xC5])),
    InitStep::Send(Command::Register(PWCTR3, &[0x0A, 0x00])),
    InitStep::Send(Command::Register(PWCTR4, &[0x8A, 0x2A])),
    InitStep::Send(Command::Register(PWCTR5, &[0x8A, 0xEE])),
    InitStep::Send(Command::Register(VMCTR1, &[0x0E])),
    InitStep::Send(Command::Register(
        GMCTRP1,
        &[
            0x0F, 0x1A, 0x0F, 0x18, 0x2F, 0x28, 0x20, 0x22, 0x1F, 0x1B, 0x23, 0x37, 0x00, 0x07,
            0x02, 0x10,
        ],
    )),
    InitStep::Send(Command::Register(
        GMCTRN1,
        &[
            0x0F, 0x1B, 0x0F, 0x17, 0x33, 0x2C, 0x29, 0x2E, 0x30, 0x30, 0x39, 0x3F, 0x00, 0x07,
            0x03, 0x10,
        ],
    )),
    InitStep::Rotation,
    InitStep::Inversion,
    InitStep::Send(Command::DisplayOn),
    InitStep::DelayMs(100),
];

/// ST7789 init sequence (ST7789V porch, power and gamma)
pub const ST7789_INIT: &[InitStep] = &[
    InitStep::Send(Command::SoftReset),
    InitStep::DelayMs(150),
    InitStep::Send(Command::SleepOut),
    InitStep::DelayMs(120),
    InitStep::ColorMode,
    InitStep::DelayMs(10),
    InitStep::Send(Command::Register(PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33])),
    InitStep::Send(Command::Register(GCTRL, &[0x35])),
    InitStep::Send(Command::Register(VCOMS, &[0x19])),
    InitStep::Send(Command::Register(LCMCTRL, &[0x2C])),
    InitStep::Send(Command::Register(VDVVRHEN, &[0x01])),
    InitStep::Send(Command::Register(VRHS, &[0x12])),
    InitStep::Send(Command::Register(VDVS, &[0x20])),
    InitStep::Send(Command::Register(FRCTRL2, &[0x0F])),
    InitStep::Send(Command::Register(PWCTRL1, &[0xA4, 0xA1])),
    InitStep::Inversion,
    InitStep::Send(Command::Register(
        PVGAMCTRL,
        &[
            0xD0, 0x04, 0x0D, 0x11, 0x13, 0x2B, 0x3F, 0x54, 0x4C, 0x18, 0x0D, 0x0B, 0x1F, 0x23,
        ],
    )),
    InitStep::Send(Command::Register(
        NVGAMCTRL,
        &[
            0xD0, 0x04, 0x0C, 0x11, 0x13, 0x2C, 0x3F, 0x44, 0x51, 0x2F, 0x1F, 0x1F, 0x20, 0x23,
        ],
    )),
    InitStep::Rotation,
    InitStep::Send(Command::DisplayOn),
    InitStep::DelayMs(100),
];

/// Init sequence for `family`
pub fn init_sequence(family: ControllerFamily) -> &'static [InitStep] {
    match family {
        ControllerFamily::St7735 => ST7735_INIT,
        ControllerFamily::St7789 => ST7789_INIT,
    }
}
