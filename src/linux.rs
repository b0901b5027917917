//! Linux transport (requires `linux` feature)
//!
//! Opens a spidev bus and gpio-cdev lines and assembles them into an
//! [`Interface`] ready for [`Display`](crate::Display).
//!
//! ## Example
//!
//! ```rust,no_run
//! use st77xx::linux::{self, Delay, LinuxConfig};
//! use st77xx::{Builder, Dimensions, Display};
//!
//! let interface = match linux::open(&LinuxConfig::default()) {
//!     Ok(interface) => interface,
//!     Err(_) => return,
//! };
//! let dims = match Dimensions::new(240, 240) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new()
//!     .dimensions(dims)
//!     .max_transfer(linux::max_transfer_hint())
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let mut display = Display::new(interface, config);
//! let _ = display.init(&mut Delay);
//! ```

use std::fmt;
use std::io::{self, Write};
use std::string::String;
use std::vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use linux_embedded_hal::CdevPin;
use linux_embedded_hal::gpio_cdev::{self, Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use log::info;

use crate::config::DEFAULT_MAX_TRANSFER;
use crate::interface::Interface;

pub use linux_embedded_hal::Delay;

/// Environment variable overriding the spidev buffer size
pub const BUFSIZ_ENV: &str = "SPI_BUFSIZ";
/// Kernel parameter holding the spidev buffer size
pub const BUFSIZ_SYSFS: &str = "/sys/module/spidev/parameters/bufsiz";

/// Interface built from Linux spidev and gpio-cdev handles
pub type LinuxInterface = Interface<SpidevBus, CdevPin, CdevPin, CdevPin>;

/// Errors raised while opening the transport
#[derive(Debug)]
pub enum LinuxError {
    /// Opening or configuring spidev failed
    Spi(io::Error),
    /// Opening the chip or requesting a line failed
    Gpio(gpio_cdev::Error),
    /// SPI mode outside 0..=3
    InvalidSpiMode(u8),
}

impl fmt::Display for LinuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI setup failed: {e}"),
            Self::Gpio(e) => write!(f, "GPIO setup failed: {e}"),
            Self::InvalidSpiMode(mode) => write!(f, "Invalid SPI mode {mode}"),
        }
    }
}

impl std::error::Error for LinuxError {}

impl From<gpio_cdev::Error> for LinuxError {
    fn from(e: gpio_cdev::Error) -> Self {
        Self::Gpio(e)
    }
}

/// Errors raised by [`SpidevBus`] transfers
#[derive(Debug)]
pub enum SpidevError {
    /// The kernel rejected the transfer
    Io(io::Error),
    /// The kernel accepted fewer bytes than requested
    ShortWrite {
        /// Bytes requested
        expected: usize,
        /// Bytes written
        written: usize,
    },
}

impl fmt::Display for SpidevError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "spidev I/O error: {e}"),
            Self::ShortWrite { expected, written } => {
                write!(f, "spidev short write: {written} of {expected} bytes")
            }
        }
    }
}

impl std::error::Error for SpidevError {}

impl From<io::Error> for SpidevError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl embedded_hal::spi::Error for SpidevError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Transport settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinuxConfig {
    /// spidev node
    pub spi_path: String,
    /// SPI mode, 0..=3
    pub spi_mode: u8,
    /// Bits per word
    pub bits_per_word: u8,
    /// Clock in Hz
    pub speed_hz: u32,
    /// gpio-cdev chip name under `/dev`
    pub gpio_chip: String,
    /// Data/command line offset
    pub dc_line: u32,
    /// Reset line offset
    pub rst_line: u32,
    /// Backlight line offset, if wired
    pub backlight_line: Option<u32>,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        Self {
            spi_path: String::from("/dev/spidev0.0"),
            spi_mode: 0,
            bits_per_word: 8,
            speed_hz: 20_000_000,
            gpio_chip: String::from("gpiochip0"),
            dc_line: 25,
            rst_line: 27,
            backlight_line: None,
        }
    }
}

/// Largest write the kernel spidev driver accepts
///
/// Looks at `SPI_BUFSIZ`, then the spidev `bufsiz` module parameter, and
/// falls back to 4096 bytes.
pub fn max_transfer_hint() -> usize {
    std::env::var(BUFSIZ_ENV)
        .ok()
        .and_then(|value| parse_bufsiz(&value))
        .or_else(|| {
            std::fs::read_to_string(BUFSIZ_SYSFS)
                .ok()
                .and_then(|value| parse_bufsiz(&value))
        })
        .unwrap_or(DEFAULT_MAX_TRANSFER)
}

fn parse_bufsiz(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|&n| n >= 2)
}

fn spi_mode_flags(mode: u8) -> Result<SpiModeFlags, LinuxError> {
    match mode {
        0 => Ok(SpiModeFlags::SPI_MODE_0),
        1 => Ok(SpiModeFlags::SPI_MODE_1),
        2 => Ok(SpiModeFlags::SPI_MODE_2),
        3 => Ok(SpiModeFlags::SPI_MODE_3),
        other => Err(LinuxError::InvalidSpiMode(other)),
    }
}

/// spidev handle implementing [`SpiDevice`]
///
/// Writes go through `write(2)` so a partial write is detected and reported
/// as [`SpidevError::ShortWrite`] instead of silently truncating a frame.
pub struct SpidevBus {
    spi: Spidev,
}

impl SpidevBus {
    /// Open and configure a spidev node
    pub fn open(path: &str, options: &SpidevOptions) -> io::Result<Self> {
        let mut spi = Spidev::open(path)?;
        spi.configure(options)?;
        Ok(Self { spi })
    }

    /// Wrap an already configured handle
    pub fn new(spi: Spidev) -> Self {
        Self { spi }
    }

    /// Give back the handle
    pub fn into_inner(self) -> Spidev {
        self.spi
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), SpidevError> {
        let len = read.len().max(write.len());
        let mut tx = vec![0u8; len];
        tx[..write.len()].copy_from_slice(write);
        let mut rx = vec![0u8; len];
        self.spi
            .transfer(&mut SpidevTransfer::read_write(&tx, &mut rx))?;
        read.copy_from_slice(&rx[..read.len()]);
        Ok(())
    }
}

// A partial write(2) is fatal
fn write_checked<W: Write>(writer: &mut W, data: &[u8]) -> Result<(), SpidevError> {
    if data.is_empty() {
        return Ok(());
    }
    let written = writer.write(data)?;
    if written != data.len() {
        return Err(SpidevError::ShortWrite {
            expected: data.len(),
            written,
        });
    }
    Ok(())
}

impl ErrorType for SpidevBus {
    type Error = SpidevError;
}

impl SpiDevice for SpidevBus {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => write_checked(&mut self.spi, data)?,
                Operation::Read(buf) => {
                    self.spi.transfer(&mut SpidevTransfer::read(buf))?;
                }
                Operation::Transfer(read, write) => self.transfer(read, write)?,
                Operation::TransferInPlace(buf) => {
                    let tx = buf.to_vec();
                    self.transfer(buf, &tx)?;
                }
                Operation::DelayNs(ns) => Delay.delay_ns(*ns),
            }
        }
        Ok(())
    }
}

fn output_line(chip: &mut Chip, offset: u32, default: u8, label: &str) -> Result<CdevPin, LinuxError> {
    let handle = chip
        .get_line(offset)?
        .request(LineRequestFlags::OUTPUT, default, label)?;
    Ok(CdevPin::new(handle)?)
}

/// Open the bus and lines described by `config`
///
/// On error everything acquired so far is dropped and thereby released.
pub fn open(config: &LinuxConfig) -> Result<LinuxInterface, LinuxError> {
    let options = SpidevOptions::new()
        .bits_per_word(config.bits_per_word)
        .max_speed_hz(config.speed_hz)
        .mode(spi_mode_flags(config.spi_mode)?)
        .build();
    let spi = SpidevBus::open(&config.spi_path, &options).map_err(LinuxError::Spi)?;

    let mut chip = Chip::new(std::format!("/dev/{}", config.gpio_chip))?;
    let dc = output_line(&mut chip, config.dc_line, 0, "st77xx-dc")?;
    let rst = output_line(&mut chip, config.rst_line, 1, "st77xx-rst")?;
    let backlight = match config.backlight_line {
        Some(offset) => Some(output_line(&mut chip, offset, 1, "st77xx-bl")?),
        None => None,
    };

    info!(
        "opened {} (mode {}, {} Hz) with {} dc={} rst={} bl={:?}",
        config.spi_path,
        config.spi_mode,
        config.speed_hz,
        config.gpio_chip,
        config.dc_line,
        config.rst_line,
        config.backlight_line
    );
    Ok(Interface::new(spi, dc, rst, backlight))
}
