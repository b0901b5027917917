//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for communicating with ST7735/ST7789 controllers over SPI.
//!
//! ## Hardware Requirements
//!
//! The ST77xx requires:
//! - SPI bus (MOSI + SCK, CS handled by the [`SpiDevice`])
//! - 2 or 3 GPIO pins:
//!   - **DC**: Data/Command select (output)
//!   - **RST**: Reset (output, active low)
//!   - **BL**: Backlight enable (output, optional)
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use st77xx::{DisplayInterface, Interface};
//! # use core::convert::Infallible;
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
//! // Create interface with SPI, DC, RST and a backlight pin
//! let mut interface = Interface::new(MockSpi, MockPin, MockPin, Some(MockPin));
//!
//! // Reset pulse
//! let _ = interface.reset(&mut delay);
//!
//! // Send command
//! let _ = interface.send_command(0x11); // Sleep out
//!
//! // Send data
//! let _ = interface.send_data(&[0x55]);
//!
//! let _ = interface.set_backlight(true);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// RST held high before the pulse, in milliseconds
pub const RESET_HIGH_MS: u32 = 10;
/// RST held low, in milliseconds
pub const RESET_LOW_MS: u32 = 20;
/// Wait after releasing RST, in milliseconds
pub const RESET_RECOVERY_MS: u32 = 120;

/// Trait for hardware interface to ST77xx controllers
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// SPI + GPIO implementation that satisfies embedded-hal traits.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. If you need
/// custom behavior (e.g., a parallel bus, or a test double), implement this
/// trait on your own type.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Send a command byte to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin low (command mode)
    /// 2. Send the command byte over SPI
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error>;

    /// Send data bytes to the controller
    ///
    /// The implementation must:
    /// 1. Set DC pin high (data mode)
    /// 2. Send all of `data` over SPI; a partial write is an error
    ///
    /// # Errors
    ///
    /// Returns an error if SPI communication or GPIO fails.
    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error>;

    /// Perform hardware reset
    ///
    /// The implementation must:
    /// 1. Set RST pin high, wait at least 10 ms
    /// 2. Set RST pin low, wait at least 20 ms
    /// 3. Set RST pin high, wait at least 120 ms
    ///
    /// # Errors
    ///
    /// Returns an error if the reset line cannot be driven.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error>;

    /// Drive the backlight line, if there is one
    ///
    /// # Errors
    ///
    /// Returns an error if the backlight line cannot be driven.
    fn set_backlight(&mut self, on: bool) -> InterfaceResult<(), Self::Error>;
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Hardware interface implementation for ST77xx
///
/// Implements [`DisplayInterface`] for embedded-hal v1.0 SPI and GPIO traits.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `DC` - Data/Command pin implementing [`OutputPin`]
/// * `RST` - Reset pin implementing [`OutputPin`]
/// * `BL` - Backlight pin implementing [`OutputPin`]
///
/// ## Example
///
/// ```rust,no_run
/// use st77xx::{Builder, Dimensions, Display, Interface};
/// # use core::convert::Infallible;
/// # use embedded_hal::digital::OutputPin;
/// # use embedded_hal::spi::{Operation, SpiDevice};
/// # struct MockSpi;
/// # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
/// # impl SpiDevice for MockSpi {
/// #     fn transaction(
/// #         &mut self,
/// #         _operations: &mut [Operation<'_, u8>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// let interface = Interface::new(
///     MockSpi,         // SpiDevice
///     MockPin,         // DC
///     MockPin,         // RST
///     None::<MockPin>, // no backlight control
/// );
///
/// // Use with Display
/// # let dims = match Dimensions::new(240, 320) {
/// #     Ok(dims) => dims,
/// #     Err(_) => return,
/// # };
/// # let config = match Builder::new().dimensions(dims).build() {
/// #     Ok(config) => config,
/// #     Err(_) => return,
/// # };
/// let _display = Display::new(interface, config);
/// ```
pub struct Interface<SPI, DC, RST, BL> {
    /// SPI device for communication
    spi: SPI,
    /// Data/Command select pin (low=command, high=data)
    dc: DC,
    /// Reset pin (active low)
    rst: RST,
    /// Backlight pin (active high)
    backlight: Option<BL>,
}

impl<SPI, DC, RST, BL> Interface<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `dc` - Data/Command pin (output, low=command, high=data)
    /// * `rst` - Reset pin (output, active low)
    /// * `backlight` - Optional backlight pin (output, active high)
    pub fn new(spi: SPI, dc: DC, rst: RST, backlight: Option<BL>) -> Self {
        Self {
            spi,
            dc,
            rst,
            backlight,
        }
    }

    /// Whether a backlight pin is attached
    pub fn has_backlight(&self) -> bool {
        self.backlight.is_some()
    }

    /// Give back the bus and pins
    pub fn release(self) -> (SPI, DC, RST, Option<BL>) {
        (self.spi, self.dc, self.rst, self.backlight)
    }
}

impl<SPI, DC, RST, BL, PinErr> DisplayInterface for Interface<SPI, DC, RST, BL>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    DC: OutputPin<Error = PinErr>,
    RST: OutputPin<Error = PinErr>,
    BL: OutputPin<Error = PinErr>,
    PinErr: Debug,
{
    type Error = InterfaceError<SPI::Error, PinErr>;

    fn send_command(&mut self, command: u8) -> InterfaceResult<(), Self::Error> {
        self.dc.set_low().map_err(|e| InterfaceError::Pin(e))?;
        self.spi
            .write(&[command])
            .map_err(|e| InterfaceError::Spi(e))?;
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> InterfaceResult<(), Self::Error> {
        self.dc.set_high().map_err(|e| InterfaceError::Pin(e))?;
        self.spi.write(data).map_err(|e| InterfaceError::Spi(e))?;
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> InterfaceResult<(), Self::Error> {
        // HIGH -> wait -> LOW -> wait -> HIGH -> wait for the panel to come up
        self.rst.set_high().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(RESET_HIGH_MS);
        self.rst.set_low().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(RESET_LOW_MS);
        self.rst.set_high().map_err(|e| InterfaceError::Pin(e))?;
        delay.delay_ms(RESET_RECOVERY_MS);
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> InterfaceResult<(), Self::Error> {
        let Some(bl) = self.backlight.as_mut() else {
            return Ok(());
        };
        if on {
            bl.set_high().map_err(|e| InterfaceError::Pin(e))
        } else {
            bl.set_low().map_err(|e| InterfaceError::Pin(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use embedded_hal::digital::ErrorType;
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Dc(bool),
        Rst(bool),
        Bl(bool),
        Write(Vec<u8>),
        Delay(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    #[derive(Debug, Clone, Copy)]
    struct MockError;

    impl embedded_hal::digital::Error for MockError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl embedded_hal::spi::Error for MockError {
        fn kind(&self) -> embedded_hal::spi::ErrorKind {
            embedded_hal::spi::ErrorKind::Other
        }
    }

    struct MockSpi {
        log: Log,
        fail: bool,
    }

    impl SpiErrorType for MockSpi {
        type Error = MockError;
    }

    impl SpiDevice for MockSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockError);
            }
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    self.log.borrow_mut().push(Event::Write(bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum Line {
        Dc,
        Rst,
        Bl,
    }

    struct MockPin {
        log: Log,
        line: Line,
    }

    impl MockPin {
        fn record(&self, level: bool) {
            let event = match self.line {
                Line::Dc => Event::Dc(level),
                Line::Rst => Event::Rst(level),
                Line::Bl => Event::Bl(level),
            };
            self.log.borrow_mut().push(event);
        }
    }

    impl ErrorType for MockPin {
        type Error = MockError;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.record(false);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.record(true);
            Ok(())
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::Delay(ms));
        }
    }

    fn interface(log: &Log, backlight: bool) -> Interface<MockSpi, MockPin, MockPin, MockPin> {
        let pin = |line| MockPin {
            log: log.clone(),
            line,
        };
        Interface::new(
            MockSpi {
                log: log.clone(),
                fail: false,
            },
            pin(Line::Dc),
            pin(Line::Rst),
            backlight.then(|| pin(Line::Bl)),
        )
    }

    #[test]
    fn test_command_and_data_framing() {
        let log = Log::default();
        let mut iface = interface(&log, false);
        iface.send_command(0x2A).unwrap();
        iface.send_data(&[0x00, 0x00, 0x00, 0xEF]).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Dc(false),
                Event::Write(vec![0x2A]),
                Event::Dc(true),
                Event::Write(vec![0x00, 0x00, 0x00, 0xEF]),
            ]
        );
    }

    #[test]
    fn test_reset_pulse_timing() {
        let log = Log::default();
        let mut iface = interface(&log, false);
        let mut delay = MockDelay { log: log.clone() };
        iface.reset(&mut delay).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Rst(true),
                Event::Delay(10),
                Event::Rst(false),
                Event::Delay(20),
                Event::Rst(true),
                Event::Delay(120),
            ]
        );
    }

    #[test]
    fn test_backlight() {
        let log = Log::default();
        let mut iface = interface(&log, true);
        assert!(iface.has_backlight());
        iface.set_backlight(true).unwrap();
        iface.set_backlight(false).unwrap();
        assert_eq!(*log.borrow(), vec![Event::Bl(true), Event::Bl(false)]);

        let log = Log::default();
        let mut iface = interface(&log, false);
        iface.set_backlight(true).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_spi_error_is_reported() {
        let log = Log::default();
        let (mut spi, dc, rst, bl) = interface(&log, false).release();
        spi.fail = true;
        let mut iface = Interface::new(spi, dc, rst, bl);
        assert!(matches!(
            iface.send_data(&[1, 2, 3]),
            Err(InterfaceError::Spi(MockError))
        ));
    }
}
