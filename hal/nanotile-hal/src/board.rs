//! Board resource provider
//!
//! Display wiring is described with plain numbers (bus 1, CS on pin 10,
//! D/C on pin 9) so it can come from a config file. A [`Board`] owns the
//! chip peripherals and hands them out by those numbers, once each. Pins
//! can be returned and taken again.

use core::convert::Infallible;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::i2c::{self, I2c};
use embedded_hal::spi::{self, SpiBus};

use crate::i2c::{I2cConfig, I2cPins};
use crate::parallel::ParallelBus;
use crate::spi::SpiConfig;

/// Error when requesting a pin or bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// Pin number does not exist on this chip
    InvalidPin(u8),
    /// Pin already handed out
    PinTaken(u8),
    /// Bus index does not exist on this chip
    InvalidBus(u8),
    /// Bus already handed out
    BusTaken(u8),
    /// This board has no bus of the requested kind
    Unsupported,
}

/// Owner of the peripherals a display can be wired to
///
/// `bus == None` selects the board's default instance of that bus kind.
pub trait Board {
    /// Output pin handed out for chip-select and data/command lines
    type Pin: OutputPin;
    /// I2C master
    type I2c: I2c;
    /// SPI master
    type Spi: SpiBus;
    /// Parallel write bus
    type Parallel: ParallelBus;

    /// Take a pin by number and configure it as a push-pull output
    fn take_pin(&mut self, pin: u8) -> Result<Self::Pin, ResourceError>;

    /// Take and configure an I2C bus
    fn take_i2c(
        &mut self,
        bus: Option<u8>,
        pins: Option<I2cPins>,
        config: &I2cConfig,
    ) -> Result<Self::I2c, ResourceError>;

    /// Take and configure an SPI bus
    fn take_spi(&mut self, bus: Option<u8>, config: &SpiConfig)
        -> Result<Self::Spi, ResourceError>;

    /// Take a parallel bus
    fn take_parallel(&mut self, bus: Option<u8>) -> Result<Self::Parallel, ResourceError>;

    /// Return a pin so it can be taken again
    fn return_pin(&mut self, pin: u8, handle: Self::Pin);
}

/// Stand-in for a bus kind a board does not have
///
/// It cannot be constructed, so a board returns
/// `Err(ResourceError::Unsupported)` from the matching `take_*` call.
#[derive(Debug)]
pub enum Unavailable {}

impl digital::ErrorType for Unavailable {
    type Error = Infallible;
}

impl OutputPin for Unavailable {
    fn set_low(&mut self) -> Result<(), Infallible> {
        match *self {}
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        match *self {}
    }
}

impl i2c::ErrorType for Unavailable {
    type Error = Infallible;
}

impl I2c for Unavailable {
    fn transaction(
        &mut self,
        _address: u8,
        _operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Infallible> {
        match *self {}
    }
}

impl spi::ErrorType for Unavailable {
    type Error = Infallible;
}

impl SpiBus for Unavailable {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
        match *self {}
    }

    fn write(&mut self, _words: &[u8]) -> Result<(), Infallible> {
        match *self {}
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Infallible> {
        match *self {}
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
        match *self {}
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        match *self {}
    }
}

impl ParallelBus for Unavailable {
    type Error = Infallible;

    fn write(&mut self, _byte: u8) -> Result<(), Infallible> {
        match *self {}
    }
}
