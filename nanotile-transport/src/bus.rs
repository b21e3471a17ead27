//! Runtime-selected transport
//!
//! The bus kind comes from configuration, so the transport is picked once
//! at startup and fixed for the lifetime of the device.

use nanotile_hal::Board;

use crate::config::{SignaledConfig, TransportConfig};
use crate::error::{ConfigError, PinRole, TransportError};
use crate::framing::DataMode;
use crate::i2c::{staging_limit, I2cTransport, DEFAULT_STAGING_CAPACITY};
use crate::signaled::{ParallelTransport, SpiTransport};
use crate::transport::{BusKind, Transport};

/// Transport over whichever bus the configuration selected
pub enum BusTransport<B: Board> {
    /// Addressed bus
    I2c(I2cTransport<B::I2c>),
    /// SPI bus
    Spi(SpiTransport<B::Spi, B::Pin>),
    /// Parallel bus
    Parallel(ParallelTransport<B::Parallel, B::Pin>),
}

impl<B: Board> BusTransport<B> {
    /// Resolve the configured bus and pins on `board` and open a transport
    ///
    /// The bus is taken last, and pins already taken are returned to the
    /// board when it is unavailable, so a failed open can be retried.
    pub fn open(config: &TransportConfig, board: &mut B) -> Result<Self, TransportError> {
        match config {
            TransportConfig::I2c(cfg) => {
                // Validate before taking anything from the board
                cfg.validated_address()?;
                staging_limit::<DEFAULT_STAGING_CAPACITY>(cfg.frame_limit())?;
                let bus = board
                    .take_i2c(cfg.bus, cfg.pins(), &cfg.bus_config()?)
                    .map_err(ConfigError::Bus)?;
                Ok(BusTransport::I2c(I2cTransport::open(bus, cfg)?))
            }
            TransportConfig::Spi(cfg) => {
                let signaled = cfg.signaled();
                let bus_config = cfg.bus_config()?;
                let (cs, dc) = take_pins(board, &signaled)?;
                let bus = match board.take_spi(cfg.bus, &bus_config) {
                    Ok(bus) => bus,
                    Err(e) => {
                        return_pins(board, &signaled, cs, dc);
                        return Err(ConfigError::Bus(e).into());
                    }
                };
                Ok(BusTransport::Spi(SpiTransport::open(bus, cs, Some(dc), cfg)?))
            }
            TransportConfig::Parallel(cfg) => {
                let signaled = cfg.signaled();
                let (cs, dc) = take_pins(board, &signaled)?;
                let bus = match board.take_parallel(cfg.bus) {
                    Ok(bus) => bus,
                    Err(e) => {
                        return_pins(board, &signaled, cs, dc);
                        return Err(ConfigError::Bus(e).into());
                    }
                };
                Ok(BusTransport::Parallel(ParallelTransport::open(
                    bus,
                    cs,
                    Some(dc),
                    cfg,
                )?))
            }
        }
    }
}

/// Take chip-select (optional) and data/command pins from the board
///
/// The whole signaled configuration is checked first, and chip select is
/// returned if data/command cannot be taken.
fn take_pins<B: Board>(
    board: &mut B,
    config: &SignaledConfig,
) -> Result<(Option<B::Pin>, B::Pin), ConfigError> {
    let dc_pin = config.required_dc_pin()?;
    config.frame_limit().validate()?;

    let cs = config
        .cs_pin
        .map(|pin| board.take_pin(pin))
        .transpose()
        .map_err(|e| ConfigError::Pin(PinRole::ChipSelect, e))?;
    match board.take_pin(dc_pin) {
        Ok(dc) => Ok((cs, dc)),
        Err(e) => {
            if let (Some(pin), Some(handle)) = (config.cs_pin, cs) {
                board.return_pin(pin, handle);
            }
            Err(ConfigError::Pin(PinRole::DataCommand, e))
        }
    }
}

/// Give pins from [`take_pins`] back to the board
fn return_pins<B: Board>(
    board: &mut B,
    config: &SignaledConfig,
    cs: Option<B::Pin>,
    dc: B::Pin,
) {
    if let (Some(pin), Some(handle)) = (config.cs_pin, cs) {
        board.return_pin(pin, handle);
    }
    if let Some(pin) = config.dc_pin {
        board.return_pin(pin, dc);
    }
}

macro_rules! dispatch {
    ($self:expr, $t:ident => $body:expr) => {
        match $self {
            BusTransport::I2c($t) => $body,
            BusTransport::Spi($t) => $body,
            BusTransport::Parallel($t) => $body,
        }
    };
}

impl<B: Board> Transport for BusTransport<B> {
    fn bus_kind(&self) -> BusKind {
        dispatch!(self, t => t.bus_kind())
    }

    fn in_transaction(&self) -> bool {
        dispatch!(self, t => t.in_transaction())
    }

    fn is_closed(&self) -> bool {
        dispatch!(self, t => t.is_closed())
    }

    fn begin_transaction(&mut self) -> Result<(), TransportError> {
        dispatch!(self, t => t.begin_transaction())
    }

    fn select(&mut self, mode: DataMode) -> Result<(), TransportError> {
        dispatch!(self, t => t.select(mode))
    }

    fn send(&mut self, byte: u8) -> Result<(), TransportError> {
        dispatch!(self, t => t.send(byte))
    }

    fn send_buffer(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        dispatch!(self, t => t.send_buffer(bytes))
    }

    fn end_transaction(&mut self) -> Result<(), TransportError> {
        dispatch!(self, t => t.end_transaction())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        dispatch!(self, t => t.close())
    }
}
