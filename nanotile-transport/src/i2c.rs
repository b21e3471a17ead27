//! I2C transport
//!
//! Bytes are staged in RAM and written as one I2C write (start, address,
//! payload, stop) when the transaction ends, the same way the Arduino
//! `Wire` library works. A staged transaction is bounded by the target's
//! frame limit; past it the staged bytes are written, a new write is
//! started and the control byte is repeated so the controller keeps
//! treating the payload as data (or commands).

use embedded_hal::i2c::{Error as _, I2c};
use heapless::Vec;

use crate::config::I2cTransportConfig;
use crate::error::{BusErrorKind, BusOp, ConfigError, TransportError};
use crate::framing::{DataMode, FrameLimit, Framer, Session};
use crate::transport::{BusKind, Transport};

/// Default staging capacity, the size of the AVR `Wire` buffer
pub const DEFAULT_STAGING_CAPACITY: usize = 32;

/// Transport for addressed display controllers
pub struct I2cTransport<I, const N: usize = DEFAULT_STAGING_CAPACITY> {
    bus: I,
    address: u8,
    staged: Vec<u8, N>,
    framer: Framer,
    /// Marker repeated after a split (the selected control byte)
    marker: u8,
    /// Marker used until a mode is selected
    default_marker: u8,
    session: Session,
}

impl<I: I2c, const N: usize> I2cTransport<I, N> {
    /// Open a transport on an already configured bus
    pub fn open(bus: I, config: &I2cTransportConfig) -> Result<Self, TransportError> {
        let address = config.validated_address()?;
        config.bus_config()?;
        let limit = staging_limit::<N>(config.frame_limit())?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "i2c transport open: addr={=u8:#x} limit={}",
            address,
            limit.max()
        );

        Ok(Self {
            bus,
            address,
            staged: Vec::new(),
            framer: Framer::new(limit),
            marker: config.continuation_marker,
            default_marker: config.continuation_marker,
            session: Session::Idle,
        })
    }

    /// Device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Transaction state
    pub fn session(&self) -> Session {
        self.session
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.bus
    }

    /// Write everything staged as one I2C transaction
    fn write_staged(&mut self, op: BusOp) -> Result<(), TransportError> {
        let result = self
            .bus
            .write(self.address, &self.staged)
            .map_err(|e| TransportError::bus(op, e.kind()));
        self.staged.clear();
        self.framer.start();
        result
    }

    fn push(&mut self, byte: u8) -> Result<(), TransportError> {
        self.staged
            .push(byte)
            .map_err(|_| TransportError::bus(BusOp::Send, BusErrorKind::Overrun))?;
        self.framer.record(1);
        Ok(())
    }

    /// Split the stream: stop, re-address, repeat the marker
    ///
    /// The marker is staged even when the write fails, so a retried send
    /// still goes out behind a control byte.
    fn reframe(&mut self) -> Result<(), TransportError> {
        #[cfg(feature = "defmt")]
        defmt::trace!("i2c reframe after {} bytes", self.framer.written());

        let written = self.write_staged(BusOp::Reframe);
        self.push(self.marker)?;
        written
    }
}

impl<I: I2c, const N: usize> Transport for I2cTransport<I, N> {
    fn bus_kind(&self) -> BusKind {
        BusKind::I2c
    }

    fn in_transaction(&self) -> bool {
        self.session == Session::InTransaction
    }

    fn is_closed(&self) -> bool {
        self.session == Session::Closed
    }

    fn begin_transaction(&mut self) -> Result<(), TransportError> {
        self.session.require_idle()?;
        self.staged.clear();
        self.framer.start();
        self.marker = self.default_marker;
        self.session = Session::InTransaction;
        Ok(())
    }

    fn select(&mut self, mode: DataMode) -> Result<(), TransportError> {
        self.session.require_transaction()?;
        // A control byte without the continuation bit covers the rest of
        // the write, so switching modes needs a fresh write.
        let flushed = if self.framer.written() > 0 {
            self.write_staged(BusOp::Select)
        } else {
            Ok(())
        };
        self.marker = mode.control_byte();
        self.push(self.marker)?;
        flushed
    }

    fn send(&mut self, byte: u8) -> Result<(), TransportError> {
        self.session.require_transaction()?;
        if self.framer.is_full() {
            self.reframe()?;
        }
        self.push(byte)
    }

    fn send_buffer(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.session.require_transaction()?;
        let mut rest = bytes;
        while !rest.is_empty() {
            if self.framer.is_full() {
                self.reframe()?;
            }
            let count = self.framer.room().min(rest.len());
            self.staged
                .extend_from_slice(&rest[..count])
                .map_err(|_| TransportError::bus(BusOp::Send, BusErrorKind::Overrun))?;
            self.framer.record(count);
            rest = &rest[count..];
        }
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), TransportError> {
        self.session.require_transaction()?;
        // The stop condition ends the transaction even when the write fails
        self.session = Session::Idle;
        self.write_staged(BusOp::End)
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if self.session == Session::InTransaction {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "i2c transport closed mid-transaction, {} bytes dropped",
                self.staged.len()
            );
            self.staged.clear();
        }
        self.session = Session::Closed;
        Ok(())
    }
}

/// Clamp the configured limit to what the staging buffer can hold
pub(crate) fn staging_limit<const N: usize>(limit: FrameLimit) -> Result<FrameLimit, ConfigError> {
    let capacity = u16::try_from(N).unwrap_or(u16::MAX);
    match limit.validate()?.max() {
        None => FrameLimit::bytes(capacity).validate(),
        Some(max) if max > capacity => Err(ConfigError::InvalidFrameLimit(max)),
        Some(_) => Ok(limit),
    }
}
