//! The uniform transport contract
//!
//! Display controller drivers see every bus as the same thing: a
//! transaction bracket around a byte stream, with a way to flip between
//! command and data.

use crate::error::TransportError;
use crate::framing::DataMode;

/// Physical bus family behind a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusKind {
    /// Addressed two-wire bus
    I2c,
    /// Serial bus with chip select and D/C lines
    Spi,
    /// 8-bit parallel bus with chip select and D/C lines
    Parallel,
}

impl BusKind {
    /// True for buses where the controller is selected by address
    pub const fn is_addressed(self) -> bool {
        matches!(self, BusKind::I2c)
    }
}

/// Transactional byte stream to a display controller
///
/// Transports are created open (see the `open` constructors) and must see
/// strictly nested `begin_transaction` / `end_transaction` pairs. Bus
/// faults are returned as-is; nothing is retried.
pub trait Transport {
    /// Bus family
    fn bus_kind(&self) -> BusKind;

    /// Check if a transaction is open
    fn in_transaction(&self) -> bool;

    /// Check if the transport has been closed
    fn is_closed(&self) -> bool;

    /// Acquire the bus (assert chip select / start addressing)
    fn begin_transaction(&mut self) -> Result<(), TransportError>;

    /// Switch the stream between commands and data
    ///
    /// The selected mode is what gets re-emitted when a long stream is
    /// split, so select before sending.
    fn select(&mut self, mode: DataMode) -> Result<(), TransportError>;

    /// Send one byte within the open transaction
    fn send(&mut self, byte: u8) -> Result<(), TransportError>;

    /// Send a run of bytes within the open transaction
    fn send_buffer(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        for &byte in bytes {
            self.send(byte)?;
        }
        Ok(())
    }

    /// Flush and release the bus
    fn end_transaction(&mut self) -> Result<(), TransportError>;

    /// Release the bus for good; calling it again is a no-op
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Convenience wrappers for the common command/data patterns
pub trait TransportExt: Transport {
    /// Send a complete command sequence in its own transaction
    fn send_commands(&mut self, commands: &[u8]) -> Result<(), TransportError> {
        self.begin_transaction()?;
        let result = self
            .select(DataMode::Command)
            .and_then(|()| self.send_buffer(commands));
        finish(self, result)
    }

    /// Send a block of display data in its own transaction
    fn send_data(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.begin_transaction()?;
        let result = self
            .select(DataMode::Data)
            .and_then(|()| self.send_buffer(data));
        finish(self, result)
    }
}

// Blanket implementation for all transports, including `dyn Transport`
impl<T: Transport + ?Sized> TransportExt for T {}

/// End the transaction even when the body failed, reporting the first error
fn finish<T: Transport + ?Sized>(
    transport: &mut T,
    result: Result<(), TransportError>,
) -> Result<(), TransportError> {
    let ended = transport.end_transaction();
    result.and(ended)
}
