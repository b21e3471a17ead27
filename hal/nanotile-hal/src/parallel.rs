//! Parallel bus abstraction
//!
//! `embedded-hal` has no trait for the 8080/6800-style 8-bit parallel
//! interfaces found on larger TFT controllers, so one lives here. Chip
//! select and data/command lines are plain output pins owned by the
//! transport; this trait only covers latching a byte onto the data lines.

use core::convert::Infallible;

/// Classification of parallel bus failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParallelErrorKind {
    /// The controller did not release its busy line in time
    Timeout,
    /// Anything else
    Other,
}

/// Error type of a [`ParallelBus`]
pub trait ParallelError: core::fmt::Debug {
    /// Classify the error
    fn kind(&self) -> ParallelErrorKind;
}

impl ParallelError for Infallible {
    fn kind(&self) -> ParallelErrorKind {
        match *self {}
    }
}

/// 8-bit parallel write bus
pub trait ParallelBus {
    /// Error type for bus operations
    type Error: ParallelError;

    /// Put one byte on the data lines and pulse the write strobe
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Write several bytes
    ///
    /// Implementations backed by DMA or a PIO FIFO should override this.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            self.write(byte)?;
        }
        Ok(())
    }

    /// Block until every queued byte has been strobed out
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
