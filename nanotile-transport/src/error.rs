//! Transport error taxonomy
//!
//! Three families, kept apart so callers can pick a policy per family:
//! configuration problems are fatal to the transport instance, bus faults
//! are handed up untouched (there is no retry here) and misuse means the
//! caller broke the begin/send/end bracket.

use embedded_hal::{digital, i2c, spi};
use nanotile_hal::{ParallelErrorKind, ResourceError};

/// Role a pin plays for the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    /// Chip select
    ChipSelect,
    /// Data/command discriminator
    DataCommand,
}

/// Invalid or unsatisfiable configuration at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Addressed bus without a device address
    MissingAddress,
    /// Address outside the 7-bit range (or the general-call address 0)
    InvalidAddress(u8),
    /// A pin the bus kind cannot work without is unassigned
    MissingPin(PinRole),
    /// The board could not provide an assigned pin
    Pin(PinRole, ResourceError),
    /// The board could not provide the bus
    Bus(ResourceError),
    /// Clock frequency of zero
    ZeroFrequency,
    /// Per-transaction byte limit below 2 or above the staging buffer
    InvalidFrameLimit(u16),
}

/// Transport operation that hit a bus fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusOp {
    /// Starting a transaction
    Begin,
    /// Sending payload bytes
    Send,
    /// Switching between command and data
    Select,
    /// Transparent end/restart when the frame limit is reached
    Reframe,
    /// Ending a transaction
    End,
    /// Releasing the bus on close
    Close,
}

/// Hardware-level failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusErrorKind {
    /// Bus error (misplaced start/stop)
    Bus,
    /// Arbitration lost
    ArbitrationLost,
    /// NACK received
    Nack,
    /// Data overrun
    Overrun,
    /// SPI mode fault
    ModeFault,
    /// SPI frame format error
    FrameFormat,
    /// Chip select fault
    ChipSelect,
    /// Timeout
    Timeout,
    /// Driving a control pin failed
    Pin,
    /// Other error
    Other,
}

impl From<i2c::ErrorKind> for BusErrorKind {
    fn from(kind: i2c::ErrorKind) -> Self {
        match kind {
            i2c::ErrorKind::Bus => BusErrorKind::Bus,
            i2c::ErrorKind::ArbitrationLoss => BusErrorKind::ArbitrationLost,
            i2c::ErrorKind::NoAcknowledge(_) => BusErrorKind::Nack,
            i2c::ErrorKind::Overrun => BusErrorKind::Overrun,
            _ => BusErrorKind::Other,
        }
    }
}

impl From<spi::ErrorKind> for BusErrorKind {
    fn from(kind: spi::ErrorKind) -> Self {
        match kind {
            spi::ErrorKind::Overrun => BusErrorKind::Overrun,
            spi::ErrorKind::ModeFault => BusErrorKind::ModeFault,
            spi::ErrorKind::FrameFormat => BusErrorKind::FrameFormat,
            spi::ErrorKind::ChipSelectFault => BusErrorKind::ChipSelect,
            _ => BusErrorKind::Other,
        }
    }
}

impl From<digital::ErrorKind> for BusErrorKind {
    fn from(_: digital::ErrorKind) -> Self {
        BusErrorKind::Pin
    }
}

impl From<ParallelErrorKind> for BusErrorKind {
    fn from(kind: ParallelErrorKind) -> Self {
        match kind {
            ParallelErrorKind::Timeout => BusErrorKind::Timeout,
            ParallelErrorKind::Other => BusErrorKind::Other,
        }
    }
}

/// Operation invoked outside its valid bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Misuse {
    /// Send, select or end without an open transaction
    NoTransaction,
    /// Begin while a transaction is already open
    TransactionOpen,
    /// Any operation after close
    Closed,
}

/// Error returned by every transport operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Configuration rejected at open
    Configuration(ConfigError),
    /// Hardware failure during `op`
    Bus {
        /// Operation that failed
        op: BusOp,
        /// What the hardware reported
        kind: BusErrorKind,
    },
    /// Programming defect
    Misuse(Misuse),
}

impl TransportError {
    /// Build a bus fault from any classified hardware error
    pub fn bus(op: BusOp, kind: impl Into<BusErrorKind>) -> Self {
        TransportError::Bus {
            op,
            kind: kind.into(),
        }
    }

    /// Check if this error means the caller broke the protocol
    pub fn is_misuse(&self) -> bool {
        matches!(self, TransportError::Misuse(_))
    }
}

impl From<ConfigError> for TransportError {
    fn from(e: ConfigError) -> Self {
        TransportError::Configuration(e)
    }
}

impl From<Misuse> for TransportError {
    fn from(e: Misuse) -> Self {
        TransportError::Misuse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nack_classification() {
        let kind: BusErrorKind =
            i2c::ErrorKind::NoAcknowledge(i2c::NoAcknowledgeSource::Address).into();
        assert_eq!(kind, BusErrorKind::Nack);
    }

    #[test]
    fn test_bus_error_carries_operation() {
        let err = TransportError::bus(BusOp::Reframe, spi::ErrorKind::Overrun);
        assert_eq!(
            err,
            TransportError::Bus {
                op: BusOp::Reframe,
                kind: BusErrorKind::Overrun
            }
        );
        assert!(!err.is_misuse());
        assert!(TransportError::from(Misuse::NoTransaction).is_misuse());
    }
}
