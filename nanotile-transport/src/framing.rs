//! Session bookkeeping and transparent re-framing
//!
//! Most bus drivers can only queue a bounded number of bytes between a
//! start and a stop condition (Arduino `Wire` stages into a 32-byte array,
//! ESP32 far less). A display stream is usually much longer, so the
//! transport splits it: once the per-transaction limit is reached it ends
//! the transaction, starts a new one and re-emits the data/command
//! discriminator so the controller keeps interpreting bytes the same way.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Misuse, TransportError};

/// Control byte announcing a command stream on addressed buses
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte announcing a data stream on addressed buses
pub const CONTROL_DATA: u8 = 0x40;

/// Command/data discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataMode {
    /// Bytes are controller commands
    Command,
    /// Bytes are display RAM contents
    Data,
}

impl DataMode {
    /// Control byte used on addressed buses
    pub const fn control_byte(self) -> u8 {
        match self {
            DataMode::Command => CONTROL_COMMAND,
            DataMode::Data => CONTROL_DATA,
        }
    }

    /// D/C line level used on signaled buses (high = data)
    pub const fn dc_high(self) -> bool {
        matches!(self, DataMode::Data)
    }
}

/// Maximum outstanding bytes per transaction, continuation markers included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameLimit(Option<u16>);

impl FrameLimit {
    /// No limit; the transaction is never split
    pub const UNBOUNDED: Self = Self(None);

    /// Split after `max` bytes
    pub const fn bytes(max: u16) -> Self {
        Self(Some(max))
    }

    /// The limit, if any
    pub const fn max(&self) -> Option<u16> {
        self.0
    }

    /// Reject limits that leave no room for payload after the marker
    pub fn validate(self) -> Result<Self, ConfigError> {
        match self.0 {
            Some(max) if max < 2 => Err(ConfigError::InvalidFrameLimit(max)),
            _ => Ok(self),
        }
    }
}

/// Per-target transaction limits
///
/// These mirror the staging buffer sizes of the common Arduino cores. Set
/// `max_transaction_bytes` in the config when the target is not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TargetProfile {
    /// AVR `Wire`: `BUFFER_LENGTH` (32) minus address and control byte
    #[default]
    Avr,
    /// SAMD `Wire`: 64-byte ring buffer
    Samd,
    /// ESP32 `Wire`: `I2C_BUFFER_LENGTH >> 4`
    Esp32,
    /// ATtiny USI: `USI_BUF_SIZE` (18) minus two
    Attiny,
    /// No limit (typical for SPI and parallel buses)
    Unbounded,
}

impl TargetProfile {
    /// Frame limit for this target
    pub const fn frame_limit(self) -> FrameLimit {
        match self {
            TargetProfile::Avr => FrameLimit::bytes(30),
            TargetProfile::Samd => FrameLimit::bytes(64),
            TargetProfile::Esp32 => FrameLimit::bytes(128 >> 4),
            TargetProfile::Attiny => FrameLimit::bytes(16),
            TargetProfile::Unbounded => FrameLimit::UNBOUNDED,
        }
    }
}

/// Byte counter for the current transaction
#[derive(Debug, Clone, Copy)]
pub(crate) struct Framer {
    limit: FrameLimit,
    written: u16,
}

impl Framer {
    pub(crate) const fn new(limit: FrameLimit) -> Self {
        Self { limit, written: 0 }
    }

    /// Reset the count at the start of a (re)opened transaction
    pub(crate) fn start(&mut self) {
        self.written = 0;
    }

    /// True when the next byte does not fit the current transaction
    pub(crate) fn is_full(&self) -> bool {
        self.limit.max().is_some_and(|max| self.written >= max)
    }

    /// Bytes that still fit before a re-frame
    pub(crate) fn room(&self) -> usize {
        match self.limit.max() {
            Some(max) => usize::from(max.saturating_sub(self.written)),
            None => usize::MAX,
        }
    }

    pub(crate) fn record(&mut self, count: usize) {
        let count = u16::try_from(count).unwrap_or(u16::MAX);
        self.written = self.written.saturating_add(count);
    }

    pub(crate) fn written(&self) -> u16 {
        self.written
    }
}

/// Transaction bracket state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Session {
    /// Open, no transaction in progress
    Idle,
    /// Between begin and end
    InTransaction,
    /// Closed; only `close` and `release` are allowed
    Closed,
}

impl Session {
    pub(crate) fn require_transaction(self) -> Result<(), TransportError> {
        match self {
            Session::InTransaction => Ok(()),
            Session::Idle => Err(Misuse::NoTransaction.into()),
            Session::Closed => Err(Misuse::Closed.into()),
        }
    }

    pub(crate) fn require_idle(self) -> Result<(), TransportError> {
        match self {
            Session::Idle => Ok(()),
            Session::InTransaction => Err(Misuse::TransactionOpen.into()),
            Session::Closed => Err(Misuse::Closed.into()),
        }
    }
}
