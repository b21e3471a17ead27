//! Transport configuration
//!
//! Plain scalar settings, deserializable from a board file:
//!
//! ```toml
//! [i2c]
//! address = 0x3C
//! target = "esp32"
//! ```
//!
//! Which table is present selects the bus kind.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nanotile_hal::{I2cConfig, I2cPins, Mode, SpiConfig};

use crate::error::{ConfigError, PinRole};
use crate::framing::{FrameLimit, TargetProfile, CONTROL_DATA};

/// Highest valid 7-bit address
const MAX_I2C_ADDRESS: u8 = 0x7F;

/// Bus selection plus its settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransportConfig {
    /// Addressed two-wire bus
    I2c(I2cTransportConfig),
    /// Signaled serial bus with CS and D/C lines
    Spi(SpiTransportConfig),
    /// Signaled 8-bit parallel bus with CS and D/C lines
    Parallel(ParallelTransportConfig),
}

/// I2C display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct I2cTransportConfig {
    /// Bus index (`None` = board default)
    pub bus: Option<u8>,
    /// 7-bit device address (SSD1306 modules use 0x3C or 0x3D)
    pub address: Option<u8>,
    /// SDA pin for chips with a pin matrix
    pub sda_pin: Option<u8>,
    /// SCL pin for chips with a pin matrix
    pub scl_pin: Option<u8>,
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Target whose driver buffer bounds a transaction
    pub target: TargetProfile,
    /// Explicit per-transaction limit, overrides `target`
    pub max_transaction_bytes: Option<u16>,
    /// Marker re-emitted after a split until a mode is selected
    pub continuation_marker: u8,
}

impl Default for I2cTransportConfig {
    fn default() -> Self {
        Self {
            bus: None,
            address: None,
            sda_pin: None,
            scl_pin: None,
            frequency: I2cConfig::FAST.frequency,
            target: TargetProfile::Avr,
            max_transaction_bytes: None,
            // Long streams are pixel data; commands never need many bytes
            continuation_marker: CONTROL_DATA,
        }
    }
}

impl I2cTransportConfig {
    /// Config for a device at `address` with target defaults
    pub fn new(address: u8) -> Self {
        Self {
            address: Some(address),
            ..Self::default()
        }
    }

    /// Validated 7-bit address
    pub fn validated_address(&self) -> Result<u8, ConfigError> {
        match self.address {
            None => Err(ConfigError::MissingAddress),
            Some(0) => Err(ConfigError::InvalidAddress(0)),
            Some(addr) if addr > MAX_I2C_ADDRESS => Err(ConfigError::InvalidAddress(addr)),
            Some(addr) => Ok(addr),
        }
    }

    /// Effective frame limit
    pub fn frame_limit(&self) -> FrameLimit {
        self.max_transaction_bytes
            .map(FrameLimit::bytes)
            .unwrap_or(self.target.frame_limit())
    }

    /// Bus settings handed to the board
    pub fn bus_config(&self) -> Result<I2cConfig, ConfigError> {
        if self.frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        Ok(I2cConfig {
            frequency: self.frequency,
        })
    }

    /// Pin routing handed to the board
    pub fn pins(&self) -> Option<I2cPins> {
        I2cPins::from_optional(self.sda_pin, self.scl_pin)
    }
}

/// SPI display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpiTransportConfig {
    /// Bus index (`None` = board default)
    pub bus: Option<u8>,
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
    /// Chip select pin (`None` when CS is tied low)
    pub cs_pin: Option<u8>,
    /// Data/command pin
    pub dc_pin: Option<u8>,
    /// Command byte sent before deselect (PCD8544 needs a NOP to latch
    /// the last data byte)
    pub trailing_nop: Option<u8>,
    /// Per-transaction limit; unbounded when absent
    pub max_transaction_bytes: Option<u16>,
}

impl Default for SpiTransportConfig {
    fn default() -> Self {
        let bus = SpiConfig::default();
        Self {
            bus: None,
            frequency: bus.frequency,
            mode: bus.mode,
            cs_pin: None,
            dc_pin: None,
            trailing_nop: None,
            max_transaction_bytes: None,
        }
    }
}

impl SpiTransportConfig {
    /// Config with the given chip select and data/command pins
    pub fn new(cs_pin: Option<u8>, dc_pin: u8) -> Self {
        Self {
            cs_pin,
            dc_pin: Some(dc_pin),
            ..Self::default()
        }
    }

    /// Bus settings handed to the board
    pub fn bus_config(&self) -> Result<SpiConfig, ConfigError> {
        if self.frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        Ok(SpiConfig {
            frequency: self.frequency,
            mode: self.mode,
        })
    }

    /// Signaled-bus settings shared with the parallel transport
    pub fn signaled(&self) -> SignaledConfig {
        SignaledConfig {
            cs_pin: self.cs_pin,
            dc_pin: self.dc_pin,
            trailing_nop: self.trailing_nop,
            max_transaction_bytes: self.max_transaction_bytes,
        }
    }
}

/// Parallel display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParallelTransportConfig {
    /// Bus index (`None` = board default)
    pub bus: Option<u8>,
    /// Chip select pin (`None` when CS is tied low)
    pub cs_pin: Option<u8>,
    /// Data/command pin
    pub dc_pin: Option<u8>,
    /// Command byte sent before deselect
    pub trailing_nop: Option<u8>,
    /// Per-transaction limit; unbounded when absent
    pub max_transaction_bytes: Option<u16>,
}

impl ParallelTransportConfig {
    /// Signaled-bus settings shared with the SPI transport
    pub fn signaled(&self) -> SignaledConfig {
        SignaledConfig {
            cs_pin: self.cs_pin,
            dc_pin: self.dc_pin,
            trailing_nop: self.trailing_nop,
            max_transaction_bytes: self.max_transaction_bytes,
        }
    }
}

/// Settings common to buses that signal D/C on a dedicated line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignaledConfig {
    /// Chip select pin (`None` when CS is tied low)
    pub cs_pin: Option<u8>,
    /// Data/command pin
    pub dc_pin: Option<u8>,
    /// Command byte sent before deselect
    pub trailing_nop: Option<u8>,
    /// Per-transaction limit; unbounded when absent
    pub max_transaction_bytes: Option<u16>,
}

impl SignaledConfig {
    /// Data/command pin, required on signaled buses
    pub fn required_dc_pin(&self) -> Result<u8, ConfigError> {
        self.dc_pin.ok_or(ConfigError::MissingPin(PinRole::DataCommand))
    }

    /// Effective frame limit
    pub fn frame_limit(&self) -> FrameLimit {
        self.max_transaction_bytes
            .map(FrameLimit::bytes)
            .unwrap_or(FrameLimit::UNBOUNDED)
    }
}
