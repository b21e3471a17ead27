//! I2C bus configuration
//!
//! Display controllers on I2C are written through `embedded_hal::i2c::I2c`.
//! This module only carries what a board needs to bring the bus up.

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 400_000, // Fast mode, what SSD1306 modules are rated for
        }
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
    };
}

/// Explicit SDA/SCL routing
///
/// Chips with a pin matrix (ESP32, RP2040) can put the bus on arbitrary
/// pins. Boards with fixed routing ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cPins {
    /// Data pin number
    pub sda: u8,
    /// Clock pin number
    pub scl: u8,
}

impl I2cPins {
    /// Pair up pins only when both are assigned
    pub fn from_optional(sda: Option<u8>, scl: Option<u8>) -> Option<Self> {
        match (sda, scl) {
            (Some(sda), Some(scl)) => Some(Self { sda, scl }),
            _ => None,
        }
    }
}
