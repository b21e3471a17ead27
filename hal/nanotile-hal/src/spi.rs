//! SPI bus configuration
//!
//! Provides the settings a board applies when it hands out an
//! `embedded_hal::spi::SpiBus` for a display.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            // SSD1331 needs a clock cycle > 150ns, so ~6.7 MHz is the ceiling
            // for the slowest controllers; most tolerate 8 MHz.
            frequency: 8_000_000,
            mode: Mode::Mode0,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    #[default]
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

impl From<Mode> for embedded_hal::spi::Mode {
    fn from(mode: Mode) -> Self {
        use embedded_hal::spi;

        let (polarity, phase) = mode.into();
        spi::Mode {
            polarity: match polarity {
                Polarity::IdleLow => spi::Polarity::IdleLow,
                Polarity::IdleHigh => spi::Polarity::IdleHigh,
            },
            phase: match phase {
                Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
                Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
            },
        }
    }
}
