//! nanotile Hardware Abstraction Layer
//!
//! This crate defines the hardware-facing pieces that display transports
//! need beyond the `embedded-hal` traits: bus configuration types, a trait
//! for 8080-style parallel buses, and a board resource provider that turns
//! the scalar identifiers found in a configuration file (bus index, pin
//! numbers) into owned peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  nanotile-transport (byte sessions)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nanotile-hal (this crate) + embedded-hal│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL implementing `Board`          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`parallel::ParallelBus`] - 8-bit parallel write strobe
//! - [`board::Board`] - Resolve bus indices and pin numbers

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod i2c;
pub mod parallel;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use board::{Board, ResourceError, Unavailable};
pub use i2c::{I2cConfig, I2cPins};
pub use parallel::{ParallelBus, ParallelError, ParallelErrorKind};
pub use spi::{Mode, Phase, Polarity, SpiConfig};
