//! Display bus transport
//!
//! One transactional byte-stream contract over every bus a small display
//! controller can hang off:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  controller encoder / tile canvas            │
//! └──────────────────────────────────────────────┘
//!                       │  Transport
//!        ┌──────────────┼──────────────┐
//!        ▼              ▼              ▼
//! ┌────────────┐ ┌────────────┐ ┌──────────────┐
//! │ I2C        │ │ SPI        │ │ Parallel     │
//! │ addressed, │ │ CS + D/C   │ │ CS + D/C     │
//! │ staged     │ │ lines      │ │ lines        │
//! └────────────┘ └────────────┘ └──────────────┘
//! ```
//!
//! Every transport enforces the begin/send/end bracket and splits
//! transactions that outgrow the target's bus driver, repeating the
//! command/data discriminator so the controller never notices.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod error;
pub mod framing;
pub mod i2c;
pub mod signaled;
pub mod transport;

#[cfg(test)]
mod mock;

pub use bus::BusTransport;
pub use config::{
    I2cTransportConfig, ParallelTransportConfig, SignaledConfig, SpiTransportConfig,
    TransportConfig,
};
pub use error::{BusErrorKind, BusOp, ConfigError, Misuse, PinRole, TransportError};
pub use framing::{DataMode, FrameLimit, Session, TargetProfile};
pub use i2c::I2cTransport;
pub use signaled::{ParallelTransport, SignaledTransport, SpiTransport};
pub use transport::{BusKind, Transport, TransportExt};
