//! Display side of the nanotile pipeline
//!
//! - [`ControllerEncoder`]: window/stream interface a controller driver
//!   implements on top of a [`nanotile_transport::Transport`]
//! - [`PageEncoder`]: SSD1306 / SH1106 page-addressed encoder
//! - [`TileCanvas`]: tile buffer implementing [`nanotile_core::Surface`]

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod canvas;
pub mod encoder;

#[cfg(test)]
mod mock;

pub use canvas::TileCanvas;
pub use encoder::{cmd, Controller, ControllerEncoder, PageEncoder, MAX_INIT_LEN, PAGE_HEIGHT};
