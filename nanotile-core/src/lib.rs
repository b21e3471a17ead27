//! Frame-buffer-free rendering core for small displays
//!
//! This crate holds everything between the application and the bus:
//!
//! - Screen geometry (points, half-open rects)
//! - Drawable objects that report damage as they move
//! - Per-screen damage tracking with weak tiler handles
//! - The tile walker that redraws only what changed

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod geometry;
pub mod object;
pub mod render;
pub mod tiler;

pub use geometry::{Coord, Point, Rect};
pub use object::{Block, Drawable, ObjectBase, Sprite};
pub use render::{Bitmap, Color, FrameStats, RenderError, Renderer, Surface, SurfaceError};
pub use tiler::{DamageError, DamageSink, Tiler, TilerHandle, TilerRegistry, TilerState};
