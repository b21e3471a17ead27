//! Screen geometry

mod point;
mod rect;

pub use point::{Coord, Point};
pub use rect::Rect;
