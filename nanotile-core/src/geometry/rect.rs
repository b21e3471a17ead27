//! Axis-aligned rectangles
//!
//! A rect covers the pixels from `p1` up to but not including `p2`, so a
//! rect with zero width or height covers nothing. Damage regions are built
//! by union, and a union with an empty rect leaves the other side as it was.

use super::point::{Coord, Point};

/// Axis-aligned rectangle with `p1` top-left and `p2` bottom-right
///
/// Constructors normalize swapped corners, so `p1.x <= p2.x` and
/// `p1.y <= p2.y` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    p1: Point,
    p2: Point,
}

impl Default for Rect {
    fn default() -> Self {
        Rect::EMPTY
    }
}

impl Rect {
    /// Canonical empty rect
    pub const EMPTY: Rect = Rect {
        p1: Point::ZERO,
        p2: Point::ZERO,
    };

    /// Rect spanning two corners, in any order
    pub const fn new(a: Point, b: Point) -> Self {
        Rect {
            p1: Point::new(min(a.x, b.x), min(a.y, b.y)),
            p2: Point::new(max(a.x, b.x), max(a.y, b.y)),
        }
    }

    /// Rect at `origin` with the given size, clamped to the coordinate range
    pub const fn with_size(origin: Point, width: u16, height: u16) -> Self {
        Rect {
            p1: origin,
            p2: Point::new(
                saturate(origin.x as i32 + width as i32),
                saturate(origin.y as i32 + height as i32),
            ),
        }
    }

    /// Top-left corner
    pub const fn p1(&self) -> Point {
        self.p1
    }

    /// Bottom-right corner (exclusive)
    pub const fn p2(&self) -> Point {
        self.p2
    }

    /// Horizontal extent in pixels
    pub const fn width(&self) -> u16 {
        (self.p2.x as i32 - self.p1.x as i32) as u16
    }

    /// Vertical extent in pixels
    pub const fn height(&self) -> u16 {
        (self.p2.y as i32 - self.p1.y as i32) as u16
    }

    /// `(width, height)`
    pub const fn size(&self) -> (u16, u16) {
        (self.width(), self.height())
    }

    /// Check if the rect covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.p1.x == self.p2.x || self.p1.y == self.p2.y
    }

    /// Moved by `offset`, clamped at the edges of the coordinate range
    pub const fn translate(&self, offset: Point) -> Rect {
        Rect {
            p1: Point::new(
                saturate(self.p1.x as i32 + offset.x as i32),
                saturate(self.p1.y as i32 + offset.y as i32),
            ),
            p2: Point::new(
                saturate(self.p2.x as i32 + offset.x as i32),
                saturate(self.p2.y as i32 + offset.y as i32),
            ),
        }
    }

    /// Same size, with the top-left corner at `origin`
    pub const fn moved_to(&self, origin: Point) -> Rect {
        Rect::with_size(origin, self.width(), self.height())
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Rect {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => Rect::EMPTY,
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => Rect {
                p1: Point::new(self.p1.x.min(other.p1.x), self.p1.y.min(other.p1.y)),
                p2: Point::new(self.p2.x.max(other.p2.x), self.p2.y.max(other.p2.y)),
            },
        }
    }

    /// Pixels covered by both, or `Rect::EMPTY`
    pub fn intersection(&self, other: &Rect) -> Rect {
        let p1 = Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y));
        let p2 = Point::new(self.p2.x.min(other.p2.x), self.p2.y.min(other.p2.y));
        if p1.x >= p2.x || p1.y >= p2.y {
            Rect::EMPTY
        } else {
            Rect { p1, p2 }
        }
    }

    /// Check if the two rects share at least one pixel
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Check if `point` is one of the covered pixels
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.p1.x && point.x < self.p2.x && point.y >= self.p1.y && point.y < self.p2.y
    }

    /// Check if every pixel of `other` is covered
    pub fn encloses(&self, other: &Rect) -> bool {
        other.is_empty()
            || (other.p1.x >= self.p1.x
                && other.p1.y >= self.p1.y
                && other.p2.x <= self.p2.x
                && other.p2.y <= self.p2.y)
    }
}

const fn min(a: Coord, b: Coord) -> Coord {
    if a < b {
        a
    } else {
        b
    }
}

const fn max(a: Coord, b: Coord) -> Coord {
    if a > b {
        a
    } else {
        b
    }
}

const fn saturate(v: i32) -> Coord {
    if v > Coord::MAX as i32 {
        Coord::MAX
    } else if v < Coord::MIN as i32 {
        Coord::MIN
    } else {
        v as Coord
    }
}
