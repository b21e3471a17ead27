//! Display-space points

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Display coordinate
pub type Coord = i16;

/// Signed pixel position (x grows right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    /// Column
    pub x: Coord,
    /// Row
    pub y: Coord,
}

impl Point {
    /// Origin (0, 0)
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a point
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Point moved by `offset`
    pub const fn translate(self, offset: Point) -> Self {
        Self {
            x: self.x.wrapping_add(offset.x),
            y: self.y.wrapping_add(offset.y),
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.translate(rhs)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.translate(-rhs)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        *self = *self - rhs;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(self.x.wrapping_neg(), self.y.wrapping_neg())
    }
}

impl From<(Coord, Coord)> for Point {
    fn from((x, y): (Coord, Coord)) -> Self {
        Point::new(x, y)
    }
}
