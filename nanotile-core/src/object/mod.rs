//! Positioned drawable objects
//!
//! An object owns its bounding rect and, optionally, a weak handle to the
//! tiler of the screen it lives on. Moving an object reports both the area
//! it leaves and the area it enters, so the next frame redraws both.

mod sprite;

pub use sprite::{Block, Sprite};

use crate::geometry::{Coord, Point, Rect};
use crate::render::{Surface, SurfaceError};
use crate::tiler::{DamageError, DamageSink, TilerHandle};

/// State shared by every drawable object
#[derive(Debug, PartialEq, Eq)]
pub struct ObjectBase {
    rect: Rect,
    tiler: Option<TilerHandle>,
}

impl ObjectBase {
    /// Detached object covering `rect`
    pub const fn new(rect: Rect) -> Self {
        Self { rect, tiler: None }
    }

    /// Object covering `rect` that reports damage to `tiler`
    pub const fn attached(rect: Rect, tiler: TilerHandle) -> Self {
        Self {
            rect,
            tiler: Some(tiler),
        }
    }

    /// Bounding rect
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Tiler damage is reported to, if any
    pub const fn tiler(&self) -> Option<TilerHandle> {
        self.tiler
    }

    /// Start reporting damage to `tiler`
    pub fn attach(&mut self, tiler: TilerHandle) {
        self.tiler = Some(tiler);
    }

    /// Stop reporting damage, returning the previous handle
    pub fn detach(&mut self) -> Option<TilerHandle> {
        self.tiler.take()
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }
}

/// Object that can draw itself into a tile
pub trait Drawable {
    /// Shared object state
    fn base(&self) -> &ObjectBase;

    /// Shared object state, mutable
    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Render into `surface`, which is clipped to the current tile
    fn draw(&self, surface: &mut dyn Surface) -> Result<(), SurfaceError>;

    /// Bounding rect
    fn bounds(&self) -> Rect {
        self.base().rect()
    }

    /// Report the current bounds as damage
    ///
    /// Objects without a tiler report nothing.
    fn refresh(&self, sink: &mut dyn DamageSink) -> Result<(), DamageError> {
        match self.base().tiler() {
            Some(handle) => sink.report(handle, self.bounds()),
            None => Ok(()),
        }
    }

    /// Move the top-left corner to `position`, keeping the size
    fn move_to(&mut self, position: Point, sink: &mut dyn DamageSink) -> Result<(), DamageError> {
        self.refresh(sink)?;
        let moved = self.bounds().moved_to(position);
        self.base_mut().set_rect(moved);
        self.refresh(sink)
    }

    /// Move by `offset`
    ///
    /// Damage is reported even for a zero offset.
    fn move_by(&mut self, offset: Point, sink: &mut dyn DamageSink) -> Result<(), DamageError> {
        self.refresh(sink)?;
        let moved = self.bounds().translate(offset);
        self.base_mut().set_rect(moved);
        self.refresh(sink)
    }

    /// Report the last bounds and detach from the tiler
    ///
    /// The object is detached even when the report fails.
    fn retire(&mut self, sink: &mut dyn DamageSink) -> Result<(), DamageError> {
        let result = self.refresh(sink);
        self.base_mut().detach();
        result
    }

    /// Top-center point
    fn top(&self) -> Point {
        let r = self.bounds();
        Point::new(midpoint(r.p1().x, r.p2().x), r.p1().y)
    }

    /// Bottom-center point
    fn bottom(&self) -> Point {
        let r = self.bounds();
        Point::new(midpoint(r.p1().x, r.p2().x), r.p2().y)
    }

    /// Left-center point
    fn left(&self) -> Point {
        let r = self.bounds();
        Point::new(r.p1().x, midpoint(r.p1().y, r.p2().y))
    }

    /// Right-center point
    fn right(&self) -> Point {
        let r = self.bounds();
        Point::new(r.p2().x, midpoint(r.p1().y, r.p2().y))
    }

    /// Center point
    fn center(&self) -> Point {
        let r = self.bounds();
        Point::new(midpoint(r.p1().x, r.p2().x), midpoint(r.p1().y, r.p2().y))
    }

    /// Left edge
    fn x(&self) -> Coord {
        self.bounds().p1().x
    }

    /// Top edge
    fn y(&self) -> Coord {
        self.bounds().p1().y
    }
}

/// Floor of the midpoint; rounds toward negative infinity for odd sums
const fn midpoint(a: Coord, b: Coord) -> Coord {
    ((a as i32 + b as i32) >> 1) as Coord
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;
    use std::vec::Vec;

    use proptest::prelude::*;

    use super::*;
    use crate::tiler::{Tiler, TilerRegistry};

    struct Marker {
        base: ObjectBase,
    }

    impl Drawable for Marker {
        fn base(&self) -> &ObjectBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ObjectBase {
            &mut self.base
        }

        fn draw(&self, _surface: &mut dyn Surface) -> Result<(), SurfaceError> {
            Ok(())
        }
    }

    /// Sink that records every report
    #[derive(Default)]
    struct Recorder(Vec<Rect>);

    impl DamageSink for Recorder {
        fn report(&mut self, _handle: TilerHandle, rect: Rect) -> Result<(), DamageError> {
            self.0.push(rect);
            Ok(())
        }
    }

    fn rect(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> Rect {
        Rect::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    fn attached(r: Rect) -> (TilerRegistry<1>, TilerHandle, Marker) {
        let mut registry = TilerRegistry::new();
        let handle = registry
            .register(Tiler::new(rect(0, 0, 128, 64)))
            .unwrap();
        let marker = Marker {
            base: ObjectBase::attached(r, handle),
        };
        (registry, handle, marker)
    }

    #[test]
    fn test_anchors() {
        let m = Marker {
            base: ObjectBase::new(rect(0, 0, 10, 4)),
        };
        assert_eq!(m.top(), Point::new(5, 0));
        assert_eq!(m.bottom(), Point::new(5, 4));
        assert_eq!(m.left(), Point::new(0, 2));
        assert_eq!(m.right(), Point::new(10, 2));
        assert_eq!(m.center(), Point::new(5, 2));
        assert_eq!((m.x(), m.y()), (0, 0));
    }

    #[test]
    fn test_anchors_floor_negative() {
        let m = Marker {
            base: ObjectBase::new(rect(-5, -3, 0, 0)),
        };
        // (-5 + 0) >> 1 == -3, (-3 + 0) >> 1 == -2
        assert_eq!(m.center(), Point::new(-3, -2));
        let odd = Marker {
            base: ObjectBase::new(rect(1, 1, 4, 4)),
        };
        assert_eq!(odd.center(), Point::new(2, 2));
    }

    #[test]
    fn test_anchors_do_not_overflow() {
        let m = Marker {
            base: ObjectBase::new(rect(Coord::MAX - 2, 0, Coord::MAX, 2)),
        };
        assert_eq!(m.center().x, Coord::MAX - 1);
    }

    #[test]
    fn test_move_to_reports_old_and_new() {
        let mut sink = Recorder::default();
        let (_, _, mut m) = attached(rect(0, 0, 8, 8));

        m.move_to(Point::new(20, 10), &mut sink).unwrap();
        assert_eq!(sink.0, vec![rect(0, 0, 8, 8), rect(20, 10, 28, 18)]);
        assert_eq!(m.bounds().size(), (8, 8));
    }

    #[test]
    fn test_move_by_zero_still_reports() {
        let mut sink = Recorder::default();
        let (_, _, mut m) = attached(rect(4, 4, 6, 6));

        m.move_by(Point::ZERO, &mut sink).unwrap();
        assert_eq!(sink.0, vec![rect(4, 4, 6, 6), rect(4, 4, 6, 6)]);
    }

    #[test]
    fn test_detached_reports_nothing() {
        let mut sink = Recorder::default();
        let mut m = Marker {
            base: ObjectBase::new(rect(0, 0, 2, 2)),
        };
        m.move_by(Point::new(1, 1), &mut sink).unwrap();
        m.refresh(&mut sink).unwrap();
        assert!(sink.0.is_empty());
        assert_eq!(m.bounds(), rect(1, 1, 3, 3));
    }

    #[test]
    fn test_move_reaches_tiler() {
        let (mut registry, handle, mut m) = attached(rect(0, 0, 4, 4));
        m.move_by(Point::new(10, 0), &mut registry).unwrap();
        assert_eq!(
            registry.get_mut(handle).unwrap().consume(),
            rect(0, 0, 14, 4)
        );
    }

    #[test]
    fn test_stale_tiler() {
        let (mut registry, handle, mut m) = attached(rect(0, 0, 4, 4));
        registry.unregister(handle).unwrap();
        assert_eq!(
            m.move_by(Point::new(1, 0), &mut registry),
            Err(DamageError::StaleTiler)
        );
    }

    #[test]
    fn test_retire_reports_and_detaches() {
        let (mut registry, handle, mut m) = attached(rect(2, 2, 4, 4));
        m.retire(&mut registry).unwrap();
        assert_eq!(m.base().tiler(), None);
        assert_eq!(registry.get_mut(handle).unwrap().consume(), rect(2, 2, 4, 4));

        // Nothing more reaches the tiler
        m.move_by(Point::new(5, 5), &mut registry).unwrap();
        assert_eq!(registry.get(handle).unwrap().region(), Rect::EMPTY);
    }

    proptest! {
        #[test]
        fn prop_frame_region_covers_every_move(
            start in (0i16..100, 0i16..50),
            moves in proptest::collection::vec((-20i16..20, -20i16..20), 1..12),
        ) {
            let (mut registry, handle, mut m) =
                attached(Rect::with_size(Point::new(start.0, start.1), 6, 3));
            let mut expected = Rect::EMPTY;
            for (dx, dy) in moves {
                expected = expected.union(&m.bounds());
                m.move_by(Point::new(dx, dy), &mut registry).unwrap();
                expected = expected.union(&m.bounds());
            }
            prop_assert_eq!(registry.get_mut(handle).unwrap().consume(), expected);
            prop_assert_eq!(registry.get_mut(handle).unwrap().consume(), Rect::EMPTY);
        }
    }
}
