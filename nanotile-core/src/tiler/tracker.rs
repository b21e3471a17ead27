//! Per-screen damage region state machine

use super::DamageError;
use crate::geometry::Rect;

/// Tiler states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TilerState {
    /// Collecting damage reports
    #[default]
    Accumulating,
    /// The region has been handed to a renderer
    Flushing,
}

/// Damage region of one screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tiler {
    screen: Rect,
    region: Rect,
    state: TilerState,
}

impl Tiler {
    /// Create a tiler for a screen of the given bounds
    ///
    /// Starts with nothing to redraw; call [`Tiler::invalidate_all`] to
    /// force a full first frame.
    pub const fn new(screen: Rect) -> Self {
        Self {
            screen,
            region: Rect::EMPTY,
            state: TilerState::Accumulating,
        }
    }

    /// Screen bounds
    pub const fn screen(&self) -> Rect {
        self.screen
    }

    /// Current damage region without taking it
    pub const fn region(&self) -> Rect {
        self.region
    }

    /// Current state
    pub const fn state(&self) -> TilerState {
        self.state
    }

    /// Check if anything needs redrawing
    pub const fn is_dirty(&self) -> bool {
        !self.region.is_empty()
    }

    /// Add `rect` to the damage region
    pub fn report(&mut self, rect: Rect) -> Result<(), DamageError> {
        if self.state == TilerState::Flushing {
            return Err(DamageError::ReportWhileFlushing);
        }
        self.region = self.region.union(&rect);
        Ok(())
    }

    /// Mark the whole screen dirty
    pub fn invalidate_all(&mut self) -> Result<(), DamageError> {
        self.report(self.screen)
    }

    /// Take the damage region, leaving it empty
    ///
    /// Fails with [`DamageError::FlushInProgress`] while a two-phase flush
    /// is open, since that flush already owns the region.
    pub fn try_consume(&mut self) -> Result<Rect, DamageError> {
        let region = self.begin_flush()?;
        self.finish_flush();
        Ok(region)
    }

    /// [`Tiler::try_consume`] for callers that never open a two-phase flush
    ///
    /// Returns `Rect::EMPTY` during an open flush and logs the refusal.
    pub fn consume(&mut self) -> Rect {
        match self.try_consume() {
            Ok(region) => region,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Tiler consume refused: {}", _e);
                Rect::EMPTY
            }
        }
    }

    /// Start a flush and take the damage region
    ///
    /// Reports are refused until [`Tiler::finish_flush`] is called.
    pub fn begin_flush(&mut self) -> Result<Rect, DamageError> {
        if self.state == TilerState::Flushing {
            return Err(DamageError::FlushInProgress);
        }
        self.state = TilerState::Flushing;
        let region = core::mem::replace(&mut self.region, Rect::EMPTY);

        #[cfg(feature = "defmt")]
        defmt::trace!("Tiler flush: {}", region);

        Ok(region)
    }

    /// End the flush and accept reports again
    pub fn finish_flush(&mut self) {
        self.state = TilerState::Accumulating;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geometry::Point;

    fn rect(x1: i16, y1: i16, x2: i16, y2: i16) -> Rect {
        Rect::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    fn screen() -> Tiler {
        Tiler::new(rect(0, 0, 128, 64))
    }

    #[test]
    fn test_starts_clean() {
        let tiler = screen();
        assert_eq!(tiler.state(), TilerState::Accumulating);
        assert_eq!(tiler.region(), Rect::EMPTY);
        assert!(!tiler.is_dirty());
    }

    #[test]
    fn test_report_unions() {
        let mut tiler = screen();
        tiler.report(rect(0, 0, 4, 4)).unwrap();
        tiler.report(rect(10, 10, 12, 12)).unwrap();
        assert_eq!(tiler.region(), rect(0, 0, 12, 12));
    }

    #[test]
    fn test_zero_area_report_is_noop() {
        let mut tiler = screen();
        tiler.report(rect(50, 50, 50, 60)).unwrap();
        assert!(!tiler.is_dirty());

        tiler.report(rect(1, 1, 2, 2)).unwrap();
        tiler.report(rect(90, 90, 90, 90)).unwrap();
        assert_eq!(tiler.region(), rect(1, 1, 2, 2));
    }

    #[test]
    fn test_consume_twice() {
        let mut tiler = screen();
        tiler.report(rect(3, 3, 8, 8)).unwrap();
        assert_eq!(tiler.consume(), rect(3, 3, 8, 8));
        assert_eq!(tiler.try_consume(), Ok(Rect::EMPTY));
        assert_eq!(tiler.state(), TilerState::Accumulating);
    }

    #[test]
    fn test_two_phase_flush() {
        let mut tiler = screen();
        tiler.invalidate_all().unwrap();

        assert_eq!(tiler.begin_flush(), Ok(rect(0, 0, 128, 64)));
        assert_eq!(tiler.state(), TilerState::Flushing);
        assert_eq!(
            tiler.report(rect(0, 0, 1, 1)),
            Err(DamageError::ReportWhileFlushing)
        );
        assert_eq!(tiler.begin_flush(), Err(DamageError::FlushInProgress));
        // The open flush keeps ownership of the region
        assert_eq!(tiler.try_consume(), Err(DamageError::FlushInProgress));
        assert_eq!(tiler.consume(), Rect::EMPTY);
        assert_eq!(tiler.state(), TilerState::Flushing);

        tiler.finish_flush();
        tiler.report(rect(0, 0, 1, 1)).unwrap();
        assert_eq!(tiler.consume(), rect(0, 0, 1, 1));
    }

    prop_compose! {
        fn any_rect()(x in -50i16..150, y in -50i16..100, w in 0u16..40, h in 0u16..40) -> Rect {
            Rect::with_size(Point::new(x, y), w, h)
        }
    }

    proptest! {
        #[test]
        fn prop_region_is_union_of_reports(reports in proptest::collection::vec(any_rect(), 0..16)) {
            let mut tiler = screen();
            for r in &reports {
                tiler.report(*r).unwrap();
            }
            let expected = reports.iter().fold(Rect::EMPTY, |acc, r| acc.union(r));
            prop_assert_eq!(tiler.consume(), expected);
            for r in reports.iter().filter(|r| !r.is_empty()) {
                prop_assert!(expected.encloses(r));
            }
            prop_assert_eq!(tiler.consume(), Rect::EMPTY);
        }
    }
}
