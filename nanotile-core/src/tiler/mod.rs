//! Damage tracking
//!
//! Moving objects report the screen area they used to cover and the area
//! they cover now. The tiler folds those reports into one bounding region,
//! which the renderer takes once per frame.

mod registry;
mod tracker;

pub use registry::{TilerHandle, TilerRegistry};
pub use tracker::{Tiler, TilerState};

use crate::geometry::Rect;

/// Damage bookkeeping errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DamageError {
    /// Damage reported while the region was being flushed
    ReportWhileFlushing,
    /// A flush was started while another one was still open
    FlushInProgress,
    /// Handle refers to a tiler that has been unregistered
    StaleTiler,
    /// No free slot left in the registry
    RegistryFull,
}

/// Destination for damage reports from drawable objects
///
/// The handle is resolved when the report is made, so an object can outlive
/// the tiler it was attached to without dangling.
pub trait DamageSink {
    /// Add `rect` to the damage region of the tiler behind `handle`
    fn report(&mut self, handle: TilerHandle, rect: Rect) -> Result<(), DamageError>;
}
