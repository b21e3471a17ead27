//! Fixed-capacity tiler storage with generation-checked handles

use heapless::Vec;

use super::{DamageError, DamageSink, Tiler};
use crate::geometry::Rect;

/// Weak reference to a tiler in a [`TilerRegistry`]
///
/// Copying a handle never keeps the tiler alive. Once the tiler is
/// unregistered, every handle to it resolves to [`DamageError::StaleTiler`],
/// even if the slot has since been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TilerHandle {
    index: u8,
    generation: u16,
}

struct Slot {
    generation: u16,
    tiler: Option<Tiler>,
}

/// Owner of up to `N` tilers
pub struct TilerRegistry<const N: usize> {
    slots: Vec<Slot, N>,
}

impl<const N: usize> Default for TilerRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TilerRegistry<N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of live tilers
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.tiler.is_some()).count()
    }

    /// Check if no tiler is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a tiler and return its handle
    pub fn register(&mut self, tiler: Tiler) -> Result<TilerHandle, DamageError> {
        if let Some((index, slot)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, s)| s.tiler.is_none())
        {
            slot.tiler = Some(tiler);
            return Ok(TilerHandle {
                index: index as u8,
                generation: slot.generation,
            });
        }

        let index = self.slots.len();
        if index > u8::MAX as usize {
            return Err(DamageError::RegistryFull);
        }
        self.slots
            .push(Slot {
                generation: 0,
                tiler: Some(tiler),
            })
            .map_err(|_| DamageError::RegistryFull)?;
        Ok(TilerHandle {
            index: index as u8,
            generation: 0,
        })
    }

    /// Remove a tiler, invalidating every handle to it
    pub fn unregister(&mut self, handle: TilerHandle) -> Result<Tiler, DamageError> {
        let slot = self.slot_mut(handle)?;
        let tiler = slot.tiler.take().ok_or(DamageError::StaleTiler)?;
        slot.generation = slot.generation.wrapping_add(1);
        Ok(tiler)
    }

    /// Resolve a handle
    pub fn get(&self, handle: TilerHandle) -> Result<&Tiler, DamageError> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.tiler.as_ref())
            .ok_or(DamageError::StaleTiler)
    }

    /// Resolve a handle for mutation
    pub fn get_mut(&mut self, handle: TilerHandle) -> Result<&mut Tiler, DamageError> {
        self.slot_mut(handle)?
            .tiler
            .as_mut()
            .ok_or(DamageError::StaleTiler)
    }

    fn slot_mut(&mut self, handle: TilerHandle) -> Result<&mut Slot, DamageError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .ok_or(DamageError::StaleTiler)
    }
}

impl<const N: usize> DamageSink for TilerRegistry<N> {
    fn report(&mut self, handle: TilerHandle, rect: Rect) -> Result<(), DamageError> {
        self.get_mut(handle)?.report(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn screen() -> Tiler {
        Tiler::new(Rect::new(Point::ZERO, Point::new(128, 64)))
    }

    #[test]
    fn test_register_and_report() {
        let mut registry: TilerRegistry<2> = TilerRegistry::new();
        let handle = registry.register(screen()).unwrap();
        assert_eq!(registry.len(), 1);

        let r = Rect::new(Point::new(1, 1), Point::new(3, 3));
        registry.report(handle, r).unwrap();
        assert_eq!(registry.get(handle).unwrap().region(), r);
    }

    #[test]
    fn test_full() {
        let mut registry: TilerRegistry<1> = TilerRegistry::new();
        registry.register(screen()).unwrap();
        assert_eq!(registry.register(screen()), Err(DamageError::RegistryFull));
    }

    #[test]
    fn test_stale_handle_after_unregister() {
        let mut registry: TilerRegistry<1> = TilerRegistry::new();
        let old = registry.register(screen()).unwrap();
        registry.unregister(old).unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.unregister(old), Err(DamageError::StaleTiler));

        // Slot reuse does not revive the old handle
        let new = registry.register(screen()).unwrap();
        assert_ne!(old, new);
        assert_eq!(
            registry.report(old, Rect::new(Point::ZERO, Point::new(1, 1))),
            Err(DamageError::StaleTiler)
        );
        assert!(registry.get(old).is_err());
        assert!(registry.get(new).is_ok());
    }

    #[test]
    fn test_report_while_flushing_passes_through() {
        let mut registry: TilerRegistry<1> = TilerRegistry::new();
        let handle = registry.register(screen()).unwrap();
        registry.get_mut(handle).unwrap().begin_flush().unwrap();
        assert_eq!(
            registry.report(handle, Rect::new(Point::ZERO, Point::new(1, 1))),
            Err(DamageError::ReportWhileFlushing)
        );
    }
}
