//! Generation-checked facet arena.

use crate::shared::{DetectedFacet, FacetInstance, FacetTypeId};
use parking_lot::RwLock;

/// Stable, weak handle to a facet instance.
///
/// Survives arena slot reuse: a handle whose generation no longer matches
/// its slot resolves to `None` instead of dangling.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct FacetHandle {
    index: u32,
    generation: u32,
}

impl FacetHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

struct Slot {
    generation: u32,
    facet: Option<FacetInstance>,
}

/// Arena of live facet instances.
///
/// Internally locked so it can be shared across the manager, the index
/// and listener callbacks within one project.
pub struct FacetArena {
    slots: RwLock<Vec<Slot>>,
    free: RwLock<Vec<u32>>,
}

impl FacetArena {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
            free: RwLock::new(Vec::new()),
        }
    }

    /// Insert a facet and return its handle.
    pub fn insert(&self, facet: FacetInstance) -> FacetHandle {
        let mut slots = self.slots.write();
        if let Some(index) = self.free.write().pop() {
            let slot = &mut slots[index as usize];
            slot.facet = Some(facet);
            return FacetHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = slots.len() as u32;
        slots.push(Slot {
            generation: 0,
            facet: Some(facet),
        });
        FacetHandle {
            index,
            generation: 0,
        }
    }

    /// Resolve a handle, returning a snapshot of the instance.
    ///
    /// `None` for removed facets and stale generations.
    pub fn get(&self, handle: FacetHandle) -> Option<FacetInstance> {
        let slots = self.slots.read();
        let slot = slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.facet.clone()
    }

    /// Remove a facet, invalidating every copy of its handle.
    pub fn remove(&self, handle: FacetHandle) -> Option<FacetInstance> {
        let mut slots = self.slots.write();
        let slot = slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation || slot.facet.is_none() {
            return None;
        }
        let facet = slot.facet.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.write().push(handle.index);
        facet
    }

    /// Find the live facet a detector result refers to, if any.
    ///
    /// Identity is (type, module, name): the same detector running on an
    /// unchanged file must resolve to the same handle, not a duplicate.
    pub fn find(&self, detected: &DetectedFacet) -> Option<FacetHandle> {
        let slots = self.slots.read();
        slots.iter().enumerate().find_map(|(index, slot)| {
            let facet = slot.facet.as_ref()?;
            facet.matches(detected).then_some(FacetHandle {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    /// All handles of live facets of the given type.
    pub fn handles_of_type(&self, facet_type: &FacetTypeId) -> Vec<FacetHandle> {
        let slots = self.slots.read();
        slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let facet = slot.facet.as_ref()?;
                (&facet.facet_type == facet_type).then_some(FacetHandle {
                    index: index as u32,
                    generation: slot.generation,
                })
            })
            .collect()
    }

    /// All live handles.
    pub fn live_handles(&self) -> Vec<FacetHandle> {
        let slots = self.slots.read();
        slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.facet.as_ref().map(|_| FacetHandle {
                    index: index as u32,
                    generation: slot.generation,
                })
            })
            .collect()
    }

    /// Number of live facets.
    pub fn len(&self) -> usize {
        self.slots.read().iter().filter(|s| s.facet.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FacetArena {
    fn default() -> Self {
        Self::new()
    }
}
