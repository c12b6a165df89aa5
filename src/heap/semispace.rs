//! Semispace copying collector (Cheney's algorithm).
//!
//! Two equal-size spaces; allocation bumps into the active one. Collection
//! copies live objects into the idle space breadth-first with a scan pointer,
//! then the spaces swap roles. Client code never sees the move: handles index
//! a location table, and the flip installs a freshly built table in one step.
//! An object already present in the new table has been copied, which is the
//! forwarding check, so shared children are copied once and identity holds.

use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::heap::handle::ObjectRef;
use crate::heap::object::HeapObject;
use crate::heap::{Heap, HeapStats};
#[cfg(feature = "telemetry")]
use crate::heap::telemetry::GcTelemetry;

/// Stop-the-world copying heap.
pub struct SemispaceHeap {
    /// Active space. Holds every materialized object; its length is the bump
    /// pointer.
    from_space: Vec<HeapObject>,
    /// Idle space, used as the copy target during collection.
    to_space: Vec<HeapObject>,
    /// Slot capacity of each space (half the byte budget).
    space_slots: usize,
    /// Handle index -> offset in `from_space`.
    locations: Vec<Option<u32>>,
    /// Handle indices freed by previous collections, reused before the table
    /// grows.
    free_handles: Vec<u32>,
    total_allocations: usize,
    total_collections: usize,
    #[cfg(feature = "telemetry")]
    telemetry: GcTelemetry,
}

impl Default for SemispaceHeap {
    fn default() -> Self {
        Self::new(&HeapConfig::default())
    }
}

impl SemispaceHeap {
    /// Creates a heap splitting the byte budget in `config` into two equal
    /// semispaces.
    pub fn new(config: &HeapConfig) -> Self {
        let space_slots = (config.heap_size_bytes() / 2) / std::mem::size_of::<HeapObject>();
        Self {
            from_space: Vec::with_capacity(space_slots),
            to_space: Vec::with_capacity(space_slots),
            space_slots,
            locations: Vec::new(),
            free_handles: Vec::new(),
            total_allocations: 0,
            total_collections: 0,
            #[cfg(feature = "telemetry")]
            telemetry: GcTelemetry::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.from_space.len() >= self.space_slots
    }

    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    pub fn total_collections(&self) -> usize {
        self.total_collections
    }

    #[cfg(feature = "telemetry")]
    pub fn telemetry(&self) -> &GcTelemetry {
        &self.telemetry
    }

    /// Current offset of a handle's storage in the active space.
    ///
    /// Offsets are collector internals and change across collections; only
    /// handles are stable. Exposed for introspection and relocation tests.
    pub fn offset_of(&self, handle: ObjectRef) -> Option<usize> {
        self.locations
            .get(handle.index() as usize)
            .copied()
            .flatten()
            .map(|offset| offset as usize)
    }

    fn offset(&self, handle: ObjectRef) -> usize {
        self.offset_of(handle)
            .expect("SemispaceHeap: stale or free handle")
    }

    /// Copies the object behind `handle` into the idle space unless a
    /// previous visit already did. The presence check against `new_locations`
    /// is the forwarding mechanism.
    fn forward(&mut self, handle: ObjectRef, new_locations: &mut [Option<u32>]) {
        let idx = handle.index() as usize;
        if idx >= new_locations.len() || new_locations[idx].is_some() {
            return;
        }
        let old_offset = match self.locations[idx] {
            Some(offset) => offset as usize,
            None => return,
        };

        let object = self.from_space[old_offset].clone();
        let new_offset = self.to_space.len() as u32;
        self.to_space.push(object);
        new_locations[idx] = Some(new_offset);
    }
}

impl Heap for SemispaceHeap {
    fn alloc(&mut self, object: HeapObject, roots: &[ObjectRef]) -> Result<ObjectRef, HeapError> {
        if self.is_full() {
            self.collect(roots);
            if self.is_full() {
                // Live data fills a whole semispace: a larger heap is the
                // only way out, and this design does not grow.
                return Err(HeapError::OutOfMemory);
            }
        }

        #[cfg(feature = "telemetry")]
        self.telemetry
            .record_alloc(object.kind(), object.shallow_size_bytes());

        self.total_allocations += 1;
        let offset = self.from_space.len() as u32;
        self.from_space.push(object);

        let handle = if let Some(idx) = self.free_handles.pop() {
            self.locations[idx as usize] = Some(offset);
            ObjectRef(idx)
        } else {
            let idx = self.locations.len() as u32;
            self.locations.push(Some(offset));
            ObjectRef(idx)
        };
        Ok(handle)
    }

    fn collect(&mut self, roots: &[ObjectRef]) {
        #[cfg(feature = "telemetry")]
        let live_before = self.from_space.len();
        #[cfg(feature = "telemetry")]
        self.telemetry.begin_cycle(live_before);

        let mut new_locations: Vec<Option<u32>> = vec![None; self.locations.len()];
        self.to_space.clear();

        // Root objects first, then a Cheney scan: every object copied so far
        // has its children forwarded in turn. The scan pointer chases the
        // bump pointer until no gray objects remain.
        for &root in roots {
            self.forward(root, &mut new_locations);
        }

        let mut scan = 0;
        while scan < self.to_space.len() {
            let (first, second) = self.to_space[scan].children();
            if let Some(child) = first {
                self.forward(child, &mut new_locations);
            }
            if let Some(child) = second {
                self.forward(child, &mut new_locations);
            }
            scan += 1;
        }

        // Flip: the copy target becomes the active space and the new table
        // replaces the old one wholesale. Handles that did not make it across
        // are dead; recycle them.
        std::mem::swap(&mut self.from_space, &mut self.to_space);
        for (idx, (old, new)) in self.locations.iter().zip(new_locations.iter()).enumerate() {
            if old.is_some() && new.is_none() {
                self.free_handles.push(idx as u32);
            }
        }
        self.locations = new_locations;
        self.total_collections += 1;

        #[cfg(feature = "telemetry")]
        {
            let live_after = self.from_space.len();
            self.telemetry
                .end_cycle(live_after, live_before.saturating_sub(live_after));
        }
    }

    fn get(&self, handle: ObjectRef) -> &HeapObject {
        &self.from_space[self.offset(handle)]
    }

    fn set_pair_first(&mut self, handle: ObjectRef, child: Option<ObjectRef>) {
        let offset = self.offset(handle);
        match &mut self.from_space[offset] {
            HeapObject::Pair { first, .. } => *first = child,
            HeapObject::Int(_) => panic!("set_pair_first: handle does not refer to a Pair"),
        }
    }

    fn set_pair_second(&mut self, handle: ObjectRef, child: Option<ObjectRef>) {
        let offset = self.offset(handle);
        match &mut self.from_space[offset] {
            HeapObject::Pair { second, .. } => *second = child,
            HeapObject::Int(_) => panic!("set_pair_second: handle does not refer to a Pair"),
        }
    }

    fn live_count(&self) -> usize {
        self.from_space.len()
    }

    fn capacity_slots(&self) -> usize {
        self.space_slots
    }

    fn live_handles(&self) -> Vec<ObjectRef> {
        self.locations
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|_| ObjectRef(idx as u32)))
            .collect()
    }

    fn stats(&self) -> HeapStats {
        HeapStats {
            live_count: self.live_count(),
            capacity_slots: self.space_slots,
            total_allocations: self.total_allocations,
            total_collections: self.total_collections,
        }
    }
}
