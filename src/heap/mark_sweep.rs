//! Free-list mark-sweep collector.
//!
//! Objects sit in a slot vector behind stable indices. Collection marks
//! everything reachable from the roots through an explicit worklist, then
//! sweeps the slots linearly: marked entries stay put with the bit cleared,
//! unmarked entries are freed and their slot goes back on the free list.
//! Nothing ever moves, so handles double as slot indices forever.

use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::heap::entry::HeapEntry;
use crate::heap::handle::ObjectRef;
use crate::heap::object::HeapObject;
use crate::heap::{Heap, HeapStats};
#[cfg(feature = "telemetry")]
use crate::heap::telemetry::GcTelemetry;

/// Stop-the-world mark-and-sweep heap.
pub struct MarkSweepHeap {
    entries: Vec<Option<HeapEntry>>,
    free_list: Vec<u32>,
    capacity_slots: usize,
    total_allocations: usize,
    total_collections: usize,
    #[cfg(feature = "telemetry")]
    telemetry: GcTelemetry,
}

impl Default for MarkSweepHeap {
    fn default() -> Self {
        Self::new(&HeapConfig::default())
    }
}

impl MarkSweepHeap {
    /// Creates a heap whose slot capacity is derived from the byte budget in
    /// `config`.
    pub fn new(config: &HeapConfig) -> Self {
        let capacity_slots = config.heap_size_bytes() / std::mem::size_of::<HeapEntry>();
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            capacity_slots,
            total_allocations: 0,
            total_collections: 0,
            #[cfg(feature = "telemetry")]
            telemetry: GcTelemetry::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.free_list.is_empty() && self.entries.len() >= self.capacity_slots
    }

    /// Number of reclaimed slots waiting for reuse.
    pub fn free_list_len(&self) -> usize {
        self.free_list.len()
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

    /// Mark phase: trace from the roots through an explicit worklist.
    ///
    /// Marking happens before a node's children are enqueued, so cyclic and
    /// self-referential pairs are visited exactly once.
    fn mark_from(&mut self, roots: &[ObjectRef]) {
        let mut worklist: Vec<ObjectRef> = roots.to_vec();

        while let Some(handle) = worklist.pop() {
            let idx = handle.index() as usize;
            if idx >= self.entries.len() {
                continue;
            }
            let entry = match self.entries[idx].as_mut() {
                Some(entry) => entry,
                None => continue,
            };
            if entry.marked {
                continue;
            }
            entry.marked = true;

            let (first, second) = entry.object.children();
            if let Some(child) = first {
                worklist.push(child);
            }
            if let Some(child) = second {
                worklist.push(child);
            }
        }
    }

    /// Sweep phase: linear walk over every slot. Marked entries are kept and
    /// their bit cleared for the next cycle; unmarked entries are reclaimed.
    fn sweep(&mut self) {
        let mut i = 0;
        let len = self.entries.len();
        while i < len {
            if let Some(entry) = &mut self.entries[i] {
                if entry.marked {
                    entry.marked = false;
                } else {
                    self.entries[i] = None;
                    self.free_list.push(i as u32);
                }
            }
            i += 1;
        }
    }

    fn entry(&self, handle: ObjectRef) -> &HeapEntry {
        self.entries[handle.index() as usize]
            .as_ref()
            .expect("MarkSweepHeap: stale or free handle")
    }

    fn entry_mut(&mut self, handle: ObjectRef) -> &mut HeapEntry {
        self.entries[handle.index() as usize]
            .as_mut()
            .expect("MarkSweepHeap: stale or free handle")
    }
}

impl Heap for MarkSweepHeap {
    fn alloc(&mut self, object: HeapObject, roots: &[ObjectRef]) -> Result<ObjectRef, HeapError> {
        if self.is_full() {
            self.collect(roots);
            if self.is_full() {
                return Err(HeapError::OutOfMemory);
            }
        }

        #[cfg(feature = "telemetry")]
        self.telemetry
            .record_alloc(object.kind(), object.shallow_size_bytes());

        self.total_allocations += 1;
        let entry = HeapEntry {
            object,
            marked: false,
        };

        if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(entry);
            Ok(ObjectRef(idx))
        } else {
            let idx = self.entries.len() as u32;
            self.entries.push(Some(entry));
            Ok(ObjectRef(idx))
        }
    }

    fn collect(&mut self, roots: &[ObjectRef]) {
        #[cfg(feature = "telemetry")]
        let live_before = self.live_count();
        #[cfg(feature = "telemetry")]
        self.telemetry.begin_cycle(live_before);

        self.mark_from(roots);
        self.sweep();
        self.total_collections += 1;

        #[cfg(feature = "telemetry")]
        {
            let live_after = self.live_count();
            self.telemetry
                .end_cycle(live_after, live_before.saturating_sub(live_after));
        }
    }

    fn get(&self, handle: ObjectRef) -> &HeapObject {
        &self.entry(handle).object
    }

    fn set_pair_first(&mut self, handle: ObjectRef, child: Option<ObjectRef>) {
        match &mut self.entry_mut(handle).object {
            HeapObject::Pair { first, .. } => *first = child,
            HeapObject::Int(_) => panic!("set_pair_first: handle does not refer to a Pair"),
        }
    }

    fn set_pair_second(&mut self, handle: ObjectRef, child: Option<ObjectRef>) {
        match &mut self.entry_mut(handle).object {
            HeapObject::Pair { second, .. } => *second = child,
            HeapObject::Int(_) => panic!("set_pair_second: handle does not refer to a Pair"),
        }
    }

    fn live_count(&self) -> usize {
        self.entries.iter().filter(|slot| slot.is_some()).count()
    }

    fn capacity_slots(&self) -> usize {
        self.capacity_slots
    }

    fn live_handles(&self) -> Vec<ObjectRef> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|_| ObjectRef(idx as u32)))
            .collect()
    }

    fn stats(&self) -> HeapStats {
        HeapStats {
            live_count: self.live_count(),
            capacity_slots: self.capacity_slots,
            total_allocations: self.total_allocations,
            total_collections: self.total_collections,
        }
    }
}
