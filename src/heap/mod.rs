//! Tagged-object heap with two interchangeable tracing collectors.
//!
//! Both collectors are stop-the-world and single-threaded: `collect` runs to
//! completion before the triggering allocation returns. Objects are referred
//! to by stable [`ObjectRef`] handles, never by address, so client code is
//! unaffected by the semispace collector moving storage around.

pub mod entry;
pub mod handle;
pub mod mark_sweep;
pub mod object;
pub mod semispace;
#[cfg(feature = "telemetry")]
pub mod telemetry;

use serde::Serialize;

pub use handle::ObjectRef;
pub use mark_sweep::MarkSweepHeap;
pub use object::{HeapObject, ObjectKind};
pub use semispace::SemispaceHeap;

use crate::error::HeapError;

/// Point-in-time heap counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeapStats {
    /// Objects currently materialized in the heap (live or not-yet-collected).
    pub live_count: usize,
    /// Maximum number of simultaneously materialized objects.
    pub capacity_slots: usize,
    /// Allocations performed over the heap's lifetime.
    pub total_allocations: usize,
    /// Completed collection cycles.
    pub total_collections: usize,
}

/// The seam between the VM shim and a collector variant.
///
/// `roots` is the caller's root set: every handle in it, and everything
/// transitively reachable from it through `Pair` children, survives a
/// collection. Anything else is reclaimed.
pub trait Heap {
    /// Allocates `object`, returning a stable handle.
    ///
    /// If the heap is exhausted, runs one full collection over `roots` and
    /// retries once. A still-exhausted heap reports
    /// [`HeapError::OutOfMemory`].
    fn alloc(&mut self, object: HeapObject, roots: &[ObjectRef]) -> Result<ObjectRef, HeapError>;

    /// Runs a full stop-the-world collection cycle. Infallible: collection
    /// only ever frees memory.
    fn collect(&mut self, roots: &[ObjectRef]);

    /// Returns the object behind a handle.
    ///
    /// Panics if the handle does not refer to a materialized object; a stale
    /// handle is a client bug, not a runtime condition.
    fn get(&self, handle: ObjectRef) -> &HeapObject;

    /// Overwrites the `first` child of a pair. Panics if `handle` is not a
    /// pair.
    fn set_pair_first(&mut self, handle: ObjectRef, child: Option<ObjectRef>);

    /// Overwrites the `second` child of a pair. Panics if `handle` is not a
    /// pair.
    fn set_pair_second(&mut self, handle: ObjectRef, child: Option<ObjectRef>);

    /// Number of currently materialized objects.
    fn live_count(&self) -> usize;

    /// Slot capacity of the allocatable region.
    fn capacity_slots(&self) -> usize;

    /// Handles of all materialized objects, in ascending index order.
    fn live_handles(&self) -> Vec<ObjectRef>;

    fn stats(&self) -> HeapStats;

    /// Integer payload, or `None` if the handle refers to a pair.
    fn int_value(&self, handle: ObjectRef) -> Option<i64> {
        match self.get(handle) {
            HeapObject::Int(v) => Some(*v),
            HeapObject::Pair { .. } => None,
        }
    }

    /// Pair children, or `None` if the handle refers to an int.
    fn pair_children(&self, handle: ObjectRef) -> Option<(Option<ObjectRef>, Option<ObjectRef>)> {
        match self.get(handle) {
            HeapObject::Int(_) => None,
            HeapObject::Pair { first, second } => Some((*first, *second)),
        }
    }
}
