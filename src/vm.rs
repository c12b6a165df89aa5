//! Root stack and client-facing allocation shim.
//!
//! The `Vm` is the mutator side of the collector pair: it owns a heap and the
//! explicit root stack that anchors reachability. Anything not on the stack,
//! and not transitively reachable from a rooted pair, is fair game for the
//! next collection cycle.

use crate::config::HeapConfig;
use crate::error::HeapError;
use crate::heap::{Heap, HeapObject, HeapStats, MarkSweepHeap, ObjectRef, SemispaceHeap};

/// Stack-machine client over a tagged-object heap.
///
/// Generic over the collector variant; `Vm::mark_sweep` and `Vm::semispace`
/// construct the two shipped configurations. Heaps are plain values, so tests
/// and embedders can run any number of independent ones.
pub struct Vm<H: Heap = MarkSweepHeap> {
    heap: H,
    roots: Vec<ObjectRef>,
}

impl Vm<MarkSweepHeap> {
    pub fn mark_sweep(config: &HeapConfig) -> Self {
        Self::new(MarkSweepHeap::new(config))
    }
}

impl Vm<SemispaceHeap> {
    pub fn semispace(config: &HeapConfig) -> Self {
        Self::new(SemispaceHeap::new(config))
    }
}

impl Default for Vm<MarkSweepHeap> {
    fn default() -> Self {
        Self::mark_sweep(&HeapConfig::default())
    }
}

impl<H: Heap> Vm<H> {
    pub fn new(heap: H) -> Self {
        Self {
            heap,
            roots: Vec::new(),
        }
    }

    // -- Root stack --

    /// Appends a reference to the top of the root stack. O(1), no allocation.
    pub fn push_root(&mut self, handle: ObjectRef) {
        self.roots.push(handle);
    }

    /// Removes and returns the top root.
    pub fn pop_root(&mut self) -> Result<ObjectRef, HeapError> {
        self.roots.pop().ok_or(HeapError::EmptyRootStack)
    }

    /// Returns the root `distance` slots below the top without removing it.
    /// `peek_root(0)` is the top of the stack.
    pub fn peek_root(&self, distance: usize) -> Result<ObjectRef, HeapError> {
        let depth = self.roots.len();
        if distance >= depth {
            return Err(HeapError::RootIndexOutOfRange { distance, depth });
        }
        Ok(self.roots[depth - 1 - distance])
    }

    pub fn root_depth(&self) -> usize {
        self.roots.len()
    }

    // -- Allocation --

    /// Allocates a boxed integer. May trigger a collection cycle over the
    /// current root stack.
    pub fn allocate_int(&mut self, value: i64) -> Result<ObjectRef, HeapError> {
        self.heap.alloc(HeapObject::Int(value), &self.roots)
    }

    /// Allocates a pair of nullable children.
    ///
    /// The children are pinned as temporary roots for the duration of the
    /// call: the allocation itself can collect, and an unrooted child must
    /// not be reclaimed (or, under the copying collector, dropped) before the
    /// pair exists to anchor it.
    pub fn allocate_pair(
        &mut self,
        first: Option<ObjectRef>,
        second: Option<ObjectRef>,
    ) -> Result<ObjectRef, HeapError> {
        let saved_depth = self.roots.len();
        if let Some(child) = first {
            self.roots.push(child);
        }
        if let Some(child) = second {
            self.roots.push(child);
        }
        let result = self.heap.alloc(HeapObject::Pair { first, second }, &self.roots);
        self.roots.truncate(saved_depth);
        result
    }

    /// Allocates an integer and roots it.
    pub fn push_int(&mut self, value: i64) -> Result<ObjectRef, HeapError> {
        let handle = self.allocate_int(value)?;
        self.push_root(handle);
        Ok(handle)
    }

    /// Pops `second` then `first` off the root stack, allocates a pair of
    /// them, and roots the pair.
    pub fn push_pair(&mut self) -> Result<ObjectRef, HeapError> {
        let second = self.pop_root()?;
        let first = match self.pop_root() {
            Ok(handle) => handle,
            Err(err) => {
                // Underflow on the second pop: leave the stack as found.
                self.push_root(second);
                return Err(err);
            }
        };
        let pair = self.allocate_pair(Some(first), Some(second))?;
        self.push_root(pair);
        Ok(pair)
    }

    /// Runs an explicit collection cycle over the current root stack.
    pub fn collect(&mut self) {
        self.heap.collect(&self.roots);
    }

    // -- Heap access --

    pub fn heap(&self) -> &H {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut H {
        &mut self.heap
    }

    pub fn int_value(&self, handle: ObjectRef) -> Option<i64> {
        self.heap.int_value(handle)
    }

    pub fn pair_children(&self, handle: ObjectRef) -> Option<(Option<ObjectRef>, Option<ObjectRef>)> {
        self.heap.pair_children(handle)
    }

    pub fn set_pair_first(&mut self, handle: ObjectRef, child: Option<ObjectRef>) {
        self.heap.set_pair_first(handle, child);
    }

    pub fn set_pair_second(&mut self, handle: ObjectRef, child: Option<ObjectRef>) {
        self.heap.set_pair_second(handle, child);
    }

    pub fn stats(&self) -> HeapStats {
        self.heap.stats()
    }

    /// Heap counters as a JSON document.
    pub fn stats_json(&self) -> String {
        serde_json::to_string_pretty(&self.heap.stats())
            .expect("HeapStats serialization cannot fail")
    }

    /// Deterministic listing of the root stack and every materialized object,
    /// in ascending handle order. Used by snapshot tests.
    pub fn dump(&self) -> String {
        let roots: Vec<String> = self.roots.iter().map(|r| r.to_string()).collect();
        let mut out = format!("roots: [{}]\n", roots.join(", "));
        out.push_str(&format!("live objects: {}\n", self.heap.live_count()));
        for handle in self.heap.live_handles() {
            out.push_str(&format!("  {}: {}\n", handle, self.heap.get(handle)));
        }
        out
    }
}
