use std::fmt;

/// Handle into a GC heap.
///
/// An `ObjectRef` is a lightweight, copyable index that refers to a
/// heap-allocated object. It stays valid across collection cycles: the
/// mark-sweep collector never relocates objects, and the semispace collector
/// updates its location table instead of invalidating handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub(crate) u32);

impl ObjectRef {
    /// Returns the raw slot index backing this handle.
    pub fn index(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub fn new_for_test(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
