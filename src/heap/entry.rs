use crate::heap::object::HeapObject;

/// A heap slot: the stored object plus the collector-owned mark bit.
pub struct HeapEntry {
    pub(crate) object: HeapObject,
    pub(crate) marked: bool,
}
