use std::fmt;

use crate::heap::handle::ObjectRef;

/// Objects that live on the GC-managed heap.
///
/// The tag is the enum discriminant; there is no separate header byte. The
/// mark bit is deliberately not part of the object; it belongs to the
/// collector (see `HeapEntry`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapObject {
    /// Boxed integer. A leaf: no outgoing references.
    Int(i64),
    /// Pair of nullable child references. Children may point anywhere in the
    /// heap, including back at the pair itself.
    Pair {
        first: Option<ObjectRef>,
        second: Option<ObjectRef>,
    },
}

impl HeapObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            HeapObject::Int(_) => ObjectKind::Int,
            HeapObject::Pair { .. } => ObjectKind::Pair,
        }
    }

    /// Child references to trace, in push order. Leaves yield `(None, None)`.
    pub fn children(&self) -> (Option<ObjectRef>, Option<ObjectRef>) {
        match self {
            HeapObject::Int(_) => (None, None),
            HeapObject::Pair { first, second } => (*first, *second),
        }
    }

    /// Shallow byte size of this object as stored in a heap slot.
    pub fn shallow_size_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
    }
}

impl fmt::Display for HeapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn child(c: &Option<ObjectRef>) -> String {
            match c {
                Some(r) => r.to_string(),
                None => "-".to_string(),
            }
        }
        match self {
            HeapObject::Int(v) => write!(f, "Int({})", v),
            HeapObject::Pair { first, second } => {
                write!(f, "Pair({}, {})", child(first), child(second))
            }
        }
    }
}

/// Classification of heap object variants, used by stats and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Int = 0,
    Pair = 1,
}

impl ObjectKind {
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Int => "Int",
            ObjectKind::Pair => "Pair",
        }
    }

    /// All variants for iteration.
    pub const ALL: [ObjectKind; 2] = [ObjectKind::Int, ObjectKind::Pair];
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
