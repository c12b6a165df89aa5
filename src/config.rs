use serde::{Deserialize, Serialize};

/// Default arena capacity: 512 KiB.
pub const DEFAULT_HEAP_SIZE_BYTES: usize = 512 * 1024;

/// Smallest usable arena. Values below this are clamped upward.
pub const MIN_HEAP_SIZE_BYTES: usize = 4096;

/// Heap construction settings.
///
/// The byte budget covers the whole arena. The mark-sweep collector turns it
/// into a single slot pool; the semispace collector splits it into two equal
/// halves and only one half is allocatable at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapConfig {
    pub heap_size_bytes: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            heap_size_bytes: DEFAULT_HEAP_SIZE_BYTES,
        }
    }
}

impl HeapConfig {
    /// Creates a config with the given byte budget, clamped to
    /// `MIN_HEAP_SIZE_BYTES`.
    pub fn with_heap_size(heap_size_bytes: usize) -> Self {
        Self {
            heap_size_bytes: heap_size_bytes.max(MIN_HEAP_SIZE_BYTES),
        }
    }

    /// Parses a config from a JSON document such as
    /// `{"heap_size_bytes": 65536}`.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        let parsed: Self = serde_json::from_str(input)?;
        Ok(Self::with_heap_size(parsed.heap_size_bytes))
    }

    /// Byte budget after clamping. Construction sites should go through this
    /// rather than reading the field, so deserialized configs are clamped too.
    pub fn heap_size_bytes(&self) -> usize {
        self.heap_size_bytes.max(MIN_HEAP_SIZE_BYTES)
    }
}
