use std::fmt;

/// Errors surfaced by heap and root-stack operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    /// An allocation could not be satisfied even after a full collection
    /// cycle. The heap does not grow; this is fatal for the allocation.
    OutOfMemory,
    /// `pop_root` was called on an empty root stack.
    EmptyRootStack,
    /// `peek_root` was asked for a slot below the bottom of the root stack.
    RootIndexOutOfRange { distance: usize, depth: usize },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::OutOfMemory => {
                write!(f, "out of memory: allocation failed after collection")
            }
            HeapError::EmptyRootStack => write!(f, "pop_root on an empty root stack"),
            HeapError::RootIndexOutOfRange { distance, depth } => write!(
                f,
                "peek_root distance {} exceeds root stack depth {}",
                distance, depth
            ),
        }
    }
}

impl std::error::Error for HeapError {}
