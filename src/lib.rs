pub mod config;
pub mod error;
pub mod heap;
pub mod vm;

pub use config::HeapConfig;
pub use error::HeapError;
pub use heap::{Heap, HeapObject, HeapStats, MarkSweepHeap, ObjectKind, ObjectRef, SemispaceHeap};
pub use vm::Vm;
