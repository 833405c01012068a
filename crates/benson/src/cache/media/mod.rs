//! Key-value media a [`TtlCache`](super::TtlCache) persists into.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
