//! File-backed storage primitives.

pub mod atomic_file;
pub mod kv_store;

pub use atomic_file::{AtomicFile, FileFormat};
pub use kv_store::{FileKeyValueStore, MemoryKeyValueStore};
