//! Result cache implementations.
//!
//! Implements the `Cache` trait from `concierge_core::cache`. Tool results are
//! cached in process with LRU eviction, so a restart starts cold.

mod memory;

pub use memory::MemoryCache;
