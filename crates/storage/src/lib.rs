//! Fanout Storage
//!
//! Response cache for aggregated results. The in-memory backend is the only
//! one shipped; the `ResponseCache` trait is the seam for others.

pub mod memory_store;
pub mod traits;

pub use memory_store::MemoryCache;
pub use traits::{CacheEntry, ResponseCache};
