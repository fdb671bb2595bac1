//! Per-transaction dump caching
//!
//! Bulk fetches against the backing system are expensive and must be
//! snapshot-consistent across the many node handlers that consult
//! overlapping ranges of the same dump within one logical read. The
//! [`DumpCacheManager`] memoizes each (manager identity, params) pair in
//! the transaction's [`ModificationCache`]; entries are write-once and die
//! with the transaction.

mod dump;
mod errors;
mod modification;

pub use dump::{CacheKeyPolicy, DumpCacheManager, DumpCacheManagerBuilder, DumpExecutor};
pub use errors::{CacheError, CacheResult, FetchError};
pub use modification::{CacheStats, ModificationCache};
