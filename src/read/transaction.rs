//! Read transaction
//!
//! The scope of one logical read operation. Created by the caller before
//! the first read, passed by reference through the whole recursive descent
//! and discarded afterwards; never persisted or shared across operations.

use crate::cache::ModificationCache;

/// Per-operation read scope carrying the dump cache.
///
/// Kept as an explicit parameter rather than ambient state so a transaction
/// stays single-threaded and testable, with no cross-transaction leakage.
#[derive(Debug, Default)]
pub struct ReadTransaction {
    cache: ModificationCache,
}

impl ReadTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// The transaction's dump cache, handed to dump cache managers.
    pub fn modification_cache(&mut self) -> &mut ModificationCache {
        &mut self.cache
    }

    /// Read-only view, for inspecting cache statistics.
    pub fn cache(&self) -> &ModificationCache {
        &self.cache
    }
}
