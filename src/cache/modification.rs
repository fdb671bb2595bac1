//! Transaction-scoped modification cache
//!
//! Holds dump results for the lifetime of one read transaction. Entries
//! are write-once and read-many; invalidation is the end of the
//! transaction. Statistics are passive and never influence caching.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use super::errors::CacheError;

/// A cached dump result plus the concrete type it was stored as.
///
/// `value` is `None` when the executor reported explicit absence; absence
/// is a result, distinct from "not yet fetched".
#[derive(Debug, Clone)]
pub(crate) struct CachedDump {
    value: Option<Arc<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl CachedDump {
    pub(crate) fn new<T: Any + Send + Sync>(value: Option<T>) -> Self {
        Self {
            value: value.map(|v| Arc::new(v) as Arc<dyn Any + Send + Sync>),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Recover the typed value; a mismatch means two executors share the
    /// same cache key.
    pub(crate) fn downcast<T: Any + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<Arc<T>>, CacheError> {
        if self.type_name != std::any::type_name::<T>() {
            return Err(CacheError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
                actual: self.type_name,
            });
        }
        match &self.value {
            None => Ok(None),
            Some(any) => Arc::clone(any)
                .downcast::<T>()
                .map(Some)
                .map_err(|_| CacheError::TypeMismatch {
                    key: key.to_string(),
                    expected: std::any::type_name::<T>(),
                    actual: self.type_name,
                }),
        }
    }
}

/// Passive cache statistics.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
}

/// Per-transaction key -> dump map.
///
/// Created with the transaction, threaded by reference through the whole
/// recursive descent, discarded afterwards. First writer wins; there is no
/// update or delete.
#[derive(Debug, Default)]
pub struct ModificationCache {
    entries: HashMap<String, CachedDump>,
    stats: CacheStats,
}

impl ModificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get(&mut self, key: &str) -> Option<&CachedDump> {
        if let Some(entry) = self.entries.get(key) {
            self.stats.hits += 1;
            Some(entry)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Store a dump under the key. Entries are immutable; a repeated insert
    /// for the same key keeps the original.
    pub(crate) fn insert(&mut self, key: String, dump: CachedDump) {
        self.entries.entry(key).or_insert(dump);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit_stats() {
        let mut cache = ModificationCache::new();
        assert!(cache.get("k").is_none());
        cache.insert("k".to_string(), CachedDump::new(Some(1u32)));
        assert!(cache.get("k").is_some());
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_entries_are_write_once() {
        let mut cache = ModificationCache::new();
        cache.insert("k".to_string(), CachedDump::new(Some(1u32)));
        cache.insert("k".to_string(), CachedDump::new(Some(2u32)));
        let entry = cache.get("k").unwrap();
        let value = entry.downcast::<u32>("k").unwrap().unwrap();
        assert_eq!(*value, 1);
    }

    #[test]
    fn test_absence_is_a_cached_result() {
        let mut cache = ModificationCache::new();
        cache.insert("k".to_string(), CachedDump::new(None::<u32>));
        let entry = cache.get("k").unwrap();
        assert!(entry.downcast::<u32>("k").unwrap().is_none());
    }

    #[test]
    fn test_downcast_mismatch() {
        let entry = CachedDump::new(Some(1u32));
        let err = entry.downcast::<String>("k").unwrap_err();
        assert!(matches!(err, CacheError::TypeMismatch { .. }));
    }

    #[test]
    fn test_absent_entry_type_checked_too() {
        let entry = CachedDump::new(None::<u32>);
        assert!(entry.downcast::<String>("k").is_err());
    }
}
