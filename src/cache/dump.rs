//! Typed dump cache manager
//!
//! One manager per call site and dump type. `get_dump` runs the executor at
//! most once per transaction per cache key and hands every caller the same
//! `Arc`-shared result, so cooperating handlers observe one snapshot.

use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use super::errors::{CacheResult, FetchError};
use super::modification::{CachedDump, ModificationCache};
use crate::path::PathId;

/// Bulk-fetch operation against the backing system.
///
/// Returning `Ok(None)` is explicit absence (no data for the request) and
/// is cached like any other result.
pub trait DumpExecutor<T, P>: Send + Sync {
    fn execute(&self, path: &PathId, params: &P) -> Result<Option<T>, FetchError>;
}

impl<T, P, F> DumpExecutor<T, P> for F
where
    F: Fn(&PathId, &P) -> Result<Option<T>, FetchError> + Send + Sync,
{
    fn execute(&self, path: &PathId, params: &P) -> Result<Option<T>, FetchError> {
        self(path, params)
    }
}

/// How the cache key is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheKeyPolicy {
    /// Call-site identity only; every call of this manager within one
    /// transaction shares a single entry.
    #[default]
    Identity,
    /// Identity plus the call parameters; use when the same call site
    /// legitimately needs different results for different parameter values
    /// (per-address-family or per-numeric-id dumps).
    IdentityAndParams,
}

/// Memoizing front to one expensive bulk fetch.
pub struct DumpCacheManager<T, P = ()> {
    identity: String,
    key_policy: CacheKeyPolicy,
    executor: Box<dyn DumpExecutor<T, P>>,
    _dump: PhantomData<fn() -> T>,
}

impl<T, P> Debug for DumpCacheManager<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DumpCacheManager")
            .field("identity", &self.identity)
            .field("key_policy", &self.key_policy)
            .finish()
    }
}

impl<T, P> DumpCacheManager<T, P>
where
    T: Any + Send + Sync,
    P: Debug,
{
    /// Fetch the dump, or return the transaction's cached copy.
    ///
    /// The executor runs only on a cache miss; its failure propagates
    /// uncached so the next call retries.
    pub fn get_dump(
        &self,
        path: &PathId,
        cache: &mut ModificationCache,
        params: &P,
    ) -> CacheResult<Option<Arc<T>>> {
        let key = self.cache_key(params);

        if let Some(entry) = cache.get(&key) {
            trace!(%path, key = %key, "dump cache hit");
            return entry.downcast::<T>(&key);
        }

        debug!(%path, key = %key, "dump cache miss, executing dump");
        let entry = CachedDump::new(self.executor.execute(path, params)?);
        let dump = entry.downcast::<T>(&key);
        cache.insert(key, entry);
        dump
    }

    fn cache_key(&self, params: &P) -> String {
        match self.key_policy {
            CacheKeyPolicy::Identity => self.identity.clone(),
            CacheKeyPolicy::IdentityAndParams => format!("{}[{:?}]", self.identity, params),
        }
    }
}

/// Builder for [`DumpCacheManager`].
pub struct DumpCacheManagerBuilder<T, P = ()> {
    identity: String,
    key_policy: CacheKeyPolicy,
    executor: Box<dyn DumpExecutor<T, P>>,
}

impl<T, P> DumpCacheManagerBuilder<T, P>
where
    T: Any + Send + Sync,
    P: Debug,
{
    /// Start a builder for the given call-site identity and executor.
    ///
    /// The identity must be unique per executor; two executors sharing an
    /// identity corrupt each other's entries and are reported as a cache
    /// type mismatch at read time.
    pub fn new(identity: impl Into<String>, executor: impl DumpExecutor<T, P> + 'static) -> Self {
        Self {
            identity: identity.into(),
            key_policy: CacheKeyPolicy::default(),
            executor: Box::new(executor),
        }
    }

    pub fn with_key_policy(mut self, policy: CacheKeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    pub fn build(self) -> DumpCacheManager<T, P> {
        DumpCacheManager {
            identity: self.identity,
            key_policy: self.key_policy,
            executor: self.executor,
            _dump: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_manager(
        calls: Arc<AtomicUsize>,
    ) -> DumpCacheManager<Vec<u32>, ()> {
        DumpCacheManagerBuilder::new("routes-dump", move |_: &PathId, _: &()| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(vec![1, 2, 3]))
        })
        .build()
    }

    fn path() -> PathId {
        PathId::root("routing").child("routes")
    }

    #[test]
    fn test_second_get_is_a_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = counting_manager(Arc::clone(&calls));
        let mut cache = ModificationCache::new();

        let first = manager.get_dump(&path(), &mut cache, &()).unwrap().unwrap();
        let second = manager.get_dump(&path(), &mut cache, &()).unwrap().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        // Referential reuse: both callers see the identical snapshot.
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_distinct_transactions_fetch_independently() {
        let calls = Arc::new(AtomicUsize::new(0));
        let manager = counting_manager(Arc::clone(&calls));

        let mut first_txn = ModificationCache::new();
        let mut second_txn = ModificationCache::new();
        manager.get_dump(&path(), &mut first_txn, &()).unwrap();
        manager.get_dump(&path(), &mut second_txn, &()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_absence_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let manager: DumpCacheManager<Vec<u32>, ()> =
            DumpCacheManagerBuilder::new("empty-dump", move |_: &PathId, _: &()| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
            .build();
        let mut cache = ModificationCache::new();

        assert!(manager.get_dump(&path(), &mut cache, &()).unwrap().is_none());
        assert!(manager.get_dump(&path(), &mut cache, &()).unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let manager: DumpCacheManager<Vec<u32>, ()> =
            DumpCacheManagerBuilder::new("flaky-dump", move |_: &PathId, _: &()| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FetchError::new("backing system unavailable"))
                } else {
                    Ok(Some(vec![9]))
                }
            })
            .build();
        let mut cache = ModificationCache::new();

        assert!(manager.get_dump(&path(), &mut cache, &()).is_err());
        // Retried on next call instead of serving a cached failure.
        let dump = manager.get_dump(&path(), &mut cache, &()).unwrap().unwrap();
        assert_eq!(*dump, vec![9]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_params_scope_the_key_when_configured() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let manager: DumpCacheManager<Vec<u32>, u32> =
            DumpCacheManagerBuilder::new("per-vrf-dump", move |_: &PathId, vrf: &u32| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(vec![*vrf]))
            })
            .with_key_policy(CacheKeyPolicy::IdentityAndParams)
            .build();
        let mut cache = ModificationCache::new();

        let vrf0 = manager.get_dump(&path(), &mut cache, &0).unwrap().unwrap();
        let vrf1 = manager.get_dump(&path(), &mut cache, &1).unwrap().unwrap();
        let vrf0_again = manager.get_dump(&path(), &mut cache, &0).unwrap().unwrap();

        assert_eq!(*vrf0, vec![0]);
        assert_eq!(*vrf1, vec![1]);
        assert!(Arc::ptr_eq(&vrf0, &vrf0_again));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shared_identity_is_a_type_mismatch() {
        let first: DumpCacheManager<Vec<u32>, ()> =
            DumpCacheManagerBuilder::new("shared", |_: &PathId, _: &()| Ok(Some(vec![1u32])))
                .build();
        let second: DumpCacheManager<String, ()> =
            DumpCacheManagerBuilder::new("shared", |_: &PathId, _: &()| {
                Ok(Some("oops".to_string()))
            })
            .build();
        let mut cache = ModificationCache::new();

        first.get_dump(&path(), &mut cache, &()).unwrap();
        let err = second.get_dump(&path(), &mut cache, &()).unwrap_err();
        assert!(matches!(
            err,
            crate::cache::CacheError::TypeMismatch { .. }
        ));
    }
}
