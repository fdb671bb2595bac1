//! Cache error types

use thiserror::Error;

use crate::path::PathId;
use crate::read::ReadError;

/// Result type for dump cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Failure of a bulk fetch against the backing system.
///
/// Raised by dump executors; never retried and never cached by this layer.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct FetchError {
    reason: String,
}

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Errors surfaced by [`crate::cache::DumpCacheManager::get_dump`]
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The executor failed; the failure is not cached and the next call
    /// retries the fetch
    #[error("dump fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// A cached entry holds a value of an unexpected type; two different
    /// executors are sharing one cache key (programming error)
    #[error("dump cache key '{key}' holds {actual}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl CacheError {
    /// Attach the originating path, producing the read-pipeline error.
    pub fn at(self, path: &PathId) -> ReadError {
        match self {
            CacheError::Fetch(e) => ReadError::fetch(path.clone(), e.reason),
            CacheError::TypeMismatch {
                key,
                expected,
                actual,
            } => ReadError::CacheTypeMismatch {
                key,
                expected,
                actual,
            },
        }
    }
}
