//! Read pipeline error types
//!
//! Every run-time failure aborts the current transaction's remaining
//! traversal and surfaces to the registry's caller; nothing is downgraded
//! to absence inside the pipeline.

use thiserror::Error;

use crate::path::PathId;

/// Result type for read operations
pub type ReadResult<T> = Result<T, ReadError>;

/// Run-time read failures
#[derive(Debug, Clone, Error)]
pub enum ReadError {
    /// A node handler or dump executor failed; carries the originating
    /// path. Retry policy belongs to the backing-system collaborator, not
    /// this layer.
    #[error("read of {path} failed: {reason}")]
    Fetch { path: PathId, reason: String },

    /// The request could not be matched to any reader; the registry was
    /// built inconsistently with the paths being queried
    #[error("missing reader for {path}, available readers at this level: {known:?}")]
    Routing { path: PathId, known: Vec<String> },

    /// A cached dump holds a value of an unexpected type (two executors
    /// sharing one cache key)
    #[error("dump cache key '{key}' holds {actual}, expected {expected}")]
    CacheTypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl ReadError {
    pub fn fetch(path: PathId, reason: impl Into<String>) -> Self {
        Self::Fetch {
            path,
            reason: reason.into(),
        }
    }

    pub fn routing(path: PathId, known: Vec<String>) -> Self {
        Self::Routing { path, known }
    }
}
