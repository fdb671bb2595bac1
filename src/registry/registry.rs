//! Composed reader registry

use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};

use crate::path::PathId;
use crate::read::{ReadError, ReadResult, ReadTransaction, Reader, ReaderShape};

/// The composed tree of readers, routing reads from root types downward.
///
/// Built once by [`crate::registry::ReaderRegistryBuilder`]; immutable
/// afterwards. Roots keep the caller's original relative registration
/// order; ordering inside a subtree is not guaranteed.
pub struct ReaderRegistry {
    roots: Vec<Reader>,
}

impl fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("roots", &self.roots.len())
            .finish()
    }
}

impl ReaderRegistry {
    pub(crate) fn new(roots: Vec<Reader>) -> Self {
        Self { roots }
    }

    /// Read the value at one specific path.
    ///
    /// Returns `Ok(None)` when the addressed node is genuinely absent; a
    /// path that matches no reader is a [`ReadError::Routing`] failure.
    pub fn read(&self, path: &PathId, txn: &mut ReadTransaction) -> ReadResult<Option<Value>> {
        trace!(%path, "registry read");
        let root_type = path.segments()[0].node_type();
        let root = self
            .roots
            .iter()
            .find(|r| r.managed_path().node_type() == root_type)
            .ok_or_else(|| ReadError::routing(path.clone(), self.known_roots()))?;
        root.read(path, txn)
    }

    /// Read the whole tree: every root in order, absent singular roots
    /// skipped, list roots materialized in full (possibly empty).
    ///
    /// There is no partial success; the first failure aborts the call.
    pub fn read_all(&self, txn: &mut ReadTransaction) -> ReadResult<Vec<(PathId, Value)>> {
        debug!(roots = self.roots.len(), "reading all roots");
        let mut results = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            let path = root.managed_path().clone();
            match root.shape() {
                ReaderShape::Singular => {
                    if let Some(value) = root.read(&path, txn)? {
                        results.push((path, value));
                    }
                }
                ReaderShape::List => {
                    let entries = root.read_all(&path, txn)?;
                    results.push((path, Value::Array(entries)));
                }
            }
        }
        Ok(results)
    }

    fn known_roots(&self) -> Vec<String> {
        self.roots
            .iter()
            .map(|r| r.managed_path().node_type().to_string())
            .collect()
    }
}
