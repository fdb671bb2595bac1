//! Subtree reader
//!
//! Lets one handler answer for an entire declared subtree with a single
//! read. The backing fetch naturally returns the whole subtree at once, so
//! descendant reads are served by navigating the in-memory result instead
//! of issuing one remote fetch per path segment.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, trace};

use super::errors::{ReadError, ReadResult};
use super::handler::NodeBuilder;
use super::reader::{LeafReader, ReaderShape};
use super::transaction::ReadTransaction;
use crate::path::{Key, PathId};
use crate::registry::ConfigError;

pub(crate) struct SubtreeReader {
    delegate: LeafReader,
    /// Absolute wildcarded paths this reader also answers for.
    handled: HashSet<PathId>,
}

impl SubtreeReader {
    /// Wrap a leaf with its subtree claims.
    ///
    /// Every claim must start with the reader's own path and be strictly
    /// longer; violations abort registry construction.
    pub(crate) fn create(delegate: LeafReader, claims: Vec<PathId>) -> Result<Self, ConfigError> {
        let root = delegate.managed_path().clone();
        let mut handled = HashSet::new();
        for claim in claims {
            let claim = claim.wildcarded();
            if !claim.starts_with(&root) {
                return Err(ConfigError::ClaimOutsideSubtree { claim, root });
            }
            if claim.len() <= root.len() {
                return Err(ConfigError::ClaimTooShort(claim));
            }
            handled.insert(claim);
        }
        Ok(Self { delegate, handled })
    }

    pub(crate) fn managed_path(&self) -> &PathId {
        self.delegate.managed_path()
    }

    pub(crate) fn shape(&self) -> ReaderShape {
        self.delegate.shape()
    }

    pub(crate) fn new_builder(&self, path: &PathId) -> NodeBuilder {
        self.delegate.new_builder(path)
    }

    pub(crate) fn read_current(
        &self,
        path: &PathId,
        builder: &mut NodeBuilder,
        txn: &mut ReadTransaction,
    ) -> ReadResult<()> {
        self.delegate.read_current(path, builder, txn)
    }

    pub(crate) fn read(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Option<Value>> {
        let root = self.delegate.managed_path();
        if path.wildcarded() == *root {
            return self.delegate.read_current_value(path, txn);
        }

        if path.starts_with(root) {
            // Read the whole subtree once, then filter down to the target.
            // The handler's dump cache makes repeated descents cheap.
            if self.handled.contains(&path.wildcarded()) {
                debug!(%path, "requested node managed by this subtree, reading and filtering");
            } else {
                debug!(%path, "no dedicated reader below subtree, reading and filtering");
            }
            let subtree_root = path.prefix(root.len());
            return match self.delegate.read_current_value(&subtree_root, txn)? {
                Some(current) => self.filter_subtree(&current, path, root.len()),
                None => Ok(None),
            };
        }

        // Not ours at all; the leaf reports the routing failure.
        self.delegate.read(path, txn)
    }

    /// Navigate from the subtree's root value to the node at `path`.
    ///
    /// Record segments resolve by field access under the node-type name;
    /// collection segments by a linear scan matching the segment's key. An
    /// absent intermediate step yields absence.
    fn filter_subtree(
        &self,
        current: &Value,
        path: &PathId,
        depth: usize,
    ) -> ReadResult<Option<Value>> {
        let mut node = current;
        for segment in &path.segments()[depth..] {
            let field = match node {
                Value::Object(map) => map.get(segment.node_type()),
                _ => None,
            };
            let Some(next) = field else {
                trace!(%path, step = segment.node_type(), "step absent, returning absence");
                return Ok(None);
            };
            node = match segment.key() {
                Some(key) => match Self::match_entry(next, key) {
                    Some(entry) => entry,
                    None => return Ok(None),
                },
                None => {
                    if next.is_array() {
                        // Filtering cannot answer a wildcarded list read.
                        return Err(ReadError::routing(path.clone(), self.known_claims()));
                    }
                    next
                }
            };
        }
        Ok(Some(node.clone()))
    }

    fn match_entry<'a>(collection: &'a Value, key: &Key) -> Option<&'a Value> {
        let Value::Array(entries) = collection else {
            return None;
        };
        let wanted = key.value().to_json();
        entries.iter().find(|e| e.get(key.field()) == Some(&wanted))
    }

    fn known_claims(&self) -> Vec<String> {
        let mut claims: Vec<String> = self.handled.iter().map(PathId::to_string).collect();
        claims.sort();
        claims
    }

    pub(crate) fn read_all(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Vec<Value>> {
        self.delegate.read_all(path, txn)
    }

    pub(crate) fn list_keys(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Vec<Key>> {
        self.delegate.list_keys(path, txn)
    }

    pub(crate) fn merge_single(&self, parent: &mut NodeBuilder, value: Value) {
        self.delegate.merge_single(parent, value);
    }

    pub(crate) fn merge_list(&self, parent: &mut NodeBuilder, entries: Vec<Value>) {
        self.delegate.merge_list(parent, entries);
    }
}
