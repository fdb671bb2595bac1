//! Reader dispatch and the leaf reader
//!
//! [`Reader`] is the internal composition unit: a leaf adapting one
//! registered handler, optionally wrapped by a subtree reader, always
//! wrapped by a composite reader during registry build.

use serde_json::Value;
use tracing::trace;

use super::composite::CompositeReader;
use super::errors::{ReadError, ReadResult};
use super::handler::{NodeBuilder, NodeHandler};
use super::subtree::SubtreeReader;
use super::transaction::ReadTransaction;
use crate::path::{Key, PathId};

/// Shape of a node type, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReaderShape {
    Singular,
    List,
}

/// One composed reader in the tree.
pub(crate) enum Reader {
    Leaf(LeafReader),
    Subtree(SubtreeReader),
    Composite(CompositeReader),
}

impl Reader {
    pub(crate) fn managed_path(&self) -> &PathId {
        match self {
            Reader::Leaf(r) => r.managed_path(),
            Reader::Subtree(r) => r.managed_path(),
            Reader::Composite(r) => r.managed_path(),
        }
    }

    pub(crate) fn shape(&self) -> ReaderShape {
        match self {
            Reader::Leaf(r) => r.shape(),
            Reader::Subtree(r) => r.shape(),
            Reader::Composite(r) => r.shape(),
        }
    }

    pub(crate) fn new_builder(&self, path: &PathId) -> NodeBuilder {
        match self {
            Reader::Leaf(r) => r.new_builder(path),
            Reader::Subtree(r) => r.new_builder(path),
            Reader::Composite(r) => r.new_builder(path),
        }
    }

    /// Populate one node's attributes (composite readers include children).
    pub(crate) fn read_current(
        &self,
        path: &PathId,
        builder: &mut NodeBuilder,
        txn: &mut ReadTransaction,
    ) -> ReadResult<()> {
        match self {
            Reader::Leaf(r) => r.read_current(path, builder, txn),
            Reader::Subtree(r) => r.read_current(path, builder, txn),
            Reader::Composite(r) => r.read_current(path, builder, txn),
        }
    }

    /// Read the value at `path`, delegating downward as needed.
    pub(crate) fn read(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Option<Value>> {
        match self {
            Reader::Leaf(r) => r.read(path, txn),
            Reader::Subtree(r) => r.read(path, txn),
            Reader::Composite(r) => r.read(path, txn),
        }
    }

    /// Materialize all entries of a list node, in key-enumeration order.
    pub(crate) fn read_all(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Vec<Value>> {
        match self {
            Reader::Leaf(r) => r.read_all(path, txn),
            Reader::Subtree(r) => r.read_all(path, txn),
            Reader::Composite(r) => r.read_all(path, txn),
        }
    }

    pub(crate) fn list_keys(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Vec<Key>> {
        match self {
            Reader::Leaf(r) => r.list_keys(path, txn),
            Reader::Subtree(r) => r.list_keys(path, txn),
            Reader::Composite(r) => r.list_keys(path, txn),
        }
    }

    pub(crate) fn merge_single(&self, parent: &mut NodeBuilder, value: Value) {
        match self {
            Reader::Leaf(r) => r.merge_single(parent, value),
            Reader::Subtree(r) => r.merge_single(parent, value),
            Reader::Composite(r) => r.merge_single(parent, value),
        }
    }

    pub(crate) fn merge_list(&self, parent: &mut NodeBuilder, entries: Vec<Value>) {
        match self {
            Reader::Leaf(r) => r.merge_list(parent, entries),
            Reader::Subtree(r) => r.merge_list(parent, entries),
            Reader::Composite(r) => r.merge_list(parent, entries),
        }
    }
}

/// Adapter giving one registered handler the reader surface.
pub(crate) struct LeafReader {
    path: PathId,
    handler: NodeHandler,
}

impl LeafReader {
    pub(crate) fn new(path: PathId, handler: NodeHandler) -> Self {
        Self {
            path: path.wildcarded(),
            handler,
        }
    }

    pub(crate) fn managed_path(&self) -> &PathId {
        &self.path
    }

    pub(crate) fn shape(&self) -> ReaderShape {
        match self.handler {
            NodeHandler::Singular(_) => ReaderShape::Singular,
            NodeHandler::List(_) => ReaderShape::List,
        }
    }

    pub(crate) fn new_builder(&self, path: &PathId) -> NodeBuilder {
        match &self.handler {
            NodeHandler::Singular(h) => h.new_builder(path),
            NodeHandler::List(h) => h.new_builder(path),
        }
    }

    pub(crate) fn read_current(
        &self,
        path: &PathId,
        builder: &mut NodeBuilder,
        txn: &mut ReadTransaction,
    ) -> ReadResult<()> {
        trace!(%path, "reading current attributes");
        match &self.handler {
            NodeHandler::Singular(h) => h.read_current(path, builder, txn),
            NodeHandler::List(h) => h.read_current(path, builder, txn),
        }
    }

    pub(crate) fn read(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Option<Value>> {
        if path.wildcarded() == self.path {
            self.read_current_value(path, txn)
        } else {
            Err(ReadError::routing(
                path.clone(),
                vec![self.path.node_type().to_string()],
            ))
        }
    }

    pub(crate) fn read_current_value(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Option<Value>> {
        let empty = self.new_builder(path);
        let mut builder = empty.clone();
        self.read_current(path, &mut builder, txn)?;
        if builder == empty {
            Ok(None)
        } else {
            Ok(Some(Value::Object(builder)))
        }
    }

    pub(crate) fn read_all(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Vec<Value>> {
        let keys = self.list_keys(path, txn)?;
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let keyed = path.with_last_key(key);
            if let Some(value) = self.read_current_value(&keyed, txn)? {
                entries.push(value);
            }
        }
        Ok(entries)
    }

    pub(crate) fn list_keys(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Vec<Key>> {
        match &self.handler {
            NodeHandler::List(h) => h.list_keys(path, txn),
            NodeHandler::Singular(_) => {
                unreachable!("key enumeration requires a list handler")
            }
        }
    }

    pub(crate) fn merge_single(&self, parent: &mut NodeBuilder, value: Value) {
        match &self.handler {
            NodeHandler::Singular(h) => h.merge(parent, value),
            NodeHandler::List(_) => unreachable!("singular merge on a list handler"),
        }
    }

    pub(crate) fn merge_list(&self, parent: &mut NodeBuilder, entries: Vec<Value>) {
        match &self.handler {
            NodeHandler::List(h) => h.merge(parent, entries),
            NodeHandler::Singular(_) => unreachable!("list merge on a singular handler"),
        }
    }
}
