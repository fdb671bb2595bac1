//! Composite reader
//!
//! Wraps one node's (possibly subtree-wrapped) reader together with its
//! already-composed children, giving "read this node, then read and merge
//! every child" semantics. Built bottom-up by the registry builder.

use serde_json::Value;
use tracing::{debug, trace};

use super::errors::{ReadError, ReadResult};
use super::handler::NodeBuilder;
use super::reader::{Reader, ReaderShape};
use super::transaction::ReadTransaction;
use crate::path::{Key, PathId};

pub(crate) struct CompositeReader {
    path: PathId,
    shape: ReaderShape,
    delegate: Box<Reader>,
    children: Vec<Reader>,
}

impl CompositeReader {
    /// Wrap a reader with its composed children. The delegate is a leaf or
    /// a subtree-wrapped leaf; children arrive already composite-wrapped.
    pub(crate) fn create(delegate: Reader, children: Vec<Reader>) -> Self {
        Self {
            path: delegate.managed_path().clone(),
            shape: delegate.shape(),
            delegate: Box::new(delegate),
            children,
        }
    }

    pub(crate) fn managed_path(&self) -> &PathId {
        &self.path
    }

    pub(crate) fn shape(&self) -> ReaderShape {
        self.shape
    }

    pub(crate) fn new_builder(&self, path: &PathId) -> NodeBuilder {
        self.delegate.new_builder(path)
    }

    /// Populate the node's own attributes, then read and merge every child.
    pub(crate) fn read_current(
        &self,
        path: &PathId,
        builder: &mut NodeBuilder,
        txn: &mut ReadTransaction,
    ) -> ReadResult<()> {
        self.delegate.read_current(path, builder, txn)?;
        self.read_children(path, builder, txn)
    }

    fn read_children(
        &self,
        path: &PathId,
        builder: &mut NodeBuilder,
        txn: &mut ReadTransaction,
    ) -> ReadResult<()> {
        for child in &self.children {
            let child_path = path.join_last(child.managed_path());
            debug!(%child_path, "reading child node");
            match child.shape() {
                ReaderShape::Singular => {
                    if let Some(value) = child.read(&child_path, txn)? {
                        child.merge_single(builder, value);
                    }
                }
                // A list child is always read fully; no entries merges an
                // empty collection.
                ReaderShape::List => {
                    let entries = child.read_all(&child_path, txn)?;
                    child.merge_list(builder, entries);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn read(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Option<Value>> {
        trace!(%path, managed = %self.path, "composite read");
        if path.wildcarded() == self.path {
            // A wildcard read of a list node materializes the whole list.
            if self.shape == ReaderShape::List && path.last_segment().key().is_none() {
                return Ok(Some(Value::Array(self.read_all(path, txn)?)));
            }
            return self.read_current_value(path, txn);
        }

        if path.starts_with(&self.path) {
            let next_type = path.segments()[self.path.len()].node_type();
            if let Some(child) = self
                .children
                .iter()
                .find(|c| c.managed_path().node_type() == next_type)
            {
                debug!(%path, child = next_type, "delegating read to child");
                return child.read(path, txn);
            }
        }

        // No dedicated child; a subtree delegate may still answer for the
        // requested descendant.
        match self.delegate.as_ref() {
            Reader::Subtree(_) => self.delegate.read(path, txn),
            _ => Err(ReadError::routing(path.clone(), self.known_children())),
        }
    }

    /// Read every entry of this list node: enumerate keys, read current per
    /// key (children included), skip absent entries.
    pub(crate) fn read_all(
        &self,
        path: &PathId,
        txn: &mut ReadTransaction,
    ) -> ReadResult<Vec<Value>> {
        trace!(%path, "reading all list entries");
        let keys = self.delegate.list_keys(path, txn)?;
        debug!(%path, count = keys.len(), "reading list entries");
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let keyed = path.with_last_key(key);
            if let Some(value) = self.read_current_value(&keyed, txn)? {
                entries.push(value);
            }
        }
        Ok(entries)
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

    fn known_children(&self) -> Vec<String> {
        self.children
            .iter()
            .map(|c| c.managed_path().node_type().to_string())
            .collect()
    }
}
