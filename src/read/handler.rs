//! Node handler contracts
//!
//! The atomic, externally supplied unit of work for exactly one schema node
//! type. A handler owns no children; composition is added by the registry.
//! Two shapes exist and the distinction is made once, at registration time,
//! through the [`NodeHandler`] tag.

use serde_json::Value;

use super::errors::ReadResult;
use super::transaction::ReadTransaction;
use crate::path::{Key, PathId};

/// In-progress result object for one node.
pub type NodeBuilder = serde_json::Map<String, Value>;

/// Handler for a singular node: zero-or-one value.
pub trait SingularReadHandler: Send + Sync {
    /// Fresh, empty in-progress result for this node. The default empty
    /// map suits nodes without pre-populated attributes.
    fn new_builder(&self, _path: &PathId) -> NodeBuilder {
        NodeBuilder::new()
    }

    /// Populate the node's own attributes. Leaving the builder untouched
    /// expresses absence.
    fn read_current(
        &self,
        path: &PathId,
        builder: &mut NodeBuilder,
        txn: &mut ReadTransaction,
    ) -> ReadResult<()>;

    /// Fold this node's materialized value into a parent's builder.
    fn merge(&self, parent: &mut NodeBuilder, value: Value);
}

/// Handler for a list node: zero-or-more entries, each with a distinct key.
pub trait ListReadHandler: Send + Sync {
    fn new_builder(&self, _path: &PathId) -> NodeBuilder {
        NodeBuilder::new()
    }

    /// Enumerate the keys of all entries. The returned order is the order
    /// entries materialize in; no sort is implied.
    fn list_keys(&self, path: &PathId, txn: &mut ReadTransaction) -> ReadResult<Vec<Key>>;

    /// Populate one entry's attributes; `path` carries the entry's key.
    fn read_current(
        &self,
        path: &PathId,
        builder: &mut NodeBuilder,
        txn: &mut ReadTransaction,
    ) -> ReadResult<()>;

    /// Fold the whole materialized collection into a parent's builder.
    /// Called with an empty collection too; absence of entries is an empty
    /// list, not a missing field decision made here.
    fn merge(&self, parent: &mut NodeBuilder, entries: Vec<Value>);
}

/// Registration-time shape tag for a node handler.
pub enum NodeHandler {
    Singular(Box<dyn SingularReadHandler>),
    List(Box<dyn ListReadHandler>),
}

impl NodeHandler {
    pub fn singular(handler: impl SingularReadHandler + 'static) -> Self {
        Self::Singular(Box::new(handler))
    }

    pub fn list(handler: impl ListReadHandler + 'static) -> Self {
        Self::List(Box::new(handler))
    }
}

/// Handler for a pure-container node: reads nothing of its own and merges
/// under its node-type name. Used by structural registrations.
pub struct StructuralReadHandler {
    node_type: String,
}

impl StructuralReadHandler {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }
}

impl SingularReadHandler for StructuralReadHandler {
    fn read_current(
        &self,
        _path: &PathId,
        _builder: &mut NodeBuilder,
        _txn: &mut ReadTransaction,
    ) -> ReadResult<()> {
        Ok(())
    }

    fn merge(&self, parent: &mut NodeBuilder, value: Value) {
        parent.insert(self.node_type.clone(), value);
    }
}
