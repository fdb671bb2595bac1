//! Read pipeline
//!
//! Handler contracts, the per-operation read transaction, and the reader
//! wrappers that compose externally supplied per-node handlers into full
//! recursive read semantics.

mod composite;
mod errors;
mod handler;
mod reader;
mod subtree;
mod transaction;

pub use errors::{ReadError, ReadResult};
pub use handler::{
    ListReadHandler, NodeBuilder, NodeHandler, SingularReadHandler, StructuralReadHandler,
};
pub use transaction::ReadTransaction;

pub(crate) use composite::CompositeReader;
pub(crate) use reader::{LeafReader, Reader, ReaderShape};
pub(crate) use subtree::SubtreeReader;
