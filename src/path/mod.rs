//! Path identifiers
//!
//! Structured addresses of nodes in the schema tree. A path is an ordered
//! sequence of typed segments; a segment may carry a key (concrete list
//! entry) or no key (wildcard, type-only).

mod identifier;

pub use identifier::{Key, KeyValue, PathId, PathSegment};
