//! treestate - a composable, schema-shaped read engine for device
//! operational state
//!
//! Per-node read handlers are registered against path identifiers; the
//! registry composes them into one consistent tree-shaped read pipeline,
//! and the per-transaction dump cache keeps expensive bulk fetches to one
//! execution per logical read.

pub mod cache;
pub mod hierarchy;
pub mod path;
pub mod read;
pub mod registry;
