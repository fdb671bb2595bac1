//! Reader registry
//!
//! Turns a flat list of registered handlers into the composed reader tree
//! and exposes the two caller-facing operations: read one path and read
//! everything.

mod builder;
mod errors;
mod registry;

pub use builder::ReaderRegistryBuilder;
pub use errors::{ConfigError, ConfigResult};
pub use registry::ReaderRegistry;
