//! Hierarchy error types

use thiserror::Error;

/// Result type for hierarchy construction
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// Errors detected while deriving the type hierarchy
#[derive(Debug, Clone, Error)]
pub enum HierarchyError {
    /// The registered path set produced an edge closing a cycle
    #[error("cycle in type hierarchy: edge {from} -> {to} closes a cycle")]
    Cycle { from: String, to: String },
}
