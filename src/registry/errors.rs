//! Registry configuration errors
//!
//! All of these are build-time, fatal and non-recoverable: they abort
//! registry construction entirely, never silently dropping a handler.

use thiserror::Error;

use crate::hierarchy::HierarchyError;
use crate::path::PathId;

/// Result type for registry construction
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Structural registration errors detected at build time
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Two handlers registered for the same exact node
    #[error("duplicate registration for {0}")]
    DuplicateRegistration(PathId),

    /// The registered path set does not form a forest
    #[error(transparent)]
    Cycle(#[from] HierarchyError),

    /// A subtree claim does not start with the claiming handler's path
    #[error("subtree claim {claim} does not start with handler root {root}")]
    ClaimOutsideSubtree { claim: PathId, root: PathId },

    /// A subtree claim equals the claiming handler's own path; claims must
    /// be strict descendants
    #[error("subtree claim {0} is too short, must be a strict descendant")]
    ClaimTooShort(PathId),

    /// A subtree claim collides with another handler's path or claim
    #[error("subtree claim {claim} collides with registration for {registered}")]
    ClaimCollision { claim: PathId, registered: PathId },

    /// A container path appears as a hierarchy vertex but carries no
    /// registration; container nodes must be registered structurally
    #[error("no handler registered for container node {0}")]
    MissingHandler(PathId),
}
