//! Registry builder
//!
//! Collects a flat registration list and assembles the composed tree:
//! validate registrations, absorb subtree claims, derive the type
//! hierarchy, then wrap handlers bottom-up into composite readers.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::errors::{ConfigError, ConfigResult};
use super::registry::ReaderRegistry;
use crate::hierarchy::TypeHierarchy;
use crate::path::PathId;
use crate::read::{
    CompositeReader, LeafReader, NodeHandler, Reader, StructuralReadHandler, SubtreeReader,
};

struct Registration {
    path: PathId,
    handler: NodeHandler,
    claims: Vec<PathId>,
}

/// Chainable builder for [`ReaderRegistry`].
#[derive(Default)]
pub struct ReaderRegistryBuilder {
    registrations: Vec<Registration>,
}

impl ReaderRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one handler for exactly the given node.
    pub fn register(mut self, path: PathId, handler: NodeHandler) -> Self {
        self.registrations.push(Registration {
            path: path.wildcarded(),
            handler,
            claims: Vec::new(),
        });
        self
    }

    /// Register a handler whose single read also produces correct values
    /// for the claimed descendant paths; no separate handler may be
    /// registered for them.
    pub fn register_subtree(
        mut self,
        path: PathId,
        claims: Vec<PathId>,
        handler: NodeHandler,
    ) -> Self {
        self.registrations.push(Registration {
            path: path.wildcarded(),
            handler,
            claims,
        });
        self
    }

    /// Register a handler-less placeholder for a pure-container node.
    pub fn register_structural(self, path: PathId) -> Self {
        let handler = NodeHandler::singular(StructuralReadHandler::new(path.node_type()));
        self.register(path, handler)
    }

    /// Assemble the registry.
    ///
    /// Structural problems (duplicates, claim collisions, cycles, missing
    /// container handlers) abort construction; no registration is ever
    /// silently dropped.
    pub fn build(self) -> ConfigResult<ReaderRegistry> {
        self.check_duplicates()?;
        self.check_claims()?;

        let hierarchy =
            TypeHierarchy::create(self.registrations.iter().map(|r| r.path.clone()))?;

        let mut index: HashMap<PathId, Registration> = self
            .registrations
            .into_iter()
            .map(|r| (r.path.clone(), r))
            .collect();

        let mut roots = Vec::new();
        for root_path in hierarchy.roots().into_iter().cloned().collect::<Vec<_>>() {
            roots.push(Self::compose(&root_path, &hierarchy, &mut index)?);
        }
        debug!(roots = roots.len(), "reader registry built");
        Ok(ReaderRegistry::new(roots))
    }

    fn check_duplicates(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for registration in &self.registrations {
            if !seen.insert(&registration.path) {
                return Err(ConfigError::DuplicateRegistration(registration.path.clone()));
            }
        }
        Ok(())
    }

    /// A claim must be disjoint from every other handler's primary path and
    /// from every other handler's claims.
    ///
    /// A claim equal to the claimant's own path is not a collision; the
    /// strictness check during subtree wrapping classifies it.
    fn check_claims(&self) -> ConfigResult<()> {
        let primary: HashSet<&PathId> = self.registrations.iter().map(|r| &r.path).collect();
        let mut claimed: HashMap<PathId, &PathId> = HashMap::new();
        for registration in &self.registrations {
            for claim in &registration.claims {
                let claim = claim.wildcarded();
                if claim != registration.path && primary.contains(&claim) {
                    return Err(ConfigError::ClaimCollision {
                        registered: claim.clone(),
                        claim,
                    });
                }
                if let Some(owner) = claimed.get(&claim) {
                    return Err(ConfigError::ClaimCollision {
                        claim,
                        registered: (*owner).clone(),
                    });
                }
                claimed.insert(claim, &registration.path);
            }
        }
        Ok(())
    }

    /// Bottom-up wrap: leaf, optional subtree wrap, composite wrap with the
    /// already-composed direct children.
    fn compose(
        path: &PathId,
        hierarchy: &TypeHierarchy,
        index: &mut HashMap<PathId, Registration>,
    ) -> ConfigResult<Reader> {
        let registration = index
            .remove(path)
            .ok_or_else(|| ConfigError::MissingHandler(path.clone()))?;

        let leaf = LeafReader::new(registration.path, registration.handler);
        let base = if registration.claims.is_empty() {
            Reader::Leaf(leaf)
        } else {
            Reader::Subtree(SubtreeReader::create(leaf, registration.claims)?)
        };

        let mut children = Vec::new();
        for child_path in hierarchy.direct_children(path).to_vec() {
            children.push(Self::compose(&child_path, hierarchy, index)?);
        }

        Ok(Reader::Composite(CompositeReader::create(base, children)))
    }
}
