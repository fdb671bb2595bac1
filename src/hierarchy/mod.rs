//! Type hierarchy
//!
//! Derives the parent/child forest over all registered paths purely from
//! path-prefix containment, independent of registration order.

mod dag;
mod errors;

pub use errors::{HierarchyError, HierarchyResult};

use crate::path::PathId;
use dag::Dag;

/// Forest of node-type paths, computed from a flat registration set.
///
/// Vertices are wildcarded path prefixes; edges connect each prefix to the
/// prefix one segment longer. Child ordering follows first insertion, so a
/// registry built from the same registration list composes the same tree.
#[derive(Debug)]
pub struct TypeHierarchy {
    dag: Dag<PathId>,
}

impl TypeHierarchy {
    /// Build the hierarchy from all registered paths.
    ///
    /// Duplicates collapse harmlessly. An edge that would close a cycle is
    /// a fatal configuration error.
    pub fn create(paths: impl IntoIterator<Item = PathId>) -> HierarchyResult<Self> {
        let mut dag = Dag::new();
        for path in paths {
            let wild = path.wildcarded();
            let mut previous: Option<PathId> = None;
            for prefix in wild.prefixes() {
                dag.add_vertex(prefix.clone());
                if let Some(parent) = previous.take() {
                    dag.add_edge(parent, prefix.clone()).map_err(|e| {
                        HierarchyError::Cycle {
                            from: e.from.to_string(),
                            to: e.to.to_string(),
                        }
                    })?;
                }
                previous = Some(prefix);
            }
        }
        Ok(Self { dag })
    }

    /// Registered prefixes exactly one segment longer than `path`.
    pub fn direct_children(&self, path: &PathId) -> &[PathId] {
        self.dag.children(path)
    }

    /// Transitive closure of [`TypeHierarchy::direct_children`].
    pub fn all_descendants(&self, path: &PathId) -> Vec<PathId> {
        let mut out = Vec::new();
        let mut stack: Vec<&PathId> = self.dag.children(path).iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next.clone());
            stack.extend(self.dag.children(next).iter().rev());
        }
        out
    }

    /// Vertices with no incoming edge, in first-insertion order.
    pub fn roots(&self) -> Vec<&PathId> {
        self.dag.roots()
    }

    /// Whether the path shape is a vertex of the hierarchy.
    pub fn contains(&self, path: &PathId) -> bool {
        self.dag.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment_path_is_root() {
        let hierarchy = TypeHierarchy::create(vec![PathId::root("device")]).unwrap();
        assert_eq!(hierarchy.roots(), vec![&PathId::root("device")]);
    }

    #[test]
    fn test_intermediate_prefixes_become_vertices() {
        let deep = PathId::root("a").child("b").child("c");
        let hierarchy = TypeHierarchy::create(vec![deep]).unwrap();
        assert!(hierarchy.contains(&PathId::root("a").child("b")));
        assert_eq!(hierarchy.roots(), vec![&PathId::root("a")]);
    }

    #[test]
    fn test_direct_children_one_level_only() {
        let hierarchy = TypeHierarchy::create(vec![
            PathId::root("a").child("b").child("c"),
            PathId::root("a").child("d"),
        ])
        .unwrap();
        let children = hierarchy.direct_children(&PathId::root("a"));
        assert_eq!(
            children,
            &[PathId::root("a").child("b"), PathId::root("a").child("d")]
        );
    }

    #[test]
    fn test_all_descendants_transitive() {
        let hierarchy = TypeHierarchy::create(vec![
            PathId::root("a").child("b").child("c"),
            PathId::root("a").child("d"),
        ])
        .unwrap();
        let descendants = hierarchy.all_descendants(&PathId::root("a"));
        assert_eq!(
            descendants,
            vec![
                PathId::root("a").child("b"),
                PathId::root("a").child("b").child("c"),
                PathId::root("a").child("d"),
            ]
        );
    }

    #[test]
    fn test_registration_order_does_not_change_shape() {
        let forward = TypeHierarchy::create(vec![
            PathId::root("a"),
            PathId::root("a").child("b"),
        ])
        .unwrap();
        let reverse = TypeHierarchy::create(vec![
            PathId::root("a").child("b"),
            PathId::root("a"),
        ])
        .unwrap();
        assert_eq!(forward.roots(), reverse.roots());
        assert_eq!(
            forward.direct_children(&PathId::root("a")),
            reverse.direct_children(&PathId::root("a"))
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let hierarchy = TypeHierarchy::create(vec![
            PathId::root("a").child("b"),
            PathId::root("a").child("b"),
        ])
        .unwrap();
        assert_eq!(
            hierarchy.direct_children(&PathId::root("a")),
            &[PathId::root("a").child("b")]
        );
    }
}
