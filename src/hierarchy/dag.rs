//! Minimal directed acyclic graph
//!
//! Insertion-ordered vertices and child lists; adding an edge that would
//! close a cycle is rejected before the graph is mutated.

use std::collections::HashMap;
use std::hash::Hash;

/// Edge rejected because it would close a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFound<V> {
    pub from: V,
    pub to: V,
}

#[derive(Debug)]
pub struct Dag<V: Eq + Hash + Clone> {
    order: Vec<V>,
    children: HashMap<V, Vec<V>>,
    incoming: HashMap<V, usize>,
}

impl<V: Eq + Hash + Clone> Dag<V> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            children: HashMap::new(),
            incoming: HashMap::new(),
        }
    }

    /// Add a vertex; re-adding is a no-op.
    pub fn add_vertex(&mut self, vertex: V) {
        if !self.children.contains_key(&vertex) {
            self.order.push(vertex.clone());
            self.children.insert(vertex.clone(), Vec::new());
            self.incoming.insert(vertex, 0);
        }
    }

    /// Add a directed edge; both endpoints are added as vertices if absent.
    /// Duplicate edges collapse. Fails without mutating when the edge would
    /// make `from` reachable from `to`.
    pub fn add_edge(&mut self, from: V, to: V) -> Result<(), CycleFound<V>> {
        self.add_vertex(from.clone());
        self.add_vertex(to.clone());

        if self.children[&from].contains(&to) {
            return Ok(());
        }
        if from == to || self.reaches(&to, &from) {
            return Err(CycleFound { from, to });
        }

        self.children.get_mut(&from).expect("vertex added").push(to.clone());
        *self.incoming.get_mut(&to).expect("vertex added") += 1;
        Ok(())
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.children.contains_key(vertex)
    }

    pub fn children(&self, vertex: &V) -> &[V] {
        self.children.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Vertices with no incoming edge, in insertion order.
    pub fn roots(&self) -> Vec<&V> {
        self.order
            .iter()
            .filter(|v| self.incoming[*v] == 0)
            .collect()
    }

    fn reaches(&self, from: &V, target: &V) -> bool {
        let mut stack = vec![from];
        while let Some(next) = stack.pop() {
            if next == target {
                return true;
            }
            stack.extend(self.children(next));
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_closing_cycle_rejected() {
        let mut dag = Dag::new();
        dag.add_edge("a", "b").unwrap();
        dag.add_edge("b", "c").unwrap();
        let err = dag.add_edge("c", "a").unwrap_err();
        assert_eq!(err, CycleFound { from: "c", to: "a" });
        // Graph unchanged by the failed insert.
        assert!(dag.children(&"c").is_empty());
    }

    #[test]
    fn test_self_edge_rejected() {
        let mut dag = Dag::new();
        assert!(dag.add_edge("a", "a").is_err());
    }

    #[test]
    fn test_duplicate_edge_collapses() {
        let mut dag = Dag::new();
        dag.add_edge("a", "b").unwrap();
        dag.add_edge("a", "b").unwrap();
        assert_eq!(dag.children(&"a"), &["b"]);
    }

    #[test]
    fn test_roots_in_insertion_order() {
        let mut dag = Dag::new();
        dag.add_edge("b", "c").unwrap();
        dag.add_vertex("a");
        assert_eq!(dag.roots(), vec![&"b", &"a"]);
    }
}
