use crate::activity::{ActivityId, DependencyEdge};
use petgraph::Direction;
use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Activity-on-node network: node weights are activity ids, edges run
/// predecessor -> successor.
#[derive(Debug, Clone, Default)]
pub struct ActivityDag {
    pub graph: DiGraph<ActivityId, ()>,
    pub id_to_index: HashMap<ActivityId, NodeIndex>,
}

impl ActivityDag {
    /// Callers must pass edges whose endpoints are all present in `ids`.
    pub fn build<I>(ids: I, edges: &[DependencyEdge]) -> Self
    where
        I: IntoIterator<Item = ActivityId>,
    {
        let mut graph: DiGraph<ActivityId, ()> = DiGraph::new();
        let mut id_to_index: HashMap<ActivityId, NodeIndex> = HashMap::new();

        // Add nodes first
        for id in ids {
            let node_ix = graph.add_node(id);
            id_to_index.insert(id, node_ix);
        }

        for edge in edges {
            if let (Some(&u), Some(&v)) = (
                id_to_index.get(&edge.predecessor),
                id_to_index.get(&edge.successor),
            ) {
                graph.add_edge(u, v, ());
            }
        }

        Self { graph, id_to_index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Weakly connected components; edge direction is ignored.
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Neighbour ids in one direction, sorted ascending.
    pub fn neighbors(&self, id: ActivityId, direction: Direction) -> Vec<ActivityId> {
        let Some(&node_ix) = self.id_to_index.get(&id) else {
            return Vec::new();
        };
        let mut ids: Vec<ActivityId> = self
            .graph
            .neighbors_directed(node_ix, direction)
            .map(|ix| self.graph[ix])
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn successors(&self, id: ActivityId) -> Vec<ActivityId> {
        self.neighbors(id, Direction::Outgoing)
    }

    pub fn predecessors(&self, id: ActivityId) -> Vec<ActivityId> {
        self.neighbors(id, Direction::Incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_edges_from_dependency_list() {
        // 1 -> {2, 3}
        let dag = ActivityDag::build(
            [1, 2, 3],
            &[DependencyEdge::new(1, 2), DependencyEdge::new(1, 3)],
        );

        assert_eq!(dag.node_count(), 3);
        assert_eq!(dag.edge_count(), 2);
        assert_eq!(dag.successors(1), vec![2, 3]);
        assert_eq!(dag.predecessors(3), vec![1]);
        assert_eq!(dag.component_count(), 1);
    }

    #[test]
    fn isolated_nodes_are_separate_components() {
        let dag = ActivityDag::build([1, 2, 3], &[DependencyEdge::new(1, 2)]);
        assert_eq!(dag.component_count(), 2);
        assert!(dag.successors(42).is_empty());
    }
}
