//! Graphs handed to simulation engines.
//!
//! Engines only need ids and links. A [`GraphBuilder`] turns a
//! [`LayoutPlan`] into whatever graph type the engine consumes; the default
//! [`PetgraphBuilder`] produces a [`SimulationGraph`].

use indexmap::IndexMap;
use log::trace;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use forcelink_core::identifier::Id;

use crate::{error::LayoutError, plan::LayoutPlan};

/// Constructs an engine graph from node ids and links.
pub trait GraphBuilder {
    /// The graph type produced.
    type Graph;

    /// Creates an empty graph.
    fn new_graph(&self) -> Self::Graph;

    /// Adds a node. Adding an id twice must not create a second node.
    fn add_node(&self, graph: &mut Self::Graph, id: Id);

    /// Links two nodes already in the graph.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Graph`] if either endpoint is missing.
    fn add_link(&self, graph: &mut Self::Graph, source: Id, target: Id)
    -> Result<(), LayoutError>;

    /// Builds the graph for a plan: every participating node, then every link.
    fn build(&self, plan: &LayoutPlan) -> Result<Self::Graph, LayoutError> {
        let mut graph = self.new_graph();
        for &id in plan.nodes() {
            self.add_node(&mut graph, id);
        }
        for link in plan.links() {
            self.add_link(&mut graph, link.source(), link.target())?;
        }
        Ok(graph)
    }
}

/// Minimal engine graph: node ids in insertion order plus directed links.
#[derive(Debug, Clone, Default)]
pub struct SimulationGraph {
    graph: DiGraph<Id, ()>,
    indices: IndexMap<Id, NodeIndex>,
}

impl SimulationGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, returning `false` if it was already present
    pub fn add_node(&mut self, id: Id) -> bool {
        if self.indices.contains_key(&id) {
            return false;
        }
        let idx = self.graph.add_node(id);
        self.indices.insert(id, idx);
        true
    }

    /// Adds a directed link between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Graph`] if either endpoint is missing.
    pub fn add_link(&mut self, source: Id, target: Id) -> Result<(), LayoutError> {
        let source_idx = self.index(source)?;
        let target_idx = self.index(target)?;
        self.graph.add_edge(source_idx, target_idx, ());
        Ok(())
    }

    fn index(&self, id: Id) -> Result<NodeIndex, LayoutError> {
        self.indices
            .get(&id)
            .copied()
            .ok_or_else(|| LayoutError::Graph(format!("node {id} is not in the simulation graph")))
    }

    /// Returns the number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of links
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if a node with the given id exists
    pub fn contains_node(&self, id: Id) -> bool {
        self.indices.contains_key(&id)
    }

    /// Node ids in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.indices.keys().copied()
    }

    /// Links as `(source, target)` pairs in insertion order
    pub fn links(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (self.graph[edge.source()], self.graph[edge.target()]))
    }

    /// Nodes linked to `id` in either direction
    pub fn neighbors(&self, id: Id) -> Vec<Id> {
        let Some(&idx) = self.indices.get(&id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_undirected(idx)
            .map(|neighbor| self.graph[neighbor])
            .collect()
    }
}

/// Default [`GraphBuilder`] producing a [`SimulationGraph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PetgraphBuilder;

impl GraphBuilder for PetgraphBuilder {
    type Graph = SimulationGraph;

    fn new_graph(&self) -> SimulationGraph {
        SimulationGraph::new()
    }

    fn add_node(&self, graph: &mut SimulationGraph, id: Id) {
        if !graph.add_node(id) {
            trace!(id:% = id; "Node already in simulation graph");
        }
    }

    fn add_link(
        &self,
        graph: &mut SimulationGraph,
        source: Id,
        target: Id,
    ) -> Result<(), LayoutError> {
        graph.add_link(source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_new() {
        let graph = SimulationGraph::new();

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.link_count(), 0);
        assert_eq!(graph.links().count(), 0);
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = SimulationGraph::new();
        let id = Id::new("sg_node");

        assert!(graph.add_node(id));
        assert!(!graph.add_node(id));
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains_node(id));
    }

    #[test]
    fn test_nodes_keep_insertion_order() {
        let mut graph = SimulationGraph::new();
        let ids = [Id::new("sg_c"), Id::new("sg_a"), Id::new("sg_b")];
        for id in ids {
            graph.add_node(id);
        }

        assert_eq!(graph.nodes().collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_add_link() {
        let mut graph = SimulationGraph::new();
        let a = Id::new("sg_link_a");
        let b = Id::new("sg_link_b");
        graph.add_node(a);
        graph.add_node(b);

        graph.add_link(a, b).unwrap();

        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.links().collect::<Vec<_>>(), [(a, b)]);
        assert_eq!(graph.neighbors(a), [b]);
        assert_eq!(graph.neighbors(b), [a]);
    }

    #[test]
    fn test_add_link_missing_endpoint() {
        let mut graph = SimulationGraph::new();
        let a = Id::new("sg_present");
        graph.add_node(a);

        let err = graph.add_link(a, Id::new("sg_absent")).unwrap_err();

        assert!(matches!(err, LayoutError::Graph(_)));
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_neighbors_of_missing_node() {
        let graph = SimulationGraph::new();
        assert!(graph.neighbors(Id::new("sg_nowhere")).is_empty());
    }
}
