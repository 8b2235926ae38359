//! Backing graph engine.
//!
//! [`Engine`] is the attribute-carrying storage a [`crate::HetGraph`] keeps in
//! sync with its nodes and edges. Edges are always stored in (source, target)
//! orientation; the runtime `directed` flag only changes how degrees and
//! traversals read them.
//!
//! Meta-path matching runs on an [`UndirectedCopy`], where simple-path
//! enumeration is delegated to [`petgraph::algo::all_simple_paths`].

use crate::{AttributeValue, Attributes};
use petgraph::algo::all_simple_paths;
use petgraph::graph::{Graph, NodeIndex as CopyIndex};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Direction, Undirected};
use std::collections::HashMap;

/// Reserved attribute holding a vertex's or edge's type.
pub const TYPE_ATTRIBUTE: &str = "Type";

/// Which incident edges to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreeMode {
    /// All incident edges.
    #[default]
    All,
    /// Incoming edges (equals `All` on undirected engines).
    In,
    /// Outgoing edges (equals `All` on undirected engines).
    Out,
}

/// Attribute graph with a runtime directedness flag.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    graph: StableDiGraph<Attributes, Attributes>,
    directed: bool,
}

impl Engine {
    /// Create an empty engine.
    pub fn new(directed: bool) -> Self {
        Self {
            graph: StableDiGraph::new(),
            directed,
        }
    }

    /// Create an empty engine with estimated capacity.
    pub fn with_capacity(directed: bool, vertices: usize, edges: usize) -> Self {
        Self {
            graph: StableDiGraph::with_capacity(vertices, edges),
            directed,
        }
    }

    /// Whether edges are read as directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Change how edges are read.
    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a vertex with the given attributes.
    pub fn add_vertex(&mut self, attributes: Attributes) -> NodeIndex {
        self.graph.add_node(attributes)
    }

    /// Remove a vertex and its incident edges.
    pub fn remove_vertex(&mut self, vertex: NodeIndex) -> Option<Attributes> {
        self.graph.remove_node(vertex)
    }

    /// Add an edge with the given attributes.
    pub fn add_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        attributes: Attributes,
    ) -> EdgeIndex {
        self.graph.add_edge(source, target, attributes)
    }

    /// Remove an edge.
    pub fn remove_edge(&mut self, edge: EdgeIndex) -> Option<Attributes> {
        self.graph.remove_edge(edge)
    }

    /// Vertex attributes.
    pub fn vertex(&self, vertex: NodeIndex) -> Option<&Attributes> {
        self.graph.node_weight(vertex)
    }

    /// Mutable vertex attributes.
    pub fn vertex_mut(&mut self, vertex: NodeIndex) -> Option<&mut Attributes> {
        self.graph.node_weight_mut(vertex)
    }

    /// Edge attributes.
    pub fn edge(&self, edge: EdgeIndex) -> Option<&Attributes> {
        self.graph.edge_weight(edge)
    }

    /// Edge endpoints in stored orientation.
    pub fn endpoints(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge)
    }

    /// The reserved type attribute of a vertex.
    pub fn vertex_type(&self, vertex: NodeIndex) -> Option<&str> {
        self.vertex(vertex)
            .and_then(|attrs| attrs.get(TYPE_ATTRIBUTE))
            .and_then(AttributeValue::as_str)
    }

    /// The reserved type attribute of an edge.
    pub fn edge_type(&self, edge: EdgeIndex) -> Option<&str> {
        self.edge(edge)
            .and_then(|attrs| attrs.get(TYPE_ATTRIBUTE))
            .and_then(AttributeValue::as_str)
    }

    /// Iterate over vertex indices in storage order.
    pub fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Iterate over edges as (index, source, target) in storage order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, NodeIndex, NodeIndex)> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e).map(|(s, t)| (e, s, t)))
    }

    /// First stored edge from `source` to `target` with the given type.
    ///
    /// The stored orientation must match, also on undirected engines, since
    /// edges are stored as declared.
    pub fn find_edge(&self, source: NodeIndex, target: NodeIndex, edge_type: &str) -> Option<EdgeIndex> {
        self.graph
            .edges_directed(source, Direction::Outgoing)
            .filter(|e| e.target() == target)
            .find(|e| {
                e.weight()
                    .get(TYPE_ATTRIBUTE)
                    .and_then(AttributeValue::as_str)
                    .unwrap_or_default()
                    == edge_type
            })
            .map(|e| e.id())
    }

    /// Degree of a vertex. Self-loops count twice in `All` mode.
    pub fn degree(&self, vertex: NodeIndex, mode: DegreeMode) -> usize {
        let incoming = self.graph.edges_directed(vertex, Direction::Incoming).count();
        let outgoing = self.graph.edges_directed(vertex, Direction::Outgoing).count();
        match (self.directed, mode) {
            (true, DegreeMode::In) => incoming,
            (true, DegreeMode::Out) => outgoing,
            _ => incoming + outgoing,
        }
    }

    /// Degrees of all vertices, in storage order.
    pub fn degrees(&self, mode: DegreeMode) -> Vec<usize> {
        self.vertices().map(|v| self.degree(v, mode)).collect()
    }

    /// Build an undirected working copy carrying vertex types.
    pub fn to_undirected(&self) -> UndirectedCopy {
        let mut graph = Graph::with_capacity(self.vertex_count(), self.edge_count());
        let mut positions = HashMap::with_capacity(self.vertex_count());
        for v in self.vertices() {
            let node_type = self.vertex_type(v).unwrap_or_default().to_string();
            positions.insert(v, graph.add_node(CopiedVertex { source: v, node_type }));
        }
        for (_, s, t) in self.edges() {
            graph.add_edge(positions[&s], positions[&t], ());
        }
        UndirectedCopy { graph, positions }
    }
}

/// A vertex of an [`UndirectedCopy`].
#[derive(Debug, Clone)]
pub struct CopiedVertex {
    /// Index of the vertex in the engine the copy was taken from.
    pub source: NodeIndex,
    /// The vertex's type.
    pub node_type: String,
}

/// Undirected snapshot of an [`Engine`], used for path enumeration.
#[derive(Debug, Clone)]
pub struct UndirectedCopy {
    graph: Graph<CopiedVertex, (), Undirected>,
    positions: HashMap<NodeIndex, CopyIndex>,
}

impl UndirectedCopy {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Enumerate simple paths from `from` to any of `targets` with at most `cutoff` hops.
    ///
    /// Paths are returned as engine vertex indices, endpoints included. Targets
    /// equal to `from` and unknown vertices are skipped.
    pub fn all_simple_paths(
        &self,
        from: NodeIndex,
        targets: &[NodeIndex],
        cutoff: usize,
    ) -> Vec<Vec<NodeIndex>> {
        let Some(&start) = self.positions.get(&from) else {
            return Vec::new();
        };
        if cutoff == 0 {
            return Vec::new();
        }
        let mut paths = Vec::new();
        for target in targets {
            if *target == from {
                continue;
            }
            let Some(&end) = self.positions.get(target) else {
                continue;
            };
            let found = all_simple_paths::<Vec<CopyIndex>, _>(&self.graph, start, end, 0, Some(cutoff - 1));
            paths.extend(
                found.map(|path| path.into_iter().map(|i| self.graph[i].source).collect::<Vec<_>>()),
            );
        }
        paths
    }

    /// Type of a vertex, by engine index.
    pub fn vertex_type(&self, vertex: NodeIndex) -> Option<&str> {
        self.positions
            .get(&vertex)
            .map(|&i| self.graph[i].node_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(t: &str) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(TYPE_ATTRIBUTE.to_string(), AttributeValue::from(t));
        attrs
    }

    #[test]
    fn directed_and_undirected_degrees() {
        let mut engine = Engine::new(false);
        let a = engine.add_vertex(typed("A"));
        let b = engine.add_vertex(typed("B"));
        engine.add_edge(a, b, typed("E"));

        assert_eq!(engine.degree(a, DegreeMode::In), 1);
        engine.set_directed(true);
        assert_eq!(engine.degree(a, DegreeMode::In), 0);
        assert_eq!(engine.degree(a, DegreeMode::Out), 1);
        assert_eq!(engine.degrees(DegreeMode::All), vec![1, 1]);
    }

    #[test]
    fn find_edge_respects_orientation_and_type() {
        let mut engine = Engine::new(false);
        let a = engine.add_vertex(typed("A"));
        let b = engine.add_vertex(typed("B"));
        let e = engine.add_edge(a, b, typed("E"));

        assert_eq!(engine.find_edge(a, b, "E"), Some(e));
        assert_eq!(engine.find_edge(b, a, "E"), None);
        assert_eq!(engine.find_edge(a, b, "F"), None);
    }

    #[test]
    fn undirected_copy_walks_against_edge_direction() {
        let mut engine = Engine::new(true);
        let a = engine.add_vertex(typed("A"));
        let b = engine.add_vertex(typed("B"));
        let c = engine.add_vertex(typed("C"));
        engine.add_edge(b, a, typed("E1"));
        engine.add_edge(c, b, typed("E2"));

        let copy = engine.to_undirected();
        let paths = copy.all_simple_paths(a, &[c], 2);
        assert_eq!(paths, vec![vec![a, b, c]]);
        assert!(copy.all_simple_paths(a, &[c], 1).is_empty());
        assert_eq!(copy.vertex_type(b), Some("B"));
    }

    #[test]
    fn removed_vertices_leave_stable_indices() {
        let mut engine = Engine::new(false);
        let a = engine.add_vertex(typed("A"));
        let b = engine.add_vertex(typed("B"));
        let c = engine.add_vertex(typed("C"));
        engine.add_edge(a, c, typed("E"));
        engine.remove_vertex(b);

        assert_eq!(engine.vertex_count(), 2);
        assert_eq!(engine.vertex_type(c), Some("C"));
        let copy = engine.to_undirected();
        assert_eq!(copy.all_simple_paths(a, &[c], 3), vec![vec![a, c]]);
    }
}
