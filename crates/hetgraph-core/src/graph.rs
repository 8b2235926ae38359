use crate::engine::{DegreeMode, Engine, TYPE_ATTRIBUTE};
use crate::{
    AttributeValue, Attributes, Edge, Error, MetaPath, Node, NodeId, NodeTypePair, PathSchema,
    Result,
};
use petgraph::graph::DiGraph;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

/// A heterogeneous graph: typed nodes and edges, a path schema and meta-paths.
///
/// The graph owns its nodes and edges and keeps a backing [`Engine`] in
/// lockstep with them. Every structural mutation recomputes the node and edge
/// type sets and updates the node-id to vertex-index maps.
///
/// # Example
///
/// ```rust
/// use hetgraph_core::{Edge, HetGraph, Node, PathSchema};
///
/// let author = Node::new("Author");
/// let paper = Node::new("Paper");
/// let writes = Edge::new(&author, &paper, true);
///
/// let schema = PathSchema::from_mappings([(("Author", "Paper"), "writes")]);
/// let graph = HetGraph::with_schema(vec![author, paper], vec![writes], schema, vec![]).unwrap();
///
/// // The untyped edge got its type from the schema.
/// assert_eq!(graph.edges()[0].edge_type, "writes");
/// assert!(graph.is_directed());
/// ```
#[derive(Debug, Clone)]
pub struct HetGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,

    node_types: HashSet<String>,
    edge_types: HashSet<String>,

    paths: PathSchema,
    meta_paths: Vec<MetaPath>,

    engine: Engine,
    /// Node id -> backing vertex.
    vertex_of: HashMap<NodeId, NodeIndex>,
    /// Backing vertex -> node id.
    node_of: HashMap<NodeIndex, NodeId>,
}

impl Default for HetGraph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            node_types: HashSet::new(),
            edge_types: HashSet::new(),
            paths: PathSchema::new(),
            meta_paths: Vec::new(),
            engine: Engine::new(false),
            vertex_of: HashMap::new(),
            node_of: HashMap::new(),
        }
    }
}

impl HetGraph {
    /// Create an empty graph.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a graph without a path schema.
    ///
    /// Edge types are accepted as given, including empty ones.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        Self::with_schema(nodes, edges, PathSchema::new(), Vec::new())
    }

    /// Build a graph with a path schema and meta-paths.
    ///
    /// With a non-empty schema, untyped edges get their type from the schema
    /// ([`Error::GraphDefinition`] if no path covers their endpoint types) and
    /// typed edges must agree with it ([`Error::TypeMismatch`]). Validation runs
    /// before anything is materialized.
    pub fn with_schema(
        nodes: Vec<Node>,
        mut edges: Vec<Edge>,
        paths: PathSchema,
        meta_paths: Vec<MetaPath>,
    ) -> Result<Self> {
        let mut types_by_id: HashMap<NodeId, &str> = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            if types_by_id.insert(node.id(), &node.node_type).is_some() {
                return Err(Error::AlreadyDefined(format!("node {}", node.id())));
            }
        }

        for edge in &edges {
            for endpoint in [edge.source, edge.target] {
                if !types_by_id.contains_key(&endpoint) {
                    return Err(Error::NotFound(format!(
                        "node {} referenced by edge {}",
                        endpoint, edge
                    )));
                }
            }
        }

        if !paths.is_empty() {
            let untyped = edges.iter().filter(|e| e.is_untyped()).count();
            if untyped > 0 {
                debug!(untyped, "inferring edge types from path definitions");
            }
            for edge in edges.iter_mut().filter(|e| e.is_untyped()) {
                let (s, t) = (types_by_id[&edge.source], types_by_id[&edge.target]);
                edge.edge_type = paths
                    .get(s, t)
                    .ok_or_else(|| {
                        Error::GraphDefinition(format!("undefined path type for ({}, {})", s, t))
                    })?
                    .to_string();
            }
            for edge in &edges {
                let (s, t) = (types_by_id[&edge.source], types_by_id[&edge.target]);
                check_edge_type(&paths, edge, s, t)?;
            }
        }

        let mut graph = Self {
            paths,
            engine: Engine::with_capacity(
                edges.iter().any(|e| e.directed),
                nodes.len(),
                edges.len(),
            ),
            ..Self::default()
        };
        for mp in meta_paths {
            graph.add_meta_path(mp)?;
        }
        for node in nodes {
            graph.insert_vertex(&node);
            graph.nodes.push(node);
        }
        for edge in edges {
            graph.insert_backing_edge(&edge);
            graph.edges.push(edge);
        }
        graph.recompute_types();

        debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            directed = graph.engine.is_directed(),
            "built heterogeneous graph"
        );
        Ok(graph)
    }

    // --- internal bookkeeping ---

    fn insert_vertex(&mut self, node: &Node) {
        let mut attributes = node.attributes.clone();
        attributes.insert(
            TYPE_ATTRIBUTE.to_string(),
            AttributeValue::from(node.node_type.as_str()),
        );
        let vertex = self.engine.add_vertex(attributes);
        self.vertex_of.insert(node.id(), vertex);
        self.node_of.insert(vertex, node.id());
    }

    fn insert_backing_edge(&mut self, edge: &Edge) {
        let (source, target) = (self.vertex_of[&edge.source], self.vertex_of[&edge.target]);
        let mut attributes: Attributes = edge.attributes.clone();
        attributes.insert(
            TYPE_ATTRIBUTE.to_string(),
            AttributeValue::from(edge.edge_type.as_str()),
        );
        self.engine.add_edge(source, target, attributes);
    }

    fn recompute_types(&mut self) {
        self.node_types = self.nodes.iter().map(|n| n.node_type.clone()).collect();
        self.edge_types = self.edges.iter().map(|e| e.edge_type.clone()).collect();
    }

    fn sync_directedness(&mut self) {
        let directed = self.edges.iter().any(|e| e.directed);
        if directed != self.engine.is_directed() {
            debug!(directed, "backing graph directedness changed");
            self.engine.set_directed(directed);
        }
    }

    fn type_of(&self, id: NodeId) -> Result<&str> {
        self.vertex_of
            .get(&id)
            .and_then(|&v| self.engine.vertex_type(v))
            .ok_or_else(|| Error::NotFound(format!("node {}", id)))
    }

    // --- accessors ---

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node types currently present.
    pub fn node_types(&self) -> &HashSet<String> {
        &self.node_types
    }

    /// Edge types currently present.
    pub fn edge_types(&self) -> &HashSet<String> {
        &self.edge_types
    }

    /// The path schema.
    pub fn paths(&self) -> &PathSchema {
        &self.paths
    }

    /// Registered meta-paths, in registration order.
    pub fn meta_paths(&self) -> &[MetaPath] {
        &self.meta_paths
    }

    /// The backing engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Whether any edge is directed.
    pub fn is_directed(&self) -> bool {
        self.engine.is_directed()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether a node with this id is a member.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.vertex_of.contains_key(&id)
    }

    /// Get a member node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        if !self.contains_node(id) {
            return None;
        }
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Backing vertex of a node.
    pub fn vertex_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.vertex_of.get(&id).copied()
    }

    /// Node behind a backing vertex.
    pub fn node_of_vertex(&self, vertex: NodeIndex) -> Option<&Node> {
        self.node_of.get(&vertex).and_then(|&id| self.node(id))
    }

    /// Backing edge of an edge, matched by endpoints and type.
    pub fn backing_edge(&self, edge: &Edge) -> Option<EdgeIndex> {
        let source = self.vertex_of(edge.source)?;
        let target = self.vertex_of(edge.target)?;
        self.engine.find_edge(source, target, &edge.edge_type)
    }

    /// Degree of a node in the backing engine.
    pub fn degree(&self, id: NodeId, mode: DegreeMode) -> Result<usize> {
        let vertex = self
            .vertex_of(id)
            .ok_or_else(|| Error::NotFound(format!("node {}", id)))?;
        Ok(self.engine.degree(vertex, mode))
    }

    /// Degrees of all nodes, in node order.
    pub fn degrees(&self, mode: DegreeMode) -> Vec<usize> {
        self.nodes
            .iter()
            .filter_map(|n| self.vertex_of(n.id()))
            .map(|v| self.engine.degree(v, mode))
            .collect()
    }

    // --- mutation ---

    /// Add a node.
    ///
    /// Fails with [`Error::AlreadyDefined`] if a node with the same id is a member.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.contains_node(node.id()) {
            return Err(Error::AlreadyDefined(format!("node {}", node.id())));
        }
        debug!(node = %node, "adding node");
        self.insert_vertex(&node);
        self.nodes.push(node);
        self.recompute_types();
        Ok(())
    }

    /// Delete a node and every edge incident to it.
    ///
    /// Fails with [`Error::NotFound`] if the node is not a member.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node> {
        if !self.contains_node(id) {
            return Err(Error::NotFound(format!("node {} is not in the graph", id)));
        }
        let incident: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| e.is_incident_to(id))
            .cloned()
            .collect();
        for edge in &incident {
            self.delete_edge(edge)?;
        }

        let pos = self
            .nodes
            .iter()
            .position(|n| n.id() == id)
            .ok_or_else(|| Error::NotFound(format!("node {}", id)))?;
        let node = self.nodes.remove(pos);
        if let Some(vertex) = self.vertex_of.remove(&id) {
            self.engine.remove_vertex(vertex);
            self.node_of.remove(&vertex);
        }
        self.recompute_types();
        debug!(node = %node, removed_edges = incident.len(), "deleted node");
        Ok(node)
    }

    /// Add an edge between two member nodes.
    ///
    /// An untyped edge gets its type from a non-empty schema; a typed edge must
    /// agree with it. Fails with [`Error::NotFound`] if an endpoint is not a
    /// member, before anything is changed.
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<()> {
        let source_type = self.type_of(edge.source).map_err(|_| {
            Error::NotFound(format!("source node {} of edge {}", edge.source, edge))
        })?;
        let target_type = self.type_of(edge.target).map_err(|_| {
            Error::NotFound(format!("target node {} of edge {}", edge.target, edge))
        })?;

        if !self.paths.is_empty() {
            if edge.is_untyped() {
                debug!(edge = %edge, "inferring edge type from path definitions");
                edge.edge_type = self
                    .paths
                    .get(source_type, target_type)
                    .ok_or_else(|| {
                        Error::GraphDefinition(format!(
                            "undefined path type for ({}, {})",
                            source_type, target_type
                        ))
                    })?
                    .to_string();
            }
            check_edge_type(&self.paths, &edge, source_type, target_type)?;
        }

        self.insert_backing_edge(&edge);
        self.edges.push(edge);
        self.recompute_types();
        self.sync_directedness();
        Ok(())
    }

    /// Delete an edge, matched by (source, target) and type.
    ///
    /// Fails with [`Error::NotFound`] if no such edge is present.
    pub fn delete_edge(&mut self, edge: &Edge) -> Result<Edge> {
        let pos = self
            .edges
            .iter()
            .position(|e| {
                e.source == edge.source && e.target == edge.target && e.edge_type == edge.edge_type
            })
            .ok_or_else(|| Error::NotFound(format!("edge {} is not in the graph", edge)))?;
        let removed = self.edges.remove(pos);
        match self.backing_edge(&removed) {
            Some(index) => {
                self.engine.remove_edge(index);
            }
            None => warn!(edge = %removed, "edge had no backing edge"),
        }
        self.recompute_types();
        self.sync_directedness();
        Ok(removed)
    }

    /// Register a path. Existing edges are not re-validated.
    pub fn add_path(
        &mut self,
        pair: impl Into<NodeTypePair>,
        edge_type: impl Into<String>,
    ) -> Result<()> {
        self.paths.add(pair, edge_type)
    }

    /// Remove a path. Existing edges are not re-validated.
    pub fn remove_path(&mut self, pair: impl Into<NodeTypePair>, edge_type: &str) -> Result<()> {
        self.paths.remove(pair, edge_type)
    }

    /// Register a meta-path.
    ///
    /// Fails with [`Error::AlreadyDefined`] if the abbreviation is taken.
    pub fn add_meta_path(&mut self, meta_path: MetaPath) -> Result<()> {
        if self.meta_path(&meta_path.abbreviation).is_some() {
            return Err(Error::AlreadyDefined(format!(
                "meta-path {}",
                meta_path.abbreviation
            )));
        }
        self.meta_paths.push(meta_path);
        Ok(())
    }

    /// Remove a meta-path by abbreviation.
    pub fn remove_meta_path(&mut self, abbreviation: &str) -> Result<MetaPath> {
        let pos = self
            .meta_paths
            .iter()
            .position(|mp| mp.abbreviation == abbreviation)
            .ok_or_else(|| Error::NotFound(format!("meta-path {}", abbreviation)))?;
        Ok(self.meta_paths.remove(pos))
    }

    // --- queries ---

    /// Get a meta-path by abbreviation.
    pub fn meta_path(&self, abbreviation: &str) -> Option<&MetaPath> {
        self.meta_paths
            .iter()
            .find(|mp| mp.abbreviation == abbreviation)
    }

    /// Registered meta-paths as abbreviation -> edge-type sequence.
    pub fn defined_meta_paths(&self) -> BTreeMap<String, Vec<String>> {
        self.meta_paths
            .iter()
            .map(|mp| (mp.abbreviation.clone(), mp.path().to_vec()))
            .collect()
    }

    /// All nodes of a type, in insertion order.
    ///
    /// Fails with [`Error::NotFound`] if no node has that type.
    pub fn nodes_of_type(&self, node_type: &str) -> Result<Vec<&Node>> {
        if !self.node_types.contains(node_type) {
            return Err(Error::NotFound(format!(
                "node type {} does not exist in the graph",
                node_type
            )));
        }
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .collect())
    }

    /// All edges of a type, in insertion order.
    ///
    /// Fails with [`Error::NotFound`] if no edge has that type.
    pub fn edges_of_type(&self, edge_type: &str) -> Result<Vec<&Edge>> {
        if !self.edge_types.contains(edge_type) {
            return Err(Error::NotFound(format!(
                "edge type {} does not exist in the graph",
                edge_type
            )));
        }
        Ok(self
            .edges
            .iter()
            .filter(|e| e.edge_type == edge_type)
            .collect())
    }

    /// Node counts per type.
    pub fn node_type_counts(&self) -> HashMap<String, usize> {
        count_types(&self.node_types, self.nodes.iter().map(|n| n.node_type.as_str()))
    }

    /// Edge counts per type.
    pub fn edge_type_counts(&self) -> HashMap<String, usize> {
        count_types(&self.edge_types, self.edges.iter().map(|e| e.edge_type.as_str()))
    }

    /// Node type distribution: counts, or shares of the total when `as_probability`.
    pub fn node_type_dist(&self, as_probability: bool) -> HashMap<String, f64> {
        distribution(self.node_type_counts(), self.nodes.len(), as_probability)
    }

    /// Edge type distribution: counts, or shares of the total when `as_probability`.
    pub fn edge_type_dist(&self, as_probability: bool) -> HashMap<String, f64> {
        distribution(self.edge_type_counts(), self.edges.len(), as_probability)
    }

    /// First edge from `source` to `target`, in that order.
    pub fn find_edge(&self, source: NodeId, target: NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    /// The network schema as a graph: node types as vertices, paths as edges.
    pub fn schema_graph(&self) -> DiGraph<String, String> {
        let mut schema = DiGraph::new();
        let mut index = HashMap::new();
        for t in self.paths.node_types() {
            index.insert(t.to_string(), schema.add_node(t.to_string()));
        }
        for m in &self.paths {
            schema.add_edge(
                index[&m.node_types.source_type],
                index[&m.node_types.target_type],
                m.edge_type.clone(),
            );
        }
        schema
    }
}

fn check_edge_type(paths: &PathSchema, edge: &Edge, source_type: &str, target_type: &str) -> Result<()> {
    let expected = paths.get(source_type, target_type).ok_or_else(|| {
        Error::GraphDefinition(format!(
            "undefined path type for ({}, {})",
            source_type, target_type
        ))
    })?;
    if edge.edge_type != expected {
        return Err(Error::TypeMismatch {
            declared: edge.edge_type.clone(),
            expected: expected.to_string(),
        });
    }
    Ok(())
}

fn count_types<'a>(
    types: &HashSet<String>,
    values: impl Iterator<Item = &'a str>,
) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = types.iter().map(|t| (t.clone(), 0)).collect();
    for value in values {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    counts
}

fn distribution(counts: HashMap<String, usize>, total: usize, as_probability: bool) -> HashMap<String, f64> {
    counts
        .into_iter()
        .map(|(t, c)| {
            let value = if as_probability {
                c as f64 / total as f64
            } else {
                c as f64
            };
            (t, value)
        })
        .collect()
}

/// Statistics for a heterogeneous graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HetGraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Number of node types.
    pub node_type_count: usize,
    /// Number of edge types.
    pub edge_type_count: usize,
    /// Number of schema paths.
    pub path_count: usize,
    /// Number of meta-paths.
    pub meta_path_count: usize,
    /// Whether the backing graph is directed.
    pub directed: bool,
    /// Nodes per type.
    pub nodes_by_type: BTreeMap<String, usize>,
    /// Edges per type.
    pub edges_by_type: BTreeMap<String, usize>,
}

impl HetGraph {
    /// Get statistics about the graph.
    pub fn stats(&self) -> HetGraphStats {
        HetGraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            node_type_count: self.node_types.len(),
            edge_type_count: self.edge_types.len(),
            path_count: self.paths.len(),
            meta_path_count: self.meta_paths.len(),
            directed: self.is_directed(),
            nodes_by_type: self.node_type_counts().into_iter().collect(),
            edges_by_type: self.edge_type_counts().into_iter().collect(),
        }
    }
}
