//! Meta-path projection.
//!
//! A projection collapses every instance of a meta-path into one direct edge
//! between the instance's endpoints, producing a homogeneous view over the
//! start and end node types.
//!
//! # Algorithm
//!
//! 1. Check the meta-path is registered on the graph (by edge-type sequence).
//! 2. Resolve start and end node types from the first schema entries mapping
//!    to the first and last edge types.
//! 3. Enumerate simple paths on an undirected copy of the backing engine, from
//!    every start-type vertex to every end-type vertex, with at most
//!    `len(meta-path)` hops; keep only paths of exactly that length.
//! 4. Keep a candidate only if the schema types of its hops equal the meta-path.
//!
//! Matching ignores the direction edges were stored in.

use crate::{
    Edge, EdgeKey, Error, HetGraph, MetaPath, Node, NodeId, PathSchema, Result,
};
use petgraph::stable_graph::NodeIndex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Attribute carrying the instance count of a combined edge.
pub const WEIGHT_ATTRIBUTE: &str = "Weight";

/// How parallel derived edges are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineStrategy {
    /// One edge per (source, target) pair, weighted by the number of instances.
    Sum,
}

impl FromStr for CombineStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            other => Err(Error::NotFound(format!("combination strategy {}", other))),
        }
    }
}

impl fmt::Display for CombineStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
        }
    }
}

/// Projection configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionConfig {
    /// Whether derived edges are directed.
    pub directed: bool,
    /// Merge parallel derived edges; `None` keeps them apart.
    pub combine: Option<CombineStrategy>,
}

impl ProjectionConfig {
    /// Set the direction of derived edges.
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Set the combination strategy.
    pub fn with_combine(mut self, combine: CombineStrategy) -> Self {
        self.combine = Some(combine);
        self
    }
}

/// Project `graph` along `meta_path`.
///
/// The output holds the nodes touched by accepted instances (in source order,
/// same ids), one derived edge per instance typed with the meta-path's
/// abbreviation (or one per pair when combined), and the single path
/// `(start type, end type) -> abbreviation`. Its meta-path list is empty.
///
/// # Errors
///
/// [`Error::NotFound`] if the meta-path is not registered, if the schema does
/// not resolve its start or end type, or if no instance is found.
pub fn create_meta_projection(
    graph: &HetGraph,
    meta_path: &MetaPath,
    config: &ProjectionConfig,
) -> Result<HetGraph> {
    if !graph.meta_paths().iter().any(|mp| mp.path() == meta_path.path()) {
        return Err(Error::NotFound(format!(
            "meta-path {} is not registered on the graph",
            meta_path
        )));
    }

    let (start_type, end_type) = endpoint_types(graph.paths(), meta_path)?;
    debug!(%start_type, %end_type, meta_path = %meta_path, "resolved projection endpoints");

    let starts = vertices_of_type(graph, &start_type);
    let ends = vertices_of_type(graph, &end_type);
    let hops = meta_path.len();

    let copy = graph.engine().to_undirected();
    let mut instances: Vec<(NodeIndex, NodeIndex)> = Vec::new();
    let mut candidates = 0usize;
    for &start in &starts {
        for path in copy.all_simple_paths(start, &ends, hops) {
            if path.len() != hops + 1 {
                continue;
            }
            candidates += 1;
            let accepted = hop_types(graph.paths(), &copy, &path)
                .is_some_and(|types| meta_path.matches(&types));
            if accepted {
                instances.push((path[0], path[hops]));
            }
        }
    }
    debug!(
        candidates,
        accepted = instances.len(),
        "enumerated meta-path candidates"
    );

    if instances.is_empty() {
        return Err(Error::NotFound(format!(
            "no instance of meta-path {} in the graph (undefined path type along every candidate)",
            meta_path
        )));
    }

    let mut derived = Vec::with_capacity(instances.len());
    for (s, t) in &instances {
        let source = node_id(graph, *s)?;
        let target = node_id(graph, *t)?;
        derived.push(
            Edge::between(source, target, config.directed).with_type(&meta_path.abbreviation),
        );
    }
    if let Some(strategy) = config.combine {
        derived = combine_edges(derived, strategy);
    }

    let touched: HashSet<NodeId> = derived.iter().flat_map(|e| [e.source, e.target]).collect();
    let nodes: Vec<Node> = graph
        .nodes()
        .iter()
        .filter(|n| touched.contains(&n.id()))
        .cloned()
        .collect();

    let schema = PathSchema::from_mappings([(
        (start_type.as_str(), end_type.as_str()),
        meta_path.abbreviation.as_str(),
    )]);
    let projection = HetGraph::with_schema(nodes, derived, schema, Vec::new())?;

    info!(
        meta_path = %meta_path.abbreviation,
        instances = instances.len(),
        nodes = projection.node_count(),
        edges = projection.edge_count(),
        "created meta-path projection"
    );
    Ok(projection)
}

/// Start and end node types of a meta-path; first schema match wins.
fn endpoint_types(paths: &PathSchema, meta_path: &MetaPath) -> Result<(String, String)> {
    for edge_type in [meta_path.first(), meta_path.last()] {
        let n = paths.pairs_for_count(edge_type);
        if n > 1 {
            warn!(
                edge_type,
                pairs = n,
                "edge type is defined for several node-type pairs; using the first"
            );
        }
    }
    let start = paths.first_pair_for(meta_path.first()).ok_or_else(|| {
        Error::NotFound(format!("path for edge type {}", meta_path.first()))
    })?;
    let end = paths.first_pair_for(meta_path.last()).ok_or_else(|| {
        Error::NotFound(format!("path for edge type {}", meta_path.last()))
    })?;
    Ok((start.source_type.clone(), end.target_type.clone()))
}

fn vertices_of_type(graph: &HetGraph, node_type: &str) -> Vec<NodeIndex> {
    graph
        .nodes()
        .iter()
        .filter(|n| n.node_type == node_type)
        .filter_map(|n| graph.vertex_of(n.id()))
        .collect()
}

/// Schema edge types along a path; `None` if any hop is undeclared.
fn hop_types<'a>(
    paths: &'a PathSchema,
    copy: &crate::engine::UndirectedCopy,
    path: &[NodeIndex],
) -> Option<Vec<&'a str>> {
    path.windows(2)
        .map(|pair| {
            let left = copy.vertex_type(pair[0])?;
            let right = copy.vertex_type(pair[1])?;
            paths.get(left, right)
        })
        .collect()
}

fn node_id(graph: &HetGraph, vertex: NodeIndex) -> Result<NodeId> {
    graph
        .node_of_vertex(vertex)
        .map(Node::id)
        .ok_or_else(|| Error::NotFound(format!("node for vertex {}", vertex.index())))
}

/// Merge parallel edges, keeping first-seen pair order.
fn combine_edges(edges: Vec<Edge>, strategy: CombineStrategy) -> Vec<Edge> {
    match strategy {
        CombineStrategy::Sum => {
            let mut order: Vec<EdgeKey> = Vec::new();
            let mut groups: HashMap<EdgeKey, (Edge, i64)> = HashMap::new();
            for edge in edges {
                let key = edge.key();
                match groups.get_mut(&key) {
                    Some((merged, count)) => {
                        merged.directed |= edge.directed;
                        *count += 1;
                    }
                    None => {
                        order.push(key);
                        groups.insert(key, (edge, 1));
                    }
                }
            }
            order
                .into_iter()
                .filter_map(|key| groups.remove(&key))
                .map(|(edge, count)| edge.with_attribute(WEIGHT_ATTRIBUTE, count))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("sum".parse::<CombineStrategy>().unwrap(), CombineStrategy::Sum);
        assert_eq!("SUM".parse::<CombineStrategy>().unwrap(), CombineStrategy::Sum);
        assert!("max".parse::<CombineStrategy>().unwrap_err().is_not_found());
    }

    #[test]
    fn sum_merges_by_ordered_pair() {
        let a = NodeId::next();
        let b = NodeId::next();
        let edges = vec![
            Edge::between(a, b, false).with_type("P"),
            Edge::between(b, a, false).with_type("P"),
            Edge::between(a, b, true).with_type("P"),
        ];
        let combined = combine_edges(edges, CombineStrategy::Sum);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].key(), EdgeKey { source: a, target: b });
        assert_eq!(combined[0].attribute(WEIGHT_ATTRIBUTE).and_then(|w| w.as_int()), Some(2));
        assert!(combined[0].directed);
        assert_eq!(combined[1].attribute(WEIGHT_ATTRIBUTE).and_then(|w| w.as_int()), Some(1));
        assert!(!combined[1].directed);
    }

    #[test]
    fn endpoint_types_first_match_wins() {
        let paths = PathSchema::from_mappings([
            (("A", "B"), "E1"),
            (("C", "B"), "E1"),
            (("B", "D"), "E2"),
        ]);
        let mp = MetaPath::new(["E1", "E2"], "", "ABD").unwrap();
        let (start, end) = endpoint_types(&paths, &mp).unwrap();
        assert_eq!(start, "A");
        assert_eq!(end, "D");

        let unknown = MetaPath::new(["E9"], "", "x").unwrap();
        assert!(endpoint_types(&paths, &unknown).unwrap_err().is_not_found());
    }

    #[test]
    fn default_config_is_undirected_without_combination() {
        let config = ProjectionConfig::default();
        assert!(!config.directed);
        assert!(config.combine.is_none());
        let config = config.with_directed(true).with_combine(CombineStrategy::Sum);
        assert!(config.directed);
        assert_eq!(config.combine, Some(CombineStrategy::Sum));
    }
}
