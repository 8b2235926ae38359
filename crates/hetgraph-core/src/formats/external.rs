//! Import from an existing `petgraph` graph.

use crate::{AttributeValue, Attributes, Edge, Error, HetGraph, MetaPath, Node, PathSchema, Result};
use petgraph::graph::Graph;
use petgraph::visit::EdgeRef;
use petgraph::EdgeType;

/// Attribute recording a node's or edge's index in the source graph.
pub const SOURCE_INDEX_ATTRIBUTE: &str = "iGraphIndex";

/// Map a `petgraph` graph with attribute weights onto a [`HetGraph`].
///
/// Node types come from `type_attribute` on every vertex. Edge types come from
/// the same attribute on edges, or stay empty (and are inferred when `paths`
/// is non-empty). Edges are directed iff the source graph is.
///
/// Fails with [`Error::NotFound`] if a vertex lacks `type_attribute`.
pub fn from_petgraph<Ty: EdgeType>(
    graph: &Graph<Attributes, Attributes, Ty>,
    type_attribute: &str,
    paths: PathSchema,
    meta_paths: Vec<MetaPath>,
) -> Result<HetGraph> {
    let mut nodes = Vec::with_capacity(graph.node_count());
    for index in graph.node_indices() {
        let weight = &graph[index];
        let node_type = weight
            .get(type_attribute)
            .map(type_name)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "attribute {} on vertex {}",
                    type_attribute,
                    index.index()
                ))
            })?;
        let mut attributes = without(weight, type_attribute);
        attributes.insert(SOURCE_INDEX_ATTRIBUTE.to_string(), index.index().into());
        nodes.push(Node::new(node_type).with_attributes(attributes));
    }

    let edges = graph
        .edge_references()
        .map(|e| {
            let weight = e.weight();
            let mut edge = Edge::new(
                &nodes[e.source().index()],
                &nodes[e.target().index()],
                Ty::is_directed(),
            );
            if let Some(t) = weight.get(type_attribute) {
                edge.edge_type = type_name(t);
            }
            edge.attributes = without(weight, type_attribute);
            edge.attributes
                .insert(SOURCE_INDEX_ATTRIBUTE.to_string(), e.id().index().into());
            edge
        })
        .collect();

    HetGraph::with_schema(nodes, edges, paths, meta_paths)
}

fn type_name(value: &AttributeValue) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn without(attributes: &Attributes, key: &str) -> Attributes {
    attributes
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
