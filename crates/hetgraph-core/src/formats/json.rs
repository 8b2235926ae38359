//! JSON interchange.
//!
//! A [`GraphDocument`] has four arrays: `nodes`, `edges`, `path_definitions`
//! and `meta_path_definitions`. Attribute values travel as plain JSON;
//! timestamps are written as RFC 3339 text and detected again on load.
//!
//! Node ids in a document only tie edges to nodes. Imported nodes always get
//! fresh ids.

use crate::{
    Attributes, Edge, EdgeTypeMapping, Error, HetGraph, MetaPath, Node, NodeId, PathSchema, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A node in a graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonNode {
    /// Key edges refer to. Falls back to the node's position when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Node type.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

/// An edge in a graph document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonEdge {
    /// Source node key.
    pub source: u64,
    /// Target node key.
    pub target: u64,
    /// Whether the edge is directed.
    #[serde(default)]
    pub directed: bool,
    /// Edge type; empty means inferred from the path definitions.
    #[serde(rename = "type", default)]
    pub edge_type: String,
    /// Attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

/// A path definition: `[source type, target type]` and an edge type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathDefinition {
    /// Source and target node types.
    pub node_types: [String; 2],
    /// Edge type.
    pub edge_type: String,
}

/// A meta-path definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaPathDefinition {
    /// Edge-type sequence.
    pub path: Vec<String>,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Abbreviation.
    pub abbreviation: String,
}

/// A complete graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Nodes.
    pub nodes: Vec<JsonNode>,
    /// Edges.
    pub edges: Vec<JsonEdge>,
    /// Path schema entries.
    #[serde(default)]
    pub path_definitions: Vec<PathDefinition>,
    /// Meta-paths.
    #[serde(default)]
    pub meta_path_definitions: Vec<MetaPathDefinition>,
}

impl From<&EdgeTypeMapping> for PathDefinition {
    fn from(m: &EdgeTypeMapping) -> Self {
        Self {
            node_types: [
                m.node_types.source_type.clone(),
                m.node_types.target_type.clone(),
            ],
            edge_type: m.edge_type.clone(),
        }
    }
}

impl From<&MetaPath> for MetaPathDefinition {
    fn from(mp: &MetaPath) -> Self {
        Self {
            path: mp.path().to_vec(),
            description: mp.description.clone(),
            abbreviation: mp.abbreviation.clone(),
        }
    }
}

impl GraphDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl HetGraph {
    /// Convert to a graph document. Node keys are the node ids.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self
                .nodes()
                .iter()
                .map(|n| JsonNode {
                    id: Some(n.id().get()),
                    node_type: n.node_type.clone(),
                    attributes: n.attributes.clone(),
                })
                .collect(),
            edges: self
                .edges()
                .iter()
                .map(|e| JsonEdge {
                    source: e.source.get(),
                    target: e.target.get(),
                    directed: e.directed,
                    edge_type: e.edge_type.clone(),
                    attributes: e.attributes.clone(),
                })
                .collect(),
            path_definitions: self.paths().iter().map(PathDefinition::from).collect(),
            meta_path_definitions: self
                .meta_paths()
                .iter()
                .map(MetaPathDefinition::from)
                .collect(),
        }
    }

    /// Build a graph from a document.
    ///
    /// Fails with [`Error::AlreadyDefined`] on repeated node keys and with
    /// [`Error::NotFound`] if an edge references an unknown key. Construction
    /// errors are passed through.
    pub fn from_document(doc: GraphDocument) -> Result<Self> {
        let mut keys: HashMap<u64, NodeId> = HashMap::with_capacity(doc.nodes.len());
        let mut nodes = Vec::with_capacity(doc.nodes.len());
        for (pos, jn) in doc.nodes.into_iter().enumerate() {
            let key = jn.id.unwrap_or(pos as u64);
            let node = Node::new(jn.node_type).with_attributes(jn.attributes);
            if keys.insert(key, node.id()).is_some() {
                return Err(Error::AlreadyDefined(format!("node {} in document", key)));
            }
            nodes.push(node);
        }

        let resolve = |key: u64| {
            keys.get(&key)
                .copied()
                .ok_or_else(|| Error::NotFound(format!("node {} in document", key)))
        };
        let mut edges = Vec::with_capacity(doc.edges.len());
        for je in doc.edges {
            let mut edge = Edge::between(resolve(je.source)?, resolve(je.target)?, je.directed)
                .with_type(je.edge_type);
            edge.attributes = je.attributes;
            edges.push(edge);
        }

        let paths = PathSchema::from_mappings(doc.path_definitions.into_iter().map(|p| {
            let [source_type, target_type] = p.node_types;
            EdgeTypeMapping::new(source_type, target_type, p.edge_type)
        }));
        let meta_paths = doc
            .meta_path_definitions
            .into_iter()
            .map(|m| MetaPath::new(m.path, m.description, m.abbreviation))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "building graph from document"
        );
        HetGraph::with_schema(nodes, edges, paths, meta_paths)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        self.to_document().to_json()
    }

    /// Write the graph as JSON to a file.
    pub fn export_to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Read a graph from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Self::from_document(GraphDocument::from_json(s)?)
    }

    /// Read a graph from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
