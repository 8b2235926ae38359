//! Typed edges between nodes.

use crate::{AttributeValue, Attributes, Node, NodeId};
use std::fmt;

/// An edge in a heterogeneous graph.
///
/// The endpoint order is always (source, target), also for undirected edges.
/// An empty `edge_type` means the type is inferred from the path schema of the
/// graph the edge is added to.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Whether the edge is directed.
    pub directed: bool,
    /// Edge type; empty until inferred.
    pub edge_type: String,
    /// Additional attributes.
    pub attributes: Attributes,
}

impl Edge {
    /// Create an untyped edge between two nodes.
    pub fn new(source: &Node, target: &Node, directed: bool) -> Self {
        Self::between(source.id(), target.id(), directed)
    }

    /// Create an untyped edge between two node ids.
    pub fn between(source: NodeId, target: NodeId, directed: bool) -> Self {
        Self {
            source,
            target,
            directed,
            edge_type: String::new(),
            attributes: Attributes::new(),
        }
    }

    /// Set the edge type.
    pub fn with_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_type = edge_type.into();
        self
    }

    /// Add an attribute.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the type still has to be inferred.
    pub fn is_untyped(&self) -> bool {
        self.edge_type.is_empty()
    }

    /// The ordered endpoint pair.
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source,
            target: self.target,
        }
    }

    /// Whether the edge touches the given node.
    pub fn is_incident_to(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    /// Get an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.directed { "->" } else { "--" };
        write!(
            f,
            "{} {} {} [{}]",
            self.source, arrow, self.target, self.edge_type
        )
    }
}

/// Ordered (source, target) pair used to group parallel edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_ordered() {
        let a = Node::new("A");
        let b = Node::new("B");
        let forward = Edge::new(&a, &b, false);
        let backward = Edge::new(&b, &a, false);
        assert_ne!(forward.key(), backward.key());
        assert!(forward.is_incident_to(b.id()));
    }

    #[test]
    fn untyped_until_set() {
        let a = Node::new("A");
        let b = Node::new("B");
        let edge = Edge::new(&a, &b, true);
        assert!(edge.is_untyped());
        assert!(!edge.with_type("writes").is_untyped());
    }
}
