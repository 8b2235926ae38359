//! Typed nodes.

use crate::{AttributeValue, Attributes};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique node identifier.
///
/// Ids are handed out by an atomic counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a heterogeneous graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,

    /// Node type (e.g., "Author", "Paper").
    pub node_type: String,

    /// Additional attributes as key-value pairs.
    pub attributes: Attributes,
}

impl Node {
    /// Create a new node of the given type with a fresh id.
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            id: NodeId::next(),
            node_type: node_type.into(),
            attributes: Attributes::new(),
        }
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

    /// Replace all attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// The node's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.node_type, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Node::new("Author");
        let b = Node::new("Author");
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..100).map(|_| NodeId::next()).collect::<Vec<_>>()))
            .collect();
        let mut ids: Vec<NodeId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 400);
    }

    #[test]
    fn clone_keeps_identity() {
        let a = Node::new("Paper").with_attribute("title", "Graphs");
        let copy = a.clone();
        assert_eq!(copy.id(), a.id());
        assert_eq!(copy.attribute("title").and_then(AttributeValue::as_str), Some("Graphs"));
    }
}
