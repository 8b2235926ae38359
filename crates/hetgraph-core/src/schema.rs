//! Path schema: which node-type pairs may be connected, and by which edge type.
//!
//! A [`PathSchema`] maps an ordered `(source type, target type)` pair to the edge
//! type that realizes it. Graphs use it to infer the type of untyped edges and to
//! validate typed ones. Entries keep their insertion order, which matters for
//! [`PathSchema::first_pair_for`].
//!
//! # Example
//!
//! ```rust
//! use hetgraph_core::PathSchema;
//!
//! let schema = PathSchema::from_mappings([
//!     (("Author", "Paper"), "writes"),
//!     (("Paper", "Venue"), "published_in"),
//! ]);
//!
//! assert_eq!(schema.lookup("Author", "Paper").unwrap(), "writes");
//! assert!(schema.lookup("Paper", "Author").is_err());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// An ordered pair of node types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeTypePair {
    /// Type of the source node.
    pub source_type: String,
    /// Type of the target node.
    pub target_type: String,
}

impl NodeTypePair {
    /// Create a new pair.
    pub fn new(source_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            target_type: target_type.into(),
        }
    }
}

impl fmt::Display for NodeTypePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.source_type, self.target_type)
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for NodeTypePair {
    fn from((s, t): (S, T)) -> Self {
        Self::new(s, t)
    }
}

/// A single schema entry: node-type pair to edge type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTypeMapping {
    /// The connected node types.
    pub node_types: NodeTypePair,
    /// The edge type realizing the connection.
    pub edge_type: String,
}

impl EdgeTypeMapping {
    /// Create a new mapping.
    pub fn new(
        source_type: impl Into<String>,
        target_type: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            node_types: NodeTypePair::new(source_type, target_type),
            edge_type: edge_type.into(),
        }
    }
}

impl<P: Into<NodeTypePair>, E: Into<String>> From<(P, E)> for EdgeTypeMapping {
    fn from((pair, edge_type): (P, E)) -> Self {
        Self {
            node_types: pair.into(),
            edge_type: edge_type.into(),
        }
    }
}

/// Insertion-ordered mapping `NodeType x NodeType -> EdgeType`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSchema {
    entries: Vec<EdgeTypeMapping>,
    index: HashMap<NodeTypePair, usize>,
}

impl PathSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from mappings.
    ///
    /// Never fails: a repeated pair overwrites the earlier edge type but keeps
    /// the earlier position.
    pub fn from_mappings<I, M>(mappings: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<EdgeTypeMapping>,
    {
        let mut schema = Self::new();
        for mapping in mappings {
            schema.upsert(mapping.into());
        }
        schema
    }

    fn upsert(&mut self, mapping: EdgeTypeMapping) {
        match self.index.get(&mapping.node_types) {
            Some(&pos) => self.entries[pos].edge_type = mapping.edge_type,
            None => {
                self.index
                    .insert(mapping.node_types.clone(), self.entries.len());
                self.entries.push(mapping);
            }
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, m)| (m.node_types.clone(), pos))
            .collect();
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pair is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the edge type for a pair, if registered.
    pub fn get(&self, source_type: &str, target_type: &str) -> Option<&str> {
        let key = NodeTypePair::new(source_type, target_type);
        self.index
            .get(&key)
            .map(|&pos| self.entries[pos].edge_type.as_str())
    }

    /// Get the edge type for a pair.
    ///
    /// Fails with [`Error::NotFound`] if the pair is unregistered.
    pub fn lookup(&self, source_type: &str, target_type: &str) -> Result<&str> {
        self.get(source_type, target_type).ok_or_else(|| {
            Error::NotFound(format!(
                "path ({}, {})",
                source_type, target_type
            ))
        })
    }

    /// Whether a pair is registered.
    pub fn contains(&self, pair: &NodeTypePair) -> bool {
        self.index.contains_key(pair)
    }

    /// Register a new pair.
    ///
    /// Fails with [`Error::AlreadyDefined`] if the pair already exists.
    pub fn add(&mut self, pair: impl Into<NodeTypePair>, edge_type: impl Into<String>) -> Result<()> {
        let pair = pair.into();
        if let Some(existing) = self.get(&pair.source_type, &pair.target_type) {
            return Err(Error::AlreadyDefined(format!(
                "path {} -> {}",
                pair, existing
            )));
        }
        self.upsert(EdgeTypeMapping {
            node_types: pair,
            edge_type: edge_type.into(),
        });
        Ok(())
    }

    /// Remove a pair.
    ///
    /// Fails with [`Error::NotFound`] if the pair is absent and with
    /// [`Error::Conflict`] if it maps to a different edge type than `edge_type`.
    pub fn remove(&mut self, pair: impl Into<NodeTypePair>, edge_type: &str) -> Result<()> {
        let pair = pair.into();
        let pos = *self
            .index
            .get(&pair)
            .ok_or_else(|| Error::NotFound(format!("path {}", pair)))?;
        let current = &self.entries[pos].edge_type;
        if current != edge_type {
            return Err(Error::Conflict {
                source_type: pair.source_type,
                target_type: pair.target_type,
                expected: current.clone(),
                given: edge_type.to_string(),
            });
        }
        self.entries.remove(pos);
        self.reindex();
        Ok(())
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EdgeTypeMapping> {
        self.entries.iter()
    }

    /// First registered pair (in insertion order) that maps to `edge_type`.
    pub fn first_pair_for(&self, edge_type: &str) -> Option<&NodeTypePair> {
        self.entries
            .iter()
            .find(|m| m.edge_type == edge_type)
            .map(|m| &m.node_types)
    }

    /// Number of pairs mapping to `edge_type`.
    pub fn pairs_for_count(&self, edge_type: &str) -> usize {
        self.entries.iter().filter(|m| m.edge_type == edge_type).count()
    }

    /// All node types named by any entry, in first-seen order.
    pub fn node_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for m in &self.entries {
            for t in [&m.node_types.source_type, &m.node_types.target_type] {
                if !seen.contains(&t.as_str()) {
                    seen.push(t);
                }
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a PathSchema {
    type Item = &'a EdgeTypeMapping;
    type IntoIter = std::slice::Iter<'a, EdgeTypeMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> PathSchema {
        PathSchema::from_mappings([
            (("A", "B"), "E1"),
            (("A", "C"), "E2"),
            (("B", "C"), "E3"),
        ])
    }

    #[test]
    fn lookup_registered_and_missing() {
        let s = schema();
        assert_eq!(s.lookup("A", "C").unwrap(), "E2");
        assert!(s.lookup("C", "A").unwrap_err().is_not_found());
    }

    #[test]
    fn duplicate_construction_entries_overwrite() {
        let s = PathSchema::from_mappings([(("A", "B"), "E1"), (("X", "Y"), "E9"), (("A", "B"), "E5")]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.lookup("A", "B").unwrap(), "E5");
        assert_eq!(s.iter().next().unwrap().edge_type, "E5");
    }

    #[test]
    fn add_rejects_existing_pair() {
        let mut s = schema();
        assert!(matches!(s.add(("A", "B"), "E7"), Err(Error::AlreadyDefined(_))));
        s.add(("C", "A"), "E4").unwrap();
        assert_eq!(s.lookup("C", "A").unwrap(), "E4");
    }

    #[test]
    fn remove_checks_edge_type() {
        let mut s = schema();
        assert!(matches!(s.remove(("A", "B"), "E3"), Err(Error::Conflict { .. })));
        assert!(s.remove(("B", "A"), "E1").unwrap_err().is_not_found());
        s.remove(("A", "B"), "E1").unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.lookup("B", "C").unwrap(), "E3");
        assert!(s.get("A", "B").is_none());
    }

    #[test]
    fn first_pair_wins() {
        let s = PathSchema::from_mappings([(("A", "B"), "E1"), (("C", "B"), "E1")]);
        assert_eq!(s.first_pair_for("E1"), Some(&NodeTypePair::new("A", "B")));
        assert_eq!(s.pairs_for_count("E1"), 2);
        assert_eq!(s.node_types(), vec!["A", "B", "C"]);
    }
}
