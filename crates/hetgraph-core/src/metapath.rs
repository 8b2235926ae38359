//! Meta-path definitions.

use crate::{Error, Result};
use std::fmt;

/// A semantic path pattern: an ordered sequence of edge types.
///
/// Meta-paths do not reference concrete nodes; instances are found by
/// [`crate::projection::create_meta_projection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaPath {
    path: Vec<String>,
    /// Free-text description.
    pub description: String,
    /// Identifier, unique among a graph's meta-paths.
    pub abbreviation: String,
}

impl MetaPath {
    /// Create a meta-path.
    ///
    /// Fails with [`Error::GraphDefinition`] if `path` is empty.
    pub fn new<I, S>(
        path: I,
        description: impl Into<String>,
        abbreviation: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        let abbreviation = abbreviation.into();
        if path.is_empty() {
            return Err(Error::GraphDefinition(format!(
                "meta-path {} has no edge types",
                abbreviation
            )));
        }
        Ok(Self {
            path,
            description: description.into(),
            abbreviation,
        })
    }

    /// The edge-type sequence.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Number of hops.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// First edge type of the sequence.
    pub fn first(&self) -> &str {
        &self.path[0]
    }

    /// Last edge type of the sequence.
    pub fn last(&self) -> &str {
        &self.path[self.path.len() - 1]
    }

    /// Whether a sequence of edge types equals this meta-path.
    pub fn matches<S: AsRef<str>>(&self, edge_types: &[S]) -> bool {
        self.path.len() == edge_types.len()
            && self
                .path
                .iter()
                .zip(edge_types)
                .all(|(a, b)| a == b.as_ref())
    }
}

impl fmt::Display for MetaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.abbreviation, self.path.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_derived() {
        let mp = MetaPath::new(["E1", "E3"], "A to C via B", "ABC").unwrap();
        assert_eq!(mp.len(), 2);
        assert_eq!(mp.first(), "E1");
        assert_eq!(mp.last(), "E3");
        assert!(mp.matches(&["E1", "E3"]));
        assert!(!mp.matches(&["E3", "E1"]));
        assert!(!mp.matches(&["E1"]));
    }

    #[test]
    fn empty_path_is_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            MetaPath::new(empty, "", "nothing"),
            Err(Error::GraphDefinition(_))
        ));
    }
}
