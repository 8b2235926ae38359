//! CSV import.
//!
//! Every row is a node. One column names the node type, one holds a row key
//! (`index` by default) and one holds a list literal of the row keys the node
//! connects to, e.g. `[3, 4]` or `['a', 'b']`. Nodes are built first, then
//! edges from the connection lists, source row to referenced row.

use crate::{
    AttributeValue, Attributes, Edge, Error, HetGraph, MetaPath, Node, NodeId, PathSchema, Result,
};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// CSV import configuration.
#[derive(Debug, Clone)]
pub struct CsvImportConfig {
    /// Column holding the node type.
    pub type_column: String,
    /// Column holding the list of connected row keys.
    pub connection_column: String,
    /// Column holding the row key.
    pub index_column: String,
    /// Whether created edges are directed.
    pub directed: bool,
    /// Attribute name -> source column.
    pub attribute_columns: BTreeMap<String, String>,
    /// Path schema passed to graph construction.
    pub paths: PathSchema,
    /// Meta-paths passed to graph construction.
    pub meta_paths: Vec<MetaPath>,
}

impl Default for CsvImportConfig {
    fn default() -> Self {
        Self {
            type_column: "type".to_string(),
            connection_column: "connections".to_string(),
            index_column: "index".to_string(),
            directed: false,
            attribute_columns: BTreeMap::new(),
            paths: PathSchema::new(),
            meta_paths: Vec::new(),
        }
    }
}

impl CsvImportConfig {
    /// Configuration for the given type and connection columns.
    pub fn new(type_column: impl Into<String>, connection_column: impl Into<String>) -> Self {
        Self {
            type_column: type_column.into(),
            connection_column: connection_column.into(),
            ..Self::default()
        }
    }

    /// Use another row key column.
    pub fn with_index_column(mut self, column: impl Into<String>) -> Self {
        self.index_column = column.into();
        self
    }

    /// Create directed edges.
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Copy `column` into the node attribute `name`.
    pub fn with_attribute(mut self, name: impl Into<String>, column: impl Into<String>) -> Self {
        self.attribute_columns.insert(name.into(), column.into());
        self
    }

    /// Build the graph with a path schema.
    pub fn with_paths(mut self, paths: PathSchema) -> Self {
        self.paths = paths;
        self
    }

    /// Build the graph with meta-paths.
    pub fn with_meta_paths(mut self, meta_paths: Vec<MetaPath>) -> Self {
        self.meta_paths = meta_paths;
        self
    }
}

/// Read a graph from CSV with a header row.
///
/// Fails with [`Error::NotFound`] if a configured column is missing or a
/// connection references an unknown row key.
pub fn read_csv<R: Read>(reader: R, config: &CsvImportConfig) -> Result<HetGraph> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::NotFound(format!("column {}", name)))
    };
    let type_col = column(&config.type_column)?;
    let conn_col = column(&config.connection_column)?;
    let index_col = column(&config.index_column)?;
    let attr_cols = config
        .attribute_columns
        .iter()
        .map(|(name, col)| Ok((name.clone(), column(col)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut nodes = Vec::new();
    let mut connections: Vec<(NodeId, String)> = Vec::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or_default();

        let mut attributes = Attributes::new();
        for (name, i) in &attr_cols {
            attributes.insert(name.clone(), AttributeValue::infer(field(*i)));
        }
        let node = Node::new(field(type_col)).with_attributes(attributes);

        let key = field(index_col).to_string();
        if ids.insert(key.clone(), node.id()).is_some() {
            return Err(Error::AlreadyDefined(format!("row {}", key)));
        }
        connections.push((node.id(), field(conn_col).to_string()));
        nodes.push(node);
    }

    let mut edges = Vec::new();
    for (source, literal) in &connections {
        for key in parse_list_literal(literal)? {
            let target = ids
                .get(&key)
                .ok_or_else(|| Error::NotFound(format!("row {} referenced by a connection", key)))?;
            edges.push(Edge::between(*source, *target, config.directed));
        }
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        "read graph from CSV"
    );
    HetGraph::with_schema(
        nodes,
        edges,
        config.paths.clone(),
        config.meta_paths.clone(),
    )
}

/// Read a graph from a CSV file.
pub fn read_csv_file(path: impl AsRef<Path>, config: &CsvImportConfig) -> Result<HetGraph> {
    let file = File::open(path)?;
    read_csv(file, config)
}

/// Parse a list literal such as `[1, 2]`, `['a', "b"]` or `[]` into its items.
///
/// An empty cell is an empty list.
fn parse_list_literal(raw: &str) -> Result<Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| raw.strip_prefix('(').and_then(|s| s.strip_suffix(')')))
        .ok_or_else(|| Error::GraphDefinition(format!("not a list literal: {}", raw)))?;

    Ok(inner
        .split(',')
        .map(|item| {
            item.trim()
                .trim_matches(|c| c == '\'' || c == '"')
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect())
}
