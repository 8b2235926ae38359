//! Import and export formats.
//!
//! - [`csv`]: one node per row, connections as list literals
//! - [`json`]: the four-array interchange document
//! - [`external`]: import from an existing `petgraph` graph

pub mod csv;
pub mod external;
pub mod json;

pub use self::csv::{read_csv, read_csv_file, CsvImportConfig};
pub use external::{from_petgraph, SOURCE_INDEX_ATTRIBUTE};
pub use json::{GraphDocument, JsonEdge, JsonNode, MetaPathDefinition, PathDefinition};
