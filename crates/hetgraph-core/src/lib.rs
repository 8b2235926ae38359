// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_const_for_fn)]

//! Core types for heterogeneous information networks.
//!
//! - [`Node`] / [`Edge`] - typed nodes and edges with attributes
//! - [`PathSchema`] - which node-type pairs connect, and by which edge type
//! - [`MetaPath`] - an ordered sequence of edge types
//! - [`HetGraph`] - the graph, kept in sync with a backing [`engine::Engine`]
//! - [`projection::create_meta_projection`] - collapse meta-path instances into edges
//!
//! # Formats
//!
//! - [`formats::csv`] - one node per row
//! - [`formats::json`] - interchange document
//! - [`formats::external`] - import from `petgraph`
//! - [`render`] - Graphviz DOT
//!
//! # Example
//!
//! ```rust
//! use hetgraph_core::{create_meta_projection, Edge, HetGraph, MetaPath, Node, PathSchema, ProjectionConfig};
//!
//! let author = Node::new("Author");
//! let paper = Node::new("Paper");
//! let venue = Node::new("Venue");
//! let edges = vec![
//!     Edge::new(&author, &paper, false),
//!     Edge::new(&paper, &venue, false),
//! ];
//! let schema = PathSchema::from_mappings([
//!     (("Author", "Paper"), "writes"),
//!     (("Paper", "Venue"), "published_in"),
//! ]);
//! let apv = MetaPath::new(["writes", "published_in"], "author publishes at venue", "APV").unwrap();
//!
//! let graph = HetGraph::with_schema(vec![author, paper, venue], edges, schema, vec![apv.clone()]).unwrap();
//!
//! let projection = create_meta_projection(&graph, &apv, &ProjectionConfig::default()).unwrap();
//! assert_eq!(projection.node_count(), 2);
//! assert_eq!(projection.edge_count(), 1);
//! assert_eq!(projection.edges()[0].edge_type, "APV");
//! ```

mod attribute;
mod edge;
pub mod engine;
mod error;
pub mod formats;
mod graph;
mod metapath;
mod node;
pub mod projection;
pub mod render;
mod schema;

pub use attribute::{parse_timestamp, AttributeValue, Attributes};
pub use edge::{Edge, EdgeKey};
pub use engine::{DegreeMode, Engine, TYPE_ATTRIBUTE};
pub use error::{Error, Result};
pub use graph::{HetGraph, HetGraphStats};
pub use metapath::MetaPath;
pub use node::{Node, NodeId};
pub use projection::{create_meta_projection, CombineStrategy, ProjectionConfig, WEIGHT_ATTRIBUTE};
pub use render::{Layout, PlotOptions};
pub use schema::{EdgeTypeMapping, NodeTypePair, PathSchema};

// Re-export petgraph for callers working with the backing engine
pub use petgraph;
