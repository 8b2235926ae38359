//! Heterogeneous information networks: typed graphs, path schemas and meta-path projections.
//!
//! This crate re-exports `hetgraph-core`. The `hetgraph` command line tool lives in
//! `crates/hetgraph-cli`.
//!
//! # Example
//!
//! ```rust
//! use hetgraph::{Edge, HetGraph, Node, PathSchema};
//!
//! let player = Node::new("Player").with_attribute("Name", "Pedri");
//! let club = Node::new("Club").with_attribute("Name", "FC Barcelona");
//! let plays_for = Edge::new(&player, &club, true);
//!
//! let schema = PathSchema::from_mappings([(("Player", "Club"), "plays_for")]);
//! let graph = HetGraph::with_schema(vec![player, club], vec![plays_for], schema, vec![]).unwrap();
//!
//! let stats = graph.stats();
//! println!("Nodes: {}, Edges: {}", stats.node_count, stats.edge_count);
//! assert_eq!(graph.nodes_of_type("Club").unwrap().len(), 1);
//! ```

// Re-export core types
pub use hetgraph_core::{
    create_meta_projection, parse_timestamp, AttributeValue, Attributes, CombineStrategy,
    DegreeMode, Edge, EdgeKey, EdgeTypeMapping, Error, HetGraph, HetGraphStats, Layout, MetaPath,
    Node, NodeId, NodeTypePair, PathSchema, PlotOptions, ProjectionConfig, Result,
};

pub use hetgraph_core::{engine, formats, petgraph, projection, render};
