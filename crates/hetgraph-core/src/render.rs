//! Graphviz DOT rendering.
//!
//! [`to_dot`] renders the backing engine of a graph with vertices colored by
//! type; [`schema_to_dot`] renders the network schema.

use crate::{Error, HetGraph, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Layout strategy, mapped onto a Graphviz engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Scattered placement.
    #[default]
    Random,
    /// Vertices on a circle.
    Circle,
    /// Force-directed placement.
    Spring,
}

impl Layout {
    /// Graphviz engine name.
    pub fn engine(self) -> &'static str {
        match self {
            Self::Random => "neato",
            Self::Circle => "circo",
            Self::Spring => "fdp",
        }
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "circle" => Ok(Self::Circle),
            "spring" => Ok(Self::Spring),
            other => Err(Error::NotFound(format!("layout {}", other))),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::Circle => "circle",
            Self::Spring => "spring",
        };
        f.write_str(name)
    }
}

/// Rendering options.
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    /// Node type -> fill color. Empty means no colors.
    pub type_colors: BTreeMap<String, String>,
    /// Layout strategy.
    pub layout: Layout,
    /// Extra graph attributes, written as given.
    pub extra: BTreeMap<String, String>,
}

impl PlotOptions {
    /// Set the color of a node type.
    pub fn with_color(mut self, node_type: impl Into<String>, color: impl Into<String>) -> Self {
        self.type_colors.insert(node_type.into(), color.into());
        self
    }

    /// Set the layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Add a graph attribute.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Render the backing graph as DOT.
///
/// Fails with [`Error::NotFound`] if `type_colors` is non-empty and lacks a
/// vertex's type.
pub fn to_dot(graph: &HetGraph, options: &PlotOptions) -> Result<String> {
    let engine = graph.engine();
    let (kind, arrow) = if engine.is_directed() {
        ("digraph", "->")
    } else {
        ("graph", "--")
    };

    let mut out = String::new();
    out.push_str(&format!("{} hetgraph {{\n", kind));
    out.push_str(&format!("  layout=\"{}\";\n", options.layout.engine()));
    for (key, value) in &options.extra {
        out.push_str(&format!("  {}=\"{}\";\n", key, escape_dot(value)));
    }
    if !options.type_colors.is_empty() {
        out.push_str("  node [style=filled];\n");
    }
    out.push('\n');

    for v in engine.vertices() {
        let node_type = engine.vertex_type(v).unwrap_or_default();
        let label = escape_dot(node_type);
        if options.type_colors.is_empty() {
            out.push_str(&format!("  {} [label=\"{}\"];\n", v.index(), label));
        } else {
            let color = options.type_colors.get(node_type).ok_or_else(|| {
                Error::NotFound(format!("color for node type {}", node_type))
            })?;
            out.push_str(&format!(
                "  {} [label=\"{}\", fillcolor=\"{}\"];\n",
                v.index(),
                label,
                escape_dot(color)
            ));
        }
    }

    for (e, s, t) in engine.edges() {
        let label = escape_dot(engine.edge_type(e).unwrap_or_default());
        out.push_str(&format!(
            "  {} {} {} [label=\"{}\"];\n",
            s.index(),
            arrow,
            t.index(),
            label
        ));
    }

    out.push_str("}\n");
    Ok(out)
}

/// Render the network schema as DOT: node types and labeled paths.
pub fn schema_to_dot(graph: &HetGraph) -> String {
    let schema = graph.schema_graph();
    let mut out = String::from("digraph schema {\n  rankdir=LR;\n  node [shape=box];\n\n");
    for v in schema.node_indices() {
        out.push_str(&format!(
            "  {} [label=\"{}\"];\n",
            v.index(),
            escape_dot(&schema[v])
        ));
    }
    for e in schema.edge_indices() {
        if let Some((s, t)) = schema.edge_endpoints(e) {
            out.push_str(&format!(
                "  {} -> {} [label=\"{}\"];\n",
                s.index(),
                t.index(),
                escape_dot(&schema[e])
            ));
        }
    }
    out.push_str("}\n");
    out
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Edge, Node, PathSchema};

    fn graph() -> HetGraph {
        let a = Node::new("Author");
        let p = Node::new("Paper");
        let e = Edge::new(&a, &p, true);
        let schema = PathSchema::from_mappings([(("Author", "Paper"), "writes")]);
        HetGraph::with_schema(vec![a, p], vec![e], schema, vec![]).unwrap()
    }

    #[test]
    fn test_colored_dot() {
        let options = PlotOptions::default()
            .with_color("Author", "red")
            .with_color("Paper", "blue")
            .with_layout(Layout::Circle)
            .with_extra("bgcolor", "white");
        let dot = to_dot(&graph(), &options).unwrap();
        assert!(dot.starts_with("digraph hetgraph {"));
        assert!(dot.contains("layout=\"circo\";"));
        assert!(dot.contains("bgcolor=\"white\";"));
        assert!(dot.contains("[label=\"Author\", fillcolor=\"red\"]"));
        assert!(dot.contains("0 -> 1 [label=\"writes\"]"));
    }

    #[test]
    fn test_missing_color() {
        let options = PlotOptions::default().with_color("Author", "red");
        assert!(to_dot(&graph(), &options).unwrap_err().is_not_found());
    }

    #[test]
    fn test_no_colors() {
        let dot = to_dot(&graph(), &PlotOptions::default()).unwrap();
        assert!(!dot.contains("fillcolor"));
        assert!(dot.contains("layout=\"neato\";"));
    }

    #[test]
    fn test_schema_dot() {
        let dot = schema_to_dot(&graph());
        assert!(dot.contains("0 [label=\"Author\"]"));
        assert!(dot.contains("0 -> 1 [label=\"writes\"]"));
    }

    #[test]
    fn test_dot_lines_are_terminated() {
        let a = Node::new("Author");
        let p = Node::new("Paper");
        let e = Edge::new(&a, &p, false);
        let schema = PathSchema::from_mappings([(("Author", "Paper"), "writes")]);
        let g = HetGraph::with_schema(vec![a, p], vec![e], schema, vec![]).unwrap();

        let dot = to_dot(&g, &PlotOptions::default()).unwrap();
        assert_eq!(
            dot,
            "graph hetgraph {\n  layout=\"neato\";\n\n  0 [label=\"Author\"];\n  1 [label=\"Paper\"];\n  0 -- 1 [label=\"writes\"];\n}\n"
        );
        assert_eq!(
            schema_to_dot(&g),
            "digraph schema {\n  rankdir=LR;\n  node [shape=box];\n\n  0 [label=\"Author\"];\n  1 [label=\"Paper\"];\n  0 -> 1 [label=\"writes\"];\n}\n"
        );
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("Spring".parse::<Layout>().unwrap(), Layout::Spring);
        assert!("grid".parse::<Layout>().is_err());
    }
}
