//! hetgraph CLI - heterogeneous graph operations from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Import a CSV (one node per row) and show stats
//! hetgraph stats players.csv --type-column type --connection-column links_to
//!
//! # Convert CSV to the JSON interchange document
//! hetgraph convert players.csv -o players.json --type-column type --connection-column links_to
//!
//! # Project along a registered meta-path
//! hetgraph project graph.json --meta-path APV -o projection.json --combine sum
//!
//! # Network schema and graph as Graphviz DOT
//! hetgraph schema graph.json -o schema.dot
//! hetgraph plot graph.json -o graph.dot --color Author=red --color Paper=blue --layout spring
//! ```

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hetgraph_core::formats::{read_csv_file, CsvImportConfig};
use hetgraph_core::render::{schema_to_dot, to_dot};
use hetgraph_core::{
    create_meta_projection, CombineStrategy, HetGraph, Layout, PlotOptions, ProjectionConfig,
};
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "hetgraph")]
#[command(about = "Heterogeneous graph CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Column options used when the input is a CSV file.
#[derive(Args, Clone)]
struct CsvArgs {
    /// Column holding the node type
    #[arg(long, default_value = "type")]
    type_column: String,

    /// Column holding the list of connected row keys
    #[arg(long, default_value = "connections")]
    connection_column: String,

    /// Column holding the row key
    #[arg(long, default_value = "index")]
    index_column: String,

    /// Create directed edges
    #[arg(long)]
    directed: bool,

    /// Copy a column into a node attribute (NAME=COLUMN, repeatable)
    #[arg(long = "attribute", value_parser = parse_key_val)]
    attributes: Vec<(String, String)>,
}

impl CsvArgs {
    fn to_config(&self) -> CsvImportConfig {
        let mut config = CsvImportConfig::new(&self.type_column, &self.connection_column)
            .with_index_column(&self.index_column)
            .with_directed(self.directed);
        for (name, column) in &self.attributes {
            config = config.with_attribute(name, column);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics about a graph
    Stats {
        /// Input file (JSON, or CSV with --type-column/--connection-column)
        input: PathBuf,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Convert a graph to the JSON interchange document
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file (.json)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Project a graph along a registered meta-path
    Project {
        /// Input file
        input: PathBuf,

        /// Abbreviation of the meta-path
        #[arg(short, long)]
        meta_path: String,

        /// Output file (.json)
        #[arg(short, long)]
        output: PathBuf,

        /// Create directed projection edges
        #[arg(long)]
        directed_output: bool,

        /// Merge parallel projection edges (sum)
        #[arg(long)]
        combine: Option<CombineStrategy>,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Render the network schema as DOT
    Schema {
        /// Input file
        input: PathBuf,

        /// Output file; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Render the graph as DOT
    Plot {
        /// Input file
        input: PathBuf,

        /// Output file (.dot)
        #[arg(short, long)]
        output: PathBuf,

        /// Fill color of a node type (TYPE=COLOR, repeatable)
        #[arg(long = "color", value_parser = parse_key_val)]
        colors: Vec<(String, String)>,

        /// Layout: random, circle or spring
        #[arg(long, default_value = "random")]
        layout: Layout,

        /// Extra graph attribute (KEY=VALUE, repeatable)
        #[arg(long = "graph-attr", value_parser = parse_key_val)]
        extra: Vec<(String, String)>,

        #[command(flatten)]
        csv: CsvArgs,
    },
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {}", s))?;
    Ok((key.to_string(), value.to_string()))
}

/// Used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "hetgraph=info,hetgraph_core=info";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input, csv } => cmd_stats(&input, &csv),
        Commands::Convert { input, output, csv } => cmd_convert(&input, &output, &csv),
        Commands::Project {
            input,
            meta_path,
            output,
            directed_output,
            combine,
            csv,
        } => cmd_project(&input, &meta_path, &output, directed_output, combine, &csv),
        Commands::Schema { input, output, csv } => cmd_schema(&input, output.as_deref(), &csv),
        Commands::Plot {
            input,
            output,
            colors,
            layout,
            extra,
            csv,
        } => cmd_plot(&input, &output, colors, layout, extra, &csv),
    }
}

fn load_graph(path: &Path, csv: &CsvArgs) -> Result<HetGraph> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", path.display()));

    let graph = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv_file(path, &csv.to_config())
            .with_context(|| format!("Failed to parse CSV {}", path.display()))?,
        _ => HetGraph::from_json_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
    };

    pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

fn cmd_stats(input: &Path, csv: &CsvArgs) -> Result<()> {
    let graph = load_graph(input, csv)?;
    let stats = graph.stats();

    println!("Heterogeneous Graph Statistics");
    println!("==============================");
    println!("Nodes:       {}", stats.node_count);
    println!("Edges:       {}", stats.edge_count);
    println!("Node types:  {}", stats.node_type_count);
    println!("Edge types:  {}", stats.edge_type_count);
    println!("Paths:       {}", stats.path_count);
    println!("Meta-paths:  {}", stats.meta_path_count);
    println!("Directed:    {}", stats.directed);

    println!();
    println!("Nodes by type:");
    for (node_type, count) in &stats.nodes_by_type {
        println!("  {:<20} {}", node_type, count);
    }
    println!("Edges by type:");
    for (edge_type, count) in &stats.edges_by_type {
        let name = if edge_type.is_empty() { "(untyped)" } else { edge_type.as_str() };
        println!("  {:<20} {}", name, count);
    }

    Ok(())
}

fn cmd_convert(input: &Path, output: &Path, csv: &CsvArgs) -> Result<()> {
    let graph = load_graph(input, csv)?;

    graph
        .export_to_json(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Converted {} -> {}", input.display(), output.display());
    Ok(())
}

fn cmd_project(
    input: &Path,
    abbreviation: &str,
    output: &Path,
    directed: bool,
    combine: Option<CombineStrategy>,
    csv: &CsvArgs,
) -> Result<()> {
    let graph = load_graph(input, csv)?;
    let meta_path = graph.meta_path(abbreviation).cloned().ok_or_else(|| {
        let known: Vec<String> = graph.defined_meta_paths().into_keys().collect();
        anyhow!(
            "Meta-path {} is not defined (known: {})",
            abbreviation,
            known.join(", ")
        )
    })?;

    let config = ProjectionConfig { directed, combine };
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Projecting along {}...", meta_path));

    let projection = create_meta_projection(&graph, &meta_path, &config)
        .with_context(|| format!("Failed to project along {}", meta_path))?;

    pb.finish_with_message(format!("Projected in {:.2?}", start.elapsed()));

    projection
        .export_to_json(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Projection {}: {} nodes, {} edges -> {}",
        meta_path.abbreviation,
        projection.node_count(),
        projection.edge_count(),
        output.display()
    );
    Ok(())
}

fn cmd_schema(input: &Path, output: Option<&Path>, csv: &CsvArgs) -> Result<()> {
    let graph = load_graph(input, csv)?;
    if graph.paths().is_empty() {
        bail!("{} defines no paths", input.display());
    }
    let dot = schema_to_dot(&graph);

    match output {
        Some(path) => {
            fs::write(path, dot).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote schema to {}", path.display());
        }
        None => print!("{}", dot),
    }
    Ok(())
}

fn cmd_plot(
    input: &Path,
    output: &Path,
    colors: Vec<(String, String)>,
    layout: Layout,
    extra: Vec<(String, String)>,
    csv: &CsvArgs,
) -> Result<()> {
    let graph = load_graph(input, csv)?;
    let options = PlotOptions {
        type_colors: colors.into_iter().collect(),
        layout,
        extra: extra.into_iter().collect(),
    };

    let dot = to_dot(&graph, &options).context("Failed to render graph")?;
    fs::write(output, dot).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {} nodes to {}", graph.node_count(), output.display());
    Ok(())
}
