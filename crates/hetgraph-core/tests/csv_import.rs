//! CSV import against the players fixture.

use hetgraph_core::formats::{read_csv_file, CsvImportConfig};
use hetgraph_core::{AttributeValue, DegreeMode, MetaPath, PathSchema};
use std::collections::HashSet;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/players.csv")
}

fn config(directed: bool) -> CsvImportConfig {
    CsvImportConfig::new("type", "links_to")
        .with_directed(directed)
        .with_attribute("Name", "name")
}

#[test]
fn test_undirected_import() {
    let graph = read_csv_file(fixture(), &config(false)).unwrap();

    let expected: HashSet<String> = ["Player", "Club", "Stadium"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(graph.node_types(), &expected);
    assert_eq!(
        graph.nodes()[0].attribute("Name").and_then(AttributeValue::as_str),
        Some("Lionel Messi")
    );
    let last = graph.nodes().last().unwrap();
    assert_eq!(last.node_type, "Stadium");
    assert_eq!(last.attribute("Name").and_then(AttributeValue::as_str), Some("Camp Nou"));

    assert!(!graph.is_directed());
    assert_eq!(graph.degrees(DegreeMode::All), vec![1, 2, 1, 4, 4, 2, 2]);
}

#[test]
fn test_directed_import() {
    let graph = read_csv_file(fixture(), &config(true)).unwrap();

    assert!(graph.is_directed());
    assert_eq!(graph.degrees(DegreeMode::In), vec![0, 0, 0, 3, 3, 1, 1]);
    assert_eq!(graph.degrees(DegreeMode::Out), vec![1, 2, 1, 1, 1, 1, 1]);
}

#[test]
fn test_schema_is_forwarded() {
    let paths = PathSchema::from_mappings([
        (("Player", "Club"), "plays_for"),
        (("Club", "Stadium"), "home_ground"),
        (("Stadium", "Club"), "hosts"),
    ]);
    let mp = MetaPath::new(["plays_for", "home_ground"], "where a player plays", "PCS").unwrap();
    let graph = read_csv_file(
        fixture(),
        &config(true).with_paths(paths).with_meta_paths(vec![mp]),
    )
    .unwrap();

    assert_eq!(graph.edges_of_type("plays_for").unwrap().len(), 4);
    assert_eq!(graph.edges_of_type("home_ground").unwrap().len(), 2);
    assert_eq!(graph.edges_of_type("hosts").unwrap().len(), 2);
    assert_eq!(graph.defined_meta_paths()["PCS"], vec!["plays_for", "home_ground"]);
}

#[test]
fn test_missing_file() {
    let err = read_csv_file("does/not/exist.csv", &config(false)).unwrap_err();
    assert!(matches!(err, hetgraph_core::Error::Io(_)));
}
