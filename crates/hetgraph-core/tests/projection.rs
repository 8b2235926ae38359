//! Meta-path projection scenarios.

use hetgraph_core::{
    create_meta_projection, CombineStrategy, Edge, Error, HetGraph, MetaPath, Node, NodeId,
    PathSchema, ProjectionConfig, WEIGHT_ATTRIBUTE,
};

fn schema() -> PathSchema {
    PathSchema::from_mappings([
        (("A", "B"), "E1"),
        (("A", "C"), "E2"),
        (("B", "C"), "E3"),
    ])
}

fn abc() -> MetaPath {
    MetaPath::new(["E1", "E3"], "A to C via B", "ABC").unwrap()
}

/// Nodes A,A,B,C,A,B,C (0..6) with directed edges and the ABC meta-path registered.
fn fixture() -> (Vec<Node>, HetGraph) {
    let nodes: Vec<Node> = ["A", "A", "B", "C", "A", "B", "C"]
        .into_iter()
        .map(Node::new)
        .collect();
    let edge = |s: usize, t: usize, ty: &str| Edge::new(&nodes[s], &nodes[t], true).with_type(ty);
    let edges = vec![
        edge(0, 2, "E1"),
        edge(1, 3, "E2"),
        edge(2, 3, "E3"),
        edge(5, 3, "E3"),
        edge(4, 5, "E1"),
        edge(5, 6, "E3"),
        edge(4, 6, "E2"),
    ];
    let graph = HetGraph::with_schema(nodes.clone(), edges, schema(), vec![abc()]).unwrap();
    (nodes, graph)
}

fn has_edge(graph: &HetGraph, source: NodeId, target: NodeId) -> bool {
    graph.find_edge(source, target).is_some()
}

#[test]
fn test_projection_finds_meta_path_instances() {
    let (nodes, graph) = fixture();
    let config = ProjectionConfig::default().with_directed(true);
    let projection = create_meta_projection(&graph, &abc(), &config).unwrap();

    assert!(has_edge(&projection, nodes[0].id(), nodes[3].id()));
    assert!(has_edge(&projection, nodes[4].id(), nodes[3].id()));
    assert!(has_edge(&projection, nodes[4].id(), nodes[6].id()));

    assert!(!has_edge(&projection, nodes[1].id(), nodes[3].id()));
    assert!(!has_edge(&projection, nodes[1].id(), nodes[6].id()));
    assert!(!has_edge(&projection, nodes[0].id(), nodes[2].id()));

    assert_eq!(projection.edge_count(), 3);
    assert!(projection.is_directed());
    assert!(projection.edges().iter().all(|e| e.edge_type == "ABC" && e.directed));
}

#[test]
fn test_projection_output_shape() {
    let (nodes, graph) = fixture();
    let projection = create_meta_projection(&graph, &abc(), &ProjectionConfig::default()).unwrap();

    let ids: Vec<NodeId> = projection.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(
        ids,
        vec![nodes[0].id(), nodes[3].id(), nodes[4].id(), nodes[6].id()]
    );
    assert_eq!(projection.paths().len(), 1);
    assert_eq!(projection.paths().lookup("A", "C").unwrap(), "ABC");
    assert!(projection.meta_paths().is_empty());
    assert!(!projection.is_directed());
    assert!(projection.edges().iter().all(|e| e.attributes.is_empty()));

    // the source graph is untouched
    assert_eq!(graph.node_count(), 7);
    assert_eq!(graph.edge_count(), 7);
}

#[test]
fn test_projection_requires_registered_meta_path() {
    let (_, graph) = fixture();
    let unregistered = MetaPath::new(["E1", "E2"], "", "other").unwrap();
    let err = create_meta_projection(&graph, &unregistered, &ProjectionConfig::default()).unwrap_err();
    assert!(err.is_not_found());

    // registration is by sequence, not abbreviation
    let renamed = MetaPath::new(["E1", "E3"], "", "renamed").unwrap();
    assert!(create_meta_projection(&graph, &renamed, &ProjectionConfig::default()).is_ok());
}

#[test]
fn test_undeclared_reverse_hops_yield_no_instance() {
    let (nodes, _) = fixture();
    let edge = |s: usize, t: usize, ty: &str| Edge::new(&nodes[s], &nodes[t], false).with_type(ty);
    let edges = vec![
        edge(0, 2, "E1"),
        edge(2, 3, "E3"),
        edge(5, 3, "E3"),
        edge(4, 5, "E1"),
    ];
    // E3 starts at B and E1 ends at B, so the candidates are B2-C3-B5 and its
    // reverse; no (C, B) path is declared, so both break at the second hop
    let reverse = MetaPath::new(["E3", "E1"], "B to B via C", "BCB").unwrap();
    let mut graph =
        HetGraph::with_schema(nodes.clone(), edges, schema(), vec![reverse.clone()]).unwrap();

    let err = create_meta_projection(&graph, &reverse, &ProjectionConfig::default()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    graph.add_path(("C", "B"), "E1").unwrap();
    let projection = create_meta_projection(&graph, &reverse, &ProjectionConfig::default()).unwrap();
    assert_eq!(projection.edge_count(), 2);
    assert!(has_edge(&projection, nodes[2].id(), nodes[5].id()));
    assert!(has_edge(&projection, nodes[5].id(), nodes[2].id()));
    let ids: Vec<NodeId> = projection.nodes().iter().map(Node::id).collect();
    assert_eq!(ids, vec![nodes[2].id(), nodes[5].id()]);
}

#[test]
fn test_sum_combines_parallel_instances() {
    let (mut nodes, _) = fixture();
    nodes.push(Node::new("B"));
    let edge = |s: usize, t: usize, ty: &str| Edge::new(&nodes[s], &nodes[t], true).with_type(ty);
    let edges = vec![
        edge(0, 2, "E1"),
        edge(2, 3, "E3"),
        edge(4, 5, "E1"),
        edge(5, 6, "E3"),
        edge(4, 7, "E1"),
        edge(7, 6, "E3"),
    ];
    let graph = HetGraph::with_schema(nodes.clone(), edges, schema(), vec![abc()]).unwrap();

    let plain = create_meta_projection(&graph, &abc(), &ProjectionConfig::default()).unwrap();
    assert_eq!(plain.edge_count(), 3);

    let config = ProjectionConfig::default().with_combine(CombineStrategy::Sum);
    let combined = create_meta_projection(&graph, &abc(), &config).unwrap();
    assert_eq!(combined.edge_count(), 2);

    let weight = |s: usize, t: usize| {
        combined
            .find_edge(nodes[s].id(), nodes[t].id())
            .and_then(|e| e.attribute(WEIGHT_ATTRIBUTE))
            .and_then(|w| w.as_int())
    };
    assert_eq!(weight(4, 6), Some(2));
    assert_eq!(weight(0, 3), Some(1));
}

#[test]
fn test_first_schema_match_resolves_endpoints() {
    // Known limitation: E1 is declared for (A, B) and (D, B); the first entry decides
    // the start type, so D nodes never start an instance.
    let nodes: Vec<Node> = ["A", "D", "B", "C"].into_iter().map(Node::new).collect();
    let edges = vec![
        Edge::new(&nodes[0], &nodes[2], false).with_type("E1"),
        Edge::new(&nodes[1], &nodes[2], false).with_type("E1"),
        Edge::new(&nodes[2], &nodes[3], false).with_type("E3"),
    ];
    let paths = PathSchema::from_mappings([
        (("A", "B"), "E1"),
        (("D", "B"), "E1"),
        (("B", "C"), "E3"),
    ]);
    let graph = HetGraph::with_schema(nodes.clone(), edges, paths, vec![abc()]).unwrap();

    let projection = create_meta_projection(&graph, &abc(), &ProjectionConfig::default()).unwrap();
    assert_eq!(projection.edge_count(), 1);
    assert!(has_edge(&projection, nodes[0].id(), nodes[3].id()));
    assert!(!projection.contains_node(nodes[1].id()));
}
