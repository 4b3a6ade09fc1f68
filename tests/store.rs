//! Tests for graph store operations and undo history.
mod common;
use channelflow::error::StoreError;
use channelflow::graph::{DUPLICATE_OFFSET, FILTER_PASS_HANDLE, FILTER_REJECT_HANDLE, TcpListenerData};
use channelflow::prelude::*;
use common::*;
use serde_json::json;

#[test]
fn test_add_node_uses_kind_defaults() {
    let mut graph = Graph::new();
    let id = graph.add_node(NodeKind::TcpListener, Position::new(10.0, 20.0));

    let node = graph.node(&id).unwrap();
    assert!(id.starts_with("tcpListener-"));
    assert_eq!(node.position, Position::new(10.0, 20.0));
    assert_eq!(node.category(), Category::Source);
    match &node.data {
        NodeData::TcpListener(TcpListenerData { port, mllp, .. }) => {
            assert_eq!(*port, 6661);
            assert!(*mllp);
        }
        other => panic!("unexpected data {:?}", other),
    }
}

#[test]
fn test_add_node_ids_are_unique() {
    let mut graph = Graph::new();
    let a = place(&mut graph, NodeKind::Console, 0);
    let b = place(&mut graph, NodeKind::Console, 1);
    assert_ne!(a, b);
    assert_eq!(graph.nodes().len(), 2);
}

#[test]
fn test_add_node_by_unknown_type_leaves_graph_untouched() {
    let mut graph = Graph::new();
    let result = graph.add_node_by_type("kafkaConsumer", Position::default());
    assert_eq!(result, Err(StoreError::UnknownNodeType("kafkaConsumer".to_string())));
    assert!(graph.nodes().is_empty());
}

#[test]
fn test_update_field_merges_value() {
    let (mut graph, ids) = linear_channel();
    graph.update_field(&ids.writer, "path", json!("/var/out")).unwrap();

    let node = graph.node(&ids.writer).unwrap();
    assert_eq!(node.data.field("path"), Some(json!("/var/out")));
    assert_eq!(node.data.field("label"), Some(json!("File Writer")));
}

#[test]
fn test_update_field_rejects_unknown_field_and_wrong_type() {
    let (mut graph, ids) = linear_channel();
    let before = graph.clone();

    let unknown = graph.update_field(&ids.source, "colour", json!("red"));
    assert!(matches!(unknown, Err(StoreError::InvalidField { ref field, .. }) if field == "colour"));

    let wrong_type = graph.update_field(&ids.source, "port", json!("not a number"));
    assert!(matches!(wrong_type, Err(StoreError::InvalidField { .. })));

    assert_eq!(graph, before);
}

#[test]
fn test_update_field_on_missing_node() {
    let mut graph = Graph::new();
    let result = graph.update_field("ghost", "label", json!("x"));
    assert_eq!(result, Err(StoreError::NodeNotFound("ghost".to_string())));
}

#[test]
fn test_move_node_changes_only_position() {
    let (mut graph, ids) = linear_channel();
    let data = graph.node(&ids.parser).unwrap().data.clone();
    graph.move_node(&ids.parser, Position::new(-5.0, 7.5)).unwrap();

    let node = graph.node(&ids.parser).unwrap();
    assert_eq!(node.position, Position::new(-5.0, 7.5));
    assert_eq!(node.data, data);
}

#[test]
fn test_delete_node_cascades_edges() {
    let (mut graph, ids) = linear_channel();
    graph.delete_node(&ids.parser).unwrap();

    assert!(!graph.contains_node(&ids.parser));
    assert!(graph.edges().is_empty());
    assert_eq!(graph.nodes().len(), 2);
}

#[test]
fn test_delete_missing_node_is_an_error() {
    let (mut graph, _) = linear_channel();
    let before = graph.clone();
    assert!(matches!(graph.delete_node("ghost"), Err(StoreError::NodeNotFound(_))));
    assert_eq!(graph, before);
}

#[test]
fn test_delete_and_reconnect_bridges_neighbours() {
    let (mut graph, ids) = linear_channel();
    let created = graph.delete_node_and_reconnect(&ids.parser).unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].source, ids.source);
    assert_eq!(created[0].target, ids.writer);
    assert_eq!(graph.edges().len(), 1);
    assert!(graph.edges().iter().all(|e| !e.touches(&ids.parser)));
}

#[test]
fn test_delete_and_reconnect_produces_cross_product() {
    let mut graph = Graph::new();
    let merge = place(&mut graph, NodeKind::Merge, 1);
    let router = place(&mut graph, NodeKind::Router, 2);
    graph
        .update_field(&router, "routes", json!([{ "name": "a" }, { "name": "b" }]))
        .unwrap();
    let first = place(&mut graph, NodeKind::HttpListener, 0);
    let second = place(&mut graph, NodeKind::Timer, 0);
    let out_a = place(&mut graph, NodeKind::Console, 3);
    let out_b = place(&mut graph, NodeKind::FileWriter, 3);

    // Predecessors feed a merge so the router below has a single input.
    wire(&mut graph, &first, &merge);
    wire(&mut graph, &second, &merge);
    wire(&mut graph, &merge, &router);
    graph
        .connect(Connection::new(&router, &out_a).with_source_handle("route-0"))
        .unwrap();
    graph
        .connect(Connection::new(&router, &out_b).with_source_handle("route-1"))
        .unwrap();

    let created = graph.delete_node_and_reconnect(&router).unwrap();
    assert_eq!(created.len(), 2);

    // Then dissolve the merge: 2 inputs x 2 outputs.
    let created = graph.delete_node_and_reconnect(&merge).unwrap();
    assert_eq!(created.len(), 4);
    for source in [&first, &second] {
        for target in [&out_a, &out_b] {
            assert!(
                graph.edges().iter().any(|e| &e.source == source && &e.target == target),
                "missing bridge {} -> {}",
                source,
                target
            );
        }
    }
}

#[test]
fn test_delete_and_reconnect_does_not_bridge_config_edges() {
    let (mut graph, ids) = linear_channel();
    let port = place(&mut graph, NodeKind::Port, 0);
    graph.connect(Connection::config(&port, &ids.source, "port")).unwrap();

    let created = graph.delete_node_and_reconnect(&ids.source).unwrap();
    assert!(created.is_empty());
    assert!(graph.edges().iter().all(|e| e.source != port));
}

#[test]
fn test_duplicate_node_copies_data_without_edges() {
    let (mut graph, ids) = linear_channel();
    graph.update_field(&ids.parser, "version", json!("2.7")).unwrap();
    let copy = graph.duplicate_node(&ids.parser).unwrap();

    let original = graph.node(&ids.parser).unwrap().clone();
    let duplicate = graph.node(&copy).unwrap();
    assert_ne!(copy, ids.parser);
    assert_eq!(duplicate.data, original.data);
    assert_eq!(
        duplicate.position,
        original.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET)
    );
    assert_eq!(graph.incoming(&copy).count() + graph.outgoing(&copy).count(), 0);
}

#[test]
fn test_connect_rejection_leaves_edges_unchanged() {
    let (mut graph, ids) = linear_channel();
    let before = graph.edges().to_vec();

    let result = graph.connect(Connection::new(&ids.writer, &ids.source));
    assert!(matches!(result, Err(RejectReason::DestinationAsSource(_))));
    assert_eq!(graph.edges(), before.as_slice());
}

#[test]
fn test_remove_edge() {
    let (mut graph, ids) = linear_channel();
    let edge_id = graph.outgoing(&ids.source).next().unwrap().id.clone();

    let removed = graph.remove_edge(&edge_id).unwrap();
    assert_eq!(removed.target, ids.parser);
    assert!(graph.edge(&edge_id).is_none());
    assert!(matches!(graph.remove_edge(&edge_id), Err(StoreError::EdgeNotFound(_))));
}

#[test]
fn test_edge_ids_distinguish_absent_handles() {
    let mut graph = Graph::new();
    let a = place(&mut graph, NodeKind::Text, 0);
    let b = place(&mut graph, NodeKind::Text, 1);

    let plain = graph.connect(Connection::new(&a, &b)).unwrap();
    let named = graph.connect(Connection::new(&a, &b).with_source_handle("out")).unwrap();
    assert_ne!(plain, named);

    graph.remove_edge(&plain).unwrap();
    assert!(graph.edge(&plain).is_none());
    assert_eq!(graph.edge(&named).map(|e| e.source_handle.as_deref()), Some(Some("out")));
}

#[test]
fn test_colliding_edge_id_is_rekeyed() {
    let mut graph = Graph::new();
    for id in ["a", "a:x", "b"] {
        graph
            .insert_node(Node {
                id: id.to_string(),
                position: Position::default(),
                data: NodeData::from_fields("text", serde_json::Map::new()).unwrap(),
            })
            .unwrap();
    }

    // Both wirings derive the id "edge-a:x-b".
    let first = graph.connect(Connection::new("a", "b").with_source_handle("x")).unwrap();
    let second = graph.connect(Connection::new("a:x", "b")).unwrap();
    assert_eq!(first, "edge-a:x-b");
    assert_ne!(first, second);
    assert!(second.starts_with("edge-a:x-b-"));

    let (nodes, edges) = graph.into_parts();
    assert!(Graph::from_parts(nodes, edges).is_ok());
}

#[test]
fn test_filter_outputs_are_named() {
    let mut graph = Graph::new();
    let source = place(&mut graph, NodeKind::HttpListener, 0);
    let filter = place(&mut graph, NodeKind::Filter, 1);
    let pass = place(&mut graph, NodeKind::FileWriter, 2);
    let reject = place(&mut graph, NodeKind::Console, 2);
    wire(&mut graph, &source, &filter);

    graph
        .connect(Connection::new(&filter, &pass).with_source_handle(FILTER_PASS_HANDLE))
        .unwrap();
    graph
        .connect(Connection::new(&filter, &reject).with_source_handle(FILTER_REJECT_HANDLE))
        .unwrap();
    assert_eq!(graph.outgoing(&filter).count(), 2);
}

#[test]
fn test_from_parts_rejects_dangling_edges() {
    let (graph, ids) = linear_channel();
    let (mut nodes, edges) = graph.into_parts();
    nodes.retain(|n| n.id != ids.writer);

    let result = Graph::from_parts(nodes, edges);
    assert!(matches!(
        result,
        Err(StoreError::DanglingEdge { ref missing_node_id, .. }) if *missing_node_id == ids.writer
    ));
}

#[test]
fn test_from_parts_rejects_duplicate_ids() {
    let (graph, _) = linear_channel();
    let (mut nodes, edges) = graph.into_parts();
    nodes.push(nodes[0].clone());
    assert!(matches!(
        Graph::from_parts(nodes, edges),
        Err(StoreError::DuplicateNodeId(_))
    ));
}

#[test]
fn test_cache_resolved_values_fills_text_nodes() {
    let mut graph = Graph::new();
    let port = place(&mut graph, NodeKind::Port, 0);
    let text = place(&mut graph, NodeKind::Text, 1);
    graph.update_field(&port, "port", json!(9443)).unwrap();
    graph.update_field(&text, "text", json!("https://lab:${Port}/fhir")).unwrap();
    wire(&mut graph, &port, &text);

    graph.cache_resolved_values();
    match &graph.node(&text).unwrap().data {
        NodeData::Text(data) => assert_eq!(data.resolved.as_deref(), Some("https://lab:9443/fhir")),
        other => panic!("unexpected data {:?}", other),
    }
}

#[test]
fn test_history_undo_and_redo() {
    let (mut graph, ids) = linear_channel();
    let mut history = History::default();
    let original = graph.clone();

    history.record(&graph);
    graph.delete_node(&ids.parser).unwrap();
    let edited = graph.clone();

    assert!(history.undo(&mut graph));
    assert_eq!(graph, original);
    assert!(history.can_redo());

    assert!(history.redo(&mut graph));
    assert_eq!(graph, edited);
    assert!(!history.redo(&mut graph));
}

#[test]
fn test_history_drops_oldest_beyond_capacity() {
    let mut graph = Graph::new();
    let mut history = History::with_capacity(2);
    for slot in 0..3 {
        history.record(&graph);
        place(&mut graph, NodeKind::Console, slot);
    }

    assert!(history.undo(&mut graph));
    assert!(history.undo(&mut graph));
    assert!(!history.undo(&mut graph));
    assert_eq!(graph.nodes().len(), 1);
}

#[test]
fn test_history_record_clears_redo() {
    let mut graph = Graph::new();
    let mut history = History::default();
    history.record(&graph);
    place(&mut graph, NodeKind::Console, 0);
    history.undo(&mut graph);

    history.record(&graph);
    place(&mut graph, NodeKind::Timer, 0);
    assert!(!history.can_redo());
}
