//! Tests for connection rules, cycle detection and graph audits.
mod common;
use channelflow::graph::{Edge, FILTER_PASS_HANDLE};
use channelflow::prelude::*;
use channelflow::validator::creates_cycle;
use common::*;

fn verdict(graph: &Graph, connection: Connection) -> Verdict {
    ConnectionValidator::new(graph).check(&connection)
}

#[test]
fn test_accepts_ordinary_flow() {
    let mut graph = Graph::new();
    let source = place(&mut graph, NodeKind::FileReader, 0);
    let script = place(&mut graph, NodeKind::LuaScript, 1);
    assert_eq!(verdict(&graph, Connection::new(&source, &script)), Verdict::Accepted);
}

#[test]
fn test_rejects_self_loop() {
    let mut graph = Graph::new();
    let mapper = place(&mut graph, NodeKind::Mapper, 0);
    assert_eq!(
        verdict(&graph, Connection::new(&mapper, &mapper)),
        Verdict::Rejected(RejectReason::SelfLoop)
    );
}

#[test]
fn test_rejects_unknown_endpoint() {
    let mut graph = Graph::new();
    let mapper = place(&mut graph, NodeKind::Mapper, 0);
    assert_eq!(
        verdict(&graph, Connection::new(&mapper, "ghost")),
        Verdict::Rejected(RejectReason::UnknownEndpoint("ghost".to_string()))
    );
}

#[test]
fn test_comment_accepts_no_edges() {
    let mut graph = Graph::new();
    let comment = place(&mut graph, NodeKind::Comment, 0);
    let mapper = place(&mut graph, NodeKind::Mapper, 1);

    for connection in [Connection::new(&comment, &mapper), Connection::new(&mapper, &comment)] {
        assert!(matches!(
            verdict(&graph, connection),
            Verdict::Rejected(RejectReason::Annotation(_))
        ));
    }
}

#[test]
fn test_destination_cannot_originate_connections() {
    let (mut graph, ids) = linear_channel();
    let other = place(&mut graph, NodeKind::Console, 3);

    let result = verdict(&graph, Connection::new(&ids.writer, &other));
    assert_eq!(
        result,
        Verdict::Rejected(RejectReason::DestinationAsSource(ids.writer.clone()))
    );
    let reason = result.reason().unwrap();
    assert!(reason.contains("cannot originate connections"), "{}", reason);
}

#[test]
fn test_source_rejects_flow_but_accepts_config() {
    let mut graph = Graph::new();
    let listener = place(&mut graph, NodeKind::HttpListener, 1);
    let mapper = place(&mut graph, NodeKind::Mapper, 0);
    let port = place(&mut graph, NodeKind::Port, 0);

    assert_eq!(
        verdict(&graph, Connection::new(&mapper, &listener)),
        Verdict::Rejected(RejectReason::SourceAsTarget(listener.clone()))
    );
    assert_eq!(
        verdict(&graph, Connection::config(&port, &listener, "port")),
        Verdict::Accepted
    );
}

#[test]
fn test_merge_accepts_fan_in() {
    let mut graph = Graph::new();
    let merge = place(&mut graph, NodeKind::Merge, 1);
    for slot in 0..3 {
        let source = place(&mut graph, NodeKind::Timer, slot);
        wire(&mut graph, &source, &merge);
    }
    assert_eq!(graph.incoming(&merge).count(), 3);
}

#[test]
fn test_rejects_duplicate_wiring() {
    let (graph, ids) = linear_channel();
    assert_eq!(
        verdict(&graph, Connection::new(&ids.source, &ids.parser)),
        Verdict::Rejected(RejectReason::Duplicate)
    );
}

#[test]
fn test_capacity_limits() {
    let (mut graph, ids) = linear_channel();
    let second_parser = place(&mut graph, NodeKind::FhirConverter, 1);
    let second_source = place(&mut graph, NodeKind::Timer, 0);

    // A listener has a single output.
    assert_eq!(
        verdict(&graph, Connection::new(&ids.source, &second_parser)),
        Verdict::Rejected(RejectReason::OutputCapacity {
            node_id: ids.source.clone(),
            max: 1
        })
    );
    // A parser has a single input.
    assert_eq!(
        verdict(&graph, Connection::new(&second_source, &ids.parser)),
        Verdict::Rejected(RejectReason::InputCapacity {
            node_id: ids.parser.clone(),
            max: 1
        })
    );
}

#[test]
fn test_config_edges_do_not_use_flow_capacity() {
    let (mut graph, ids) = linear_channel();
    let address = place(&mut graph, NodeKind::Address, 0);
    let port = place(&mut graph, NodeKind::Port, 0);

    graph.connect(Connection::config(&address, &ids.source, "host")).unwrap();
    graph.connect(Connection::config(&port, &ids.source, "port")).unwrap();
    assert_eq!(graph.incoming(&ids.source).count(), 2);
}

#[test]
fn test_config_handle_rules() {
    let (mut graph, ids) = linear_channel();
    let port = place(&mut graph, NodeKind::Port, 0);
    let other_port = place(&mut graph, NodeKind::Port, 0);

    assert_eq!(
        verdict(&graph, Connection::config(&port, &ids.parser, "version")),
        Verdict::Rejected(RejectReason::UnknownConfigField {
            node_id: ids.parser.clone(),
            field: "version".to_string()
        })
    );

    graph.connect(Connection::config(&port, &ids.source, "port")).unwrap();
    assert_eq!(
        verdict(&graph, Connection::config(&other_port, &ids.source, "port")),
        Verdict::Rejected(RejectReason::ConfigFieldTaken {
            node_id: ids.source.clone(),
            field: "port".to_string()
        })
    );
}

#[test]
fn test_named_outputs() {
    let mut graph = Graph::new();
    let source = place(&mut graph, NodeKind::HttpListener, 0);
    let filter = place(&mut graph, NodeKind::Filter, 1);
    let first = place(&mut graph, NodeKind::Console, 2);
    let second = place(&mut graph, NodeKind::FileWriter, 2);
    wire(&mut graph, &source, &filter);

    assert!(matches!(
        verdict(&graph, Connection::new(&filter, &first)),
        Verdict::Rejected(RejectReason::UnknownOutput { .. })
    ));
    assert!(matches!(
        verdict(&graph, Connection::new(&filter, &first).with_source_handle("maybe")),
        Verdict::Rejected(RejectReason::UnknownOutput { .. })
    ));

    graph
        .connect(Connection::new(&filter, &first).with_source_handle(FILTER_PASS_HANDLE))
        .unwrap();
    assert!(matches!(
        verdict(&graph, Connection::new(&filter, &second).with_source_handle(FILTER_PASS_HANDLE)),
        Verdict::Rejected(RejectReason::OutputTaken { .. })
    ));
}

#[test]
fn test_router_outputs_follow_route_count() {
    let (mut graph, _, router) = routed_channel(3);
    assert_eq!(
        graph.node(&router).unwrap().output_handles(),
        vec!["route-0", "route-1", "route-2"]
    );

    for index in 0..3 {
        let target = place(&mut graph, NodeKind::Console, 2 + index);
        graph
            .connect(Connection::new(&router, &target).with_source_handle(format!("route-{}", index)))
            .unwrap();
    }
    let extra = place(&mut graph, NodeKind::Console, 6);
    assert!(matches!(
        verdict(&graph, Connection::new(&router, &extra).with_source_handle("route-3")),
        Verdict::Rejected(RejectReason::OutputCapacity { max: 3, .. })
    ));
}

#[test]
fn test_rejects_two_node_cycle() {
    let mut graph = Graph::new();
    let a = place(&mut graph, NodeKind::Mapper, 0);
    let b = place(&mut graph, NodeKind::LuaScript, 1);

    // Each direction is structurally legal on an empty graph.
    assert!(ConnectionValidator::new(&graph).check_structure(&Connection::new(&a, &b)).is_ok());
    assert!(ConnectionValidator::new(&graph).check_structure(&Connection::new(&b, &a)).is_ok());

    wire(&mut graph, &a, &b);
    assert_eq!(
        verdict(&graph, Connection::new(&b, &a)),
        Verdict::Rejected(RejectReason::Cycle {
            source_id: b.clone(),
            target_id: a.clone()
        })
    );
}

#[test]
fn test_detects_transitive_cycle() {
    let mut graph = Graph::new();
    let merge = place(&mut graph, NodeKind::Merge, 0);
    let a = place(&mut graph, NodeKind::Mapper, 1);
    let b = place(&mut graph, NodeKind::LuaScript, 2);
    let c = place(&mut graph, NodeKind::Hl7Parser, 3);
    wire(&mut graph, &merge, &a);
    wire(&mut graph, &a, &b);
    wire(&mut graph, &b, &c);

    assert!(creates_cycle(&graph, &Connection::new(&c, &merge)));
    assert!(matches!(
        verdict(&graph, Connection::new(&c, &merge)),
        Verdict::Rejected(RejectReason::Cycle { .. })
    ));
}

#[test]
fn test_cycle_check_through_utility_nodes() {
    let mut graph = Graph::new();
    let text = place(&mut graph, NodeKind::Text, 0);
    let other = place(&mut graph, NodeKind::Text, 1);
    wire(&mut graph, &text, &other);
    assert!(creates_cycle(&graph, &Connection::new(&other, &text)));
}

#[test]
fn test_verdict_unaffected_by_unrelated_nodes() {
    let (mut graph, ids) = linear_channel();
    let probe = Connection::new(&ids.writer, &ids.parser);
    let before = verdict(&graph, probe.clone());

    let timer = place(&mut graph, NodeKind::Timer, 5);
    let console = place(&mut graph, NodeKind::Console, 6);
    wire(&mut graph, &timer, &console);

    assert_eq!(verdict(&graph, probe), before);
}

#[test]
fn test_audit_reports_imported_violations() {
    let (mut graph, ids) = linear_channel();
    let console = place(&mut graph, NodeKind::Console, 3);
    let (nodes, mut edges) = graph.into_parts();
    edges.push(Edge {
        id: "chained".to_string(),
        source: ids.writer.clone(),
        target: console,
        source_handle: None,
        target_handle: None,
    });
    let graph = Graph::from_parts(nodes, edges).unwrap();

    let issues = audit(&graph);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].edge_id, "chained");
    assert!(matches!(issues[0].reason, RejectReason::DestinationAsSource(_)));
}

#[test]
fn test_audit_clean_graph() {
    let (graph, _) = linear_channel();
    assert!(audit(&graph).is_empty());
}
