//! Property tests over random edit sequences.
use channelflow::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Connect(usize, usize, Option<usize>),
    Delete(usize),
    DeleteAndReconnect(usize),
    Duplicate(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let kinds = NodeKind::ALL.len();
    prop_oneof![
        3 => (0..kinds).prop_map(Op::Add),
        4 => (0..16usize, 0..16usize, proptest::option::of(0..3usize))
            .prop_map(|(s, t, h)| Op::Connect(s, t, h)),
        1 => (0..16usize).prop_map(Op::Delete),
        1 => (0..16usize).prop_map(Op::DeleteAndReconnect),
        1 => (0..16usize).prop_map(Op::Duplicate),
    ]
}

fn settings() -> impl Strategy<Value = ChannelSettings> {
    (
        "[a-z]{1,8}",
        "[a-z-]{1,12}",
        any::<bool>(),
        0..10u32,
        proptest::option::of("[a-z0-9-]{1,12}"),
    )
        .prop_map(|(name, channel_name, enabled, max_retries, error_destination_id)| ChannelSettings {
            name,
            channel_name,
            enabled,
            max_retries,
            error_destination_id,
            ..ChannelSettings::default()
        })
}

fn node_id(graph: &Graph, index: usize) -> Option<String> {
    let nodes = graph.nodes();
    (!nodes.is_empty()).then(|| nodes[index % nodes.len()].id.clone())
}

fn output_handle(graph: &Graph, node_id: &str, pick: Option<usize>) -> Option<String> {
    let handles = graph.node(node_id)?.output_handles();
    match pick {
        Some(i) if !handles.is_empty() => Some(handles[i % handles.len()].clone()),
        _ => None,
    }
}

/// Applies one edit. Rejected connections must leave the edge set alone.
fn apply(graph: &mut Graph, op: &Op) {
    match op {
        Op::Add(kind) => {
            graph.add_node(NodeKind::ALL[*kind], Position::default());
        }
        Op::Connect(s, t, handle) => {
            let (Some(source), Some(target)) = (node_id(graph, *s), node_id(graph, *t)) else {
                return;
            };
            let mut connection = Connection::new(&source, &target);
            if let Some(h) = output_handle(graph, &source, *handle) {
                connection = connection.with_source_handle(h);
            }
            let before = graph.edges().to_vec();
            if graph.connect(connection).is_err() {
                assert_eq!(graph.edges(), before.as_slice());
            }
        }
        Op::Delete(i) => {
            if let Some(id) = node_id(graph, *i) {
                graph.delete_node(&id).unwrap();
            }
        }
        Op::DeleteAndReconnect(i) => {
            if let Some(id) = node_id(graph, *i) {
                graph.delete_node_and_reconnect(&id).unwrap();
            }
        }
        Op::Duplicate(i) => {
            if let Some(id) = node_id(graph, *i) {
                graph.duplicate_node(&id).unwrap();
            }
        }
    }
}

proptest! {
    #[test]
    fn edits_preserve_referential_integrity(ops in proptest::collection::vec(op(), 0..40)) {
        let mut graph = Graph::new();
        for op in &ops {
            apply(&mut graph, op);
            let (nodes, edges) = graph.clone().into_parts();
            prop_assert!(Graph::from_parts(nodes, edges).is_ok());
        }
    }

    #[test]
    fn compiled_pipeline_references_existing_nodes(ops in proptest::collection::vec(op(), 0..40)) {
        let mut graph = Graph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let spec = Compiler::builder(&graph).build().compile();
        for id in spec.referenced_node_ids() {
            prop_assert!(graph.contains_node(id), "pipeline references missing node {}", id);
        }
    }

    #[test]
    fn validated_graphs_stay_acyclic(ops in proptest::collection::vec(op(), 0..40)) {
        let mut graph = Graph::new();
        for op in ops.iter().filter(|op| matches!(op, Op::Add(_) | Op::Connect(..))) {
            apply(&mut graph, op);
        }
        prop_assert!(audit(&graph).is_empty());
    }

    #[test]
    fn compilation_is_deterministic(ops in proptest::collection::vec(op(), 0..30)) {
        let mut graph = Graph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let settings = ChannelSettings::default();
        let first = channelflow::compiler::compile(&graph, &settings);
        let second = channelflow::compiler::compile(&graph, &settings);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn export_import_round_trips(
        ops in proptest::collection::vec(op(), 0..30),
        settings in settings(),
    ) {
        let mut graph = Graph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let channel = Channel::new(settings, graph);
        let reimported = Channel::import(&channel.export_json().unwrap()).unwrap();
        prop_assert_eq!(reimported, channel);
    }
}
