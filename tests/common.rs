//! Common test utilities for building channel graphs.
use channelflow::prelude::*;
use serde_json::json;

/// Node ids of the three-stage channel built by [`linear_channel`].
#[allow(dead_code)]
pub struct Linear {
    pub source: String,
    pub parser: String,
    pub writer: String,
}

/// Places a node of `kind` in a row, `slot` columns from the left.
#[allow(dead_code)]
pub fn place(graph: &mut Graph, kind: NodeKind, slot: usize) -> String {
    graph.add_node(kind, Position::new(slot as f64 * 200.0, 0.0))
}

/// Connects two nodes with a plain flow edge, failing the test on rejection.
#[allow(dead_code)]
pub fn wire(graph: &mut Graph, source: &str, target: &str) -> String {
    graph
        .connect(Connection::new(source, target))
        .unwrap_or_else(|reason| panic!("{} -> {} rejected: {}", source, target, reason))
}

/// `httpListener -> hl7Parser -> fileWriter`, the smallest useful channel.
#[allow(dead_code)]
pub fn linear_channel() -> (Graph, Linear) {
    let mut graph = Graph::new();
    let source = place(&mut graph, NodeKind::HttpListener, 0);
    let parser = place(&mut graph, NodeKind::Hl7Parser, 1);
    let writer = place(&mut graph, NodeKind::FileWriter, 2);
    wire(&mut graph, &source, &parser);
    wire(&mut graph, &parser, &writer);
    (
        graph,
        Linear {
            source,
            parser,
            writer,
        },
    )
}

/// A router with `routes` authored routes, fed by a TCP listener.
#[allow(dead_code)]
pub fn routed_channel(routes: usize) -> (Graph, String, String) {
    let mut graph = Graph::new();
    let source = place(&mut graph, NodeKind::TcpListener, 0);
    let router = place(&mut graph, NodeKind::Router, 1);
    let authored: Vec<_> = (0..routes)
        .map(|i| json!({ "name": format!("Route {}", i + 1), "condition": format!("msh.9 == 'A0{}'", i + 1) }))
        .collect();
    graph
        .update_field(&router, "routes", json!(authored))
        .expect("routes should be settable");
    wire(&mut graph, &source, &router);
    (graph, source, router)
}

/// A minimal exported document with hand-written ids.
#[allow(dead_code)]
pub fn sample_document() -> serde_json::Value {
    json!({
        "version": "1.0",
        "name": "Lab results",
        "channelName": "lab-results",
        "channelId": "0b0f6a3e-5d0c-4f43-9c56-2a7e6b1d4c11",
        "maxRetries": 5,
        "errorDestinationId": "errors",
        "nodes": [
            { "id": "in", "type": "tcpListener", "position": { "x": 0.0, "y": 0.0 },
              "data": { "label": "MLLP in", "host": "0.0.0.0", "port": 2575, "mllp": true } },
            { "id": "parse", "type": "hl7Parser", "position": { "x": 200.0, "y": 0.0 },
              "data": { "label": "Parse", "version": "2.5.1", "strict": true } },
            { "id": "db", "type": "databaseWriter", "position": { "x": 400.0, "y": 0.0 },
              "data": { "label": "Store", "connectionString": "postgres://lab:pw@db/lab", "table": "results", "password": "pw" } },
            { "id": "errors", "type": "console", "position": { "x": 400.0, "y": 200.0 },
              "data": { "label": "Errors", "prefix": "[err]" } }
        ],
        "edges": [
            { "id": "e1", "source": "in", "target": "parse" },
            { "id": "e2", "source": "parse", "target": "db" }
        ],
        "exportedAt": "2026-01-05T10:00:00Z"
    })
}
