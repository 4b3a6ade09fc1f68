//! # channelflow - Channel Graph Compiler
//!
//! **channelflow** holds the model behind a visual message-channel editor. An
//! operator places typed nodes (listeners, parsers, scripts, writers and small
//! utility nodes that feed values into other nodes' fields) and wires them
//! together; this crate keeps that graph consistent and turns it into the
//! pipeline specification an execution backend deploys.
//!
//! ## Core Workflow
//!
//! 1.  **Edit**: Mutate a [`graph::Graph`] through its store operations. Every
//!     connection goes through the [`validator::ConnectionValidator`] first.
//! 2.  **Resolve**: The [`resolver::ConfigResolver`] follows `config-` edges to
//!     find the effective value of fields driven by utility nodes.
//! 3.  **Compile**: [`compiler::Compiler`] walks the graph from its entry source
//!     and emits a [`pipeline::PipelineSpec`].
//! 4.  **Persist**: [`document::Channel`] imports, exports and sanitises whole
//!     channels.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use channelflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = Graph::new();
//!     let listener = graph.add_node(NodeKind::TcpListener, Position::new(0.0, 0.0));
//!     let parser = graph.add_node(NodeKind::Hl7Parser, Position::new(200.0, 0.0));
//!     let writer = graph.add_node(NodeKind::FileWriter, Position::new(400.0, 0.0));
//!     let port = graph.add_node(NodeKind::Port, Position::new(0.0, 150.0));
//!
//!     graph.connect(Connection::new(&listener, &parser))?;
//!     graph.connect(Connection::new(&parser, &writer))?;
//!     graph.update_field(&port, "port", serde_json::json!(2575))?;
//!     graph.connect(Connection::config(&port, &listener, "port"))?;
//!
//!     let spec = Compiler::builder(&graph).with_name("ADT feed").build().compile();
//!     println!("{}", spec.to_json_pretty()?);
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod document;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod prelude;
pub mod resolver;
pub mod settings;
pub mod validator;
