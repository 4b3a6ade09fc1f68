//! Prelude module for convenient imports
//!
//! Re-exports the types needed to edit, validate, compile and persist a channel.
//!
//! ```rust,no_run
//! use channelflow::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let channel = Channel::load("path/to/channel.json")?;
//! for issue in audit(&channel.graph) {
//!     eprintln!("{}: {}", issue.edge_id, issue.reason);
//! }
//! let spec = channel.compile();
//! println!("{}", spec.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

// Graph model and editing
pub use crate::graph::{Category, Connection, Edge, Graph, History, Node, NodeData, NodeKind, Position};

// Validation and resolution
pub use crate::resolver::ConfigResolver;
pub use crate::validator::{AuditIssue, ConnectionValidator, RejectReason, Verdict, audit};

// Compilation
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::pipeline::{DestinationConfig, PipelineSpec, ProcessorConfig, SourceConfig, Stage};

// Channel documents and metadata
pub use crate::document::Channel;
pub use crate::settings::ChannelSettings;

// Error types
pub use crate::error::{DocumentError, StoreError};
