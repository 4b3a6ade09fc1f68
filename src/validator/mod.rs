//! Connection rules for the channel graph.
//!
//! A prospective edge is accepted only when it is structurally legal and does
//! not close a cycle. The validator never mutates the graph; rejections are
//! values, not errors.

use crate::graph::{Category, Connection, Graph, Node};
use thiserror::Error;

mod audit;
mod cycle;

pub use audit::{AuditIssue, audit};
pub use cycle::creates_cycle;

/// Why a connection was refused. The `Display` form is meant for the operator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Node '{0}' does not exist")]
    UnknownEndpoint(String),

    #[error("A node cannot be connected to itself")]
    SelfLoop,

    #[error("Comment node '{0}' cannot be connected")]
    Annotation(String),

    #[error("Destination '{0}' cannot originate connections; destinations are pipeline sinks")]
    DestinationAsSource(String),

    #[error("Source '{0}' cannot receive messages; only configuration handles accept edges")]
    SourceAsTarget(String),

    #[error("These nodes are already connected this way")]
    Duplicate,

    #[error("Node '{node_id}' accepts at most {max} incoming connection(s)")]
    InputCapacity { node_id: String, max: usize },

    #[error("Node '{node_id}' allows at most {max} outgoing connection(s)")]
    OutputCapacity { node_id: String, max: usize },

    #[error("Node '{node_id}' has no output named '{handle}'")]
    UnknownOutput { node_id: String, handle: String },

    #[error("Output '{handle}' of node '{node_id}' is already connected")]
    OutputTaken { node_id: String, handle: String },

    #[error("Node '{node_id}' has no configurable field '{field}'")]
    UnknownConfigField { node_id: String, field: String },

    #[error("Field '{field}' of node '{node_id}' is already driven by another node")]
    ConfigFieldTaken { node_id: String, field: String },

    #[error("Connecting '{source_id}' to '{target_id}' would create a cycle")]
    Cycle { source_id: String, target_id: String },
}

/// Outcome of checking a prospective connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// Human-readable reason, present only on rejection.
    pub fn reason(&self) -> Option<String> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(reason) => Some(reason.to_string()),
        }
    }
}

/// Checks prospective connections against a graph.
pub struct ConnectionValidator<'a> {
    graph: &'a Graph,
}

impl<'a> ConnectionValidator<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// Runs the structural rules, then the cycle check.
    pub fn check(&self, connection: &Connection) -> Verdict {
        if let Err(reason) = self.check_structure(connection) {
            return Verdict::Rejected(reason);
        }
        if creates_cycle(self.graph, connection) {
            return Verdict::Rejected(RejectReason::Cycle {
                source_id: connection.source.clone(),
                target_id: connection.target.clone(),
            });
        }
        Verdict::Accepted
    }

    /// Structural legality only: endpoint categories, handles and capacities.
    pub fn check_structure(&self, connection: &Connection) -> Result<(), RejectReason> {
        let source = self.endpoint(&connection.source)?;
        let target = self.endpoint(&connection.target)?;

        if source.id == target.id {
            return Err(RejectReason::SelfLoop);
        }
        for node in [source, target] {
            if node.kind().is_some_and(|k| k.is_annotation()) {
                return Err(RejectReason::Annotation(node.id.clone()));
            }
        }
        if source.category() == Category::Destination {
            return Err(RejectReason::DestinationAsSource(source.id.clone()));
        }

        let is_config = connection.is_config();
        let fan_in = target.kind().is_some_and(|k| k.accepts_fan_in());
        if target.category() == Category::Source && !is_config && !fan_in {
            return Err(RejectReason::SourceAsTarget(target.id.clone()));
        }

        if self.graph.edges().iter().any(|e| e.same_wiring(connection)) {
            return Err(RejectReason::Duplicate);
        }

        match connection.config_field() {
            Some(field) => self.check_config_handle(target, field),
            None => {
                self.check_output(source, connection.source_handle.as_deref())?;
                self.check_input(target)
            }
        }
    }

    fn endpoint(&self, node_id: &str) -> Result<&'a Node, RejectReason> {
        self.graph
            .node(node_id)
            .ok_or_else(|| RejectReason::UnknownEndpoint(node_id.to_string()))
    }

    /// Configuration handles carry one value each and must name a drivable field.
    fn check_config_handle(&self, target: &Node, field: &str) -> Result<(), RejectReason> {
        let drivable = target
            .kind()
            .is_some_and(|k| k.config_fields().contains(&field));
        if !drivable {
            return Err(RejectReason::UnknownConfigField {
                node_id: target.id.clone(),
                field: field.to_string(),
            });
        }
        let taken = self
            .graph
            .incoming(&target.id)
            .any(|e| e.config_field() == Some(field));
        if taken {
            return Err(RejectReason::ConfigFieldTaken {
                node_id: target.id.clone(),
                field: field.to_string(),
            });
        }
        Ok(())
    }

    fn check_output(&self, source: &Node, handle: Option<&str>) -> Result<(), RejectReason> {
        let used = self.graph.outgoing(&source.id).filter(|e| e.is_flow()).count();
        if let Some(max) = source.capacity().max_out {
            if used >= max {
                return Err(RejectReason::OutputCapacity {
                    node_id: source.id.clone(),
                    max,
                });
            }
        }

        if source.kind().is_some_and(|k| k.has_named_outputs()) {
            let handle = handle.unwrap_or_default();
            if !source.output_handles().iter().any(|h| h == handle) {
                return Err(RejectReason::UnknownOutput {
                    node_id: source.id.clone(),
                    handle: handle.to_string(),
                });
            }
            let taken = self
                .graph
                .outgoing(&source.id)
                .any(|e| e.is_flow() && e.source_handle.as_deref() == Some(handle));
            if taken {
                return Err(RejectReason::OutputTaken {
                    node_id: source.id.clone(),
                    handle: handle.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_input(&self, target: &Node) -> Result<(), RejectReason> {
        let used = self.graph.incoming(&target.id).filter(|e| e.is_flow()).count();
        match target.capacity().max_in {
            Some(max) if used >= max => Err(RejectReason::InputCapacity {
                node_id: target.id.clone(),
                max,
            }),
            _ => Ok(()),
        }
    }
}
