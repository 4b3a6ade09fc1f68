use super::{ConnectionValidator, RejectReason, creates_cycle};
use crate::graph::{Connection, Graph};
use tracing::warn;

/// An existing edge that would not pass validation today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditIssue {
    pub edge_id: String,
    pub reason: RejectReason,
}

/// Re-checks every edge of a graph that may have bypassed the validator, for
/// example after an import.
///
/// Each edge is judged against the graph without itself, so capacity counts and
/// cycle detection see it the way they would have when it was drawn. Every edge
/// on a cycle is reported.
pub fn audit(graph: &Graph) -> Vec<AuditIssue> {
    let mut issues = Vec::new();
    let (nodes, edges) = graph.clone().into_parts();

    for (index, edge) in edges.iter().enumerate() {
        let others: Vec<_> = edges
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| e.clone())
            .collect();
        let Ok(rest) = Graph::from_parts(nodes.clone(), others) else {
            continue;
        };

        let connection = Connection::from(edge);
        let validator = ConnectionValidator::new(&rest);
        let reason = match validator.check_structure(&connection) {
            Err(reason) => Some(reason),
            Ok(()) if creates_cycle(&rest, &connection) => Some(RejectReason::Cycle {
                source_id: edge.source.clone(),
                target_id: edge.target.clone(),
            }),
            Ok(()) => None,
        };

        if let Some(reason) = reason {
            warn!(edge_id = %edge.id, %reason, "edge fails validation");
            issues.push(AuditIssue {
                edge_id: edge.id.clone(),
                reason,
            });
        }
    }
    issues
}
