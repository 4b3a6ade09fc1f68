use crate::graph::{Category, Graph, Node};
use ahash::AHashSet;
use tracing::debug;

/// Nodes selected for the pipeline, in the order they will be emitted.
pub(super) struct Traversal<'a> {
    pub entry: Option<&'a Node>,
    pub processors: Vec<&'a Node>,
    pub destinations: Vec<&'a Node>,
}

/// Picks the entry node: the first real source, else the first manual trigger.
pub fn find_entry(graph: &Graph) -> Option<&Node> {
    fn is_manual(node: &Node) -> bool {
        node.kind().is_some_and(|k| k.is_manual_trigger())
    }
    graph
        .nodes()
        .iter()
        .find(|n| n.category() == Category::Source && !is_manual(n))
        .or_else(|| graph.nodes().iter().find(|n| is_manual(n)))
}

/// Walks from the entry along the first outgoing flow edge of each node, then
/// sweeps up wired destinations the walk did not reach (secondary branches of
/// routers and filters).
pub(super) fn traverse(graph: &Graph) -> Traversal<'_> {
    let entry = find_entry(graph);
    let mut processors = Vec::new();
    let mut destinations = Vec::new();
    let mut visited: AHashSet<&str> = AHashSet::new();

    if let Some(entry) = entry {
        visited.insert(entry.id.as_str());
        let mut current = entry;
        while let Some(next) = graph
            .outgoing(&current.id)
            .find(|e| e.is_flow())
            .and_then(|e| graph.node(&e.target))
        {
            if !visited.insert(next.id.as_str()) {
                debug!(node_id = %next.id, "walk reached a visited node, stopping");
                break;
            }
            match next.category() {
                Category::Processor => processors.push(next),
                Category::Destination => destinations.push(next),
                Category::Source | Category::Utility => {}
            }
            current = next;
        }
    }

    for node in graph.nodes() {
        if visited.contains(node.id.as_str()) || node.category() != Category::Destination {
            continue;
        }
        if graph.incoming(&node.id).next().is_some() {
            debug!(node_id = %node.id, "adding branch destination");
            destinations.push(node);
        }
    }

    Traversal {
        entry,
        processors,
        destinations,
    }
}
