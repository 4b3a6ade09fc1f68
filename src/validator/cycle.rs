use crate::graph::{Connection, Graph};
use ahash::{AHashMap, AHashSet};

/// Whether adding `connection` to `graph` would close a directed cycle.
///
/// Depth-first search from the connection's source over every edge plus the
/// candidate, tracking the active path. A back edge into the path is a cycle.
/// Runs in O(V + E) and also catches cycles closed through several hops.
pub fn creates_cycle(graph: &Graph, connection: &Connection) -> bool {
    let mut adjacency: AHashMap<&str, Vec<&str>> = AHashMap::new();
    for edge in graph.edges() {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }
    adjacency
        .entry(connection.source.as_str())
        .or_default()
        .push(connection.target.as_str());

    let root = connection.source.as_str();
    let mut finished: AHashSet<&str> = AHashSet::new();
    let mut on_path: AHashSet<&str> = AHashSet::new();
    // (node, index of the next child to visit)
    let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
    on_path.insert(root);

    while let Some((node, next_child)) = stack.last_mut() {
        let children = adjacency.get(*node).map(Vec::as_slice).unwrap_or(&[]);
        match children.get(*next_child) {
            Some(&child) => {
                *next_child += 1;
                if on_path.contains(child) {
                    return true;
                }
                if !finished.contains(child) {
                    on_path.insert(child);
                    stack.push((child, 0));
                }
            }
            None => {
                let node = *node;
                on_path.remove(node);
                finished.insert(node);
                stack.pop();
            }
        }
    }
    false
}
