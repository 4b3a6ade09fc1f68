use super::edge::{Connection, Edge};
use super::kind::{NodeData, NodeKind};
use super::node::{Node, Position};
use crate::error::StoreError;
use crate::resolver::ConfigResolver;
use crate::validator::{ConnectionValidator, RejectReason, Verdict};
use ahash::AHashSet;
use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

/// Offset applied to a duplicated node so it does not sit on top of the original.
pub const DUPLICATE_OFFSET: f64 = 40.0;

/// The nodes and edges of one channel.
///
/// Every operation keeps referential integrity: an edge never references a
/// node that is not in the graph. Operations that fail leave the graph as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a graph from loaded parts, checking id uniqueness and that
    /// every edge endpoint exists.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, StoreError> {
        let mut node_ids = AHashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(StoreError::DuplicateNodeId(node.id.clone()));
            }
        }

        let mut edge_ids = AHashSet::with_capacity(edges.len());
        for edge in &edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(StoreError::DuplicateEdgeId(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(StoreError::DanglingEdge {
                        edge_id: edge.id.clone(),
                        missing_node_id: endpoint.clone(),
                    });
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.node(node_id).is_some()
    }

    /// Edges ending at `node_id`, in insertion order.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Edges starting at `node_id`, in insertion order.
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes, self.edges)
    }

    /// Places a new node of `kind` with its default field bag and returns its id.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> String {
        let id = format!("{}-{}", kind.type_tag(), Uuid::new_v4().simple());
        debug!(node_id = %id, kind = %kind, "adding node");
        self.nodes.push(Node::new(id.clone(), kind, position));
        id
    }

    /// Like `add_node`, for callers holding a raw type tag.
    pub fn add_node_by_type(&mut self, type_tag: &str, position: Position) -> Result<String, StoreError> {
        let kind = NodeKind::from_type_tag(type_tag)
            .ok_or_else(|| StoreError::UnknownNodeType(type_tag.to_string()))?;
        Ok(self.add_node(kind, position))
    }

    /// Inserts a fully formed node under its own id.
    pub fn insert_node(&mut self, node: Node) -> Result<(), StoreError> {
        if self.contains_node(&node.id) {
            return Err(StoreError::DuplicateNodeId(node.id));
        }
        debug!(node_id = %node.id, kind = node.type_tag(), "inserting node");
        self.nodes.push(node);
        Ok(())
    }

    /// Sets one field of a node's bag. No semantic checks happen here; the
    /// compiler decides what a value means.
    pub fn update_field(&mut self, node_id: &str, field: &str, value: Value) -> Result<(), StoreError> {
        let node = self.node_mut(node_id)?;
        node.data
            .set_field(field, value)
            .map_err(|message| StoreError::InvalidField {
                node_id: node_id.to_string(),
                field: field.to_string(),
                message,
            })
    }

    /// Replaces a node's whole bag. The kind may not change.
    pub fn replace_data(&mut self, node_id: &str, data: NodeData) -> Result<(), StoreError> {
        let node = self.node_mut(node_id)?;
        if node.type_tag() != data.type_tag() {
            return Err(StoreError::InvalidField {
                node_id: node_id.to_string(),
                field: "type".to_string(),
                message: format!("cannot change '{}' into '{}'", node.type_tag(), data.type_tag()),
            });
        }
        node.data = data;
        Ok(())
    }

    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<(), StoreError> {
        self.node_mut(node_id)?.position = position;
        Ok(())
    }

    /// Removes a node together with every edge touching it.
    pub fn delete_node(&mut self, node_id: &str) -> Result<Node, StoreError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or_else(|| StoreError::NodeNotFound(node_id.to_string()))?;
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(node_id));
        let node = self.nodes.remove(index);
        info!(
            node_id,
            removed_edges = before - self.edges.len(),
            "deleted node"
        );
        Ok(node)
    }

    /// Removes a node and bridges every predecessor to every successor.
    ///
    /// Each (incoming, outgoing) flow edge pair yields one new edge keeping the
    /// incoming source handle and the outgoing target handle, so a node with
    /// several inputs and outputs multiplies edges. Configuration edges are not
    /// bridged. Bridges that would be self loops or repeat an existing wiring
    /// are skipped. Returns the created edges.
    pub fn delete_node_and_reconnect(&mut self, node_id: &str) -> Result<Vec<Edge>, StoreError> {
        if !self.contains_node(node_id) {
            return Err(StoreError::NodeNotFound(node_id.to_string()));
        }

        let incoming: Vec<Edge> = self.incoming(node_id).filter(|e| e.is_flow()).cloned().collect();
        let outgoing: Vec<Edge> = self.outgoing(node_id).filter(|e| e.is_flow()).cloned().collect();

        let bridges: Vec<Connection> = incoming
            .iter()
            .cartesian_product(outgoing.iter())
            .map(|(inbound, outbound)| Connection {
                source: inbound.source.clone(),
                target: outbound.target.clone(),
                source_handle: inbound.source_handle.clone(),
                target_handle: outbound.target_handle.clone(),
            })
            .filter(|bridge| bridge.source != node_id && bridge.target != node_id)
            .filter(|bridge| bridge.source != bridge.target)
            .collect();

        self.delete_node(node_id)?;

        let mut created = Vec::new();
        for bridge in bridges {
            if self.edges.iter().any(|e| e.same_wiring(&bridge)) {
                debug!(source = %bridge.source, target = %bridge.target, "skipping duplicate bridge edge");
                continue;
            }
            let edge = self.unique_edge(bridge);
            self.edges.push(edge.clone());
            created.push(edge);
        }
        info!(node_id, bridged = created.len(), "deleted node and reconnected neighbours");
        Ok(created)
    }

    /// Copies a node's data under a fresh id. Edges are not copied.
    pub fn duplicate_node(&mut self, node_id: &str) -> Result<String, StoreError> {
        let original = self
            .node(node_id)
            .ok_or_else(|| StoreError::NodeNotFound(node_id.to_string()))?;
        let id = format!("{}-{}", original.type_tag(), Uuid::new_v4().simple());
        let copy = Node {
            id: id.clone(),
            position: original.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
            data: original.data.clone(),
        };
        debug!(node_id, copy_id = %id, "duplicated node");
        self.nodes.push(copy);
        Ok(id)
    }

    /// Validates a connection and adds it when legal. A rejected connection
    /// leaves the edge set untouched.
    pub fn connect(&mut self, connection: Connection) -> Result<String, RejectReason> {
        match ConnectionValidator::new(self).check(&connection) {
            Verdict::Accepted => {
                let edge = self.unique_edge(connection);
                let id = edge.id.clone();
                debug!(edge_id = %id, "connected");
                self.edges.push(edge);
                Ok(id)
            }
            Verdict::Rejected(reason) => {
                debug!(source = %connection.source, target = %connection.target, %reason, "connection rejected");
                Err(reason)
            }
        }
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> Result<Edge, StoreError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or_else(|| StoreError::EdgeNotFound(edge_id.to_string()))?;
        Ok(self.edges.remove(index))
    }

    /// Stores the resolved template of every text node in its display cache.
    /// Compilation never reads the cache.
    pub fn cache_resolved_values(&mut self) {
        let resolved: Vec<(usize, String)> = {
            let resolver = ConfigResolver::new(self);
            self.nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| match &node.data {
                    NodeData::Text(_) => resolver.resolve_text(node).map(|text| (index, text)),
                    _ => None,
                })
                .collect()
        };
        for (index, text) in resolved {
            if let NodeData::Text(data) = &mut self.nodes[index].data {
                data.resolved = Some(text);
            }
        }
    }

    /// Builds the edge for a connection, re-keying it when its derived id is
    /// already taken.
    fn unique_edge(&self, connection: Connection) -> Edge {
        let mut edge = connection.into_edge();
        if self.edge(&edge.id).is_some() {
            edge.id = format!("{}-{}", edge.id, Uuid::new_v4().simple());
        }
        edge
    }

    fn node_mut(&mut self, node_id: &str) -> Result<&mut Node, StoreError> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == node_id)
            .ok_or_else(|| StoreError::NodeNotFound(node_id.to_string()))
    }
}
