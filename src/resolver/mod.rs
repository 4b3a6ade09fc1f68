//! Resolution of node fields that may be driven by configuration nodes.
//!
//! A field is either authored on the node itself or fed by a utility node
//! wired into the `config-<field>` handle. Resolution is read-only and is
//! recomputed from the graph every time it is asked for.

use crate::graph::{CONFIG_HANDLE_PREFIX, Graph, Node, NodeData};
use serde_json::Value;
use tracing::debug;

pub mod template;

/// Resolves effective field values against one graph.
pub struct ConfigResolver<'a> {
    graph: &'a Graph,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// The node feeding `field` of `node_id` through a configuration edge.
    pub fn config_source(&self, node_id: &str, field: &str) -> Option<&'a Node> {
        let edge = self.graph.incoming(node_id).find(|e| {
            e.target_handle
                .as_deref()
                .and_then(|h| h.strip_prefix(CONFIG_HANDLE_PREFIX))
                == Some(field)
        })?;
        self.graph.node(&edge.source)
    }

    /// Effective value of a field: the connected node's value when one is
    /// wired and produces something, the node's own value otherwise.
    pub fn resolve(&self, node: &Node, field: &str) -> Option<Value> {
        self.dynamic_value(node, field)
            .or_else(|| node.data.field(field))
    }

    /// The value a configuration edge injects into `field`, if any.
    pub fn dynamic_value(&self, node: &Node, field: &str) -> Option<Value> {
        let source = self.config_source(&node.id, field)?;
        let value = self.produced_value(source);
        if value.is_none() {
            debug!(node_id = %node.id, field, source_id = %source.id, "configuration source produced no value");
        }
        value
    }

    /// The value a node hands to whatever it is wired into.
    pub fn produced_value(&self, node: &Node) -> Option<Value> {
        let mut path = Vec::new();
        self.produced_value_on_path(node, &mut path)
    }

    /// Resolved template of a text node; `None` for any other kind.
    pub fn resolve_text(&self, node: &Node) -> Option<String> {
        let mut path = Vec::new();
        self.resolve_text_on_path(node, &mut path)
    }

    /// Field as a non-empty string. Numbers are rendered; a wired value of the
    /// wrong shape falls back to the authored one.
    pub fn string(&self, node: &Node, field: &str) -> Option<String> {
        self.coerced(node, field, as_string)
    }

    /// Field as a TCP/UDP port in `1..=65535`.
    pub fn port(&self, node: &Node, field: &str) -> Option<u16> {
        self.coerced(node, field, as_port)
    }

    /// Field as an unsigned integer.
    pub fn number(&self, node: &Node, field: &str) -> Option<u64> {
        self.coerced(node, field, as_number)
    }

    fn coerced<T>(&self, node: &Node, field: &str, coerce: fn(&Value) -> Option<T>) -> Option<T> {
        let dynamic = self.dynamic_value(node, field).and_then(|value| {
            let coerced = coerce(&value);
            if coerced.is_none() {
                debug!(node_id = %node.id, field, %value, "ignoring configuration value of the wrong shape");
            }
            coerced
        });
        dynamic.or_else(|| node.data.field(field).as_ref().and_then(coerce))
    }

    fn produced_value_on_path<'n>(&self, node: &'n Node, path: &mut Vec<&'n str>) -> Option<Value>
    where
        'a: 'n,
    {
        match &node.data {
            NodeData::Port(port) => Some(Value::from(port.port)),
            NodeData::Address(address) => Some(Value::String(address.address.clone())),
            NodeData::Text(_) => self.resolve_text_on_path(node, path).map(Value::String),
            NodeData::Counter(counter) => Some(Value::from(counter.start)),
            data => data
                .field("value")
                .or_else(|| data.field("text"))
                .or_else(|| data.label().map(|label| Value::String(label.to_string()))),
        }
    }

    fn resolve_text_on_path<'n>(&self, node: &'n Node, path: &mut Vec<&'n str>) -> Option<String>
    where
        'a: 'n,
    {
        let NodeData::Text(text) = &node.data else {
            return None;
        };
        if on_path(path, &node.id) {
            return None;
        }
        path.push(node.id.as_str());

        let inputs: Vec<&'a Node> = self
            .graph
            .incoming(&node.id)
            .filter_map(|e| self.graph.node(&e.source))
            .collect();

        let resolved = template::substitute(&text.text, |label| {
            let source = *inputs
                .iter()
                .find(|n| n.label() == Some(label) && !on_path(path, &n.id))?;
            self.produced_value_on_path(source, path)
                .as_ref()
                .and_then(as_string)
        });

        path.pop();
        Some(resolved)
    }
}

fn on_path(path: &[&str], node_id: &str) -> bool {
    path.iter().any(|id| *id == node_id)
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_port(value: &Value) -> Option<u16> {
    let port = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u16::try_from(port).ok().filter(|p| *p != 0)
}

fn as_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
