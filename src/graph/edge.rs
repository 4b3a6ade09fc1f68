use serde::{Deserialize, Serialize};

/// Target handles starting with this prefix mark configuration edges.
pub const CONFIG_HANDLE_PREFIX: &str = "config-";

/// Returns the field name a configuration handle drives, if it is one.
pub fn config_field(target_handle: Option<&str>) -> Option<&str> {
    target_handle.and_then(|handle| handle.strip_prefix(CONFIG_HANDLE_PREFIX))
}

/// Handle id that drives `field` on the target node.
pub fn config_handle(field: &str) -> String {
    format!("{}{}", CONFIG_HANDLE_PREFIX, field)
}

/// A connection between two nodes on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    /// Configuration edges inject a value into one field of their target
    /// instead of carrying messages.
    pub fn is_config(&self) -> bool {
        self.config_field().is_some()
    }

    pub fn is_flow(&self) -> bool {
        !self.is_config()
    }

    pub fn config_field(&self) -> Option<&str> {
        config_field(self.target_handle.as_deref())
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Whether both edges describe the same wiring, ignoring ids.
    pub fn same_wiring(&self, connection: &Connection) -> bool {
        self.source == connection.source
            && self.target == connection.target
            && self.source_handle == connection.source_handle
            && self.target_handle == connection.target_handle
    }
}

/// A prospective edge, not yet part of any graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// A configuration connection driving `field` on `target`.
    pub fn config(source: impl Into<String>, target: impl Into<String>, field: &str) -> Self {
        Self::new(source, target).with_target_handle(config_handle(field))
    }

    pub fn with_source_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_target_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    pub fn is_config(&self) -> bool {
        self.config_field().is_some()
    }

    pub fn config_field(&self) -> Option<&str> {
        config_field(self.target_handle.as_deref())
    }

    /// Id derived from the wiring. Absent handles add no segment, so a
    /// handle-less edge never shares an id with one naming a handle.
    pub fn edge_id(&self) -> String {
        let segment = |node: &str, handle: Option<&str>| match handle {
            Some(handle) => format!("{}:{}", node, handle),
            None => node.to_string(),
        };
        format!(
            "edge-{}-{}",
            segment(&self.source, self.source_handle.as_deref()),
            segment(&self.target, self.target_handle.as_deref()),
        )
    }

    pub fn into_edge(self) -> Edge {
        Edge {
            id: self.edge_id(),
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
        }
    }
}

impl From<&Edge> for Connection {
    fn from(edge: &Edge) -> Self {
        Self {
            source: edge.source.clone(),
            target: edge.target.clone(),
            source_handle: edge.source_handle.clone(),
            target_handle: edge.target_handle.clone(),
        }
    }
}
