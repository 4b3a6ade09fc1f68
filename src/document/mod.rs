//! Import, export and persistence of whole channels.
//!
//! A channel document is validated in full before anything is built from it,
//! so a failed import never touches an existing [`Channel`].

mod format;

pub use format::{ChannelDocument, DOCUMENT_VERSION, SENSITIVE_KEYS, strip_sensitive};

use crate::compiler::Compiler;
use crate::error::DocumentError;
use crate::graph::{Edge, Graph, Node};
use crate::pipeline::{PipelineSpec, defaults};
use crate::settings::{ChannelSettings, is_valid_channel_id, new_channel_id};
use chrono::Utc;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// A channel being edited: its metadata plus its graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub settings: ChannelSettings,
    pub graph: Graph,
}

impl Channel {
    pub fn new(settings: ChannelSettings, graph: Graph) -> Self {
        Self { settings, graph }
    }

    /// Parses an exported document or persisted state.
    pub fn import(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut object) = value else {
            return Err(DocumentError::MissingNodes);
        };

        let raw_nodes = match object.remove("nodes") {
            None | Some(Value::Null) => return Err(DocumentError::MissingNodes),
            Some(Value::Array(nodes)) => nodes,
            Some(_) => return Err(DocumentError::NodesNotArray),
        };
        let raw_edges = match object.remove("edges") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(edges)) => edges,
            Some(_) => return Err(DocumentError::EdgesNotArray),
        };

        let nodes = raw_nodes
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value::<Node>(raw).map_err(|e| DocumentError::MalformedNode {
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let edges = raw_edges
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                serde_json::from_value::<Edge>(raw).map_err(|e| DocumentError::MalformedEdge {
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let graph = Graph::from_parts(nodes, edges)?;
        let settings = read_settings(&object);
        info!(
            channel = %settings.channel_name,
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "imported channel document"
        );
        Ok(Self { settings, graph })
    }

    /// Same as [`Channel::import`]; persisted state simply lacks the export
    /// header.
    pub fn restore(json: &str) -> Result<Self, DocumentError> {
        Self::import(json)
    }

    /// Replaces this channel with the one in `json`. On error nothing changes.
    pub fn replace_from(&mut self, json: &str) -> Result<(), DocumentError> {
        *self = Self::import(json)?;
        Ok(())
    }

    pub fn export(&self) -> ChannelDocument {
        ChannelDocument {
            version: Some(DOCUMENT_VERSION.to_string()),
            exported_at: Some(Utc::now()),
            ..self.document()
        }
    }

    pub fn export_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// The form kept in local storage: no export header and no credentials.
    pub fn persisted_state(&self) -> Result<Value, DocumentError> {
        let mut value = serde_json::to_value(self.document())?;
        let stripped = strip_sensitive(&mut value);
        if stripped > 0 {
            debug!(stripped, "removed sensitive values from persisted state");
        }
        Ok(value)
    }

    pub fn persisted_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.persisted_state()?)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        Self::import(&content)
    }

    /// Writes the export form of the channel.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        fs::write(path, self.export_json()?).map_err(|e| io_error(path, e))
    }

    /// Writes the persisted-state form of the channel.
    pub fn save_persisted(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        fs::write(path, self.persisted_json()?).map_err(|e| io_error(path, e))
    }

    pub fn compile(&self) -> PipelineSpec {
        Compiler::builder(&self.graph)
            .with_settings(self.settings.clone())
            .build()
            .compile()
    }

    fn document(&self) -> ChannelDocument {
        ChannelDocument {
            version: None,
            name: self.settings.name.clone(),
            channel_name: self.settings.channel_name.clone(),
            channel_id: self.settings.channel_id.clone(),
            enabled: self.settings.enabled,
            max_retries: self.settings.max_retries,
            error_destination_id: self.settings.error_destination_id.clone(),
            nodes: self.graph.nodes().to_vec(),
            edges: self.graph.edges().to_vec(),
            exported_at: None,
        }
    }
}

/// Header fields are read leniently: anything missing or of the wrong shape
/// falls back to its default.
fn read_settings(object: &Map<String, Value>) -> ChannelSettings {
    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    let name = text("name").unwrap_or_else(|| defaults::CHANNEL_NAME.to_string());
    let channel_name = text("channelName").unwrap_or_else(|| name.clone());
    let channel_id = match text("channelId") {
        Some(id) if is_valid_channel_id(&id) => id,
        Some(id) => {
            warn!(channel_id = %id, "channel id is not a v4 uuid, generating a new one");
            new_channel_id()
        }
        None => new_channel_id(),
    };
    let max_retries = object
        .get("maxRetries")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(defaults::MAX_RETRIES);
    let enabled = object.get("enabled").and_then(Value::as_bool).unwrap_or(true);

    ChannelSettings {
        name,
        channel_name,
        channel_id,
        enabled,
        max_retries,
        error_destination_id: text("errorDestinationId"),
    }
}

fn io_error(path: &Path, error: std::io::Error) -> DocumentError {
    DocumentError::Io {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
