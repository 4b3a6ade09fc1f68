//! The compiled pipeline specification handed to the execution backend.
//!
//! Field names are camelCase and stage types are snake_case wire tags
//! (`http_listener`, `lua_script`, `file_writer`, ...). Both are a stable
//! contract with the backend.

pub mod defaults;
pub mod destination;
pub mod processor;
pub mod source;

pub use destination::*;
pub use processor::*;
pub use source::*;

use serde::{Deserialize, Serialize};

/// One stage of the pipeline: the node it came from plus its tagged config.
///
/// Serializes as `{ nodeId, name, type, config }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage<C> {
    /// Absent for the placeholder source of a graph without sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub name: String,
    #[serde(flatten)]
    pub config: C,
}

impl<C> Stage<C> {
    pub fn new(node_id: impl Into<String>, name: impl Into<String>, config: C) -> Self {
        Self {
            node_id: Some(node_id.into()),
            name: name.into(),
            config,
        }
    }
}

/// Backend-executable description of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSpec {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub source: Stage<SourceConfig>,
    pub processors: Vec<Stage<ProcessorConfig>>,
    pub destinations: Vec<Stage<DestinationConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_destination: Option<Stage<DestinationConfig>>,
    pub max_retries: u32,
}

impl PipelineSpec {
    /// Every node id the pipeline refers to, stages first, then route and
    /// reject targets.
    pub fn referenced_node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = std::iter::once(self.source.node_id.as_deref())
            .chain(self.processors.iter().map(|s| s.node_id.as_deref()))
            .chain(self.destinations.iter().map(|s| s.node_id.as_deref()))
            .chain(self.error_destination.iter().map(|s| s.node_id.as_deref()))
            .flatten()
            .collect();
        for stage in &self.processors {
            match &stage.config {
                ProcessorConfig::Router(router) => {
                    ids.extend(router.routes.iter().filter_map(|r| r.target.as_deref()))
                }
                ProcessorConfig::Filter(filter) => ids.extend(filter.reject_target.as_deref()),
                _ => {}
            }
        }
        ids
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
