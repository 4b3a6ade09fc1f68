//! Linearises a channel graph into a [`PipelineSpec`].
//!
//! Compilation is total: an empty graph, a graph without sources or a graph
//! full of unknown node types still yields a specification, with documented
//! fallbacks standing in for whatever is missing.

use crate::graph::{Category, Graph};
use crate::pipeline::{PipelineSpec, SourceConfig, Stage};
use crate::settings::ChannelSettings;
use tracing::{info, warn};

mod builder;
mod walk;

use builder::StageBuilder;

pub use walk::find_entry;

pub struct Compiler<'a> {
    graph: &'a Graph,
    settings: ChannelSettings,
}

pub struct CompilerBuilder<'a> {
    graph: &'a Graph,
    settings: ChannelSettings,
}

impl<'a> CompilerBuilder<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            settings: ChannelSettings::default(),
        }
    }

    /// Replaces all channel metadata at once.
    pub fn with_settings(mut self, settings: ChannelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.settings.channel_name = name.into();
        self
    }

    pub fn with_channel_id(mut self, id: impl Into<String>) -> Self {
        self.settings.channel_id = id.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.settings.enabled = enabled;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.settings.max_retries = retries;
        self
    }

    pub fn with_error_destination(mut self, node_id: impl Into<String>) -> Self {
        self.settings.error_destination_id = Some(node_id.into());
        self
    }

    pub fn build(self) -> Compiler<'a> {
        Compiler {
            graph: self.graph,
            settings: self.settings,
        }
    }
}

impl<'a> Compiler<'a> {
    pub fn builder(graph: &'a Graph) -> CompilerBuilder<'a> {
        CompilerBuilder::new(graph)
    }

    pub fn settings(&self) -> &ChannelSettings {
        &self.settings
    }

    pub fn compile(&self) -> PipelineSpec {
        let stages = StageBuilder::new(self.graph);
        let traversal = walk::traverse(self.graph);

        let source = match traversal.entry {
            Some(entry) => stages.source(entry),
            None => {
                warn!("graph has no source node, emitting placeholder listener");
                Stage {
                    node_id: None,
                    name: "Default Source".to_string(),
                    config: SourceConfig::placeholder(),
                }
            }
        };

        let processors: Vec<_> = traversal
            .processors
            .iter()
            .map(|node| stages.processor(node))
            .collect();
        let destinations: Vec<_> = traversal
            .destinations
            .iter()
            .map(|node| stages.destination(node))
            .collect();

        let error_destination = self.settings.error_destination_id.as_deref().and_then(|id| {
            match self.graph.node(id) {
                Some(node) => {
                    if node.category() != Category::Destination {
                        warn!(node_id = id, "error destination is not a destination node, using the default");
                    }
                    Some(stages.destination(node))
                }
                None => {
                    warn!(node_id = id, "error destination no longer exists, omitting it");
                    None
                }
            }
        });

        info!(
            channel = %self.channel_name(),
            source = source.config.type_tag(),
            processors = processors.len(),
            destinations = destinations.len(),
            "compiled channel"
        );

        PipelineSpec {
            id: self.settings.channel_id.clone(),
            name: self.channel_name().to_string(),
            enabled: self.settings.enabled,
            source,
            processors,
            destinations,
            error_destination,
            max_retries: self.settings.max_retries,
        }
    }

    /// The backend-facing channel name, falling back to the project name.
    fn channel_name(&self) -> &str {
        if self.settings.channel_name.trim().is_empty() {
            &self.settings.name
        } else {
            &self.settings.channel_name
        }
    }
}

/// Compiles `graph` with the given channel metadata.
pub fn compile(graph: &Graph, settings: &ChannelSettings) -> PipelineSpec {
    Compiler::builder(graph)
        .with_settings(settings.clone())
        .build()
        .compile()
}
