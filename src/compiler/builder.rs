use crate::graph::{FILTER_REJECT_HANDLE, Graph, Node, NodeData, route_handle};
use crate::pipeline::defaults;
use crate::pipeline::*;
use crate::resolver::ConfigResolver;
use tracing::warn;

/// Builds the tagged config of each stage from its node.
///
/// Every drivable field goes through the resolver; a field with neither a
/// wired nor an authored value gets its documented default.
pub(super) struct StageBuilder<'a> {
    graph: &'a Graph,
    resolver: ConfigResolver<'a>,
}

impl<'a> StageBuilder<'a> {
    pub(super) fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            resolver: ConfigResolver::new(graph),
        }
    }

    pub(super) fn source(&self, node: &Node) -> Stage<SourceConfig> {
        let r = &self.resolver;
        let config = match &node.data {
            NodeData::HttpListener(data) => SourceConfig::HttpListener(HttpListenerConfig {
                host: r.string(node, "host").unwrap_or_else(|| defaults::LISTENER_HOST.to_string()),
                port: r.port(node, "port").unwrap_or(defaults::HTTP_PORT),
                path: r.string(node, "path").unwrap_or_else(|| defaults::HTTP_PATH.to_string()),
                methods: if data.methods.is_empty() {
                    vec![defaults::HTTP_METHOD.to_string()]
                } else {
                    data.methods.clone()
                },
            }),
            NodeData::TcpListener(data) => SourceConfig::TcpListener(TcpListenerConfig {
                host: r.string(node, "host").unwrap_or_else(|| defaults::LISTENER_HOST.to_string()),
                port: r.port(node, "port").unwrap_or(defaults::TCP_LISTENER_PORT),
                mllp: data.mllp,
            }),
            NodeData::FileReader(data) => SourceConfig::FileReader(FileReaderConfig {
                directory: r
                    .string(node, "directory")
                    .unwrap_or_else(|| defaults::INPUT_DIRECTORY.to_string()),
                pattern: r.string(node, "pattern").unwrap_or_else(|| defaults::FILE_PATTERN.to_string()),
                poll_interval_ms: positive_or(data.poll_interval_ms, defaults::POLL_INTERVAL_MS),
                delete_after_read: data.delete_after_read,
            }),
            NodeData::Timer(data) => SourceConfig::Timer(TimerConfig {
                interval_ms: r
                    .number(node, "intervalMs")
                    .filter(|ms| *ms > 0)
                    .unwrap_or(defaults::TIMER_INTERVAL_MS),
                payload: data.payload.clone(),
            }),
            NodeData::ManualTrigger(data) => SourceConfig::ManualTrigger(ManualTriggerConfig {
                payload: data.payload.clone(),
            }),
            _ => {
                warn!(node_id = %node.id, kind = node.type_tag(), "entry node is not a source, using placeholder");
                SourceConfig::placeholder()
            }
        };
        Stage::new(node.id.clone(), stage_name(node), config)
    }

    pub(super) fn processor(&self, node: &Node) -> Stage<ProcessorConfig> {
        let r = &self.resolver;
        let config = match &node.data {
            NodeData::Hl7Parser(data) => ProcessorConfig::Hl7Parser(Hl7ParserConfig {
                version: non_empty_or(&data.version, defaults::HL7_VERSION),
                strict: data.strict,
            }),
            NodeData::FhirConverter(data) => ProcessorConfig::FhirConverter(FhirConverterConfig {
                resource_type: non_empty_or(&data.resource_type, defaults::FHIR_RESOURCE_TYPE),
                fhir_version: non_empty_or(&data.fhir_version, defaults::FHIR_VERSION),
            }),
            NodeData::LuaScript(data) => ProcessorConfig::LuaScript(LuaScriptConfig {
                script: r.string(node, "script").unwrap_or_default(),
                timeout_ms: positive_or(data.timeout_ms, defaults::SCRIPT_TIMEOUT_MS),
            }),
            NodeData::Mapper(data) => ProcessorConfig::Mapper(MapperConfig {
                mappings: data
                    .mappings
                    .iter()
                    .filter(|m| !m.from.is_empty() && !m.to.is_empty())
                    .map(|m| MappingConfig {
                        from: m.from.clone(),
                        to: m.to.clone(),
                    })
                    .collect(),
            }),
            NodeData::Filter(data) => ProcessorConfig::Filter(FilterConfig {
                condition: data.condition.clone(),
                reject_target: self.target_of(node, FILTER_REJECT_HANDLE),
            }),
            NodeData::Router(data) => ProcessorConfig::Router(RouterConfig {
                routes: data
                    .routes
                    .iter()
                    .enumerate()
                    .map(|(index, route)| {
                        let handle = route_handle(index);
                        RouteConfig {
                            name: non_empty_or(&route.name, &format!("Route {}", index + 1)),
                            condition: route.condition.clone(),
                            target: self.target_of(node, &handle),
                            handle,
                        }
                    })
                    .collect(),
            }),
            NodeData::Merge(data) => ProcessorConfig::Merge(MergeConfig {
                wait_for_all: data.wait_for_all,
            }),
            other => {
                warn!(node_id = %node.id, kind = other.type_tag(), "no stage builder for node type, emitting passthrough");
                ProcessorConfig::Passthrough(PassthroughConfig {
                    node_type: other.type_tag().to_string(),
                })
            }
        };
        Stage::new(node.id.clone(), stage_name(node), config)
    }

    pub(super) fn destination(&self, node: &Node) -> Stage<DestinationConfig> {
        let r = &self.resolver;
        let config = match &node.data {
            NodeData::FileWriter(data) => DestinationConfig::FileWriter(FileWriterConfig {
                path: r.string(node, "path").unwrap_or_else(|| defaults::OUTPUT_PATH.to_string()),
                filename: r
                    .string(node, "filename")
                    .unwrap_or_else(|| defaults::OUTPUT_FILENAME.to_string()),
                append: data.append,
            }),
            NodeData::HttpSender(data) => DestinationConfig::HttpSender(HttpSenderConfig {
                url: r.string(node, "url").unwrap_or_else(|| defaults::HTTP_SENDER_URL.to_string()),
                method: non_empty_or(&data.method, defaults::HTTP_METHOD).to_uppercase(),
                headers: data.headers.clone(),
                timeout_ms: positive_or(data.timeout_ms, defaults::SEND_TIMEOUT_MS),
                api_key: data.api_key.clone().filter(|k| !k.is_empty()),
            }),
            NodeData::TcpSender(data) => DestinationConfig::TcpSender(TcpSenderConfig {
                host: r.string(node, "host").unwrap_or_else(|| defaults::SENDER_HOST.to_string()),
                port: r.port(node, "port").unwrap_or(defaults::TCP_SENDER_PORT),
                mllp: data.mllp,
                timeout_ms: positive_or(data.timeout_ms, defaults::SEND_TIMEOUT_MS),
            }),
            NodeData::DatabaseWriter(data) => DestinationConfig::DatabaseWriter(DatabaseWriterConfig {
                connection_string: r.string(node, "connectionString"),
                table: r.string(node, "table").unwrap_or_else(|| defaults::DATABASE_TABLE.to_string()),
                password: data.password.clone().filter(|p| !p.is_empty()),
            }),
            NodeData::Console(data) => DestinationConfig::Console(ConsoleConfig {
                prefix: data.prefix.clone(),
            }),
            other => {
                warn!(node_id = %node.id, kind = other.type_tag(), "node is not a destination, using default destination");
                DestinationConfig::default()
            }
        };
        Stage::new(node.id.clone(), stage_name(node), config)
    }

    /// Node wired to the given output handle of `node`, if any.
    fn target_of(&self, node: &Node, handle: &str) -> Option<String> {
        self.graph
            .outgoing(&node.id)
            .find(|e| e.is_flow() && e.source_handle.as_deref() == Some(handle))
            .map(|e| e.target.clone())
    }
}

fn stage_name(node: &Node) -> String {
    node.label()
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| node.type_tag())
        .to_string()
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn positive_or(value: u64, default: u64) -> u64 {
    if value == 0 { default } else { value }
}
