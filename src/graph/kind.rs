use super::data::*;
use serde_json::{Map, Value};

/// The role a node plays in a channel, derived from its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Source,
    Processor,
    Destination,
    Utility,
}

impl Category {
    /// Classifies a raw type tag. Unregistered tags are treated as processors so
    /// classification stays total over imported graphs.
    pub fn of(type_tag: &str) -> Category {
        NodeKind::from_type_tag(type_tag)
            .map(NodeKind::category)
            .unwrap_or(Category::Processor)
    }

    /// Connection multiplicities a kind gets unless it declares its own.
    pub fn default_capacity(self) -> Capacity {
        match self {
            Category::Source => Capacity::new(Some(0), Some(1)),
            Category::Destination => Capacity::new(Some(1), Some(0)),
            Category::Processor | Category::Utility => Capacity::new(Some(1), Some(1)),
        }
    }
}

/// Maximum number of flow edges a node accepts on each side. `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub max_in: Option<usize>,
    pub max_out: Option<usize>,
}

impl Capacity {
    pub const fn new(max_in: Option<usize>, max_out: Option<usize>) -> Self {
        Self { max_in, max_out }
    }
}

/// Defines every registered node kind together with its tags, category and
/// field bag type. Generates `NodeKind` and the kind-dispatched parts of `NodeData`.
macro_rules! define_node_kinds {
    ( $( ($variant:ident, $data:ident, $type_tag:literal, $wire_tag:expr, $category:ident) ),* $(,)? ) => {
        /// Closed set of node types the store and compiler understand.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $( $variant, )*
        }

        impl NodeKind {
            pub const ALL: &'static [NodeKind] = &[ $( NodeKind::$variant, )* ];

            /// The tag used by the editor and in channel documents (`httpListener`).
            pub fn type_tag(self) -> &'static str {
                match self { $( NodeKind::$variant => $type_tag, )* }
            }

            /// The tag used in the compiled pipeline (`http_listener`).
            /// Utility kinds never reach the pipeline and have none.
            pub fn wire_tag(self) -> Option<&'static str> {
                match self { $( NodeKind::$variant => $wire_tag, )* }
            }

            pub fn category(self) -> Category {
                match self { $( NodeKind::$variant => Category::$category, )* }
            }

            pub fn from_type_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $type_tag => Some(NodeKind::$variant), )*
                    _ => None,
                }
            }
        }

        /// Typed field bag of a node, one variant per registered kind.
        ///
        /// Nodes whose type tag is not registered keep their raw fields in
        /// `Unknown` so imported documents survive a load/save cycle unchanged.
        #[derive(Debug, Clone, PartialEq)]
        pub enum NodeData {
            $( $variant($data), )*
            Unknown {
                type_name: String,
                fields: Map<String, Value>,
            },
        }

        impl NodeData {
            /// The field bag a freshly placed node of `kind` starts with.
            pub fn default_for(kind: NodeKind) -> Self {
                match kind { $( NodeKind::$variant => NodeData::$variant($data::default()), )* }
            }

            pub fn kind(&self) -> Option<NodeKind> {
                match self {
                    $( NodeData::$variant(_) => Some(NodeKind::$variant), )*
                    NodeData::Unknown { .. } => None,
                }
            }

            pub fn type_tag(&self) -> &str {
                match self {
                    $( NodeData::$variant(_) => $type_tag, )*
                    NodeData::Unknown { type_name, .. } => type_name,
                }
            }

            /// Serializes the bag into its document form.
            pub fn to_fields(&self) -> Map<String, Value> {
                let value = match self {
                    $( NodeData::$variant(data) => serde_json::to_value(data), )*
                    NodeData::Unknown { fields, .. } => return fields.clone(),
                };
                match value {
                    Ok(Value::Object(map)) => map,
                    _ => Map::new(),
                }
            }

            /// Rebuilds a bag from its document form. Missing fields take their
            /// defaults; fields of the wrong type are an error, except numeric
            /// strings in numeric fields.
            pub fn from_fields(type_tag: &str, fields: Map<String, Value>) -> Result<Self, serde_json::Error> {
                match NodeKind::from_type_tag(type_tag) {
                    $( Some(NodeKind::$variant) => serde_json::from_value(Value::Object(fields)).map(NodeData::$variant), )*
                    None => Ok(NodeData::Unknown {
                        type_name: type_tag.to_string(),
                        fields,
                    }),
                }
            }
        }
    };
}

define_node_kinds! {
    // Sources
    (HttpListener, HttpListenerData, "httpListener", Some("http_listener"), Source),
    (TcpListener, TcpListenerData, "tcpListener", Some("tcp_listener"), Source),
    (FileReader, FileReaderData, "fileReader", Some("file_reader"), Source),
    (Timer, TimerData, "timer", Some("timer"), Source),
    (ManualTrigger, ManualTriggerData, "manualTrigger", Some("manual_trigger"), Source),

    // Processors
    (Hl7Parser, Hl7ParserData, "hl7Parser", Some("hl7_parser"), Processor),
    (FhirConverter, FhirConverterData, "fhirConverter", Some("fhir_converter"), Processor),
    (LuaScript, LuaScriptData, "luaScript", Some("lua_script"), Processor),
    (Mapper, MapperData, "mapper", Some("mapper"), Processor),
    (Filter, FilterData, "filter", Some("filter"), Processor),
    (Router, RouterData, "router", Some("router"), Processor),
    (Merge, MergeData, "merge", Some("merge"), Processor),

    // Destinations
    (FileWriter, FileWriterData, "fileWriter", Some("file_writer"), Destination),
    (HttpSender, HttpSenderData, "httpSender", Some("http_sender"), Destination),
    (TcpSender, TcpSenderData, "tcpSender", Some("tcp_sender"), Destination),
    (DatabaseWriter, DatabaseWriterData, "databaseWriter", Some("database_writer"), Destination),
    (Console, ConsoleData, "console", Some("console"), Destination),

    // Utilities
    (Port, PortData, "port", None, Utility),
    (Address, AddressData, "address", None, Utility),
    (Text, TextData, "text", None, Utility),
    (Counter, CounterData, "counter", None, Utility),
    (Comment, CommentData, "comment", None, Utility),
}

impl NodeKind {
    /// Flow-edge multiplicities. Routers are further limited by their route
    /// count, see `Node::capacity`.
    pub fn capacity(self) -> Capacity {
        match self {
            NodeKind::Filter => Capacity::new(Some(1), Some(2)),
            NodeKind::Router => Capacity::new(Some(1), None),
            NodeKind::Merge => Capacity::new(None, Some(1)),
            NodeKind::Port | NodeKind::Address | NodeKind::Counter => Capacity::new(Some(0), None),
            NodeKind::Text => Capacity::new(None, None),
            NodeKind::Comment => Capacity::new(Some(0), Some(0)),
            other => other.category().default_capacity(),
        }
    }

    /// Fields that may be driven by a `config-<field>` edge.
    pub fn config_fields(self) -> &'static [&'static str] {
        match self {
            NodeKind::HttpListener => &["host", "port", "path"],
            NodeKind::TcpListener => &["host", "port"],
            NodeKind::FileReader => &["directory", "pattern"],
            NodeKind::Timer => &["intervalMs"],
            NodeKind::LuaScript => &["script"],
            NodeKind::FileWriter => &["path", "filename"],
            NodeKind::HttpSender => &["url"],
            NodeKind::TcpSender => &["host", "port"],
            NodeKind::DatabaseWriter => &["connectionString", "table"],
            _ => &[],
        }
    }

    /// Kinds that take flow edges from several upstream stages.
    pub fn accepts_fan_in(self) -> bool {
        matches!(self, NodeKind::Merge)
    }

    /// Annotation kinds never take part in connections.
    pub fn is_annotation(self) -> bool {
        matches!(self, NodeKind::Comment)
    }

    /// The manual-test entry point, only used when no other source exists.
    pub fn is_manual_trigger(self) -> bool {
        matches!(self, NodeKind::ManualTrigger)
    }

    /// Whether outgoing flow edges must name one of the node's output handles.
    pub fn has_named_outputs(self) -> bool {
        matches!(self, NodeKind::Filter | NodeKind::Router)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_tag())
    }
}
