use super::data::*;
use super::kind::{Capacity, Category, NodeData, NodeKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output handles of a filter node.
pub const FILTER_PASS_HANDLE: &str = "pass";
pub const FILTER_REJECT_HANDLE: &str = "reject";

/// Canvas position. Presentation only; nothing in the core reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A node placed on the channel canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    pub id: String,
    pub position: Position,
    pub data: NodeData,
}

/// Document form of a node: `{ id, type, position, data }`.
#[derive(Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    data: Map<String, Value>,
}

impl TryFrom<RawNode> for Node {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let data = NodeData::from_fields(&raw.node_type, raw.data)
            .map_err(|e| format!("invalid data for '{}' node '{}': {}", raw.node_type, raw.id, e))?;
        Ok(Node {
            id: raw.id,
            position: raw.position,
            data,
        })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        RawNode {
            node_type: node.data.type_tag().to_string(),
            data: node.data.to_fields(),
            id: node.id,
            position: node.position,
        }
    }
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            data: NodeData::default_for(kind),
        }
    }

    pub fn with_data(id: impl Into<String>, data: NodeData, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.data.kind()
    }

    pub fn type_tag(&self) -> &str {
        self.data.type_tag()
    }

    pub fn category(&self) -> Category {
        self.kind()
            .map(NodeKind::category)
            .unwrap_or_else(|| Category::of(self.type_tag()))
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label()
    }

    /// Flow-edge capacity, taking the authored route count of routers into account.
    pub fn capacity(&self) -> Capacity {
        match &self.data {
            NodeData::Router(router) => Capacity::new(Some(1), Some(router.routes.len().max(1))),
            _ => self
                .kind()
                .map(NodeKind::capacity)
                .unwrap_or_else(|| self.category().default_capacity()),
        }
    }

    /// Named output handles. Empty for kinds with a single anonymous output.
    pub fn output_handles(&self) -> Vec<String> {
        match &self.data {
            NodeData::Filter(_) => vec![
                FILTER_PASS_HANDLE.to_string(),
                FILTER_REJECT_HANDLE.to_string(),
            ],
            NodeData::Router(router) => (0..router.routes.len().max(1)).map(route_handle).collect(),
            _ => Vec::new(),
        }
    }
}

/// Handle id of the router output at `index`.
pub fn route_handle(index: usize) -> String {
    format!("route-{}", index)
}

impl NodeData {
    /// The user-facing label, used to match `${Label}` placeholders.
    pub fn label(&self) -> Option<&str> {
        match self {
            NodeData::HttpListener(HttpListenerData { label, .. })
            | NodeData::TcpListener(TcpListenerData { label, .. })
            | NodeData::FileReader(FileReaderData { label, .. })
            | NodeData::Timer(TimerData { label, .. })
            | NodeData::ManualTrigger(ManualTriggerData { label, .. })
            | NodeData::Hl7Parser(Hl7ParserData { label, .. })
            | NodeData::FhirConverter(FhirConverterData { label, .. })
            | NodeData::LuaScript(LuaScriptData { label, .. })
            | NodeData::Mapper(MapperData { label, .. })
            | NodeData::Filter(FilterData { label, .. })
            | NodeData::Router(RouterData { label, .. })
            | NodeData::Merge(MergeData { label, .. })
            | NodeData::FileWriter(FileWriterData { label, .. })
            | NodeData::HttpSender(HttpSenderData { label, .. })
            | NodeData::TcpSender(TcpSenderData { label, .. })
            | NodeData::DatabaseWriter(DatabaseWriterData { label, .. })
            | NodeData::Console(ConsoleData { label, .. })
            | NodeData::Port(PortData { label, .. })
            | NodeData::Address(AddressData { label, .. })
            | NodeData::Text(TextData { label, .. })
            | NodeData::Counter(CounterData { label, .. }) => Some(label.as_str()),
            NodeData::Comment(_) => None,
            NodeData::Unknown { fields, .. } => fields.get("label").and_then(Value::as_str),
        }
    }

    /// Stored value of a field by its document name. `null` reads as absent.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.to_fields()
            .remove(name)
            .filter(|value| !value.is_null())
    }

    /// Merges `value` into the bag under `name`.
    ///
    /// The field must exist on the kind and the value must fit its type;
    /// otherwise the bag is left untouched.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), String> {
        if let NodeData::Unknown { fields, .. } = self {
            fields.insert(name.to_string(), value);
            return Ok(());
        }
        let mut fields = self.to_fields();
        if !fields.contains_key(name) {
            return Err(format!("'{}' nodes have no such field", self.type_tag()));
        }
        fields.insert(name.to_string(), value);
        let rebuilt = NodeData::from_fields(self.type_tag(), fields).map_err(|e| e.to_string())?;
        *self = rebuilt;
        Ok(())
    }
}
