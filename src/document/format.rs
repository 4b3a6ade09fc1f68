use crate::graph::{Edge, Node};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written into exported documents.
pub const DOCUMENT_VERSION: &str = "1.0";

/// Node data keys that never leave the process in persisted state.
pub const SENSITIVE_KEYS: [&str; 6] = [
    "password",
    "apiKey",
    "token",
    "secret",
    "connectionString",
    "credentials",
];

/// The exchange format of a channel.
///
/// Exports carry `version` and `exportedAt`; persisted state omits both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub name: String,
    pub channel_name: String,
    pub channel_id: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub max_retries: u32,
    pub error_destination_id: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

fn enabled_by_default() -> bool {
    true
}

/// Removes every sensitive key from the `data` bag of each node in a
/// serialized document. Returns how many values were dropped.
pub fn strip_sensitive(document: &mut Value) -> usize {
    let Some(nodes) = document.get_mut("nodes").and_then(Value::as_array_mut) else {
        return 0;
    };
    let mut stripped = 0;
    for data in nodes
        .iter_mut()
        .filter_map(|node| node.get_mut("data").and_then(Value::as_object_mut))
    {
        for key in SENSITIVE_KEYS {
            if data.remove(key).is_some() {
                stripped += 1;
            }
        }
    }
    stripped
}
