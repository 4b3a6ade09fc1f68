use crate::pipeline::defaults;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel-level metadata that travels with the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelSettings {
    /// Project name shown in the editor.
    pub name: String,
    /// Name the backend registers the channel under.
    pub channel_name: String,
    /// UUID v4 identifying the channel on the backend.
    pub channel_id: String,
    pub enabled: bool,
    pub max_retries: u32,
    /// Node receiving messages that failed processing.
    pub error_destination_id: Option<String>,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            name: defaults::CHANNEL_NAME.to_string(),
            channel_name: defaults::CHANNEL_NAME.to_string(),
            channel_id: new_channel_id(),
            enabled: true,
            max_retries: defaults::MAX_RETRIES,
            error_destination_id: None,
        }
    }
}

/// A fresh channel id.
pub fn new_channel_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether `id` is a well-formed version 4 UUID.
pub fn is_valid_channel_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok_and(|uuid| uuid.get_version_num() == 4)
}
