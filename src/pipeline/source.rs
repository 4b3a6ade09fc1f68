use super::defaults;
use serde::{Deserialize, Serialize};

/// Entry stage of a compiled pipeline, tagged by wire type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum SourceConfig {
    HttpListener(HttpListenerConfig),
    TcpListener(TcpListenerConfig),
    FileReader(FileReaderConfig),
    Timer(TimerConfig),
    ManualTrigger(ManualTriggerConfig),
}

impl SourceConfig {
    pub fn type_tag(&self) -> &'static str {
        match self {
            SourceConfig::HttpListener(_) => "http_listener",
            SourceConfig::TcpListener(_) => "tcp_listener",
            SourceConfig::FileReader(_) => "file_reader",
            SourceConfig::Timer(_) => "timer",
            SourceConfig::ManualTrigger(_) => "manual_trigger",
        }
    }

    /// Used when the graph has no usable source node.
    pub fn placeholder() -> Self {
        SourceConfig::HttpListener(HttpListenerConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpListenerConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub methods: Vec<String>,
}

impl Default for HttpListenerConfig {
    fn default() -> Self {
        Self {
            host: defaults::LISTENER_HOST.to_string(),
            port: defaults::HTTP_PORT,
            path: defaults::HTTP_PATH.to_string(),
            methods: vec![defaults::HTTP_METHOD.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpListenerConfig {
    pub host: String,
    pub port: u16,
    pub mllp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReaderConfig {
    pub directory: String,
    pub pattern: String,
    pub poll_interval_ms: u64,
    pub delete_after_read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    pub interval_ms: u64,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTriggerConfig {
    pub payload: String,
}
