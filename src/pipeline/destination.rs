use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pipeline sink, tagged by wire type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum DestinationConfig {
    FileWriter(FileWriterConfig),
    HttpSender(HttpSenderConfig),
    TcpSender(TcpSenderConfig),
    DatabaseWriter(DatabaseWriterConfig),
    Console(ConsoleConfig),
}

impl DestinationConfig {
    pub fn type_tag(&self) -> &'static str {
        match self {
            DestinationConfig::FileWriter(_) => "file_writer",
            DestinationConfig::HttpSender(_) => "http_sender",
            DestinationConfig::TcpSender(_) => "tcp_sender",
            DestinationConfig::DatabaseWriter(_) => "database_writer",
            DestinationConfig::Console(_) => "console",
        }
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        DestinationConfig::Console(ConsoleConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWriterConfig {
    pub path: String,
    pub filename: String,
    pub append: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSenderConfig {
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpSenderConfig {
    pub host: String,
    pub port: u16,
    pub mllp: bool,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseWriterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleConfig {
    pub prefix: String,
}
