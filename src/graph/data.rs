//! Field bags for every registered node kind, in their document (camelCase) form.
use crate::pipeline::defaults;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Numeric fields accept numbers or numeric strings, since editor inputs
/// often store what was typed.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Number(T),
        Text(String),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpListenerData {
    pub label: String,
    pub host: String,
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
    pub path: String,
    pub methods: Vec<String>,
}

impl Default for HttpListenerData {
    fn default() -> Self {
        Self {
            label: "HTTP Listener".to_string(),
            host: defaults::LISTENER_HOST.to_string(),
            port: defaults::HTTP_PORT,
            path: defaults::HTTP_PATH.to_string(),
            methods: vec!["POST".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TcpListenerData {
    pub label: String,
    pub host: String,
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
    /// Wrap messages in MLLP start/end blocks.
    pub mllp: bool,
}

impl Default for TcpListenerData {
    fn default() -> Self {
        Self {
            label: "TCP Listener".to_string(),
            host: defaults::LISTENER_HOST.to_string(),
            port: defaults::TCP_LISTENER_PORT,
            mllp: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileReaderData {
    pub label: String,
    pub directory: String,
    pub pattern: String,
    #[serde(deserialize_with = "number_or_string")]
    pub poll_interval_ms: u64,
    pub delete_after_read: bool,
}

impl Default for FileReaderData {
    fn default() -> Self {
        Self {
            label: "File Reader".to_string(),
            directory: defaults::INPUT_DIRECTORY.to_string(),
            pattern: defaults::FILE_PATTERN.to_string(),
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            delete_after_read: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerData {
    pub label: String,
    #[serde(deserialize_with = "number_or_string")]
    pub interval_ms: u64,
    pub payload: String,
}

impl Default for TimerData {
    fn default() -> Self {
        Self {
            label: "Timer".to_string(),
            interval_ms: defaults::TIMER_INTERVAL_MS,
            payload: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualTriggerData {
    pub label: String,
    pub payload: String,
}

impl Default for ManualTriggerData {
    fn default() -> Self {
        Self {
            label: "Manual Trigger".to_string(),
            payload: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hl7ParserData {
    pub label: String,
    pub version: String,
    pub strict: bool,
}

impl Default for Hl7ParserData {
    fn default() -> Self {
        Self {
            label: "HL7 Parser".to_string(),
            version: defaults::HL7_VERSION.to_string(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FhirConverterData {
    pub label: String,
    pub resource_type: String,
    pub fhir_version: String,
}

impl Default for FhirConverterData {
    fn default() -> Self {
        Self {
            label: "FHIR Converter".to_string(),
            resource_type: defaults::FHIR_RESOURCE_TYPE.to_string(),
            fhir_version: defaults::FHIR_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LuaScriptData {
    pub label: String,
    pub script: String,
    #[serde(deserialize_with = "number_or_string")]
    pub timeout_ms: u64,
}

impl Default for LuaScriptData {
    fn default() -> Self {
        Self {
            label: "Lua Script".to_string(),
            script: "return message".to_string(),
            timeout_ms: defaults::SCRIPT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMapping {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapperData {
    pub label: String,
    pub mappings: Vec<FieldMapping>,
}

impl Default for MapperData {
    fn default() -> Self {
        Self {
            label: "Mapper".to_string(),
            mappings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterData {
    pub label: String,
    pub condition: String,
}

impl Default for FilterData {
    fn default() -> Self {
        Self {
            label: "Filter".to_string(),
            condition: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    pub name: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouterData {
    pub label: String,
    pub routes: Vec<Route>,
}

impl Default for RouterData {
    fn default() -> Self {
        Self {
            label: "Router".to_string(),
            routes: vec![Route {
                name: "Route 1".to_string(),
                condition: String::new(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeData {
    pub label: String,
    /// Hold a message until every upstream branch has delivered.
    pub wait_for_all: bool,
}

impl Default for MergeData {
    fn default() -> Self {
        Self {
            label: "Merge".to_string(),
            wait_for_all: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileWriterData {
    pub label: String,
    pub path: String,
    pub filename: String,
    pub append: bool,
}

impl Default for FileWriterData {
    fn default() -> Self {
        Self {
            label: "File Writer".to_string(),
            path: defaults::OUTPUT_PATH.to_string(),
            filename: defaults::OUTPUT_FILENAME.to_string(),
            append: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpSenderData {
    pub label: String,
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    #[serde(deserialize_with = "number_or_string")]
    pub timeout_ms: u64,
    pub api_key: Option<String>,
}

impl Default for HttpSenderData {
    fn default() -> Self {
        Self {
            label: "HTTP Sender".to_string(),
            url: defaults::HTTP_SENDER_URL.to_string(),
            method: defaults::HTTP_METHOD.to_string(),
            headers: BTreeMap::new(),
            timeout_ms: defaults::SEND_TIMEOUT_MS,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TcpSenderData {
    pub label: String,
    pub host: String,
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
    pub mllp: bool,
    #[serde(deserialize_with = "number_or_string")]
    pub timeout_ms: u64,
}

impl Default for TcpSenderData {
    fn default() -> Self {
        Self {
            label: "TCP Sender".to_string(),
            host: defaults::SENDER_HOST.to_string(),
            port: defaults::TCP_SENDER_PORT,
            mllp: true,
            timeout_ms: defaults::SEND_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseWriterData {
    pub label: String,
    pub connection_string: Option<String>,
    pub table: String,
    pub password: Option<String>,
}

impl Default for DatabaseWriterData {
    fn default() -> Self {
        Self {
            label: "Database Writer".to_string(),
            connection_string: None,
            table: defaults::DATABASE_TABLE.to_string(),
            password: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsoleData {
    pub label: String,
    pub prefix: String,
}

impl Default for ConsoleData {
    fn default() -> Self {
        Self {
            label: "Console".to_string(),
            prefix: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortData {
    pub label: String,
    #[serde(deserialize_with = "number_or_string")]
    pub port: u16,
}

impl Default for PortData {
    fn default() -> Self {
        Self {
            label: "Port".to_string(),
            port: defaults::HTTP_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressData {
    pub label: String,
    pub address: String,
}

impl Default for AddressData {
    fn default() -> Self {
        Self {
            label: "Address".to_string(),
            address: defaults::SENDER_HOST.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextData {
    pub label: String,
    /// Raw template, may contain `${Label}` placeholders.
    pub text: String,
    /// Last resolved form, kept for display only.
    pub resolved: Option<String>,
}

impl Default for TextData {
    fn default() -> Self {
        Self {
            label: "Text".to_string(),
            text: String::new(),
            resolved: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CounterData {
    pub label: String,
    #[serde(deserialize_with = "number_or_string")]
    pub start: i64,
    #[serde(deserialize_with = "number_or_string")]
    pub step: i64,
}

impl Default for CounterData {
    fn default() -> Self {
        Self {
            label: "Counter".to_string(),
            start: 0,
            step: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentData {
    pub text: String,
}
