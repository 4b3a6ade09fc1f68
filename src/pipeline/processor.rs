use serde::{Deserialize, Serialize};

/// A message-transforming stage, tagged by wire type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum ProcessorConfig {
    Hl7Parser(Hl7ParserConfig),
    FhirConverter(FhirConverterConfig),
    LuaScript(LuaScriptConfig),
    Mapper(MapperConfig),
    Filter(FilterConfig),
    Router(RouterConfig),
    Merge(MergeConfig),
    /// Stage for a node type this compiler does not know. The backend decides
    /// what to do with it.
    Passthrough(PassthroughConfig),
}

impl ProcessorConfig {
    pub fn type_tag(&self) -> &'static str {
        match self {
            ProcessorConfig::Hl7Parser(_) => "hl7_parser",
            ProcessorConfig::FhirConverter(_) => "fhir_converter",
            ProcessorConfig::LuaScript(_) => "lua_script",
            ProcessorConfig::Mapper(_) => "mapper",
            ProcessorConfig::Filter(_) => "filter",
            ProcessorConfig::Router(_) => "router",
            ProcessorConfig::Merge(_) => "merge",
            ProcessorConfig::Passthrough(_) => "passthrough",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hl7ParserConfig {
    pub version: String,
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FhirConverterConfig {
    pub resource_type: String,
    pub fhir_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LuaScriptConfig {
    pub script: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingConfig {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperConfig {
    pub mappings: Vec<MappingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub condition: String,
    /// Node receiving messages that fail the condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub name: String,
    pub condition: String,
    pub handle: String,
    /// Node wired to this route's output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConfig {
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConfig {
    pub wait_for_all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassthroughConfig {
    pub node_type: String,
}
