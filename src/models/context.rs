//! The root IR document

use super::module::Module;
use crate::SCHEMA_VERSION;
use crate::config::VERSION_KEY;
use crate::error::IrError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;

/// Keys whose object values are plain maps rather than entity records
///
/// Their keys are user data and are never filtered; their values still are.
const PLAIN_MAP_KEYS: [&str; 3] = ["field_mapping", "type_mapping", "parameter"];

/// How much of the entity graph a dump contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpMode {
    /// Authoritative fields only; nulls and empty docs are omitted
    #[default]
    Concise,
    /// Every field, including `_`-prefixed derived fields and nulls
    Debug,
}

/// Validated and expanded IR handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub sources: Vec<String>,
    pub headers: Vec<String>,
    pub module: Module,
}

impl Context {
    pub const DOCUMENT: &'static str = "Context";

    /// Parse an IR document, rejecting any other schema version
    pub fn load(text: &str) -> Result<Self, IrError> {
        let value: Value = serde_json::from_str(text)?;
        let found = value.get(VERSION_KEY).and_then(Value::as_str);
        if found != Some(SCHEMA_VERSION) {
            return Err(IrError::version_mismatch(Self::DOCUMENT, SCHEMA_VERSION, found));
        }
        Self::reconstruct(value)
    }

    /// Rebuild the entity graph from a dumped value, re-deriving ids, aliases and
    /// binding names
    pub fn reconstruct(value: Value) -> Result<Self, IrError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Document value with the version tag
    pub fn to_value(&self, mode: DumpMode) -> Result<Value, IrError> {
        let value = serde_json::to_value(self)?;
        let Value::Object(record) = normalize(value, mode, false) else {
            return Err(IrError::InvalidConfig("Context must serialize to an object".to_string()));
        };
        let mut document = Map::new();
        document.insert(VERSION_KEY.to_string(), Value::String(SCHEMA_VERSION.to_string()));
        document.extend(record);
        Ok(Value::Object(sort_keys(document)))
    }

    /// Write the document as JSON indented by four spaces with sorted keys
    pub fn dump_to<W: Write>(&self, writer: W, mode: DumpMode) -> Result<(), IrError> {
        let value = self.to_value(mode)?;
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        value.serialize(&mut serializer)?;
        Ok(())
    }

    pub fn dump(&self, mode: DumpMode) -> Result<String, IrError> {
        let mut buf = Vec::new();
        self.dump_to(&mut buf, mode)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Round-trip through the debug representation
    pub fn refresh(&self) -> Result<Self, IrError> {
        Self::reconstruct(self.to_value(DumpMode::Debug)?)
    }
}

fn keep_concise(key: &str, value: &Value) -> bool {
    !key.starts_with('_') && !value.is_null() && !(key == "doc" && value.as_str() == Some(""))
}

/// Sort object keys and, in concise mode, drop non-authoritative entries
///
/// `plain_map` marks an object whose keys are data, so its entries are kept.
fn normalize(value: Value, mode: DumpMode, plain_map: bool) -> Value {
    match value {
        Value::Object(map) => {
            let entries = map
                .into_iter()
                .filter(|(k, v)| plain_map || mode == DumpMode::Debug || keep_concise(k, v))
                .map(|(k, v)| {
                    let is_plain = !plain_map && PLAIN_MAP_KEYS.contains(&k.as_str());
                    let v = normalize(v, mode, is_plain);
                    (k, v)
                })
                .collect();
            Value::Object(sort_keys(entries))
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize(item, mode, false))
                .collect(),
        ),
        other => other,
    }
}

fn sort_keys(map: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().collect()
}
