//! The model class entity

use super::field::Field;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Alias of the model class inside the generated bindings
pub const MODEL_CLASS_ALIAS: &str = "SlxpyExtensionModelClass";

/// A public method of the model class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub doc: String,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
        }
    }
}

/// The simulated system's runtime state and behavior
///
/// `field_mapping` and `type_mapping` go from a semantic role (`external_inputs`,
/// `instance_parameters`, ...) to the generated member and struct names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelClass {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub namespace: String,
    pub identifier: String,
    pub sample_time: f64,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
    pub field_mapping: BTreeMap<String, String>,
    pub type_mapping: BTreeMap<String, String>,
}

impl ModelClass {
    pub fn alias_name(&self) -> &'static str {
        MODEL_CLASS_ALIAS
    }

    pub fn binding_name(&self) -> &str {
        &self.name
    }

    pub fn binding_identifier(&self) -> String {
        format!("{}_PB", self.binding_name())
    }

    /// Struct name generated for a semantic role
    pub fn type_for_role(&self, role: &str) -> Option<&str> {
        self.type_mapping.get(role).map(String::as_str)
    }

    /// Member name generated for a semantic role
    pub fn field_for_role(&self, role: &str) -> Option<&str> {
        self.field_mapping.get(role).map(String::as_str)
    }
}

#[derive(Serialize)]
struct ModelClassView<'a> {
    name: &'a str,
    doc: &'a str,
    namespace: &'a str,
    identifier: &'a str,
    sample_time: f64,
    methods: &'a [Method],
    fields: &'a [Field],
    field_mapping: &'a BTreeMap<String, String>,
    type_mapping: &'a BTreeMap<String, String>,
    #[serde(rename = "_alias_name")]
    alias_name: &'static str,
    #[serde(rename = "_binding_name")]
    binding_name: &'a str,
    #[serde(rename = "_binding_identifier")]
    binding_identifier: String,
}

impl Serialize for ModelClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ModelClassView {
            name: &self.name,
            doc: &self.doc,
            namespace: &self.namespace,
            identifier: &self.identifier,
            sample_time: self.sample_time,
            methods: &self.methods,
            fields: &self.fields,
            field_mapping: &self.field_mapping,
            type_mapping: &self.type_mapping,
            alias_name: self.alias_name(),
            binding_name: self.binding_name(),
            binding_identifier: self.binding_identifier(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::field_mode::FieldMode;

    fn sample() -> ModelClass {
        ModelClass {
            name: "Pendulum".to_string(),
            doc: String::new(),
            namespace: "sim".to_string(),
            identifier: "sim::Pendulum".to_string(),
            sample_time: 0.01,
            methods: vec![Method::new("initialize"), Method::new("step")],
            fields: vec![Field::new("rtU", "", FieldMode::Model, None, None).unwrap()],
            field_mapping: BTreeMap::from([("external_inputs".to_string(), "rtU".to_string())]),
            type_mapping: BTreeMap::from([("external_inputs".to_string(), "ExtU".to_string())]),
        }
    }

    #[test]
    fn test_derived_names() {
        let mc = sample();
        assert_eq!(mc.alias_name(), "SlxpyExtensionModelClass");
        assert_eq!(mc.binding_identifier(), "Pendulum_PB");
        assert_eq!(mc.type_for_role("external_inputs"), Some("ExtU"));
        assert_eq!(mc.field_for_role("external_outputs"), None);
    }

    #[test]
    fn test_serialized_record_carries_derived_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["_alias_name"], "SlxpyExtensionModelClass");
        assert_eq!(value["_binding_identifier"], "Pendulum_PB");

        let back: ModelClass = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }
}
