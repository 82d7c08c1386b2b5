//! Metadata document (`metadata.json`) emitted by the model exporter

use crate::SCHEMA_VERSION;
use crate::config::VERSION_KEY;
use crate::error::IrError;
use crate::models::{Enumerator, Field, FieldMode, Location, Method, TypeDef};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw model description, one-to-one with the exporter's JSON
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    pub sample_time: f64,
    pub model_class: MetadataModelClass,
    #[serde(default)]
    pub structs: Vec<MetadataStruct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataModelClass {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub identifier: String,
    #[serde(default)]
    pub methods: Vec<MetadataMethod>,
    #[serde(default)]
    pub fields: Vec<MetadataMember>,
    #[serde(default)]
    pub field_mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub type_mapping: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataMethod {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataStruct {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub fields: Vec<MetadataMember>,
}

/// Array extent, a bare integer for 1-D arrays
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MetadataShape {
    Scalar(usize),
    List(Vec<usize>),
}

impl MetadataShape {
    pub fn into_vec(self) -> Vec<usize> {
        match self {
            MetadataShape::Scalar(n) => vec![n],
            MetadataShape::List(axes) => axes,
        }
    }
}

/// A struct member, model class member or enumerator
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataMember {
    pub name: String,
    /// Member kind (`plain`, `struct`, `enum`, `pointer`, `std`)
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub shape: Option<MetadataShape>,
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Pointee type of pointer members
    #[serde(default)]
    pub underlying: Option<String>,
    #[serde(default)]
    pub value: Option<i64>,
}

impl Metadata {
    pub const DOCUMENT: &'static str = "Metadata";

    /// Parse a version-tagged metadata document
    pub fn from_json_str(text: &str) -> Result<Self, IrError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let found = value.get(VERSION_KEY).and_then(serde_json::Value::as_str);
        if found != Some(SCHEMA_VERSION) {
            return Err(IrError::version_mismatch(Self::DOCUMENT, SCHEMA_VERSION, found));
        }
        Ok(serde_json::from_value(value)?)
    }
}

impl MetadataModelClass {
    pub fn methods(&self) -> Vec<Method> {
        self.methods.iter().map(|m| Method::new(&m.name)).collect()
    }

    /// Model class members, all of kind `model`
    pub fn fields(&self) -> Result<Vec<Field>, IrError> {
        self.fields.iter().map(|m| m.to_field(true)).collect()
    }
}

impl MetadataStruct {
    pub fn to_type_def(&self) -> Result<TypeDef, IrError> {
        if self.is_enum {
            let enumerators = self
                .fields
                .iter()
                .map(MetadataMember::to_enumerator)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeDef::new_enum(&self.name, self.location, enumerators))
        } else {
            let fields = self
                .fields
                .iter()
                .map(|m| m.to_field(false))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TypeDef::new_struct(&self.name, self.location, fields))
        }
    }
}

impl MetadataMember {
    /// Classify the member and build a [`Field`]
    ///
    /// Struct and enum members reference `type`, pointer members `underlying`.
    pub fn to_field(&self, model: bool) -> Result<Field, IrError> {
        let kind = if model {
            "model"
        } else {
            self.mode
                .as_deref()
                .ok_or_else(|| IrError::invalid_field(&self.name, "missing member kind"))?
        };
        let mode = FieldMode::classify(kind, self.is_array)?;
        let type_name = match kind {
            "struct" | "enum" => self.type_name.clone(),
            "pointer" => self.underlying.clone(),
            _ => None,
        };
        let raw_shape = if mode.is_array() {
            let shape = self
                .shape
                .clone()
                .ok_or_else(|| IrError::invalid_field(&self.name, "array member without shape"))?;
            Some(shape.into_vec())
        } else {
            None
        };
        Field::new(&self.name, "", mode, raw_shape, type_name)
    }

    pub fn to_enumerator(&self) -> Result<Enumerator, IrError> {
        let value = self
            .value
            .ok_or_else(|| IrError::invalid_field(&self.name, "enumerator without value"))?;
        Ok(Enumerator::new(&self.name, value))
    }
}
