//! The module entity: one model class, its types and environment options

use super::model_class::ModelClass;
use super::types::{Type, TypeContainer, TypeDef};
use crate::config::EnvConfig;
use crate::error::IrError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModuleRecord")]
pub struct Module {
    pub name: String,
    pub doc: String,
    pub version: String,
    pub author: String,
    pub license: String,
    pub model_class: ModelClass,
    pub types: TypeContainer,
    pub env: EnvConfig,
}

/// The model class is read before the types so that model-class-located types
/// can be qualified by its identifier.
#[derive(Deserialize)]
struct ModuleRecord {
    name: String,
    #[serde(default)]
    doc: String,
    version: String,
    author: String,
    license: String,
    model_class: ModelClass,
    types: Vec<TypeDef>,
    env: EnvConfig,
}

impl TryFrom<ModuleRecord> for Module {
    type Error = IrError;

    fn try_from(record: ModuleRecord) -> Result<Self, Self::Error> {
        let types = TypeContainer::new(record.types, record.model_class.identifier.clone())?;
        Ok(Self {
            name: record.name,
            doc: record.doc,
            version: record.version,
            author: record.author,
            license: record.license,
            model_class: record.model_class,
            types,
            env: record.env,
        })
    }
}

impl Module {
    /// Struct generated for a semantic role, e.g. `external_inputs`
    pub fn role_type(&self, role: &str) -> Result<&Type, IrError> {
        let name = self
            .model_class
            .type_for_role(role)
            .ok_or_else(|| IrError::MissingTypeMapping {
                role: role.to_string(),
                message: format!("Model has no type for role '{}'", role),
            })?;
        self.types.lookup(name)
    }
}
