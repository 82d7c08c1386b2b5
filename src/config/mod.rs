//! User configuration documents
//!
//! Both documents are TOML with a top-level `__version__` key that must equal
//! [`crate::SCHEMA_VERSION`].

pub mod env;
pub mod init;
pub mod model;
pub mod space;

pub use env::{EnvConfig, GymConfig, InfoSelector, ResetConfig, RewardRange};
pub use init::InitConfig;
pub use model::{CppConfig, InfoConfig, ModelConfig, SimulinkConfig, Solver};
pub use space::SpaceConfig;

use crate::SCHEMA_VERSION;
use crate::error::IrError;
use serde::Serialize;

/// Key holding the schema version in every persisted document
pub const VERSION_KEY: &str = "__version__";

/// Parse a TOML document and check its version tag
pub(crate) fn parse_versioned_toml(document: &str, text: &str) -> Result<toml::Table, IrError> {
    let table: toml::Table = text.parse()?;
    let found = table.get(VERSION_KEY).and_then(|v| v.as_str());
    if found != Some(SCHEMA_VERSION) {
        return Err(IrError::version_mismatch(document, SCHEMA_VERSION, found));
    }
    Ok(table)
}

/// Serialize `value` as a TOML document tagged with the schema version
pub(crate) fn to_versioned_toml<T: Serialize>(value: &T) -> Result<String, IrError> {
    let toml::Value::Table(mut table) = toml::Value::try_from(value)? else {
        return Err(IrError::InvalidConfig(
            "configuration document must be a table".to_string(),
        ));
    };
    table.insert(
        VERSION_KEY.to_string(),
        toml::Value::String(SCHEMA_VERSION.to_string()),
    );
    Ok(toml::to_string_pretty(&table)?)
}
