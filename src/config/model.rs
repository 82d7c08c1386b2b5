//! Code generation configuration (`model.toml`)

use super::{parse_versioned_toml, to_versioned_toml};
use crate::error::IrError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MODEL_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*$").unwrap());

static CPP_IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap());

/// Whether `name` is usable as a model (and file) name
pub fn is_valid_model_name(name: &str) -> bool {
    MODEL_NAME_REGEX.is_match(name)
}

/// Whether `name` is a plain C++ identifier
pub fn is_valid_cpp_identifier(name: &str) -> bool {
    CPP_IDENTIFIER_REGEX.is_match(name)
}

/// Fixed-step solvers supported by the generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Solver {
    #[default]
    FixedStepAuto,
    FixedStepDiscrete,
    #[serde(rename = "ode8")]
    Ode8,
    #[serde(rename = "ode5")]
    Ode5,
    #[serde(rename = "ode4")]
    Ode4,
    #[serde(rename = "ode3")]
    Ode3,
    #[serde(rename = "ode2")]
    Ode2,
    #[serde(rename = "ode1")]
    Ode1,
    #[serde(rename = "ode14x")]
    Ode14x,
}

/// Code generator switches
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulinkConfig {
    pub solver: Solver,
    pub absolute_time: bool,
    pub integer_code: bool,
    pub non_finite: bool,
    pub complex: bool,
    pub continuous_time: bool,
    pub variable_size_signal: bool,
    pub non_inlined_sfcn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppConfig {
    pub class_name: String,
    /// Empty for the global namespace
    pub namespace: String,
}

/// Module information, `<auto>` values are taken from the model metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoConfig {
    pub description: String,
    pub version: String,
    pub author: String,
    pub license: String,
}

impl InfoConfig {
    pub const AUTO: &'static str = "<auto>";
    pub const NO_LICENSE: &'static str = "<no-license>";

    pub fn resolve_description(&self, metadata: &str) -> String {
        resolve_auto(&self.description, metadata)
    }

    pub fn resolve_version(&self, metadata: &str) -> String {
        resolve_auto(&self.version, metadata)
    }

    pub fn resolve_author(&self, metadata: &str) -> String {
        resolve_auto(&self.author, metadata)
    }

    /// License text, empty for `<no-license>`
    pub fn resolve_license(&self) -> String {
        if self.license == Self::NO_LICENSE {
            String::new()
        } else {
            self.license.clone()
        }
    }
}

fn resolve_auto(value: &str, metadata: &str) -> String {
    if value == InfoConfig::AUTO {
        metadata.to_string()
    } else {
        value.to_string()
    }
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            description: Self::AUTO.to_string(),
            version: Self::AUTO.to_string(),
            author: Self::AUTO.to_string(),
            license: Self::NO_LICENSE.to_string(),
        }
    }
}

/// Model and code generation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub simulink: SimulinkConfig,
    pub cpp: CppConfig,
    pub info: InfoConfig,
}

impl ModelConfig {
    pub const DOCUMENT: &'static str = "Model config";

    /// Default options for a new project
    pub fn new(
        model: impl Into<String>,
        class_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            simulink: SimulinkConfig::default(),
            cpp: CppConfig {
                class_name: class_name.into(),
                namespace: namespace.into(),
            },
            info: InfoConfig::default(),
        }
    }

    /// Parse a version-tagged `model.toml` document
    pub fn from_toml_str(text: &str) -> Result<Self, IrError> {
        let table = parse_versioned_toml(Self::DOCUMENT, text)?;
        let config: ModelConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e| IrError::InvalidConfig(format!("{}: {}", Self::DOCUMENT, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, IrError> {
        to_versioned_toml(self)
    }

    /// Check the model, class and namespace names
    pub fn validate(&self) -> Result<(), IrError> {
        if !is_valid_model_name(&self.model) {
            return Err(IrError::InvalidConfig(format!(
                "Model name '{}' must start with a letter and contain only letters, digits and underscores",
                self.model
            )));
        }
        if !is_valid_cpp_identifier(&self.cpp.class_name) {
            return Err(IrError::InvalidConfig(format!(
                "Class name '{}' is not a valid C++ identifier",
                self.cpp.class_name
            )));
        }
        if !self.cpp.namespace.is_empty() && !is_valid_cpp_identifier(&self.cpp.namespace) {
            return Err(IrError::InvalidConfig(format!(
                "Namespace '{}' is not a valid C++ identifier",
                self.cpp.namespace
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert!(is_valid_model_name("Pendulum_2"));
        assert!(!is_valid_model_name("_hidden"));
        assert!(!is_valid_model_name("2fast"));
        assert!(is_valid_cpp_identifier("_Impl"));
        assert!(!is_valid_cpp_identifier("my-class"));
    }

    #[test]
    fn test_validate() {
        assert!(ModelConfig::new("Pendulum", "PendulumModel", "").validate().is_ok());
        assert!(ModelConfig::new("Pendulum", "PendulumModel", "sim").validate().is_ok());
        assert!(ModelConfig::new("Pendulum", "Pendulum Model", "").validate().is_err());
        assert!(ModelConfig::new("Pendulum", "Model", "a::b").validate().is_err());
    }

    #[test]
    fn test_info_resolution() {
        let info = InfoConfig::default();
        assert_eq!(info.resolve_author("Jane"), "Jane");
        assert_eq!(info.resolve_license(), "");

        let info = InfoConfig {
            author: "Team".to_string(),
            license: "MIT".to_string(),
            ..InfoConfig::default()
        };
        assert_eq!(info.resolve_author("Jane"), "Team");
        assert_eq!(info.resolve_license(), "MIT");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ModelConfig::new("Pendulum", "PendulumModel", "sim");
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("solver = \"FixedStepAuto\""));
        assert_eq!(ModelConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_solver_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            solver: Solver,
        }
        let w: Wrapper = toml::from_str("solver = \"ode14x\"").unwrap();
        assert_eq!(w.solver, Solver::Ode14x);
        assert!(toml::from_str::<Wrapper>("solver = \"ode45\"").is_err());
    }
}
