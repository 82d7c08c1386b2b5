//! Instance parameter initializers

use crate::error::IrError;
use crate::format::{NumericValue, Scalar};
use crate::models::{Field, FieldMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How one instance parameter is initialized on environment reset
///
/// Tagged by `type` in configuration documents. `custom` carries a code fragment
/// passed verbatim to the renderer and bypasses every structural check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InitConfig {
    /// Draw a fresh random seed
    Seed,
    Constant {
        value: Scalar,
    },
    /// Uniform sampling between scalar or per-element bounds
    Uniform {
        low: NumericValue,
        high: NumericValue,
    },
    Custom {
        code: String,
    },
}

impl InitConfig {
    /// Tag name as written in documents
    pub fn kind(&self) -> &'static str {
        match self {
            InitConfig::Seed => "seed",
            InitConfig::Constant { .. } => "constant",
            InitConfig::Uniform { .. } => "uniform",
            InitConfig::Custom { .. } => "custom",
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, InitConfig::Custom { .. })
    }

    /// Distinct initializer kinds in use, sorted by tag name
    pub fn unique_kinds<'a>(inits: impl IntoIterator<Item = &'a InitConfig>) -> Vec<&'static str> {
        inits
            .into_iter()
            .map(InitConfig::kind)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Check that this initializer can be applied to `field`
    ///
    /// Struct parameters need a `custom` initializer. Uniform bounds on a plain array
    /// are a scalar or a flat sequence matching the element count; on any other
    /// field they are scalars.
    pub fn check_basic_compatibility(&self, field: &Field) -> Result<(), IrError> {
        if let InitConfig::Custom { .. } = self {
            return Ok(());
        }
        if field.mode.is_struct() {
            return Err(IrError::incompatible_init(
                &field.name,
                "For struct parameters, use \"custom\" type initialization.",
            ));
        }
        if let InitConfig::Uniform { low, high } = self {
            if field.mode == FieldMode::PlainArray {
                check_shape(&field.name, "low", low, field.size())?;
                check_shape(&field.name, "high", high, field.size())?;
            } else if low.is_sequence() || high.is_sequence() {
                return Err(IrError::incompatible_init(
                    &field.name,
                    "uniform bounds of a scalar field must be scalars",
                ));
            }
        }
        Ok(())
    }
}

fn check_shape(field: &str, bound: &str, value: &NumericValue, size: usize) -> Result<(), IrError> {
    if value.len() == 1 {
        return Ok(());
    }
    if value.len() != size {
        return Err(IrError::incompatible_init(
            field,
            format!(
                "{} has {} elements but the field has {}, broadcast is currently unsupported",
                bound,
                value.len(),
                size
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_array(raw: Vec<usize>) -> Field {
        Field::new("gain", "", FieldMode::PlainArray, Some(raw), None).unwrap()
    }

    fn struct_field() -> Field {
        Field::new("nested", "", FieldMode::Struct, None, Some("Inner".into())).unwrap()
    }

    #[test]
    fn test_parse_tagged() {
        let init: InitConfig = serde_json::from_str(r#"{"type": "seed"}"#).unwrap();
        assert_eq!(init, InitConfig::Seed);

        let init: InitConfig = serde_json::from_str(r#"{"type": "constant", "value": "-inf"}"#).unwrap();
        assert_eq!(
            init,
            InitConfig::Constant {
                value: Scalar::Inf(crate::format::Infinity::Negative)
            }
        );

        let init: InitConfig =
            serde_json::from_str(r#"{"type": "uniform", "low": [0.0, 1.0], "high": 2.0}"#).unwrap();
        assert_eq!(init.kind(), "uniform");

        assert!(serde_json::from_str::<InitConfig>(r#"{"type": "gaussian"}"#).is_err());
    }

    #[test]
    fn test_struct_requires_custom() {
        let err = InitConfig::Seed
            .check_basic_compatibility(&struct_field())
            .unwrap_err();
        assert!(err.to_string().contains("custom"));

        let custom = InitConfig::Custom {
            code: "p.nested = {};".to_string(),
        };
        assert!(custom.check_basic_compatibility(&struct_field()).is_ok());
    }

    #[test]
    fn test_uniform_on_plain_array() {
        let field = plain_array(vec![1, 3]);
        let ok = InitConfig::Uniform {
            low: NumericValue::from(vec![0.0, 0.0, 0.0]),
            high: NumericValue::from(1.0),
        };
        assert!(ok.check_basic_compatibility(&field).is_ok());

        let single = InitConfig::Uniform {
            low: NumericValue::from(vec![0.0]),
            high: NumericValue::from(vec![1.0]),
        };
        assert!(single.check_basic_compatibility(&field).is_ok());

        let mismatch = InitConfig::Uniform {
            low: NumericValue::from(vec![0.0, 0.0]),
            high: NumericValue::from(1.0),
        };
        assert!(matches!(
            mismatch.check_basic_compatibility(&field),
            Err(IrError::IncompatibleInit { .. })
        ));
    }

    #[test]
    fn test_uniform_on_scalar_field() {
        let field = Field::plain("k");
        let ok = InitConfig::Uniform {
            low: NumericValue::from(0.0),
            high: NumericValue::from(1.0),
        };
        assert!(ok.check_basic_compatibility(&field).is_ok());

        let bad = InitConfig::Uniform {
            low: NumericValue::from(vec![0.0, 1.0]),
            high: NumericValue::from(1.0),
        };
        assert!(bad.check_basic_compatibility(&field).is_err());
    }

    #[test]
    fn test_unique_kinds() {
        let inits = [
            InitConfig::Seed,
            InitConfig::Constant {
                value: Scalar::Float(1.0),
            },
            InitConfig::Seed,
        ];
        assert_eq!(InitConfig::unique_kinds(&inits), vec!["constant", "seed"]);
    }
}
