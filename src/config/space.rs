//! Gym space descriptions

use crate::error::IrError;
use crate::format::{Dtype, NumericValue, format_sequence, format_sequence_or_scalar};
use serde::{Deserialize, Serialize};

/// Action or observation space of the gym wrapper
///
/// Tagged by `type`. Each variant maps to a fixed factory function in the binding
/// runtime and renders its constructor arguments with [`SpaceConfig::initializer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpaceConfig {
    Box {
        low: NumericValue,
        high: NumericValue,
        shape: Vec<usize>,
        dtype: Dtype,
    },
    Discrete {
        n: i64,
    },
    MultiDiscrete {
        nvec: Vec<i64>,
    },
    MultiBinary {
        n: i64,
    },
}

impl Default for SpaceConfig {
    fn default() -> Self {
        SpaceConfig::Box {
            low: NumericValue::from(0.0),
            high: NumericValue::from(1.0),
            shape: vec![2, 2],
            dtype: Dtype::Float64,
        }
    }
}

impl SpaceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SpaceConfig::Box { .. } => "Box",
            SpaceConfig::Discrete { .. } => "Discrete",
            SpaceConfig::MultiDiscrete { .. } => "MultiDiscrete",
            SpaceConfig::MultiBinary { .. } => "MultiBinary",
        }
    }

    /// Element dtype of the space
    pub fn dtype(&self) -> Dtype {
        match self {
            SpaceConfig::Box { dtype, .. } => *dtype,
            SpaceConfig::Discrete { .. } | SpaceConfig::MultiDiscrete { .. } => Dtype::Int64,
            SpaceConfig::MultiBinary { .. } => Dtype::Int8,
        }
    }

    pub fn ctype(&self) -> &'static str {
        self.dtype().ctype()
    }

    /// Factory function that builds the space in the binding runtime
    pub fn func(&self) -> String {
        match self {
            SpaceConfig::Box { dtype, .. } => format!("make_box<{}>", dtype.ctype()),
            SpaceConfig::Discrete { .. } => "make_discrete".to_string(),
            SpaceConfig::MultiDiscrete { .. } => "make_multi_discrete".to_string(),
            SpaceConfig::MultiBinary { .. } => "make_multi_binary".to_string(),
        }
    }

    /// Constructor arguments as a C++ literal list
    pub fn initializer(&self) -> Result<String, IrError> {
        let rendered = match self {
            SpaceConfig::Box {
                low,
                high,
                shape,
                dtype,
            } => {
                let shape: Vec<i64> = shape.iter().map(|&axis| axis as i64).collect();
                format!(
                    "{}, {}, {}",
                    format_sequence_or_scalar(low, *dtype)?,
                    format_sequence_or_scalar(high, *dtype)?,
                    format_sequence(shape.as_slice(), Dtype::Int64)?
                )
            }
            SpaceConfig::Discrete { n } | SpaceConfig::MultiBinary { n } => n.to_string(),
            SpaceConfig::MultiDiscrete { nvec } => format_sequence(nvec.as_slice(), Dtype::Int64)?,
        };
        Ok(rendered)
    }

    /// Validate bounds and cardinalities; `role` names the space in errors
    pub fn check(&self, role: &str) -> Result<(), IrError> {
        let invalid = |reason: String| IrError::InvalidSpace {
            role: role.to_string(),
            reason,
        };
        match self {
            SpaceConfig::Box {
                low, high, shape, ..
            } => {
                if shape.is_empty() || shape.contains(&0) {
                    return Err(invalid(format!(
                        "Box shape must be a non-empty list of positive integers, got {:?}",
                        shape
                    )));
                }
                let size: usize = shape.iter().product();
                for (name, bound) in [("low", low), ("high", high)] {
                    if bound.is_sequence() && bound.len() != size {
                        return Err(invalid(format!(
                            "Box {} has {} elements, expected 1 or {}",
                            name,
                            bound.len(),
                            size
                        )));
                    }
                }
            }
            SpaceConfig::Discrete { n } | SpaceConfig::MultiBinary { n } => {
                if *n <= 0 {
                    return Err(invalid(format!("{} n must be positive, got {}", self.kind(), n)));
                }
            }
            SpaceConfig::MultiDiscrete { nvec } => {
                if nvec.is_empty() {
                    return Err(invalid("MultiDiscrete nvec must not be empty".to_string()));
                }
                if let Some(n) = nvec.iter().find(|&&n| n <= 0) {
                    return Err(invalid(format!(
                        "MultiDiscrete cardinalities must be positive, got {}",
                        n
                    )));
                }
            }
        }
        self.initializer()?;
        Ok(())
    }
}
