//! Numeric element types understood by the binding generator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric dtype of an array element or a space bound
///
/// Names follow the numpy spelling used in the configuration documents
/// (`"float64"`, `"uint8"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Uint64,
    Int64,
    Float32,
    Float64,
}

impl Dtype {
    /// Dtype name as written in configuration documents
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Int8 => "int8",
            Self::Uint16 => "uint16",
            Self::Int16 => "int16",
            Self::Uint32 => "uint32",
            Self::Int32 => "int32",
            Self::Uint64 => "uint64",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// C++ type spelling
    pub fn ctype(&self) -> &'static str {
        match self {
            Self::Uint8 => "uint8_t",
            Self::Int8 => "int8_t",
            Self::Uint16 => "uint16_t",
            Self::Int16 => "int16_t",
            Self::Uint32 => "uint32_t",
            Self::Int32 => "int32_t",
            Self::Uint64 => "uint64_t",
            Self::Int64 => "int64_t",
            Self::Float32 => "float",
            Self::Float64 => "double",
        }
    }

    pub fn is_integer(&self) -> bool {
        !self.is_float()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Literal suffix for floating point numerals, empty for `double`
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Float32 => "F",
            _ => "",
        }
    }

    /// Inclusive representable range, `None` for floating point dtypes
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        let range = match self {
            Self::Uint8 => (0, u8::MAX as i128),
            Self::Int8 => (i8::MIN as i128, i8::MAX as i128),
            Self::Uint16 => (0, u16::MAX as i128),
            Self::Int16 => (i16::MIN as i128, i16::MAX as i128),
            Self::Uint32 => (0, u32::MAX as i128),
            Self::Int32 => (i32::MIN as i128, i32::MAX as i128),
            Self::Uint64 => (0, u64::MAX as i128),
            Self::Int64 => (i64::MIN as i128, i64::MAX as i128),
            Self::Float32 | Self::Float64 => return None,
        };
        Some(range)
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Dtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint8" => Ok(Self::Uint8),
            "int8" => Ok(Self::Int8),
            "uint16" => Ok(Self::Uint16),
            "int16" => Ok(Self::Int16),
            "uint32" => Ok(Self::Uint32),
            "int32" => Ok(Self::Int32),
            "uint64" => Ok(Self::Uint64),
            "int64" => Ok(Self::Int64),
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            _ => Err(format!("Unknown dtype: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_serde_names() {
        let dtype: Dtype = serde_json::from_str("\"float32\"").unwrap();
        assert_eq!(dtype, Dtype::Float32);
        assert_eq!(serde_json::to_string(&Dtype::Uint16).unwrap(), "\"uint16\"");
        assert!(serde_json::from_str::<Dtype>("\"float16\"").is_err());
    }

    #[test]
    fn test_dtype_ranges() {
        assert_eq!(Dtype::Uint8.integer_range(), Some((0, 255)));
        assert_eq!(Dtype::Int8.integer_range(), Some((-128, 127)));
        assert_eq!(Dtype::Float64.integer_range(), None);
        assert_eq!(Dtype::Float32.ctype(), "float");
        assert_eq!("int64".parse::<Dtype>().unwrap(), Dtype::Int64);
    }
}
