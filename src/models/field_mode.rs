//! Field mode classification

use crate::error::IrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a structure member is shaped and typed
///
/// Persisted as its integer discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FieldMode {
    Model = 0,
    Plain = 1,
    PlainArray = 2,
    Struct = 3,
    StructArray = 4,
    Enum = 5,
    EnumArray = 6,
    Pointer = 7,
    PointerArray = 8,
}

impl FieldMode {
    /// Classify a raw metadata member from its kind string and array flag
    ///
    /// `std` kinds (C++ standard library members) are not supported yet.
    pub fn classify(kind: &str, is_array: bool) -> Result<Self, IrError> {
        let mode = match (kind, is_array) {
            ("model", false) => Self::Model,
            ("plain", false) => Self::Plain,
            ("plain", true) => Self::PlainArray,
            ("struct", false) => Self::Struct,
            ("struct", true) => Self::StructArray,
            ("enum", false) => Self::Enum,
            ("enum", true) => Self::EnumArray,
            ("pointer", false) => Self::Pointer,
            ("pointer", true) => Self::PointerArray,
            ("std", _) => return Err(IrError::UnsupportedFieldKind("std".to_string())),
            _ => {
                return Err(IrError::UnknownFieldKind {
                    kind: kind.to_string(),
                    is_array,
                });
            }
        };
        Ok(mode)
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::PlainArray | Self::StructArray | Self::EnumArray | Self::PointerArray
        )
    }

    /// Whether a field of this mode carries a raw shape
    pub fn requires_shape(&self) -> bool {
        self.is_array()
    }

    /// Whether a field of this mode carries a referenced type name
    pub fn requires_type(&self) -> bool {
        !matches!(self, Self::Model | Self::Plain | Self::PlainArray)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct | Self::StructArray)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum | Self::EnumArray)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer | Self::PointerArray)
    }
}

impl From<FieldMode> for u8 {
    fn from(mode: FieldMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for FieldMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Model),
            1 => Ok(Self::Plain),
            2 => Ok(Self::PlainArray),
            3 => Ok(Self::Struct),
            4 => Ok(Self::StructArray),
            5 => Ok(Self::Enum),
            6 => Ok(Self::EnumArray),
            7 => Ok(Self::Pointer),
            8 => Ok(Self::PointerArray),
            _ => Err(format!("Unsupported field mode: {}", value)),
        }
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Model => "MODEL",
            Self::Plain => "PLAIN",
            Self::PlainArray => "PLAIN_ARRAY",
            Self::Struct => "STRUCT",
            Self::StructArray => "STRUCT_ARRAY",
            Self::Enum => "ENUM",
            Self::EnumArray => "ENUM_ARRAY",
            Self::Pointer => "POINTER",
            Self::PointerArray => "POINTER_ARRAY",
        };
        write!(f, "{}", name)
    }
}
