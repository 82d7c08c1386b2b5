//! Field and enumerator models

use super::field_mode::FieldMode;
use crate::error::IrError;
use serde::{Deserialize, Serialize};

/// A named member of a structured type
///
/// `raw_shape` is present exactly for array modes and `type_name` exactly for
/// struct, enum and pointer modes. Both are checked on construction, so a `Field`
/// value always satisfies its mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldRecord")]
pub struct Field {
    pub name: String,
    pub doc: String,
    pub mode: FieldMode,
    /// Shape as emitted by the code generator (column-major)
    #[serde(rename = "shape")]
    raw_shape: Option<Vec<usize>>,
    /// Referenced struct/enum/pointee type
    #[serde(rename = "type")]
    type_name: Option<String>,
}

#[derive(Deserialize)]
struct FieldRecord {
    name: String,
    #[serde(default)]
    doc: String,
    mode: FieldMode,
    #[serde(default)]
    shape: Option<Vec<usize>>,
    #[serde(default, rename = "type")]
    type_name: Option<String>,
}

impl TryFrom<FieldRecord> for Field {
    type Error = IrError;

    fn try_from(record: FieldRecord) -> Result<Self, Self::Error> {
        Field::new(
            record.name,
            record.doc,
            record.mode,
            record.shape,
            record.type_name,
        )
    }
}

impl Field {
    /// Create a field, checking shape and type presence against `mode`
    pub fn new(
        name: impl Into<String>,
        doc: impl Into<String>,
        mode: FieldMode,
        raw_shape: Option<Vec<usize>>,
        type_name: Option<String>,
    ) -> Result<Self, IrError> {
        let name = name.into();

        match (&raw_shape, mode.requires_shape()) {
            (None, true) => {
                return Err(IrError::invalid_field(&name, format!("{} field requires a shape", mode)));
            }
            (Some(_), false) => {
                return Err(IrError::invalid_field(&name, format!("{} field must not have a shape", mode)));
            }
            (Some(shape), true) if shape.is_empty() || shape.contains(&0) => {
                return Err(IrError::invalid_field(
                    &name,
                    format!("shape must be a non-empty list of positive integers, got {:?}", shape),
                ));
            }
            _ => {}
        }

        match (&type_name, mode.requires_type()) {
            (None, true) => {
                return Err(IrError::invalid_field(&name, format!("{} field requires a type", mode)));
            }
            (Some(_), false) => {
                return Err(IrError::invalid_field(&name, format!("{} field must not have a type", mode)));
            }
            (Some(t), true) if t.is_empty() => {
                return Err(IrError::invalid_field(&name, "type name must not be empty"));
            }
            _ => {}
        }

        Ok(Self {
            name,
            doc: doc.into(),
            mode,
            raw_shape,
            type_name,
        })
    }

    /// Scalar plain-old-data member
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            mode: FieldMode::Plain,
            raw_shape: None,
            type_name: None,
        }
    }

    pub fn raw_shape(&self) -> Option<&[usize]> {
        self.raw_shape.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Row-major shape of the member
    ///
    /// The code generator emits column-major layouts, so the raw axes are reversed.
    /// A 2-D shape with a unit axis (`[n, 1]` or `[1, n]`) is a vector and collapses
    /// to `[n]`.
    pub fn shape(&self) -> Option<Vec<usize>> {
        let raw = self.raw_shape.as_ref()?;
        if raw.len() == 2 && (raw[0] == 1 || raw[1] == 1) {
            Some(vec![raw[0] * raw[1]])
        } else {
            Some(raw.iter().rev().copied().collect())
        }
    }

    /// Total element count, 1 for non-array members
    pub fn size(&self) -> usize {
        self.shape().map(|s| s.iter().product()).unwrap_or(1)
    }
}

/// Named value of an enum type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    pub value: i64,
}

impl Enumerator {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(raw: Vec<usize>) -> Field {
        Field::new("x", "", FieldMode::PlainArray, Some(raw), None).unwrap()
    }

    #[test]
    fn test_shape_collapses_row_vector() {
        assert_eq!(array(vec![1, 4]).shape(), Some(vec![4]));
        assert_eq!(array(vec![4, 1]).shape(), Some(vec![4]));
    }

    #[test]
    fn test_shape_is_reversed() {
        assert_eq!(array(vec![3, 4]).shape(), Some(vec![4, 3]));
        assert_eq!(array(vec![2, 3, 4]).shape(), Some(vec![4, 3, 2]));
        assert_eq!(array(vec![5]).shape(), Some(vec![5]));
    }

    #[test]
    fn test_size() {
        assert_eq!(array(vec![3, 4]).size(), 12);
        assert_eq!(Field::plain("p").size(), 1);
        assert_eq!(Field::plain("p").shape(), None);
    }

    #[test]
    fn test_mode_invariants() {
        assert!(Field::new("a", "", FieldMode::PlainArray, None, None).is_err());
        assert!(Field::new("a", "", FieldMode::Plain, Some(vec![2]), None).is_err());
        assert!(Field::new("a", "", FieldMode::Plain, None, Some("T".into())).is_err());
        assert!(Field::new("a", "", FieldMode::Struct, None, None).is_err());
        assert!(Field::new("a", "", FieldMode::StructArray, None, Some("T".into())).is_err());
        assert!(Field::new("a", "", FieldMode::PlainArray, Some(vec![0]), None).is_err());
        assert!(Field::new("a", "", FieldMode::PlainArray, Some(vec![]), None).is_err());
        assert!(Field::new("a", "", FieldMode::EnumArray, Some(vec![2]), Some("E".into())).is_ok());
        assert!(Field::new("a", "", FieldMode::Model, None, None).is_ok());
    }

    #[test]
    fn test_deserialize_checks_invariants() {
        let field: Field =
            serde_json::from_str(r#"{"name": "u", "mode": 2, "shape": [1, 3]}"#).unwrap();
        assert_eq!(field.mode, FieldMode::PlainArray);
        assert_eq!(field.doc, "");
        assert_eq!(field.shape(), Some(vec![3]));

        let err = serde_json::from_str::<Field>(r#"{"name": "s", "mode": 3}"#).unwrap_err();
        assert!(err.to_string().contains("requires a type"));
    }

    #[test]
    fn test_serialize_uses_document_keys() {
        let field = Field::new("s", "", FieldMode::Struct, None, Some("Inner".into())).unwrap();
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(value["type"], "Inner");
        assert!(value["shape"].is_null());
        assert_eq!(value["mode"], 3);
    }
}
