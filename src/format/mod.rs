//! Literal formatting
//!
//! Renders numbers and number sequences as C++ literals for the binding templates.
//! Integers are range checked against their dtype, floats get the dtype suffix and
//! the `inf`/`-inf` literals are replaced by `std::numeric_limits` expressions.

pub mod dtype;

pub use dtype::Dtype;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error rendering a literal
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("Integer value {value} out of range for dtype {dtype}")]
    OutOfRange { value: String, dtype: Dtype },
    #[error("Value {value} is not an integer, but dtype {dtype} requires one")]
    NotAnInteger { value: String, dtype: Dtype },
    #[error("NaN cannot be rendered as a {0} literal")]
    NotANumber(Dtype),
    #[error("Dtype {0} is not a floating point dtype")]
    NotAFloat(Dtype),
}

/// Signed infinity, written as `"inf"` / `"-inf"` in documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Infinity {
    #[serde(rename = "inf")]
    Positive,
    #[serde(rename = "-inf")]
    Negative,
}

/// A single numeric literal from a configuration document
///
/// Non-finite floats read from TOML (`inf`, `-inf`) are normalized into
/// [`Scalar::Inf`], so they survive a trip through JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScalarRepr", into = "ScalarRepr")]
pub enum Scalar {
    Int(i64),
    /// Integer above `i64::MAX`
    UInt(u64),
    Float(f64),
    Inf(Infinity),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum ScalarRepr {
    Int(i64),
    UInt(u64),
    Float(f64),
    Inf(Infinity),
}

impl From<ScalarRepr> for Scalar {
    fn from(repr: ScalarRepr) -> Self {
        match repr {
            ScalarRepr::Int(v) => Scalar::Int(v),
            ScalarRepr::UInt(v) => Scalar::from(v),
            ScalarRepr::Float(v) if v == f64::INFINITY => Scalar::Inf(Infinity::Positive),
            ScalarRepr::Float(v) if v == f64::NEG_INFINITY => Scalar::Inf(Infinity::Negative),
            ScalarRepr::Float(v) => Scalar::Float(v),
            ScalarRepr::Inf(inf) => Scalar::Inf(inf),
        }
    }
}

impl From<Scalar> for ScalarRepr {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Int(v) => ScalarRepr::Int(v),
            Scalar::UInt(v) => ScalarRepr::UInt(v),
            Scalar::Float(v) => ScalarRepr::Float(v),
            Scalar::Inf(inf) => ScalarRepr::Inf(inf),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Scalar::UInt(v), Scalar::Int)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        ScalarRepr::Float(v).into()
    }
}

impl From<Infinity> for Scalar {
    fn from(inf: Infinity) -> Self {
        Scalar::Inf(inf)
    }
}

impl Scalar {
    pub fn is_int(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::UInt(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::UInt(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{:?}", v),
            Scalar::Inf(Infinity::Positive) => write!(f, "inf"),
            Scalar::Inf(Infinity::Negative) => write!(f, "-inf"),
        }
    }
}

/// A scalar or a flat sequence of scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Scalar(Scalar),
    Sequence(Vec<Scalar>),
}

impl NumericValue {
    pub fn is_sequence(&self) -> bool {
        matches!(self, NumericValue::Sequence(_))
    }

    /// Number of elements (1 for a scalar)
    pub fn len(&self) -> usize {
        match self {
            NumericValue::Scalar(_) => 1,
            NumericValue::Sequence(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<f64> for NumericValue {
    fn from(v: f64) -> Self {
        NumericValue::Scalar(v.into())
    }
}

impl From<Vec<f64>> for NumericValue {
    fn from(values: Vec<f64>) -> Self {
        NumericValue::Sequence(values.into_iter().map(Scalar::from).collect())
    }
}

/// Render an integer literal, failing when the value does not fit `dtype`
pub fn format_integer(value: impl Into<Scalar>, dtype: Dtype) -> Result<String, FormatError> {
    let value = value.into();
    let integer = match value {
        Scalar::Int(v) => v as i128,
        Scalar::UInt(v) => v as i128,
        Scalar::Float(v) if v.is_finite() && v.fract() == 0.0 => v as i128,
        _ => {
            return Err(FormatError::NotAnInteger {
                value: value.to_string(),
                dtype,
            });
        }
    };
    let Some((min, max)) = dtype.integer_range() else {
        return Err(FormatError::NotAnInteger {
            value: value.to_string(),
            dtype,
        });
    };
    if min <= integer && integer <= max {
        Ok(integer.to_string())
    } else {
        Err(FormatError::OutOfRange {
            value: value.to_string(),
            dtype,
        })
    }
}

/// Render a floating point literal with the dtype suffix
///
/// Infinities become `std::numeric_limits<T>::infinity()` expressions.
pub fn format_float(value: impl Into<Scalar>, dtype: Dtype) -> Result<String, FormatError> {
    if !dtype.is_float() {
        return Err(FormatError::NotAFloat(dtype));
    }
    let ctype = dtype.ctype();
    match value.into() {
        Scalar::Inf(Infinity::Positive) => Ok(format!("std::numeric_limits<{}>::infinity()", ctype)),
        Scalar::Inf(Infinity::Negative) => Ok(format!("-std::numeric_limits<{}>::infinity()", ctype)),
        Scalar::Float(v) if v.is_nan() => Err(FormatError::NotANumber(dtype)),
        Scalar::Float(v) => Ok(format!("{:?}{}", v, dtype.suffix())),
        Scalar::Int(v) => Ok(format!("{:?}{}", v as f64, dtype.suffix())),
        Scalar::UInt(v) => Ok(format!("{:?}{}", v as f64, dtype.suffix())),
    }
}

/// Render a number according to whether `dtype` is integral or floating point
pub fn format_number(value: impl Into<Scalar>, dtype: Dtype) -> Result<String, FormatError> {
    if dtype.is_integer() {
        format_integer(value, dtype)
    } else {
        format_float(value, dtype)
    }
}

/// Render a brace-delimited initializer list, e.g. `{ 1, 2, 3 }`
pub fn format_sequence<T>(values: &[T], dtype: Dtype) -> Result<String, FormatError>
where
    T: Into<Scalar> + Copy,
{
    let items = values
        .iter()
        .map(|v| format_number(*v, dtype))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{{ {} }}", items.join(", ")))
}

pub fn format_sequence_or_scalar(value: &NumericValue, dtype: Dtype) -> Result<String, FormatError> {
    match value {
        NumericValue::Scalar(v) => format_number(*v, dtype),
        NumericValue::Sequence(values) => format_sequence(values.as_slice(), dtype),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integer_range() {
        assert_eq!(format_integer(255, Dtype::Uint8).unwrap(), "255");
        assert_eq!(format_integer(-128, Dtype::Int8).unwrap(), "-128");
        let err = format_integer(300, Dtype::Uint8).unwrap_err();
        assert!(matches!(err, FormatError::OutOfRange { .. }));
        assert!(err.to_string().contains("300"));
        assert!(err.to_string().contains("uint8"));
        assert!(format_integer(-1, Dtype::Uint64).is_err());
    }

    #[test]
    fn test_format_integer_full_uint64_range() {
        let max: Scalar = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(max, Scalar::UInt(u64::MAX));
        assert_eq!(format_integer(max, Dtype::Uint64).unwrap(), "18446744073709551615");
        assert!(matches!(
            format_integer(max, Dtype::Int64),
            Err(FormatError::OutOfRange { .. })
        ));

        let above_i64: Scalar = serde_json::from_str("9223372036854775809").unwrap();
        assert_eq!(
            format_integer(above_i64, Dtype::Uint64).unwrap(),
            "9223372036854775809"
        );
        assert_eq!(Scalar::from(5u64), Scalar::Int(5));
        assert_eq!(serde_json::to_string(&max).unwrap(), "18446744073709551615");
    }

    #[test]
    fn test_format_integer_rejects_fractions() {
        assert_eq!(format_integer(4.0, Dtype::Int32).unwrap(), "4");
        assert!(matches!(
            format_integer(1.5, Dtype::Int32),
            Err(FormatError::NotAnInteger { .. })
        ));
        assert!(format_integer(Infinity::Positive, Dtype::Int64).is_err());
    }

    #[test]
    fn test_format_float_infinity() {
        assert_eq!(
            format_float(f64::INFINITY, Dtype::Float64).unwrap(),
            "std::numeric_limits<double>::infinity()"
        );
        assert_eq!(
            format_float(f64::NEG_INFINITY, Dtype::Float64).unwrap(),
            "-std::numeric_limits<double>::infinity()"
        );
        assert_eq!(
            format_float(Infinity::Negative, Dtype::Float32).unwrap(),
            "-std::numeric_limits<float>::infinity()"
        );
    }

    #[test]
    fn test_format_float_suffix() {
        assert_eq!(format_float(0.5, Dtype::Float32).unwrap(), "0.5F");
        assert_eq!(format_float(1.0, Dtype::Float64).unwrap(), "1.0");
        assert_eq!(format_float(2, Dtype::Float32).unwrap(), "2.0F");
        assert!(format_float(f64::NAN, Dtype::Float64).is_err());
        assert!(format_float(1.0, Dtype::Int8).is_err());
    }

    #[test]
    fn test_format_sequence() {
        assert_eq!(format_sequence(&[1i64, 2, 3][..], Dtype::Int64).unwrap(), "{ 1, 2, 3 }");
        assert_eq!(format_sequence(&[0.0f64, 1.5][..], Dtype::Float32).unwrap(), "{ 0.0F, 1.5F }");
        assert!(format_sequence(&[1i64, 256][..], Dtype::Uint8).is_err());
    }

    #[test]
    fn test_format_sequence_or_scalar() {
        let scalar = NumericValue::from(1.0);
        assert_eq!(format_sequence_or_scalar(&scalar, Dtype::Float64).unwrap(), "1.0");
        let seq = NumericValue::from(vec![1.0, 2.0]);
        assert_eq!(format_sequence_or_scalar(&seq, Dtype::Float64).unwrap(), "{ 1.0, 2.0 }");
    }

    #[test]
    fn test_scalar_document_forms() {
        let values: Vec<Scalar> = serde_json::from_str(r#"[1, 2.5, "inf", "-inf"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Int(1),
                Scalar::Float(2.5),
                Scalar::Inf(Infinity::Positive),
                Scalar::Inf(Infinity::Negative),
            ]
        );
        assert_eq!(Scalar::from(f64::INFINITY), Scalar::Inf(Infinity::Positive));
        assert_eq!(serde_json::to_string(&Scalar::Inf(Infinity::Negative)).unwrap(), "\"-inf\"");
        assert!(serde_json::from_str::<Scalar>("\"nan\"").is_err());
    }
}
