use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::UnknownDataTypeError;

/// The data-type tags a decision-table cell can carry.
///
/// These are the wire tags the guided decision-table importer understands.
/// Any other tag is a caller bug and is rejected with
/// [`UnknownDataTypeError`] instead of being silently coerced to a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    NumericInteger,
    NumericDouble,
    String,
    Boolean,
}

impl DataType {
    /// Parse a wire tag (e.g. `"NUMERIC_INTEGER"`).
    ///
    /// # Errors
    ///
    /// Returns [`UnknownDataTypeError`] for tags outside the four-member enum.
    pub fn from_tag(tag: &str) -> Result<Self, UnknownDataTypeError> {
        match tag {
            "NUMERIC_INTEGER" => Ok(DataType::NumericInteger),
            "NUMERIC_DOUBLE" => Ok(DataType::NumericDouble),
            "STRING" => Ok(DataType::String),
            "BOOLEAN" => Ok(DataType::Boolean),
            other => Err(UnknownDataTypeError {
                tag: other.to_owned(),
            }),
        }
    }

    /// The wire tag for this data type.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            DataType::NumericInteger => "NUMERIC_INTEGER",
            DataType::NumericDouble => "NUMERIC_DOUBLE",
            DataType::String => "STRING",
            DataType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        DataType::from_tag(&tag).map_err(D::Error::custom)
    }
}

/// A scalar rule value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Double(f64),
    /// A UTF-8 string.
    Str(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// A nullable value together with its declared data-type tag.
///
/// The tag, not the payload, decides how the cell serializes: an absent
/// payload falls back to the tag's zero value (`"0"`, `"0.0"`, `""`,
/// `"false"`) rather than being an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(rename = "dataType")]
    pub data_type: DataType,
}

/// The canonical serialized parts of one cell.
///
/// `isOtherwise` is not carried here: it is a reserved decision-table
/// feature this IR never populates, so the emitter writes a fixed `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// `valueNumeric` element: numeric subtype class and text, if numeric.
    pub numeric: Option<(&'static str, String)>,
    /// `valueBoolean` element text, if boolean.
    pub boolean: Option<String>,
    /// `valueString` element text (empty for non-string cells).
    pub string: String,
    /// The declared tag, echoed into the `dataType` element.
    pub data_type: DataType,
}

impl TypedValue {
    #[must_use]
    pub fn new(data_type: DataType, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            data_type,
        }
    }

    /// A value-less cell of the given type; serializes to the type default.
    #[must_use]
    pub fn absent(data_type: DataType) -> Self {
        Self {
            value: None,
            data_type,
        }
    }

    #[must_use]
    pub fn int(v: i64) -> Self {
        Self::new(DataType::NumericInteger, v)
    }

    #[must_use]
    pub fn double(v: f64) -> Self {
        Self::new(DataType::NumericDouble, v)
    }

    #[must_use]
    pub fn string(v: impl Into<String>) -> Self {
        Self::new(DataType::String, v.into())
    }

    #[must_use]
    pub fn bool(v: bool) -> Self {
        Self::new(DataType::Boolean, v)
    }

    /// Produce the canonical cell form for this (value, tag) pair.
    ///
    /// Numeric payloads are coerced across the int/double boundary so a JSON
    /// `5` under a `NUMERIC_DOUBLE` tag still serializes as `"5.0"`.
    #[must_use]
    pub fn cell(&self) -> Cell {
        match self.data_type {
            DataType::NumericInteger => {
                let text = match &self.value {
                    Some(Value::Int(i)) => i.to_string(),
                    #[allow(clippy::cast_possible_truncation)]
                    Some(Value::Double(d)) => (*d as i64).to_string(),
                    Some(Value::Str(s)) => s.clone(),
                    _ => "0".to_owned(),
                };
                Cell {
                    numeric: Some(("int", text)),
                    boolean: None,
                    string: String::new(),
                    data_type: self.data_type,
                }
            }
            DataType::NumericDouble => {
                let text = match &self.value {
                    Some(Value::Double(d)) => format_double(*d),
                    #[allow(clippy::cast_precision_loss)]
                    Some(Value::Int(i)) => format_double(*i as f64),
                    Some(Value::Str(s)) => s.clone(),
                    _ => "0.0".to_owned(),
                };
                Cell {
                    numeric: Some(("double", text)),
                    boolean: None,
                    string: String::new(),
                    data_type: self.data_type,
                }
            }
            DataType::Boolean => {
                let text = match &self.value {
                    Some(Value::Bool(b)) => b.to_string(),
                    _ => "false".to_owned(),
                };
                Cell {
                    numeric: None,
                    boolean: Some(text),
                    string: String::new(),
                    data_type: self.data_type,
                }
            }
            DataType::String => {
                let text = match &self.value {
                    Some(Value::Str(s)) => s.clone(),
                    Some(Value::Int(i)) => i.to_string(),
                    Some(Value::Double(d)) => format_double(*d),
                    Some(Value::Bool(b)) => b.to_string(),
                    None => String::new(),
                };
                Cell {
                    numeric: None,
                    boolean: None,
                    string: text,
                    data_type: self.data_type,
                }
            }
        }
    }
}

/// Integral doubles keep one decimal place (`5.0`, not `5`) so the importer
/// sees an unambiguous double literal.
fn format_double(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}
