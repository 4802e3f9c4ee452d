use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered map from field name to value.
///
/// Field order is preserved so that a store encodes back to the same text
/// it was decoded from.
pub type Fields = serde_json::Map<String, Value>;

/// The live value of a store.
///
/// A store holds either a bare string (a cookie that was never structured)
/// or a map of named fields. A scalar is promoted to a map on the first
/// field-level write; a map never reverts to a scalar except through a
/// whole-value replacement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    /// Unstructured text, persisted verbatim.
    Scalar(String),
    /// Named fields, persisted in the store's configured format.
    Fields(Fields),
}

impl StoreValue {
    /// An empty field map.
    pub fn empty_fields() -> Self {
        Self::Fields(Fields::new())
    }

    /// Returns `true` if this is a scalar value.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns `true` if this is a field map.
    pub fn is_fields(&self) -> bool {
        matches!(self, Self::Fields(_))
    }

    /// The scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Fields(_) => None,
        }
    }

    /// The field map, if this is a mapping.
    pub fn as_fields(&self) -> Option<&Fields> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Scalar(_) => None,
        }
    }

    /// Mutable access to the field map, if this is a mapping.
    pub fn as_fields_mut(&mut self) -> Option<&mut Fields> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Scalar(_) => None,
        }
    }

    /// Look up a single field. Scalars have no fields.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_fields().and_then(|fields| fields.get(name))
    }

    /// Convert into a JSON value: scalars become strings, maps become objects.
    pub fn into_value(self) -> Value {
        match self {
            Self::Scalar(s) => Value::String(s),
            Self::Fields(fields) => Value::Object(fields),
        }
    }
}

impl From<&str> for StoreValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Fields> for StoreValue {
    fn from(fields: Fields) -> Self {
        Self::Fields(fields)
    }
}

/// Objects become field maps. Every other JSON value becomes a scalar:
/// strings keep their text, `null` is empty, and the rest use their JSON text.
impl From<Value> for StoreValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::Fields(fields),
            Value::String(s) => Self::Scalar(s),
            Value::Null => Self::Scalar(String::new()),
            other => Self::Scalar(other.to_string()),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => f.write_str(s),
            Self::Fields(fields) => write!(f, "{}", Value::Object(fields.clone())),
        }
    }
}
