//! Dynamic values a [`Schema`](crate::Schema) encodes from and decodes into.

mod date;
mod regexp;

use std::collections::BTreeMap;

use crate::errors::{DecodeError, EncodeError};

pub use date::{Date, MAX_DATE_MILLIS};
pub use regexp::{ParseRegExpError, RegExp, RegExpFlags};

/// Object members keyed by logical field name. An absent optional field is
/// a missing key.
pub type Object = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Raw UTF-16 code units, possibly containing unpaired surrogates.
    /// Accepted wherever a string is; decoding always yields [`Value::String`].
    Utf16(Vec<u16>),
    Date(Date),
    RegExp(RegExp),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) | Value::Utf16(_) => "string",
            Value::Date(_) => "date",
            Value::RegExp(_) => "regexp",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_object(self) -> Result<Object, DecodeError> {
        match self {
            Value::Object(object) => Ok(object),
            other => Err(DecodeError::TypeMismatch { expected: "object", found: other.kind() }),
        }
    }

    pub fn into_array(self) -> Result<Vec<Value>, DecodeError> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(DecodeError::TypeMismatch { expected: "array", found: other.kind() }),
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

impl From<RegExp> for Value {
    fn from(value: RegExp) -> Self {
        Value::RegExp(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = EncodeError;

    /// Integral JSON numbers become [`Value::Int`], others [`Value::Float`].
    /// `null` members of an object are dropped so they read as absent
    /// optional fields; `null` anywhere else is rejected.
    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => Err(EncodeError::NotSupported("null outside of an object member".to_string())),
            serde_json::Value::Bool(value) => Ok(Value::Bool(value)),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(value) => Ok(Value::Int(value)),
                None => number
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| EncodeError::NotSupported(format!("number {}", number))),
            },
            serde_json::Value::String(value) => Ok(Value::String(value)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            serde_json::Value::Object(map) => {
                let mut object = Object::new();
                for (key, value) in map {
                    if value.is_null() {
                        continue;
                    }
                    object.insert(key, Value::try_from(value)?);
                }
                Ok(Value::Object(object))
            }
        }
    }
}
