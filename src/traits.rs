//! Conversion between Rust types and [`Value`].
//!
//! `#[derive(Encode, Decode)]` implements these for structs and unit enums;
//! the impls below cover the leaves.

use crate::errors::{DecodeError, EncodeError};
use crate::value::{Date, RegExp, Value};

pub trait Encode {
    fn to_value(&self) -> Result<Value, EncodeError>;
}

pub trait Decode: Sized {
    fn from_value(value: Value) -> Result<Self, DecodeError>;
}

fn mismatch(expected: &'static str, value: &Value) -> DecodeError {
    DecodeError::TypeMismatch { expected, found: value.kind() }
}

macro_rules! impl_int {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn to_value(&self) -> Result<Value, EncodeError> {
                    Ok(Value::Int(i64::from(*self)))
                }
            }

            impl Decode for $ty {
                fn from_value(value: Value) -> Result<Self, DecodeError> {
                    match value {
                        Value::Int(int) => Ok(<$ty>::try_from(int)?),
                        other => Err(mismatch("integer", &other)),
                    }
                }
            }
        )*
    };
}

impl_int!(u8, u16, u32, i8, i16, i32, i64);

macro_rules! impl_wide_int {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn to_value(&self) -> Result<Value, EncodeError> {
                    i64::try_from(*self)
                        .map(Value::Int)
                        .map_err(|_| EncodeError::NotSupported(format!("{} does not fit in i64", self)))
                }
            }

            impl Decode for $ty {
                fn from_value(value: Value) -> Result<Self, DecodeError> {
                    match value {
                        Value::Int(int) => Ok(<$ty>::try_from(int)?),
                        other => Err(mismatch("integer", &other)),
                    }
                }
            }
        )*
    };
}

impl_wide_int!(u64, usize);

impl Encode for bool {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(Value::Bool(*self))
    }
}

impl Decode for bool {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(flag) => Ok(flag),
            other => Err(mismatch("boolean", &other)),
        }
    }
}

impl Encode for f64 {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(Value::Float(*self))
    }
}

impl Decode for f64 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Float(float) => Ok(float),
            Value::Int(int) => Ok(int as f64),
            other => Err(mismatch("number", &other)),
        }
    }
}

impl Encode for f32 {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(Value::Float(f64::from(*self)))
    }
}

impl Decode for f32 {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        f64::from_value(value).map(|float| float as f32)
    }
}

impl Encode for String {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(Value::String(self.clone()))
    }
}

impl Encode for str {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(Value::String(self.to_string()))
    }
}

impl Decode for String {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(text) => Ok(text),
            Value::Utf16(units) => Ok(String::from_utf16_lossy(&units)),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl Encode for Date {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(Value::Date(*self))
    }
}

impl Decode for Date {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Date(date) => Ok(date),
            other => Err(mismatch("date", &other)),
        }
    }
}

impl Encode for RegExp {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(Value::RegExp(self.clone()))
    }
}

impl Decode for RegExp {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::RegExp(regexp) => Ok(regexp),
            other => Err(mismatch("regexp", &other)),
        }
    }
}

impl Encode for Value {
    fn to_value(&self) -> Result<Value, EncodeError> {
        Ok(self.clone())
    }
}

impl Decode for Value {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn to_value(&self) -> Result<Value, EncodeError> {
        self.as_slice().to_value()
    }
}

impl<T: Encode> Encode for [T] {
    fn to_value(&self) -> Result<Value, EncodeError> {
        self.iter().map(T::to_value).collect::<Result<Vec<_>, _>>().map(Value::Array)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        value.into_array()?.into_iter().map(T::from_value).collect()
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn to_value(&self) -> Result<Value, EncodeError> {
        (**self).to_value()
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn to_value(&self) -> Result<Value, EncodeError> {
        (**self).to_value()
    }
}

impl<T: Decode> Decode for Box<T> {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        T::from_value(value).map(Box::new)
    }
}
