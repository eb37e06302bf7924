use std::convert::Infallible;
use std::num::TryFromIntError;
use thiserror::Error;
use crate::buffer::{ReadError, WriteError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Encoding error: Type mismatch - expected {expected}, got {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },
    #[error("Encoding error: Missing field - '{0}' is required by the schema")]
    MissingField(String),
    #[error("Encoding error: Invalid date - {0} ms is not a valid instant")]
    InvalidDate(i64),
    #[error("Encoding error: Out of bounds - {0}")]
    OutOfBounds(#[from] WriteError),
    #[error("Encoding error: Not supported - {0}")]
    NotSupported(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Decoding error: Not enough bytes - {0}")]
    NotEnoughBytes(#[from] ReadError),
    #[error("Decoding error: Out of bounds - {0}")]
    OutOfBounds(String),
    #[error("Decoding error: Type mismatch - expected {expected}, got {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },
    #[error("Decoding error: Missing field - '{0}'")]
    MissingField(String),
}

impl From<TryFromIntError> for DecodeError {
    fn from(error: TryFromIntError) -> Self {
        DecodeError::OutOfBounds(error.to_string())
    }
}

impl From<Infallible> for DecodeError {
    fn from(error: Infallible) -> Self {
        match error {}
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Schema-defining array should contain only 1 element, got: {0}")]
    InvalidArrayLength(usize),
    #[error("Unsupported declaration: {0}")]
    UnsupportedDeclaration(String),
    #[error("Failed to parse schema: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
}
