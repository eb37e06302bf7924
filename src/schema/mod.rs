//! Compiled schema trees.
//!
//! A [`Schema`] is built once from a JSON declaration and then shared by
//! every encode and decode call. Nothing about the schema travels on the
//! wire, so both peers must compile the same declaration.

mod decode;
mod encode;

use std::cmp::Ordering;
use std::path::Path;

use tracing::debug;

use crate::errors::SchemaError;
use crate::types::Type;

pub use encode::EncodeOptions;

/// Bytes reserved at the front of every encoded packet for its identifier.
pub const PACKET_ID_SIZE: usize = 2;

/// Declared keys ending with this suffix mark an optional field.
pub const OPTIONAL_SUFFIX: &str = "_opt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Primitive(Type),
    Array(Box<Schema>),
    /// Fields in wire order.
    Object(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    key: String,
    name: String,
    optional: bool,
    schema: Schema,
}

impl Field {
    /// Builds a field from its declared key. A trailing `_opt` marks the
    /// field optional and is removed from the logical name.
    pub fn new(key: impl Into<String>, schema: Schema) -> Self {
        let key = key.into();
        let (name, optional) = match key.strip_suffix(OPTIONAL_SUFFIX) {
            Some(name) => (name.to_string(), true),
            None => (key.clone(), false),
        };

        Field {
            key,
            name,
            optional,
            schema,
        }
    }

    /// The key as declared, including any `_opt` suffix. Wire order sorts on this.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The key data objects use.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// UTF-16 code unit order, which differs from Rust's `str` order for keys
/// outside the basic multilingual plane.
fn compare_keys(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

impl Schema {
    /// An object schema. Fields are put into wire order.
    pub fn object(mut fields: Vec<Field>) -> Self {
        fields.sort_by(|a, b| compare_keys(&a.key, &b.key));
        Schema::Object(fields)
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    /// Compiles a declaration: a tag name is a primitive, a one-element
    /// array is an array of that element, an object maps keys to fields.
    pub fn compile(declaration: &serde_json::Value) -> Result<Self, SchemaError> {
        let schema = Self::compile_node(declaration)?;
        debug!(kind = schema.kind(), fields = schema.fields().len(), "compiled schema");
        Ok(schema)
    }

    fn compile_node(declaration: &serde_json::Value) -> Result<Self, SchemaError> {
        match declaration {
            serde_json::Value::String(tag) => Ok(Schema::Primitive(tag.parse()?)),
            serde_json::Value::Array(items) => match items.as_slice() {
                [item] => Ok(Schema::array(Self::compile_node(item)?)),
                _ => Err(SchemaError::InvalidArrayLength(items.len())),
            },
            serde_json::Value::Object(map) => {
                let fields = map
                    .iter()
                    .map(|(key, value)| Ok(Field::new(key.as_str(), Self::compile_node(value)?)))
                    .collect::<Result<Vec<_>, SchemaError>>()?;
                Ok(Schema::object(fields))
            }
            other => Err(SchemaError::UnsupportedDeclaration(other.to_string())),
        }
    }

    pub fn from_json_str(declaration: &str) -> Result<Self, SchemaError> {
        Self::compile(&serde_json::from_str(declaration)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading schema");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Fields of an object schema, empty otherwise.
    pub fn fields(&self) -> &[Field] {
        match self {
            Schema::Object(fields) => fields,
            _ => &[],
        }
    }

    /// Looks up an object field by its logical name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|field| field.name == name)
    }

    fn kind(&self) -> &'static str {
        match self {
            Schema::Primitive(_) => "primitive",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }
}
