use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use darling::ast::Data;
use darling::{FromDeriveInput, FromField, FromVariant};
use syn::Type;

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(schema), supports(struct_named, enum_unit))]
pub struct SchemaInput {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub data: Data<VariantInput, FieldInput>,
    /// JSON declaration to check the type against, relative to the crate root.
    #[darling(default)]
    pub path: Option<String>,
}

#[derive(Debug, FromField)]
#[darling(attributes(schema))]
pub struct FieldInput {
    pub ident: Option<syn::Ident>,
    pub ty: Type,
    #[darling(default)]
    pub rename: Option<String>,
}

#[derive(Debug, FromVariant)]
pub struct VariantInput {
    pub ident: syn::Ident,
}

#[derive(Debug)]
pub struct TypeHelper<'a> {
    ty: &'a Type,
}

pub fn snake_to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut next_char_uppercase = false;

    for char in s.trim_start_matches("r#").chars() {
        if char == '_' {
            next_char_uppercase = !result.is_empty();
        } else if next_char_uppercase {
            result.push(char.to_ascii_uppercase());
            next_char_uppercase = false;
        } else {
            result.push(char);
        }
    }

    result
}

impl<'a> TypeHelper<'a> {
    pub fn new(ty: &'a Type) -> Self {
        TypeHelper { ty }
    }

    /// Last path segment, so `zeropack::Date` and `Date` both give `Date`.
    pub fn last_ident(&self) -> Option<String> {
        match self.ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                type_path.path.segments.last().map(|segment| segment.ident.to_string())
            }
            _ => None,
        }
    }

    /// First generic argument of the last path segment.
    pub fn inner_type(&self) -> Option<TypeHelper<'a>> {
        let Type::Path(type_path) = self.ty else {
            return None;
        };
        let segment = type_path.path.segments.last()?;
        let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
            return None;
        };
        args.args.iter().find_map(|arg| match arg {
            syn::GenericArgument::Type(ty) => Some(TypeHelper::new(ty)),
            _ => None,
        })
    }

    /// `T` for `Option<T>`.
    pub fn option_inner(&self) -> Option<TypeHelper<'a>> {
        if self.last_ident().as_deref() == Some("Option") {
            self.inner_type()
        } else {
            None
        }
    }

    pub fn ty(&self) -> &'a Type {
        self.ty
    }
}

#[derive(Debug)]
pub enum SchemaParseError {
    FileNotFound(String),
    ParseError(String),
    Mismatch(String),
}

impl Display for SchemaParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaParseError::FileNotFound(path) => write!(f, "Schema file not found: {}", path),
            SchemaParseError::ParseError(msg) => write!(f, "Failed to parse schema: {}", msg),
            SchemaParseError::Mismatch(msg) => write!(f, "Schema validation error: {}", msg),
        }
    }
}

impl std::error::Error for SchemaParseError {}

/// Resolves a relative `path` against the crate being compiled.
pub fn resolve_path(path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_relative() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            return PathBuf::from(manifest_dir).join(path);
        }
    }
    path
}

pub fn read_declaration(path: &str) -> Result<serde_json::Value, SchemaParseError> {
    let resolved = resolve_path(path);
    let contents = std::fs::read_to_string(&resolved)
        .map_err(|_| SchemaParseError::FileNotFound(resolved.display().to_string()))?;
    serde_json::from_str(&contents).map_err(|err| SchemaParseError::ParseError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keys() {
        assert_eq!(snake_to_camel_case("first_name"), "firstName");
        assert_eq!(snake_to_camel_case("id"), "id");
        assert_eq!(snake_to_camel_case("r#type"), "type");
        assert_eq!(snake_to_camel_case("_private"), "private");
    }

    #[test]
    fn option_types() {
        let ty: Type = syn::parse_quote!(Option<Vec<u8>>);
        let helper = TypeHelper::new(&ty);
        let inner = helper.option_inner().unwrap();
        assert_eq!(inner.last_ident().as_deref(), Some("Vec"));
        assert_eq!(inner.inner_type().unwrap().last_ident().as_deref(), Some("u8"));

        let ty: Type = syn::parse_quote!(zeropack::Date);
        assert!(TypeHelper::new(&ty).option_inner().is_none());
        assert_eq!(TypeHelper::new(&ty).last_ident().as_deref(), Some("Date"));
    }
}
