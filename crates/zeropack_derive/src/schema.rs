//! Compile-time checks of a type against its JSON declaration.

use serde_json::Value;

use crate::field::{Field, OPTIONAL_SUFFIX};
use crate::utils::TypeHelper;

/// Tags an enum can be declared as: its variant index is written as an integer.
const INTEGER_TAGS: [&str; 8] = ["UBYTE", "BYTE", "USHORT", "SHORT", "UINT", "INT", "VARUINT", "VARINT"];

const STRING_TAGS: [&str; 4] = ["VSTRING", "BSTRING", "SSTRING", "ISTRING"];

/// Types the checks know about. Anything else, like a derived enum, is
/// left to its own `Encode`/`Decode` impl.
const KNOWN_TYPES: [&str; 18] = [
    "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "f32", "f64", "bool", "String", "Date",
    "RegExp", "Vec", "Option", "Box",
];

/// Rust types that can hold every value of `tag`. `None` for unknown tags.
fn accepted_types(tag: &str) -> Option<&'static [&'static str]> {
    let types: &'static [&'static str] = match tag {
        "UBYTE" => &["u8", "u16", "u32", "u64", "usize", "i16", "i32", "i64"],
        "BYTE" => &["i8", "i16", "i32", "i64"],
        "USHORT" => &["u16", "u32", "u64", "usize", "i32", "i64"],
        "SHORT" => &["i16", "i32", "i64"],
        "UINT" => &["u32", "u64", "usize", "i64"],
        "INT" => &["i32", "i64"],
        "VARUINT" => &["u64", "usize", "i64"],
        "VARINT" => &["i64"],
        "FLOAT" => &["f32", "f64"],
        "DOUBLE" => &["f64"],
        "BOOLEAN" => &["bool"],
        "DATE" => &["Date"],
        "REGEXP" => &["RegExp"],
        tag if STRING_TAGS.contains(&tag) => &["String"],
        _ => return None,
    };
    Some(types)
}

/// Checks that `declaration` compiles and that `ty` can carry it. Types that
/// are not plain paths, and nested objects, are left to the trait bounds.
fn validate_type(name: &str, declaration: &Value, ty: Option<&TypeHelper>) -> Result<(), String> {
    let ident = ty.and_then(TypeHelper::last_ident);
    if ident.as_deref() == Some("Value") {
        return validate_declaration(name, declaration);
    }

    match declaration {
        Value::String(tag) => {
            let accepted = accepted_types(tag).ok_or_else(|| format!("Field '{}' has unknown type '{}'", name, tag))?;
            match ident {
                Some(ident) if KNOWN_TYPES.contains(&ident.as_str()) && !accepted.contains(&ident.as_str()) => Err(format!(
                    "Field '{}' is declared as {} but has type '{}'. Valid types are: {:?}",
                    name, tag, ident, accepted
                )),
                _ => Ok(()),
            }
        }
        Value::Array(items) => {
            let [item] = items.as_slice() else {
                return Err(format!("Field '{}' must declare an array with exactly 1 element, got {}", name, items.len()));
            };
            match ident.as_deref() {
                Some("Vec") => validate_type(name, item, ty.and_then(TypeHelper::inner_type).as_ref()),
                Some(other) if KNOWN_TYPES.contains(&other) => {
                    Err(format!("Field '{}' is declared as an array but has type '{}'", name, other))
                }
                _ => validate_declaration(name, item),
            }
        }
        Value::Object(_) => validate_declaration(name, declaration),
        other => Err(format!("Field '{}' has unsupported declaration: {}", name, other)),
    }
}

/// Structural check of a declaration with no Rust type to compare against.
fn validate_declaration(name: &str, declaration: &Value) -> Result<(), String> {
    match declaration {
        Value::String(tag) => accepted_types(tag)
            .map(|_| ())
            .ok_or_else(|| format!("Field '{}' has unknown type '{}'", name, tag)),
        Value::Array(items) => match items.as_slice() {
            [item] => validate_declaration(name, item),
            _ => Err(format!("Field '{}' must declare an array with exactly 1 element, got {}", name, items.len())),
        },
        Value::Object(map) => map
            .iter()
            .try_for_each(|(key, value)| validate_declaration(&format!("{}.{}", name, key), value)),
        other => Err(format!("Field '{}' has unsupported declaration: {}", name, other)),
    }
}

pub fn validate_struct(declaration: &Value, fields: &[Field]) -> Result<(), String> {
    let Value::Object(map) = declaration else {
        return Err(format!("Structs must be declared as an object, got: {}", declaration));
    };

    for field in fields {
        let declared_key = field.declared_key();
        match map.get(&declared_key) {
            Some(value) => validate_type(&field.key, value, Some(&field.value_type))?,
            None if field.optional && map.contains_key(&field.key) => {
                return Err(format!("Field '{}' is an Option but is declared as required", field.key));
            }
            None if !field.optional && map.contains_key(&format!("{}{}", field.key, OPTIONAL_SUFFIX)) => {
                return Err(format!("Field '{}' is declared as optional but is not an Option", field.key));
            }
            None => return Err(format!("Field '{}' not found in schema", declared_key)),
        }
    }

    for key in map.keys() {
        let name = key.strip_suffix(OPTIONAL_SUFFIX).unwrap_or(key);
        if !fields.iter().any(|field| field.key == name) {
            return Err(format!("Field '{}' is not present in struct", key));
        }
    }

    Ok(())
}

pub fn validate_enum(declaration: &Value) -> Result<(), String> {
    match declaration {
        Value::String(tag) if INTEGER_TAGS.contains(&tag.as_str()) => Ok(()),
        other => Err(format!("Enums must be declared as one of {:?}, got: {}", INTEGER_TAGS, other)),
    }
}
