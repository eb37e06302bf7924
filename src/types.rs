use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::errors::SchemaError;

/// Primitive wire types a schema leaf can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    UByte,
    Byte,
    UShort,
    Short,
    UInt,
    Int,
    VarUInt,
    VarInt,
    Float,
    Double,
    Boolean,
    /// UTF-8 prefixed by a variable-length length.
    VString,
    /// UTF-8 prefixed by a 1-byte length.
    BString,
    /// UTF-8 prefixed by a 2-byte length.
    SString,
    /// UTF-8 prefixed by a 4-byte length.
    IString,
    /// Epoch milliseconds as a variable-length unsigned integer.
    Date,
    /// Pattern source as a `VString` followed by a flag byte.
    RegExp,
}

impl Type {
    pub const ALL: [Type; 17] = [
        Type::UByte,
        Type::Byte,
        Type::UShort,
        Type::Short,
        Type::UInt,
        Type::Int,
        Type::VarUInt,
        Type::VarInt,
        Type::Float,
        Type::Double,
        Type::Boolean,
        Type::VString,
        Type::BString,
        Type::SString,
        Type::IString,
        Type::Date,
        Type::RegExp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Type::UByte => "UBYTE",
            Type::Byte => "BYTE",
            Type::UShort => "USHORT",
            Type::Short => "SHORT",
            Type::UInt => "UINT",
            Type::Int => "INT",
            Type::VarUInt => "VARUINT",
            Type::VarInt => "VARINT",
            Type::Float => "FLOAT",
            Type::Double => "DOUBLE",
            Type::Boolean => "BOOLEAN",
            Type::VString => "VSTRING",
            Type::BString => "BSTRING",
            Type::SString => "SSTRING",
            Type::IString => "ISTRING",
            Type::Date => "DATE",
            Type::RegExp => "REGEXP",
        }
    }

    /// Wire width for types whose size does not depend on the value.
    pub fn fixed_len(&self) -> Option<usize> {
        match self {
            Type::UByte | Type::Byte | Type::Boolean => Some(1),
            Type::UShort | Type::Short => Some(2),
            Type::UInt | Type::Int | Type::Float => Some(4),
            Type::Double => Some(8),
            Type::VarUInt
            | Type::VarInt
            | Type::VString
            | Type::BString
            | Type::SString
            | Type::IString
            | Type::Date
            | Type::RegExp => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Type {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Type::ALL
            .iter()
            .find(|ty| ty.as_str() == s)
            .copied()
            .ok_or_else(|| SchemaError::UnknownType(s.to_string()))
    }
}
