//! Per-type measure/write/read for primitive leaves.
//!
//! This layer knows nothing about arrays or objects. `measure` and `write`
//! select the same widths for the same value, which is what lets the encoder
//! allocate the output exactly once.

use crate::buffer::{var_int_len, var_uint_len, ByteBuffer, Encoding, Prefix};
use crate::errors::{DecodeError, EncodeError};
use crate::types::Type;
use crate::value::{Date, RegExp, RegExpFlags, Value};

fn mismatch(expected: &'static str, found: &Value) -> EncodeError {
    EncodeError::TypeMismatch { expected, found: found.kind() }
}

fn expect_int(value: &Value) -> Result<i64, EncodeError> {
    match value {
        Value::Int(value) => Ok(*value),
        other => Err(mismatch("integer", other)),
    }
}

fn expect_number(value: &Value) -> Result<f64, EncodeError> {
    match value {
        Value::Float(value) => Ok(*value),
        Value::Int(value) => Ok(*value as f64),
        other => Err(mismatch("number", other)),
    }
}

fn expect_date(value: &Value) -> Result<i64, EncodeError> {
    match value {
        Value::Date(date) if date.is_valid() => Ok(date.millis()),
        Value::Date(date) => Err(EncodeError::InvalidDate(date.millis())),
        other => Err(mismatch("date", other)),
    }
}

fn expect_regexp(value: &Value) -> Result<&RegExp, EncodeError> {
    match value {
        Value::RegExp(regexp) => Ok(regexp),
        other => Err(mismatch("regexp", other)),
    }
}

/// UTF-8 bytes of a string value.
fn string_bytes(value: &Value) -> Result<Vec<u8>, EncodeError> {
    match value {
        Value::String(text) => Ok(Encoding::Utf8.encode_str(text)),
        Value::Utf16(units) => Ok(Encoding::Utf8.encode(units.iter().copied())),
        other => Err(mismatch("string", other)),
    }
}

fn string_len(value: &Value) -> Result<usize, EncodeError> {
    match value {
        Value::String(text) => Ok(Encoding::Utf8.encoded_len(text.encode_utf16())),
        Value::Utf16(units) => Ok(Encoding::Utf8.encoded_len(units.iter().copied())),
        other => Err(mismatch("string", other)),
    }
}

impl Type {
    fn string_prefix(&self) -> Option<Prefix> {
        match self {
            Type::VString => Some(Prefix::Var),
            Type::BString => Some(Prefix::Byte),
            Type::SString => Some(Prefix::Short),
            Type::IString => Some(Prefix::Int),
            _ => None,
        }
    }

    /// Bytes `value` occupies on the wire.
    pub fn measure(&self, value: &Value) -> Result<usize, EncodeError> {
        if let Some(prefix) = self.string_prefix() {
            let len = string_len(value)?;
            return Ok(prefix.len(len) + len);
        }

        match self {
            Type::UByte | Type::Byte | Type::UShort | Type::Short | Type::UInt | Type::Int => {
                expect_int(value)?;
            }
            Type::VarUInt => return Ok(var_uint_len(expect_int(value)?)),
            Type::VarInt => return Ok(var_int_len(expect_int(value)?)),
            Type::Float | Type::Double => {
                expect_number(value)?;
            }
            Type::Boolean => {
                if !matches!(value, Value::Bool(_)) {
                    return Err(mismatch("boolean", value));
                }
            }
            Type::Date => return Ok(var_uint_len(expect_date(value)?)),
            Type::RegExp => {
                let source_len = Encoding::Utf8.encoded_len(expect_regexp(value)?.source().encode_utf16());
                return Ok(var_uint_len(source_len as i64) + source_len + 1);
            }
            Type::VString | Type::BString | Type::SString | Type::IString => unreachable!("handled above"),
        }

        Ok(self.fixed_len().unwrap_or_default())
    }

    pub fn write(&self, buffer: &mut ByteBuffer, value: &Value) -> Result<(), EncodeError> {
        if let Some(prefix) = self.string_prefix() {
            buffer.write_prefixed(&string_bytes(value)?, prefix)?;
            return Ok(());
        }

        match self {
            Type::UByte => buffer.write_ubyte(expect_int(value)?)?,
            Type::Byte => buffer.write_byte(expect_int(value)?)?,
            Type::UShort => buffer.write_ushort_be(expect_int(value)?)?,
            Type::Short => buffer.write_short_be(expect_int(value)?)?,
            Type::UInt => buffer.write_uint_be(expect_int(value)?)?,
            Type::Int => buffer.write_int_be(expect_int(value)?)?,
            Type::VarUInt => buffer.write_var_uint(expect_int(value)?)?,
            Type::VarInt => buffer.write_var_int(expect_int(value)?)?,
            Type::Float => buffer.write_float_be(expect_number(value)?)?,
            Type::Double => buffer.write_double_be(expect_number(value)?)?,
            Type::Boolean => match value {
                Value::Bool(flag) => buffer.write_boolean(*flag)?,
                other => return Err(mismatch("boolean", other)),
            },
            Type::Date => buffer.write_var_uint(expect_date(value)?)?,
            Type::RegExp => {
                let regexp = expect_regexp(value)?;
                buffer.write_v_string(regexp.source(), Encoding::Utf8)?;
                buffer.write_ubyte(regexp.flags().to_byte() as i64)?;
            }
            Type::VString | Type::BString | Type::SString | Type::IString => unreachable!("handled above"),
        }

        Ok(())
    }

    pub fn read(&self, buffer: &mut ByteBuffer) -> Result<Value, DecodeError> {
        if let Some(prefix) = self.string_prefix() {
            return Ok(Value::String(buffer.read_prefixed(prefix, Encoding::Utf8)?));
        }

        let value = match self {
            Type::UByte => Value::Int(buffer.read_ubyte()?),
            Type::Byte => Value::Int(buffer.read_byte()?),
            Type::UShort => Value::Int(buffer.read_ushort_be()?),
            Type::Short => Value::Int(buffer.read_short_be()?),
            Type::UInt => Value::Int(buffer.read_uint_be()?),
            Type::Int => Value::Int(buffer.read_int_be()?),
            Type::VarUInt => Value::Int(buffer.read_var_uint()?),
            Type::VarInt => Value::Int(buffer.read_var_int()?),
            Type::Float => Value::Float(buffer.read_float_be()?),
            Type::Double => Value::Float(buffer.read_double_be()?),
            Type::Boolean => Value::Bool(buffer.read_boolean()?),
            Type::Date => Value::Date(Date::from_millis(buffer.read_var_uint()?)),
            Type::RegExp => {
                let source = buffer.read_v_string(Encoding::Utf8)?;
                let flags = RegExpFlags::from_byte(buffer.read_ubyte()? as u8);
                Value::RegExp(RegExp::new(source, flags))
            }
            Type::VString | Type::BString | Type::SString | Type::IString => unreachable!("handled above"),
        };

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::WriteError;

    fn write(ty: Type, value: &Value) -> Vec<u8> {
        let len = ty.measure(value).unwrap();
        let mut buffer = ByteBuffer::with_len(len);
        ty.write(&mut buffer, value).unwrap();
        assert_eq!(buffer.remaining(), 0, "{} measured {} bytes", ty, len);
        buffer.into_bytes()
    }

    fn round_trip(ty: Type, value: Value) {
        let bytes = write(ty, &value);
        let mut buffer = ByteBuffer::from_vec(bytes);
        assert_eq!(ty.read(&mut buffer).unwrap(), value, "{}", ty);
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn every_type_measures_what_it_writes() {
        round_trip(Type::UByte, Value::Int(255));
        round_trip(Type::Byte, Value::Int(-128));
        round_trip(Type::UShort, Value::Int(65535));
        round_trip(Type::Short, Value::Int(-32768));
        round_trip(Type::UInt, Value::Int(4_294_967_295));
        round_trip(Type::Int, Value::Int(-2_147_483_648));
        round_trip(Type::VarUInt, Value::Int(16384));
        round_trip(Type::VarInt, Value::Int(-65));
        round_trip(Type::Float, Value::Float(0.5));
        round_trip(Type::Double, Value::Float(std::f64::consts::PI));
        round_trip(Type::Boolean, Value::Bool(true));
        round_trip(Type::VString, Value::from("Александр"));
        round_trip(Type::BString, Value::from("Майоров"));
        round_trip(Type::SString, Value::from("zerobone"));
        round_trip(Type::IString, Value::from("myseCreTPasswodрусскхар!"));
        round_trip(Type::Date, Value::Date(Date::from_millis(1_111_111_112)));
        round_trip(Type::RegExp, Value::RegExp("/^a+$/gi".parse().unwrap()));
    }

    #[test]
    fn string_prefix_widths() {
        assert_eq!(write(Type::VString, &Value::from("ab")), [2, b'a', b'b']);
        assert_eq!(write(Type::BString, &Value::from("ab")), [2, b'a', b'b']);
        assert_eq!(write(Type::SString, &Value::from("ab")), [0, 2, b'a', b'b']);
        assert_eq!(write(Type::IString, &Value::from("ab")), [0, 0, 0, 2, b'a', b'b']);
    }

    #[test]
    fn regexp_layout() {
        let regexp = Value::RegExp(RegExp::new("x", RegExpFlags::IGNORE_CASE | RegExpFlags::MULTILINE));
        assert_eq!(write(Type::RegExp, &regexp), [1, b'x', 0b110]);
    }

    #[test]
    fn date_uses_variable_length() {
        assert_eq!(write(Type::Date, &Value::Date(Date::from_millis(1))), [1]);
        assert_eq!(Type::Date.measure(&Value::Date(Date::from_millis(1 << 29))).unwrap(), 8);
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(write(Type::Double, &Value::Int(1)), [0x3F, 0xF0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn utf16_values_are_written_lossily() {
        let value = Value::Utf16(vec![0x68, 0xD83D]);
        let bytes = write(Type::VString, &value);
        assert_eq!(bytes, [4, b'h', 0xEF, 0xBF, 0xBD]);
        let mut buffer = ByteBuffer::from_vec(bytes);
        assert_eq!(Type::VString.read(&mut buffer).unwrap(), Value::from("h\u{FFFD}"));
    }

    #[test]
    fn type_mismatches_are_reported_by_measure_and_write() {
        let mut buffer = ByteBuffer::with_len(8);
        let expected = EncodeError::TypeMismatch { expected: "integer", found: "string" };
        assert_eq!(Type::UByte.measure(&Value::from("1")), Err(expected.clone()));
        assert_eq!(Type::UByte.write(&mut buffer, &Value::from("1")), Err(expected));
        assert!(matches!(
            Type::VString.measure(&Value::Int(1)),
            Err(EncodeError::TypeMismatch { expected: "string", found: "integer" })
        ));
        assert!(matches!(Type::Boolean.measure(&Value::Int(1)), Err(EncodeError::TypeMismatch { .. })));
        assert!(matches!(Type::RegExp.measure(&Value::from("/a/")), Err(EncodeError::TypeMismatch { .. })));
    }

    #[test]
    fn invalid_and_negative_dates_fail() {
        let mut buffer = ByteBuffer::with_len(8);
        let invalid = Value::Date(Date::from_millis(i64::MAX));
        assert_eq!(Type::Date.write(&mut buffer, &invalid), Err(EncodeError::InvalidDate(i64::MAX)));

        let before_epoch = Value::Date(Date::from_millis(-1));
        assert!(matches!(
            Type::Date.write(&mut buffer, &before_epoch),
            Err(EncodeError::OutOfBounds(WriteError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn range_violations_propagate() {
        let mut buffer = ByteBuffer::with_len(8);
        assert!(matches!(
            Type::UByte.write(&mut buffer, &Value::Int(256)),
            Err(EncodeError::OutOfBounds(WriteError::OutOfRange { value: 256, .. }))
        ));
    }
}
