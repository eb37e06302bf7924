use tracing::trace;

use crate::buffer::ByteBuffer;
use crate::errors::EncodeError;
use crate::schema::{Schema, PACKET_ID_SIZE};
use crate::value::{Object, Value};

/// Bytes of the element count in front of every array.
const ARRAY_COUNT_SIZE: usize = 4;

/// Bytes of the presence flag in front of every optional field.
const PRESENCE_SIZE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Range-check every integer against its tag. When off, out-of-range
    /// integers are truncated to the tag width instead.
    pub safe: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions { safe: true }
    }
}

fn expect_array(value: &Value) -> Result<&[Value], EncodeError> {
    value.as_array().ok_or(EncodeError::TypeMismatch {
        expected: "array",
        found: value.kind(),
    })
}

fn expect_object(value: &Value) -> Result<&Object, EncodeError> {
    value.as_object().ok_or(EncodeError::TypeMismatch {
        expected: "object",
        found: value.kind(),
    })
}

impl Schema {
    /// Encodes `data` as a packet: the identifier as a big-endian `u16`
    /// followed by the payload. The output is allocated once at its exact size.
    pub fn encode(&self, packet_id: u16, data: &Value) -> Result<Vec<u8>, EncodeError> {
        self.encode_with(packet_id, data, EncodeOptions::default())
    }

    pub fn encode_with(&self, packet_id: u16, data: &Value, options: EncodeOptions) -> Result<Vec<u8>, EncodeError> {
        let size = self.measure(data)?;

        let mut buffer = ByteBuffer::with_len(size);
        buffer.set_safe(options.safe);
        buffer.write_ushort_be(i64::from(packet_id))?;
        self.write(&mut buffer, data)?;

        // The last write is bounds checked, so overshooting never gets here.
        debug_assert_eq!(buffer.remaining(), 0, "measured {} bytes but wrote {}", size, buffer.offset());
        trace!(packet_id, size, safe = options.safe, "encoded packet");

        Ok(buffer.into_bytes())
    }

    /// Size of the packet [`Schema::encode`] would produce for `data`,
    /// header included.
    pub fn measure(&self, data: &Value) -> Result<usize, EncodeError> {
        Ok(PACKET_ID_SIZE + self.measure_value(data)?)
    }

    fn measure_value(&self, value: &Value) -> Result<usize, EncodeError> {
        match self {
            Schema::Primitive(ty) => ty.measure(value),
            Schema::Array(items) => expect_array(value)?
                .iter()
                .try_fold(ARRAY_COUNT_SIZE, |size, item| -> Result<usize, EncodeError> {
                    Ok(size + items.measure_value(item)?)
                }),
            Schema::Object(fields) => {
                let object = expect_object(value)?;
                let mut size = 0;
                for field in fields {
                    if field.optional {
                        size += PRESENCE_SIZE;
                    }
                    match object.get(&field.name) {
                        Some(member) => size += field.schema.measure_value(member)?,
                        None if field.optional => {}
                        None => return Err(EncodeError::MissingField(field.name.clone())),
                    }
                }
                Ok(size)
            }
        }
    }

    /// Writes the payload for `value` at the buffer's cursor.
    pub fn write(&self, buffer: &mut ByteBuffer, value: &Value) -> Result<(), EncodeError> {
        match self {
            Schema::Primitive(ty) => ty.write(buffer, value),
            Schema::Array(items) => {
                let values = expect_array(value)?;
                buffer.write_uint_be(values.len() as i64)?;
                for item in values {
                    items.write(buffer, item)?;
                }
                Ok(())
            }
            Schema::Object(fields) => {
                let object = expect_object(value)?;
                for field in fields {
                    let member = object.get(&field.name);
                    if field.optional {
                        buffer.write_boolean(member.is_some())?;
                    }
                    match member {
                        Some(member) => field.schema.write(buffer, member)?,
                        None if field.optional => {}
                        None => return Err(EncodeError::MissingField(field.name.clone())),
                    }
                }
                Ok(())
            }
        }
    }
}
