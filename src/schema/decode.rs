use tracing::trace;

use crate::buffer::ByteBuffer;
use crate::errors::DecodeError;
use crate::schema::Schema;
use crate::value::{Object, Value};

impl Schema {
    /// Reads one payload starting at the buffer's cursor.
    ///
    /// The packet identifier written by [`Schema::encode`] is not consumed;
    /// position the cursor past it first (or use [`crate::decode_packet`]).
    pub fn decode(&self, buffer: &mut ByteBuffer) -> Result<Value, DecodeError> {
        let start = buffer.offset();
        let value = self.read(buffer)?;
        trace!(start, size = buffer.offset() - start, "decoded payload");
        Ok(value)
    }

    fn read(&self, buffer: &mut ByteBuffer) -> Result<Value, DecodeError> {
        match self {
            Schema::Primitive(ty) => ty.read(buffer),
            Schema::Array(items) => {
                let len = usize::try_from(buffer.read_uint_be()?)?;
                // A corrupt count must not reserve more than the input could hold.
                let mut values = Vec::with_capacity(len.min(buffer.remaining()));
                for _ in 0..len {
                    values.push(items.read(buffer)?);
                }
                Ok(Value::Array(values))
            }
            Schema::Object(fields) => {
                let mut object = Object::new();
                for field in fields {
                    if field.optional && !buffer.read_boolean()? {
                        continue;
                    }
                    object.insert(field.name.clone(), field.schema.read(buffer)?);
                }
                Ok(Value::Object(object))
            }
        }
    }
}
