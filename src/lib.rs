//! Schema-driven binary codec.
//!
//! A [`Schema`] is compiled once from a JSON declaration. Encoding walks it
//! twice, once to measure and once to write into an exactly sized buffer;
//! decoding walks it once. No field names or type tags are sent, so both
//! sides must share the declaration.
//!
//! ```
//! use zeropack::{Schema, Value};
//!
//! let schema = Schema::from_json_str(r#"{ "id": "VARUINT", "nick_opt": "VSTRING" }"#).unwrap();
//! let data: Value = [("id", 300)].into_iter().collect();
//!
//! let packet = schema.encode(7, &data).unwrap();
//! assert_eq!(packet, [0x00, 0x07, 0x81, 0x2C, 0x00]);
//!
//! let (packet_id, decoded) = zeropack::decode_packet::<Value>(&schema, &packet).unwrap();
//! assert_eq!((packet_id, decoded), (7, data));
//! ```

pub mod buffer;
pub mod schema;
pub mod traits;
pub mod value;
mod codec;
mod errors;
mod types;

pub use buffer::{ByteBuffer, Encoding};
pub use errors::{DecodeError, EncodeError, SchemaError};
pub use schema::{EncodeOptions, Field, Schema};
pub use types::Type;
pub use value::{Date, Object, RegExp, RegExpFlags, Value};
pub use zeropack_derive::{Decode, Encode};

/// Encodes `value` as a packet with the given identifier.
#[inline(always)]
pub fn encode<T: traits::Encode + ?Sized>(schema: &Schema, packet_id: u16, value: &T) -> Result<Vec<u8>, EncodeError> {
    schema.encode(packet_id, &value.to_value()?)
}

/// Decodes a payload that starts at the first byte of `bytes`, without a
/// packet identifier.
#[inline(always)]
pub fn decode<T: traits::Decode>(schema: &Schema, bytes: &[u8]) -> Result<T, DecodeError> {
    let mut buffer = ByteBuffer::from_slice(bytes);
    T::from_value(schema.decode(&mut buffer)?)
}

/// Decodes a whole packet as written by [`encode`], returning its identifier
/// alongside the value.
pub fn decode_packet<T: traits::Decode>(schema: &Schema, bytes: &[u8]) -> Result<(u16, T), DecodeError> {
    let mut buffer = ByteBuffer::from_slice(bytes);
    let packet_id = u16::try_from(buffer.read_ushort_be()?)?;
    let value = T::from_value(schema.decode(&mut buffer)?)?;
    Ok((packet_id, value))
}
