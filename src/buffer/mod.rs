//! Offset-tracked byte buffer with the primitive wire codecs.
//!
//! A [`ByteBuffer`] is either created zero-filled with the exact length an
//! encode pass measured, or wraps bytes received from a peer. Every write
//! and read advances the cursor. Multi-byte integers are big-endian.
//!
//! In safe mode (the default) integer writers validate the value against
//! the range of their width before touching memory. Memory bounds are
//! checked in both modes.

mod float;
mod string;
mod varint;

use std::fmt::{Debug, Formatter};
use thiserror::Error;

pub use string::Encoding;
pub(crate) use string::Prefix;
pub use varint::{var_int_len, var_uint_len, MAX_SAFE_INTEGER};

pub const MAX_UBYTE: i64 = 0xFF;
pub const MIN_BYTE: i64 = -0x80;
pub const MAX_BYTE: i64 = 0x7F;
pub const MAX_USHORT: i64 = 0xFFFF;
pub const MIN_SHORT: i64 = -0x8000;
pub const MAX_SHORT: i64 = 0x7FFF;
pub const MAX_UINT: i64 = 0xFFFF_FFFF;
pub const MIN_INT: i64 = -0x8000_0000;
pub const MAX_INT: i64 = 0x7FFF_FFFF;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WriteError {
    #[error("not enough space while writing (truncated): {needed} bytes at offset {offset}, buffer length {len}")]
    Truncated { needed: usize, offset: usize, len: usize },
    #[error("integer {value} is out of range [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },
    #[error("IEEE754 write of {width} bytes at offset {offset} is out of range for buffer length {len}")]
    Ieee754OutOfRange { width: usize, offset: usize, len: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("not enough data while reading (truncated): {needed} bytes at offset {offset}, buffer length {len}")]
    Truncated { needed: usize, offset: usize, len: usize },
}

pub struct ByteBuffer {
    bytes: Vec<u8>,
    offset: usize,
    safe: bool,
}

impl ByteBuffer {
    /// Creates a zero-filled buffer of exactly `len` bytes, ready for writing.
    pub fn with_len(len: usize) -> Self {
        ByteBuffer {
            bytes: vec![0; len],
            offset: 0,
            safe: true,
        }
    }

    /// Wraps received bytes for reading. The cursor starts at offset 0.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        ByteBuffer {
            bytes,
            offset: 0,
            safe: true,
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Repositions the cursor, e.g. back to 0 for another decode pass or
    /// past a packet header the caller already consumed.
    #[inline]
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    #[inline]
    pub fn is_safe(&self) -> bool {
        self.safe
    }

    #[inline]
    pub fn set_safe(&mut self, safe: bool) {
        self.safe = safe;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn request_read(&self, needed: usize) -> Result<(), ReadError> {
        match self.offset.checked_add(needed) {
            Some(end) if end <= self.bytes.len() => Ok(()),
            _ => Err(ReadError::Truncated {
                needed,
                offset: self.offset,
                len: self.bytes.len(),
            }),
        }
    }

    fn request_write(&self, needed: usize) -> Result<(), WriteError> {
        match self.offset.checked_add(needed) {
            Some(end) if end <= self.bytes.len() => Ok(()),
            _ => Err(WriteError::Truncated {
                needed,
                offset: self.offset,
                len: self.bytes.len(),
            }),
        }
    }

    fn check_int(&self, value: i64, min: i64, max: i64) -> Result<(), WriteError> {
        if self.safe && !(min..=max).contains(&value) {
            return Err(WriteError::OutOfRange { value, min, max });
        }
        Ok(())
    }

    /// Copies `bytes` at the cursor. Bounds are enforced regardless of mode.
    fn put(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.request_write(bytes.len())?;
        self.bytes[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
        Ok(())
    }

    fn take(&mut self, count: usize) -> Result<&[u8], ReadError> {
        self.request_read(count)?;
        let start = self.offset;
        self.offset += count;
        Ok(&self.bytes[start..start + count])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn write_ubyte(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, 0, MAX_UBYTE)?;
        self.put(&[value as u8])
    }

    pub fn write_byte(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, MIN_BYTE, MAX_BYTE)?;
        self.put(&[value as u8])
    }

    pub fn write_ushort_be(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, 0, MAX_USHORT)?;
        self.put(&(value as u16).to_be_bytes())
    }

    pub fn write_short_be(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, MIN_SHORT, MAX_SHORT)?;
        self.put(&(value as u16).to_be_bytes())
    }

    pub fn write_uint_be(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, 0, MAX_UINT)?;
        self.put(&(value as u32).to_be_bytes())
    }

    pub fn write_int_be(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, MIN_INT, MAX_INT)?;
        self.put(&(value as u32).to_be_bytes())
    }

    pub fn write_boolean(&mut self, value: bool) -> Result<(), WriteError> {
        self.write_ubyte(value as i64)
    }

    pub fn read_ubyte(&mut self) -> Result<i64, ReadError> {
        let [byte] = self.take_array::<1>()?;
        Ok(byte as i64)
    }

    pub fn read_byte(&mut self) -> Result<i64, ReadError> {
        let [byte] = self.take_array::<1>()?;
        Ok(byte as i8 as i64)
    }

    pub fn read_ushort_be(&mut self) -> Result<i64, ReadError> {
        Ok(u16::from_be_bytes(self.take_array()?) as i64)
    }

    pub fn read_short_be(&mut self) -> Result<i64, ReadError> {
        Ok(i16::from_be_bytes(self.take_array()?) as i64)
    }

    pub fn read_uint_be(&mut self) -> Result<i64, ReadError> {
        Ok(u32::from_be_bytes(self.take_array()?) as i64)
    }

    pub fn read_int_be(&mut self) -> Result<i64, ReadError> {
        Ok(i32::from_be_bytes(self.take_array()?) as i64)
    }

    /// Any nonzero byte reads as `true`.
    pub fn read_boolean(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_ubyte()? != 0)
    }

    fn peek_ubyte(&self) -> Result<u8, ReadError> {
        self.request_read(1)?;
        Ok(self.bytes[self.offset])
    }
}

impl Debug for ByteBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hex = self.bytes.iter().map(|byte| format!("{:02x}", byte)).collect::<Vec<_>>().join(" ");
        write!(f, "ByteBuffer {{ offset: {}, safe: {}, bytes: [{}] }}", self.offset, self.safe, hex)
    }
}
