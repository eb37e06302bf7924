//! UTF-8 and ASCII transcoding over UTF-16 code units, plus the four
//! length-prefixed string shapes.
//!
//! The UTF-8 encoder is lossy on malformed input: an unexpected trail
//! surrogate, a lead surrogate not followed by a trail, or a lead surrogate
//! at the very end each become U+FFFD. The decoder substitutes U+FFFD for any
//! malformed sequence and advances a single byte.

use std::char::REPLACEMENT_CHARACTER;

use super::{var_uint_len, ByteBuffer, ReadError, WriteError};

const REPLACEMENT_BYTES: [u8; 3] = [0xEF, 0xBF, 0xBD];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// Keeps the low 8 bits of each unit when writing and the low 7 bits of
    /// each byte when reading. No validation.
    Ascii,
}

impl Encoding {
    pub fn encode<I>(self, units: I) -> Vec<u8>
    where
        I: IntoIterator<Item = u16>,
    {
        match self {
            Encoding::Utf8 => {
                let mut bytes = Vec::new();
                transcode_utf8(units, |chunk| bytes.extend_from_slice(chunk));
                bytes
            }
            Encoding::Ascii => units.into_iter().map(|unit| unit as u8).collect(),
        }
    }

    pub fn encode_str(self, text: &str) -> Vec<u8> {
        self.encode(text.encode_utf16())
    }

    /// Number of bytes [`Encoding::encode`] would produce, without allocating.
    pub fn encoded_len<I>(self, units: I) -> usize
    where
        I: IntoIterator<Item = u16>,
    {
        match self {
            Encoding::Utf8 => {
                let mut len = 0;
                transcode_utf8(units, |chunk| len += chunk.len());
                len
            }
            Encoding::Ascii => units.into_iter().count(),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => decode_utf8(bytes),
            Encoding::Ascii => bytes.iter().map(|byte| (byte & 0x7F) as char).collect(),
        }
    }
}

fn transcode_utf8<I, F>(units: I, mut emit: F)
where
    I: IntoIterator<Item = u16>,
    F: FnMut(&[u8]),
{
    let mut units = units.into_iter().peekable();
    let mut lead: Option<u16> = None;

    while let Some(unit) = units.next() {
        let mut code_point = unit as u32;

        if (0xD800..=0xDFFF).contains(&unit) {
            match lead {
                None => {
                    if unit > 0xDBFF || units.peek().is_none() {
                        emit(&REPLACEMENT_BYTES);
                    } else {
                        lead = Some(unit);
                    }
                    continue;
                }
                Some(_) if unit < 0xDC00 => {
                    // Two leads in a row: the first one is dropped.
                    emit(&REPLACEMENT_BYTES);
                    lead = Some(unit);
                    continue;
                }
                Some(lead_unit) => {
                    code_point = ((((lead_unit - 0xD800) as u32) << 10) | (unit - 0xDC00) as u32) + 0x10000;
                }
            }
        } else if lead.is_some() {
            emit(&REPLACEMENT_BYTES);
        }
        lead = None;

        if code_point < 0x80 {
            emit(&[code_point as u8]);
        } else if code_point < 0x800 {
            emit(&[(code_point >> 6 | 0xC0) as u8, (code_point & 0x3F | 0x80) as u8]);
        } else if code_point < 0x10000 {
            emit(&[
                (code_point >> 12 | 0xE0) as u8,
                (code_point >> 6 & 0x3F | 0x80) as u8,
                (code_point & 0x3F | 0x80) as u8,
            ]);
        } else {
            emit(&[
                (code_point >> 18 | 0xF0) as u8,
                (code_point >> 12 & 0x3F | 0x80) as u8,
                (code_point >> 6 & 0x3F | 0x80) as u8,
                (code_point & 0x3F | 0x80) as u8,
            ]);
        }
    }
}

fn decode_utf8(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let first = bytes[i];
        let mut width = if first > 0xEF {
            4
        } else if first > 0xDF {
            3
        } else if first > 0xBF {
            2
        } else {
            1
        };

        let code_point = bytes.get(i..i + width).and_then(|sequence| {
            let continuation = |byte: u8| byte & 0xC0 == 0x80;
            match *sequence {
                [a] if a < 0x80 => Some(a as u32),
                [a, b] if continuation(b) => {
                    let code_point = (a as u32 & 0x1F) << 6 | (b as u32 & 0x3F);
                    (code_point > 0x7F).then_some(code_point)
                }
                [a, b, c] if continuation(b) && continuation(c) => {
                    let code_point = (a as u32 & 0x0F) << 12 | (b as u32 & 0x3F) << 6 | (c as u32 & 0x3F);
                    (code_point > 0x7FF && !(0xD800..=0xDFFF).contains(&code_point)).then_some(code_point)
                }
                [a, b, c, d] if continuation(b) && continuation(c) && continuation(d) => {
                    let code_point = (a as u32 & 0x0F) << 18
                        | (b as u32 & 0x3F) << 12
                        | (c as u32 & 0x3F) << 6
                        | (d as u32 & 0x3F);
                    (code_point > 0xFFFF && code_point < 0x110000).then_some(code_point)
                }
                _ => None,
            }
        });

        match code_point.and_then(char::from_u32) {
            Some(ch) => result.push(ch),
            None => {
                result.push(REPLACEMENT_CHARACTER);
                width = 1;
            }
        }
        i += width;
    }

    result
}

impl ByteBuffer {
    pub(crate) fn write_prefixed(&mut self, bytes: &[u8], prefix: Prefix) -> Result<(), WriteError> {
        let len = bytes.len() as i64;
        match prefix {
            Prefix::Var => self.write_var_uint(len)?,
            Prefix::Byte => self.write_ubyte(len)?,
            Prefix::Short => self.write_ushort_be(len)?,
            Prefix::Int => self.write_uint_be(len)?,
        }
        self.put(bytes)
    }

    pub(crate) fn read_prefixed(&mut self, prefix: Prefix, encoding: Encoding) -> Result<String, ReadError> {
        let len = match prefix {
            Prefix::Var => self.read_var_uint()?,
            Prefix::Byte => self.read_ubyte()?,
            Prefix::Short => self.read_ushort_be()?,
            Prefix::Int => self.read_uint_be()?,
        };
        // Prefixes are never negative; a length beyond the address space
        // cannot be satisfied anyway.
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        let bytes = self.take(len)?;
        Ok(encoding.decode(bytes))
    }

    pub fn write_v_bytes(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.write_prefixed(bytes, Prefix::Var)
    }

    pub fn write_b_bytes(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.write_prefixed(bytes, Prefix::Byte)
    }

    pub fn write_s_bytes(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.write_prefixed(bytes, Prefix::Short)
    }

    pub fn write_i_bytes(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        self.write_prefixed(bytes, Prefix::Int)
    }

    pub fn write_v_string(&mut self, text: &str, encoding: Encoding) -> Result<(), WriteError> {
        self.write_v_bytes(&encoding.encode_str(text))
    }

    pub fn write_b_string(&mut self, text: &str, encoding: Encoding) -> Result<(), WriteError> {
        self.write_b_bytes(&encoding.encode_str(text))
    }

    pub fn write_s_string(&mut self, text: &str, encoding: Encoding) -> Result<(), WriteError> {
        self.write_s_bytes(&encoding.encode_str(text))
    }

    pub fn write_i_string(&mut self, text: &str, encoding: Encoding) -> Result<(), WriteError> {
        self.write_i_bytes(&encoding.encode_str(text))
    }

    pub fn read_v_string(&mut self, encoding: Encoding) -> Result<String, ReadError> {
        self.read_prefixed(Prefix::Var, encoding)
    }

    pub fn read_b_string(&mut self, encoding: Encoding) -> Result<String, ReadError> {
        self.read_prefixed(Prefix::Byte, encoding)
    }

    pub fn read_s_string(&mut self, encoding: Encoding) -> Result<String, ReadError> {
        self.read_prefixed(Prefix::Short, encoding)
    }

    pub fn read_i_string(&mut self, encoding: Encoding) -> Result<String, ReadError> {
        self.read_prefixed(Prefix::Int, encoding)
    }
}

/// Width of the length that precedes string bytes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prefix {
    Var,
    Byte,
    Short,
    Int,
}

impl Prefix {
    pub(crate) fn len(self, payload_len: usize) -> usize {
        match self {
            Prefix::Var => var_uint_len(payload_len as i64),
            Prefix::Byte => 1,
            Prefix::Short => 2,
            Prefix::Int => 4,
        }
    }
}
