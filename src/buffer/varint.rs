//! Four-tier variable-length integers.
//!
//! ```text
//! tier 1  0xxxxxxx                               7 bits
//! tier 2  10xxxxxx xxxxxxxx                     14 bits
//! tier 3  110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx    29 bits
//! tier 4  111xxxxx + 7 bytes                     61 bits
//! ```
//!
//! The tier is a pure function of the magnitude, so [`var_uint_len`] and the
//! writers always agree on the width.

use super::{ByteBuffer, ReadError, WriteError};

/// Largest magnitude the variable-length writers accept (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

const UNSIGNED_TIER_1: i64 = 1 << 7;
const UNSIGNED_TIER_2: i64 = 1 << 14;
const UNSIGNED_TIER_3: i64 = 1 << 29;

const SIGNED_TIER_1: i64 = 1 << 6;
const SIGNED_TIER_2: i64 = 1 << 13;
const SIGNED_TIER_3: i64 = 1 << 28;

const TIER_2_TAG: i64 = 0x8000;
const TIER_3_TAG: i64 = 0xC000_0000;
const TIER_4_TAG: i64 = 0xE000_0000;

const LOW_WORD: i64 = 0xFFFF_FFFF;
const TIER_4_HIGH_MASK: i64 = 0x1FFF_FFFF;

pub fn var_uint_len(value: i64) -> usize {
    if value < UNSIGNED_TIER_1 {
        1
    } else if value < UNSIGNED_TIER_2 {
        2
    } else if value < UNSIGNED_TIER_3 {
        4
    } else {
        8
    }
}

pub fn var_int_len(value: i64) -> usize {
    if (-SIGNED_TIER_1..SIGNED_TIER_1).contains(&value) {
        1
    } else if (-SIGNED_TIER_2..SIGNED_TIER_2).contains(&value) {
        2
    } else if (-SIGNED_TIER_3..SIGNED_TIER_3).contains(&value) {
        4
    } else {
        8
    }
}

#[inline]
fn sign_extend(value: i64, bits: u32) -> i64 {
    let shift = 64 - bits;
    (value << shift) >> shift
}

impl ByteBuffer {
    pub fn write_var_uint(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, 0, MAX_SAFE_INTEGER)?;

        match var_uint_len(value) {
            1 => self.write_ubyte(value),
            2 => self.write_ushort_be(value + TIER_2_TAG),
            4 => self.write_uint_be(value + TIER_3_TAG),
            _ => {
                self.request_write(8)?;
                self.write_uint_be((value >> 32) + TIER_4_TAG)?;
                self.write_uint_be(value & LOW_WORD)
            }
        }
    }

    pub fn write_var_int(&mut self, value: i64) -> Result<(), WriteError> {
        self.check_int(value, -MAX_SAFE_INTEGER, MAX_SAFE_INTEGER)?;

        // The magnitude is masked to the tier width; the reader sign-extends
        // from the tier's top bit.
        match var_int_len(value) {
            1 => self.write_ubyte(value & 0x7F),
            2 => self.write_ushort_be((value & 0x3FFF) + TIER_2_TAG),
            4 => self.write_uint_be((value & 0x1FFF_FFFF) + TIER_3_TAG),
            _ => {
                self.request_write(8)?;
                self.write_uint_be(((value >> 32) & TIER_4_HIGH_MASK) + TIER_4_TAG)?;
                self.write_uint_be(value & LOW_WORD)
            }
        }
    }

    pub fn read_var_uint(&mut self) -> Result<i64, ReadError> {
        let first = self.peek_ubyte()?;

        if first & 0x80 == 0 {
            self.read_ubyte()
        } else if first & 0x40 == 0 {
            Ok(self.read_ushort_be()? - TIER_2_TAG)
        } else if first & 0x20 == 0 {
            Ok(self.read_uint_be()? - TIER_3_TAG)
        } else {
            self.request_read(8)?;
            let high = self.read_uint_be()? - TIER_4_TAG;
            let low = self.read_uint_be()?;
            Ok((high << 32) + low)
        }
    }

    pub fn read_var_int(&mut self) -> Result<i64, ReadError> {
        let first = self.peek_ubyte()?;

        if first & 0x80 == 0 {
            Ok(sign_extend(self.read_ubyte()?, 7))
        } else if first & 0x40 == 0 {
            Ok(sign_extend(self.read_ushort_be()? - TIER_2_TAG, 14))
        } else if first & 0x20 == 0 {
            Ok(sign_extend(self.read_uint_be()? - TIER_3_TAG, 29))
        } else {
            self.request_read(8)?;
            let high = sign_extend(self.read_uint_be()? - TIER_4_TAG, 29);
            let low = self.read_uint_be()?;
            Ok(high * (1 << 32) + low)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_uint(value: i64) -> Vec<u8> {
        let mut buffer = ByteBuffer::with_len(var_uint_len(value));
        buffer.write_var_uint(value).unwrap();
        assert_eq!(buffer.remaining(), 0);
        buffer.into_bytes()
    }

    fn encode_int(value: i64) -> Vec<u8> {
        let mut buffer = ByteBuffer::with_len(var_int_len(value));
        buffer.write_var_int(value).unwrap();
        assert_eq!(buffer.remaining(), 0);
        buffer.into_bytes()
    }

    #[test]
    fn unsigned_tier_boundaries() {
        let cases: [(i64, &[u8]); 7] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x80, 0x80]),
            (16383, &[0xBF, 0xFF]),
            (16384, &[0xC0, 0x00, 0x40, 0x00]),
            ((1 << 29) - 1, &[0xDF, 0xFF, 0xFF, 0xFF]),
            (1 << 29, &[0xE0, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00]),
        ];

        for (value, expected) in cases {
            let bytes = encode_uint(value);
            assert_eq!(bytes, expected, "value {}", value);
            assert_eq!(ByteBuffer::from_vec(bytes).read_var_uint().unwrap(), value);
        }
    }

    #[test]
    fn unsigned_safe_integer_ceiling() {
        let bytes = encode_uint(MAX_SAFE_INTEGER);
        assert_eq!(bytes, [0xE0, 0x1F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(ByteBuffer::from_vec(bytes).read_var_uint().unwrap(), MAX_SAFE_INTEGER);

        let mut buffer = ByteBuffer::with_len(8);
        assert!(matches!(
            buffer.write_var_uint(MAX_SAFE_INTEGER + 1),
            Err(WriteError::OutOfRange { .. })
        ));
        assert!(matches!(buffer.write_var_uint(-1), Err(WriteError::OutOfRange { .. })));
    }

    #[test]
    fn signed_tier_boundaries() {
        let cases: [(i64, usize); 12] = [
            (-64, 1),
            (63, 1),
            (-65, 2),
            (64, 2),
            (-(1 << 13), 2),
            ((1 << 13) - 1, 2),
            (-(1 << 13) - 1, 4),
            (1 << 13, 4),
            (-(1 << 28), 4),
            ((1 << 28) - 1, 4),
            (-(1 << 28) - 1, 8),
            (1 << 28, 8),
        ];

        for (value, width) in cases {
            let bytes = encode_int(value);
            assert_eq!(bytes.len(), width, "value {}", value);
            assert_eq!(ByteBuffer::from_vec(bytes).read_var_int().unwrap(), value);
        }
    }

    #[test]
    fn signed_layout() {
        assert_eq!(encode_int(-64), [0x40]);
        assert_eq!(encode_int(-65), [0xBF, 0xBF]);
        assert_eq!(encode_int(-(1 << 28) - 1), [0xFF, 0xFF, 0xFF, 0xFF, 0xEF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn signed_extremes_round_trip() {
        for value in [MAX_SAFE_INTEGER, -MAX_SAFE_INTEGER, -1, 0, 1] {
            let bytes = encode_int(value);
            assert_eq!(ByteBuffer::from_vec(bytes).read_var_int().unwrap(), value);
        }
    }

    #[test]
    fn truncated_tier_four_read_fails() {
        let mut buffer = ByteBuffer::from_slice(&[0xE0, 0x00, 0x00, 0x00, 0x20]);
        assert!(matches!(buffer.read_var_uint(), Err(ReadError::Truncated { needed: 8, .. })));
    }
}
