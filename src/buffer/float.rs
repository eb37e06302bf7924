//! IEEE754 single/double packing done with integer and power-of-two
//! arithmetic instead of native float-to-bits casts.
//!
//! Singles are rounded from the `f64` input by biasing the value with
//! `2^-24 - 2^-77` before truncating the mantissa. NaN is written with a
//! mantissa of 1 and a clear sign bit.

use super::{ByteBuffer, ReadError, WriteError};

const FLOAT_MANTISSA_BITS: u32 = 23;
const DOUBLE_MANTISSA_BITS: u32 = 52;

/// `x * 2^exp` for exponents outside what a single `powi` can represent.
fn ldexp(mut x: f64, mut exp: i32) -> f64 {
    while exp > 1000 {
        x *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        x *= 2f64.powi(-1000);
        exp += 1000;
    }
    x * 2f64.powi(exp)
}

#[inline]
fn pow2(exp: i32) -> f64 {
    ldexp(1.0, exp)
}

struct Layout {
    width: usize,
    mantissa_bits: u32,
    exponent_max: i32,
    exponent_bias: i32,
}

impl Layout {
    const fn new(width: usize, mantissa_bits: u32) -> Self {
        let exponent_bits = width as u32 * 8 - mantissa_bits - 1;
        let exponent_max = (1 << exponent_bits) - 1;
        Layout {
            width,
            mantissa_bits,
            exponent_max,
            exponent_bias: exponent_max >> 1,
        }
    }

    fn pack(&self, value: f64) -> u64 {
        let rounding = if self.mantissa_bits == FLOAT_MANTISSA_BITS {
            pow2(-24) - pow2(-77)
        } else {
            0.0
        };
        let negative = value < 0.0 || (value == 0.0 && 1.0 / value < 0.0);
        let mut value = value.abs();

        let (exponent, mantissa) = if value.is_nan() {
            (self.exponent_max, 1u64)
        } else if value.is_infinite() {
            (self.exponent_max, 0)
        } else if value == 0.0 {
            (0, 0)
        } else {
            let mut e = value.log2().floor() as i32;
            let mut c = pow2(-e);
            if value * c < 1.0 {
                e -= 1;
                c *= 2.0;
            }
            if e + self.exponent_bias >= 1 {
                value += rounding / c;
            } else {
                value += rounding * pow2(1 - self.exponent_bias);
            }
            if value * c >= 2.0 {
                e += 1;
                c /= 2.0;
            }

            if e + self.exponent_bias >= self.exponent_max {
                (self.exponent_max, 0)
            } else if e + self.exponent_bias >= 1 {
                let mantissa = ((value * c) - 1.0) * pow2(self.mantissa_bits as i32);
                (e + self.exponent_bias, mantissa as u64)
            } else {
                // Subnormal.
                let mantissa = value * pow2(self.exponent_bias - 1) * pow2(self.mantissa_bits as i32);
                (0, mantissa as u64)
            }
        };

        let sign_bit = (negative as u64) << (self.width * 8 - 1);
        sign_bit | ((exponent as u64) << self.mantissa_bits) | mantissa
    }

    fn unpack(&self, bits: u64) -> f64 {
        let negative = (bits >> (self.width * 8 - 1)) & 1 == 1;
        let mut exponent = ((bits >> self.mantissa_bits) as i32) & self.exponent_max;
        let mut mantissa = (bits & ((1u64 << self.mantissa_bits) - 1)) as f64;

        if exponent == 0 {
            exponent = 1 - self.exponent_bias;
        } else if exponent == self.exponent_max {
            return if mantissa != 0.0 {
                f64::NAN
            } else if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
        } else {
            mantissa += pow2(self.mantissa_bits as i32);
            exponent -= self.exponent_bias;
        }

        let magnitude = ldexp(mantissa, exponent - self.mantissa_bits as i32);
        if negative { -magnitude } else { magnitude }
    }
}

const FLOAT: Layout = Layout::new(4, FLOAT_MANTISSA_BITS);
const DOUBLE: Layout = Layout::new(8, DOUBLE_MANTISSA_BITS);

impl ByteBuffer {
    fn check_ieee754(&self, width: usize) -> Result<(), WriteError> {
        if self.safe && self.offset + width > self.bytes.len() {
            return Err(WriteError::Ieee754OutOfRange {
                width,
                offset: self.offset,
                len: self.bytes.len(),
            });
        }
        Ok(())
    }

    fn write_ieee754(&mut self, layout: &Layout, value: f64, little_endian: bool) -> Result<(), WriteError> {
        self.check_ieee754(layout.width)?;
        let packed = layout.pack(value).to_be_bytes();
        let mut bytes = packed[8 - layout.width..].to_vec();
        if little_endian {
            bytes.reverse();
        }
        self.put(&bytes)
    }

    fn read_ieee754(&mut self, layout: &Layout, little_endian: bool) -> Result<f64, ReadError> {
        let bytes = self.take(layout.width)?;
        let fold = |bits: u64, byte: &u8| (bits << 8) | *byte as u64;
        let bits = if little_endian {
            bytes.iter().rev().fold(0, fold)
        } else {
            bytes.iter().fold(0, fold)
        };
        Ok(layout.unpack(bits))
    }

    pub fn write_float_be(&mut self, value: f64) -> Result<(), WriteError> {
        self.write_ieee754(&FLOAT, value, false)
    }

    pub fn write_float_le(&mut self, value: f64) -> Result<(), WriteError> {
        self.write_ieee754(&FLOAT, value, true)
    }

    pub fn write_double_be(&mut self, value: f64) -> Result<(), WriteError> {
        self.write_ieee754(&DOUBLE, value, false)
    }

    pub fn write_double_le(&mut self, value: f64) -> Result<(), WriteError> {
        self.write_ieee754(&DOUBLE, value, true)
    }

    pub fn read_float_be(&mut self) -> Result<f64, ReadError> {
        self.read_ieee754(&FLOAT, false)
    }

    pub fn read_float_le(&mut self) -> Result<f64, ReadError> {
        self.read_ieee754(&FLOAT, true)
    }

    pub fn read_double_be(&mut self) -> Result<f64, ReadError> {
        self.read_ieee754(&DOUBLE, false)
    }

    pub fn read_double_le(&mut self) -> Result<f64, ReadError> {
        self.read_ieee754(&DOUBLE, true)
    }
}
