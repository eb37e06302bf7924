use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Regular expression flags. The raw bits are the wire mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegExpFlags: u8 {
        const GLOBAL = 0b0000_0001;
        const IGNORE_CASE = 0b0000_0010;
        const MULTILINE = 0b0000_0100;
    }
}

impl RegExpFlags {
    /// Unknown bits are dropped.
    pub const fn from_byte(byte: u8) -> Self {
        Self::from_bits_truncate(byte)
    }

    pub const fn to_byte(self) -> u8 {
        self.bits()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseRegExpError {
    #[error("regular expression literal must look like /source/flags, got: {0}")]
    NotALiteral(String),
    #[error("unsupported regular expression flag: {0}")]
    UnsupportedFlag(char),
}

/// A regular expression as pattern source plus flags. The pattern is not
/// compiled or validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegExp {
    source: String,
    flags: RegExpFlags,
}

impl RegExp {
    pub fn new(source: impl Into<String>, flags: RegExpFlags) -> Self {
        RegExp {
            source: source.into(),
            flags,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> RegExpFlags {
        self.flags
    }
}

impl Display for RegExp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/", self.source)?;
        for (flag, letter) in [
            (RegExpFlags::GLOBAL, 'g'),
            (RegExpFlags::IGNORE_CASE, 'i'),
            (RegExpFlags::MULTILINE, 'm'),
        ] {
            if self.flags.contains(flag) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

impl FromStr for RegExp {
    type Err = ParseRegExpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let not_a_literal = || ParseRegExpError::NotALiteral(s.to_string());
        let body = s.strip_prefix('/').ok_or_else(not_a_literal)?;
        let end = body.rfind('/').ok_or_else(not_a_literal)?;

        let mut flags = RegExpFlags::empty();
        for letter in body[end + 1..].chars() {
            flags |= match letter {
                'g' => RegExpFlags::GLOBAL,
                'i' => RegExpFlags::IGNORE_CASE,
                'm' => RegExpFlags::MULTILINE,
                other => return Err(ParseRegExpError::UnsupportedFlag(other)),
            };
        }

        Ok(RegExp::new(&body[..end], flags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_round_trip() {
        let regexp: RegExp = "/a\\/b+/gm".parse().unwrap();
        assert_eq!(regexp.source(), "a\\/b+");
        assert_eq!(regexp.flags(), RegExpFlags::GLOBAL | RegExpFlags::MULTILINE);
        assert_eq!(regexp.flags().to_byte(), 0b101);
        assert_eq!(regexp.to_string(), "/a\\/b+/gm");
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(matches!("abc".parse::<RegExp>(), Err(ParseRegExpError::NotALiteral(_))));
        assert_eq!("/abc/y".parse::<RegExp>(), Err(ParseRegExpError::UnsupportedFlag('y')));
    }

    #[test]
    fn unknown_wire_bits_are_dropped() {
        assert_eq!(RegExpFlags::from_byte(0xFF), RegExpFlags::all());
    }
}
