//! The length octets.
//!
//! This is a private module. The [`Length`] definied herein is re-exported
//! by the parent.

use std::{fmt, io};
use crate::decode::{read_u8, DecodeError};


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-value marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// The first octet 0xFF is reserved and therefore illegal. Lengths that
/// don’t fit into a `u64` are rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Length {
    /// A length value in its definite form.
    Definite(u64),

    /// A length value in its indefinite form.
    Indefinite,
}

impl Length {
    /// The maximum number of subsequent length octets.
    const MAX_OCTETS: u8 = 8;

    /// Reads the length octets from a reader.
    ///
    /// The position `pos` is the position of the first length octet in the
    /// underlying source and only used for error reporting.
    pub fn read_from(
        reader: &mut impl io::Read, pos: u64
    ) -> Result<Self, DecodeError> {
        let len = match FirstOctet::from_u8(read_u8(reader, pos)?, pos)? {
            FirstOctet::Single(res) => return Ok(res),
            FirstOctet::Multi(len) => len,
        };
        if len > Self::MAX_OCTETS {
            return Err(DecodeError::unsupported(
                "length does not fit into 64 bits", pos
            ))
        }
        let mut res = 0u64;
        for i in 0..len {
            let octet = read_u8(reader, pos + 1 + u64::from(i))?;
            res = (res << 8) | u64::from(octet);
        }
        Ok(Length::Definite(res))
    }

    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<u64> {
        match self {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    /// Returns whether the length is indefinite.
    pub fn is_indefinite(self) -> bool {
        matches!(self, Length::Indefinite)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Length::Definite(len) => fmt::Display::fmt(&len, f),
            Length::Indefinite => f.write_str("indefinite"),
        }
    }
}


//------------ FirstOctet ---------------------------------------------------

/// The first octet of the encoded length.
enum FirstOctet {
    /// The first octet is a length in and of itself.
    Single(Length),

    /// The first octet indicates the number of octets to follow.
    Multi(u8),
}

impl FirstOctet {
    /// Checks what the first octet means.
    fn from_u8(octet: u8, pos: u64) -> Result<Self, DecodeError> {
        match octet {
            // Bit 7 clear: single.
            n if (n & 0x80) == 0 => {
                Ok(Self::Single(Length::Definite(n.into())))
            }

            // 0x80: indefinite.
            0x80 => Ok(Self::Single(Length::Indefinite)),

            // 0xFF: illegal.
            0xFF => {
                Err(DecodeError::malformed_length(
                    "illegal length octets", pos
                ))
            }

            // anything else: clear left bit, number of octets.
            n => Ok(Self::Multi(n & 0x7F))
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::ErrorKind;
    use super::*;

    fn read_from(src: &[u8]) -> Result<Option<u64>, DecodeError> {
        let mut reader = src;
        let res = Length::read_from(&mut reader, 0)?;
        assert!(reader.is_empty(), "trailing data");
        Ok(res.definite())
    }

    #[test]
    fn ber_read_from() {
        assert_eq!(read_from(b"\x00").unwrap(), Some(0x00));
        assert_eq!(read_from(b"\x12").unwrap(), Some(0x12));
        assert_eq!(read_from(b"\x7f").unwrap(), Some(0x7f));
        assert_eq!(read_from(b"\x80").unwrap(), None);
        assert_eq!(read_from(b"\x81\x00").unwrap(), Some(0));
        assert_eq!(read_from(b"\x81\xF0").unwrap(), Some(0xF0));
        assert_eq!(read_from(b"\x82\x00\x00").unwrap(), Some(0));
        assert_eq!(read_from(b"\x82\xF0\x0E").unwrap(), Some(0xF00E));
        assert_eq!(read_from(b"\x82\x00\x0E").unwrap(), Some(0x0E));
        assert_eq!(
            read_from(b"\x88\x01\x02\x03\x04\x05\x06\x07\x08").unwrap(),
            Some(0x0102_0304_0506_0708)
        );
    }

    #[test]
    fn illegal() {
        assert_eq!(
            read_from(b"\xFF").unwrap_err().kind(),
            ErrorKind::MalformedLength
        );
        assert_eq!(
            read_from(b"\x89\x01\x02\x03\x04\x05\x06\x07\x08\x09")
                .unwrap_err().kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(
            read_from(b"\x82\x01").unwrap_err().kind(),
            ErrorKind::Truncated
        );
        assert_eq!(
            read_from(b"").unwrap_err().kind(),
            ErrorKind::Truncated
        );
    }
}
