//! BER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::{DecodeError, Pos};


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits.
///
/// The [`from_content`][Self::from_content] function parses the content
/// octets of a primitive bit string value. It can be used directly if the
/// bit string is implicitly tagged.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// When encoded as a primitive value, the first octet of the content
/// contains the number of unused bits in the last octet and the following
/// octets contain the bits with the first bit in the most significant bit
/// of the octet. The unused bits must be zero.
///
/// # Limitation
///
/// The constructed encoding of a bit string is not supported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Parses the content octets of a primitive bit string value.
    pub fn from_content(
        content: Bytes, pos: impl Into<Pos>
    ) -> Result<Self, DecodeError> {
        let pos = pos.into();
        let unused = match content.first() {
            Some(&unused) => unused,
            None => {
                return Err(DecodeError::malformed("empty bit string", pos))
            }
        };
        if unused > 7 {
            return Err(DecodeError::malformed(
                "invalid number of unused bits in bit string", pos
            ))
        }
        let bits = content.slice(1..);
        if unused > 0 {
            match bits.last() {
                None => {
                    return Err(DecodeError::malformed(
                        "unused bits in empty bit string", pos
                    ))
                }
                Some(last) if last & ((1u8 << unused) - 1) != 0 => {
                    return Err(DecodeError::malformed(
                        "unused bits in bit string not zero", pos
                    ))
                }
                _ => { }
            }
        }
        Ok(BitString { unused, bits })
    }

    /// Returns the value of the given bit.
    ///
    /// Bits past the end of the bit string are returned as `false`.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        match self.bits.get(bit >> 3) {
            Some(octet) => octet & (0x80 >> (bit & 7)) != 0,
            None => false
        }
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::ErrorKind;
    use super::*;

    fn bits(slice: &'static [u8]) -> Result<BitString, DecodeError> {
        BitString::from_content(Bytes::from_static(slice), 0u64)
    }

    #[test]
    fn from_content() {
        let s = bits(b"\x00").unwrap();
        assert_eq!(s.bit_len(), 0);
        assert_eq!(s.octet_len(), 0);

        let s = bits(b"\x04\xa0").unwrap();
        assert_eq!(s.unused(), 4);
        assert_eq!(s.bit_len(), 4);
        assert_eq!(s.octet_slice(), b"\xa0");
        assert!(s.bit(0));
        assert!(!s.bit(1));
        assert!(s.bit(2));
        assert!(!s.bit(3));
        assert!(!s.bit(4));

        let s = bits(b"\x00\x01\x80").unwrap();
        assert_eq!(s.bit_len(), 16);
        assert!(s.bit(7));
        assert!(s.bit(8));
        assert!(!s.bit(16));
    }

    #[test]
    fn malformed() {
        for slice in [
            b"".as_ref(), b"\x08\x00", b"\x01", b"\x04\xa8", b"\x01\x01"
        ] {
            assert_eq!(bits(slice).unwrap_err().kind(), ErrorKind::Malformed);
        }
    }
}
