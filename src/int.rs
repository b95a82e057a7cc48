//! BER encoded integers.

use std::fmt;
use bytes::Bytes;
use crate::decode::{DecodeError, Pos};


//------------ Integer -------------------------------------------------------

/// A BER encoded integer.
///
/// As integers are variable length in BER, this type is just a simple wrapper
/// atop the underlying `Bytes` value containing the raw content. A value of
/// this type is a signed integer of arbitrary size.
///
/// The conversion methods such as [`to_i64`][Self::to_i64] allow turning
/// the value into a native integer type if it is in range. The `Display`
/// implementation renders the value in decimal no matter its size.
///
/// # BER Encoding
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit.
///
/// The content must contain at least one octet and the first nine bits must
/// not all be set or all be cleared.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from the content octets of a value.
    ///
    /// The position is the start of the content and only used for errors.
    pub fn from_content(
        content: Bytes, pos: impl Into<Pos>
    ) -> Result<Self, DecodeError> {
        Self::check_head(&content, pos.into())?;
        Ok(Integer(content))
    }

    /// Checks that the content octets are a valid integer encoding.
    fn check_head(content: &[u8], pos: Pos) -> Result<(), DecodeError> {
        match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
            (Some(0), Some(false)) => {
                Err(DecodeError::malformed("invalid integer", pos))
            }
            (Some(0xFF), Some(true)) => {
                Err(DecodeError::malformed("invalid integer", pos))
            }
            (None, _) => {
                Err(DecodeError::malformed("empty integer", pos))
            }
            _ => Ok(())
        }
    }

    /// Returns the content octets of the integer.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the integer is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|x| x & 0x80 != 0).unwrap_or(false)
    }

    /// Returns whether the integer is zero.
    pub fn is_zero(&self) -> bool {
        self.0.as_ref() == b"\0"
    }

    /// Converts the integer into an `i128` if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.0.len() > 16 {
            return None
        }
        let mut res: i128 = if self.is_negative() { -1 } else { 0 };
        for &octet in self.0.iter() {
            res = (res << 8) | i128::from(octet);
        }
        Some(res)
    }

    /// Converts the integer into an `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|x| i64::try_from(x).ok())
    }

    /// Converts the integer into an `i32` if it fits.
    pub fn to_i32(&self) -> Option<i32> {
        self.to_i128().and_then(|x| i32::try_from(x).ok())
    }

    /// Converts the integer into a `u128` if it fits.
    ///
    /// Negative values never fit.
    pub fn to_u128(&self) -> Option<u128> {
        if self.is_negative() {
            return None
        }
        let octets = match self.0.split_first() {
            Some((0, tail)) => tail,
            _ => self.0.as_ref()
        };
        if octets.len() > 16 {
            return None
        }
        let mut res = 0u128;
        for &octet in octets {
            res = (res << 8) | u128::from(octet);
        }
        Some(res)
    }

    /// Converts the integer into a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|x| u64::try_from(x).ok())
    }

    /// Returns the big-endian magnitude of the integer.
    fn magnitude(&self) -> Vec<u8> {
        let mut res = self.0.to_vec();
        if self.is_negative() {
            // Two’s complement: invert and add one.
            res.iter_mut().for_each(|x| *x = !*x);
            for octet in res.iter_mut().rev() {
                let (value, overflow) = octet.overflowing_add(1);
                *octet = value;
                if !overflow {
                    break
                }
            }
        }
        res
    }
}


//--- AsRef

impl AsRef<[u8]> for Integer {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- Display

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(value) = self.to_i128() {
            return fmt::Display::fmt(&value, f)
        }

        // Long division by 10^9 on the big-endian magnitude, collecting
        // the remainders as chunks of nine decimal digits.
        const CHUNK: u64 = 1_000_000_000;
        let mut magnitude = self.magnitude();
        let mut chunks = Vec::new();
        while magnitude.iter().any(|&x| x != 0) {
            let mut rem = 0u64;
            for octet in magnitude.iter_mut() {
                let cur = (rem << 8) | u64::from(*octet);
                *octet = (cur / CHUNK) as u8;
                rem = cur % CHUNK;
            }
            chunks.push(rem);
        }

        if self.is_negative() {
            f.write_str("-")?;
        }
        let mut chunks = chunks.iter().rev();
        match chunks.next() {
            Some(first) => write!(f, "{}", first)?,
            None => f.write_str("0")?,
        }
        for chunk in chunks {
            write!(f, "{:09}", chunk)?;
        }
        Ok(())
    }
}


//============ Testing ======================================================
