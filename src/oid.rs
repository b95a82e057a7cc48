//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object identifiers,
//! a construct used by ANS.1 to uniquely identify all sorts of things. The
//! type is also re-exported at the top-level.

use std::{fmt, hash};
use bytes::Bytes;
use crate::decode::{DecodeError, Pos};


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep a single object identifer in its BER encoding.
/// The encoding is checked when the value is created via
/// [`from_content`][Self::from_content], so iterating over the components
/// and displaying the identifier cannot fail.
///
/// # BER Encoding
///
/// The content octets are a sequence of subidentifiers. Each subidentifier
/// is an unsigned integer encoded in base 128 with the most significant bit
/// of each octet set if more octets follow. The first subidentifier
/// combines the first two components as `first * 40 + second`.
#[derive(Clone, Debug)]
pub struct Oid<T: AsRef<[u8]> = Bytes>(T);

impl Oid<Bytes> {
    /// Creates an object identifier from the content octets of a value.
    ///
    /// Returns a malformed error if the content is empty or the last octet
    /// announces another octet to follow. Subidentifiers that don’t fit
    /// into a `u64` are unsupported.
    pub fn from_content(
        content: Bytes, pos: impl Into<Pos>
    ) -> Result<Self, DecodeError> {
        Self::check(&content, pos.into())?;
        Ok(Oid(content))
    }
}

impl<T: AsRef<[u8]>> Oid<T> {
    /// Checks the encoding of an object identifier.
    fn check(slice: &[u8], pos: Pos) -> Result<(), DecodeError> {
        match slice.last() {
            None => {
                return Err(DecodeError::malformed(
                    "empty object identifier", pos
                ))
            }
            Some(last) if last & 0x80 != 0 => {
                return Err(DecodeError::malformed(
                    "illegal object identifier (last octet has bit 8 set)",
                    pos
                ))
            }
            _ => { }
        }
        let mut iter = Iter::new(slice);
        while let Some(component) = iter.next_raw() {
            if component.value().is_none() {
                return Err(DecodeError::unsupported(
                    "object identifier component too large", pos
                ))
            }
        }
        Ok(())
    }

    /// Returns an iterator to the components of this object identifiers.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.0.as_ref())
    }

    /// Returns the components as a vector of integers.
    pub fn to_vec(&self) -> Vec<u64> {
        self.iter().filter_map(Component::to_u64).collect()
    }
}


//--- AsRef

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<Oid<U>> for Oid<T> {
    fn eq(&self, other: &Oid<U>) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }


//--- Hash

impl<T: AsRef<[u8]>> hash::Hash for Oid<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- Display

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for component in self.iter() {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            match component.to_u64() {
                Some(value) => write!(f, "{}", value)?,
                None => f.write_str("?")?,
            }
        }
        Ok(())
    }
}


//------------ Component -----------------------------------------------------

/// A component of an object identifier.
///
/// Although these components are integers, they are encoded in a slightly
/// inconvenient way. Because of this we don’t convert them to native integers
/// right away but rather keep them as references to the underlying octets.
#[derive(Clone, Copy, Debug)]
pub struct Component<'a> {
    /// The position of the component in the object identifer.
    position: Position,

    /// The octets of the subidentifer.
    ///
    /// The most significant bit of each octet indicates whether there are
    /// more octets to follow, the lower seven bits are then shifted
    /// accordingly to make up an unsigned integer in big endian notation.
    slice: &'a [u8],
}

/// The position of the component in the object identifier.
///
/// As the first two components of the object identifer are encoded in the
/// first subidentifier of the encoded value, we have three different cases.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Position {
    /// This is the first component of the identifier.
    ///
    /// This is 0 if the integer value of the subidentifer is 0..39,
    /// 1 for 40..79, and 2 for anything else.
    First,

    /// This is the second component of the identifier.
    ///
    /// This is the integer value of the subidentifer module 40 if the value
    /// is below 80 and otherwise the value minus 80.
    Second,

    /// This is any later component of the identifier.
    ///
    /// This is identical to the integer value of the subidentifier.
    Other,
}

impl<'a> Component<'a> {
    /// Creates a new component.
    fn new(slice: &'a [u8], position: Position) -> Self {
        Component { slice, position }
    }

    /// Returns the integer value of the subidentifier if it fits.
    fn value(self) -> Option<u64> {
        let mut res = 0u64;
        for &ch in self.slice {
            if res > (u64::MAX >> 7) {
                return None
            }
            res = res << 7 | u64::from(ch & 0x7F);
        }
        Some(res)
    }

    /// Attempts to convert the component to `u64`.
    ///
    /// This only fails for components of identifiers that were not checked
    /// on creation.
    pub fn to_u64(self) -> Option<u64> {
        let res = self.value()?;
        match self.position {
            Position::First => {
                if res < 40 {
                    Some(0)
                }
                else if res < 80 {
                    Some(1)
                }
                else {
                    Some(2)
                }
            }
            Position::Second => {
                if res < 80 {
                    Some(res % 40)
                }
                else {
                    Some(res - 80)
                }
            }
            Position::Other => Some(res)
        }
    }
}


//--- PartialEq and Eq

impl<'a> PartialEq for Component<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.slice == other.slice
    }
}

impl<'a> Eq for Component<'a> { }


//------------ Iter ----------------------------------------------------------

/// An iterator over the components in an object identifier.
///
/// The first subidentifier yields two components.
pub struct Iter<'a> {
    /// The remainder of the object identifier’s encoded octets.
    slice: &'a [u8],

    /// The position of the next component.
    position: Position,

    /// The octets of the first subidentifier while yielding the second.
    first: Option<&'a [u8]>,
}

impl<'a> Iter<'a> {
    /// Creates a new iterator.
    fn new(slice: &'a [u8]) -> Self {
        Iter {
            slice,
            position: Position::First,
            first: None,
        }
    }

    /// Returns the next subidentifier without splitting the first one.
    fn next_raw(&mut self) -> Option<Component<'a>> {
        let idx = self.slice.iter().position(|&ch| ch & 0x80 == 0)?;
        let (res, tail) = self.slice.split_at(idx + 1);
        self.slice = tail;
        Some(Component::new(res, Position::Other))
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.position {
            Position::First => {
                let res = self.next_raw()?;
                self.first = Some(res.slice);
                self.position = Position::Second;
                Some(Component::new(res.slice, Position::First))
            }
            Position::Second => {
                self.position = Position::Other;
                self.first.take().map(|slice| {
                    Component::new(slice, Position::Second)
                })
            }
            Position::Other => self.next_raw()
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::ErrorKind;
    use super::*;

    fn oid(slice: &'static [u8]) -> Result<Oid, DecodeError> {
        Oid::from_content(Bytes::from_static(slice), 0u64)
    }

    #[test]
    fn display() {
        assert_eq!(
            oid(b"\x2b\x06\x01\x04\x01\x82\x37\x15\x14").unwrap().to_string(),
            "1.3.6.1.4.1.311.21.20"
        );
        assert_eq!(oid(b"\x00").unwrap().to_string(), "0.0");
        assert_eq!(oid(b"\x27").unwrap().to_string(), "0.39");
        assert_eq!(oid(b"\x28").unwrap().to_string(), "1.0");
        assert_eq!(oid(b"\x50").unwrap().to_string(), "2.0");
        assert_eq!(oid(b"\x88\x37\x03").unwrap().to_string(), "2.999.3");
    }

    #[test]
    fn to_vec() {
        assert_eq!(
            oid(b"\x2a\x86\x48\x86\xf7\x0d").unwrap().to_vec(),
            [1, 2, 840, 113549]
        );
    }

    #[test]
    fn malformed() {
        assert_eq!(oid(b"").unwrap_err().kind(), ErrorKind::Malformed);
        assert_eq!(oid(b"\x2b\x86").unwrap_err().kind(), ErrorKind::Malformed);
        assert_eq!(
            oid(b"\x2b\xff\xff\xff\xff\xff\xff\xff\xff\xff\x7f")
                .unwrap_err().kind(),
            ErrorKind::Unsupported
        );
        assert!(oid(b"\x2b\x81\xff\xff\xff\xff\xff\xff\xff\xff\x7f").is_ok());
    }

    #[test]
    fn eq() {
        assert_eq!(
            oid(b"\x2b\x06\x01").unwrap(),
            Oid(b"\x2b\x06\x01".as_ref())
        );
    }
}
