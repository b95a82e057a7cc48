//! Decoded values of any supported type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::DecodeError;
use crate::ident::{Class, Tag};
use crate::int::Integer;
use crate::node::{Node, NodeType};
use crate::oid::Oid;
use crate::string::BitString;
use crate::time::Time;


//------------ Value ---------------------------------------------------------

/// The decoded content of a node.
///
/// This is the closed set of value types the crate knows how to decode.
/// Values with a tag outside the universal class or with a universal tag
/// that has no decoder are kept as [`Value::Raw`] content octets.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(Integer),
    Enumerated(Integer),
    BitString(BitString),
    OctetString(Bytes),
    Null,
    Oid(Oid),
    Real(f64),

    /// Any of the restricted character string types.
    String(String),

    /// A UTCTime or GeneralizedTime.
    Time(Time),

    /// A constructed value or a virtual marker.
    ///
    /// These don’t have a value of their own.
    Constructed,

    /// The content octets of a value that can’t be decoded.
    Raw(Bytes),
}

impl Node {
    /// Decodes the content of the node according to its tag.
    ///
    /// Primitive nodes need their content loaded. Nodes of other types
    /// always result in [`Value::Constructed`].
    pub fn value(&self) -> Result<Value, DecodeError> {
        if self.node_type() != NodeType::Primitive {
            return Ok(Value::Constructed)
        }
        let raw = match self.raw() {
            Some(raw) => raw,
            None => {
                return Err(DecodeError::missing_content(self.data_offset()))
            }
        };
        if self.class() != Class::Universal {
            return Ok(Value::Raw(raw.clone()))
        }
        match self.tag() {
            Tag::BOOLEAN => self.to_bool().map(Value::Boolean),
            Tag::INTEGER => self.to_integer().map(Value::Integer),
            Tag::ENUMERATED => {
                Integer::from_content(
                    raw.clone(), self.data_offset()
                ).map(Value::Enumerated)
            }
            Tag::BIT_STRING => self.to_bit_string().map(Value::BitString),
            Tag::OCTET_STRING => {
                self.to_octet_string().map(Value::OctetString)
            }
            Tag::NULL => self.to_null().map(|_| Value::Null),
            Tag::OID => self.to_oid().map(Value::Oid),
            Tag::REAL => self.to_real().map(Value::Real),
            tag if tag.is_string() => self.to_text().map(Value::String),
            tag if tag.is_time() => self.to_time().map(Value::Time),
            _ => Ok(Value::Raw(raw.clone()))
        }
    }
}


//--- Display

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Boolean(value) => {
                f.write_str(if value { "TRUE" } else { "FALSE" })
            }
            Value::Integer(ref value) => fmt::Display::fmt(value, f),
            Value::Enumerated(ref value) => fmt::Display::fmt(value, f),
            Value::BitString(ref value) => {
                write!(f, "({} bit) ", value.bit_len())?;
                hex(value.octet_slice(), f)
            }
            Value::OctetString(ref value) => hex(value, f),
            Value::Null => f.write_str("NULL"),
            Value::Oid(ref value) => fmt::Display::fmt(value, f),
            Value::Real(value) => fmt::Display::fmt(&value, f),
            Value::String(ref value) => write!(f, "{:?}", value),
            Value::Time(ref value) => fmt::Display::fmt(value, f),
            Value::Constructed => Ok(()),
            Value::Raw(ref value) => hex(value, f),
        }
    }
}

fn hex(slice: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    for octet in slice {
        write!(f, "{:02X}", octet)?;
    }
    Ok(())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::io::Cursor;
    use crate::decode::{BerReader, ErrorKind, Options};
    use super::*;

    fn first_value(data: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = BerReader::with_options(
            Cursor::new(data), Options::default().read_content(true)
        );
        reader.step()?;
        reader.current().value()
    }

    #[test]
    fn dispatch() {
        assert_eq!(
            first_value(b"\x01\x01\xff").unwrap(), Value::Boolean(true)
        );
        assert_eq!(first_value(b"\x05\x00").unwrap(), Value::Null);
        assert_eq!(
            first_value(b"\x09\x01\x40").unwrap(),
            Value::Real(f64::INFINITY)
        );
        assert_eq!(
            first_value(b"\x0c\x04abcd").unwrap(),
            Value::String("abcd".into())
        );
        assert_eq!(
            first_value(b"\x30\x00").unwrap(), Value::Constructed
        );
        assert_eq!(
            first_value(b"\x81\x02\x01\x02").unwrap(),
            Value::Raw(Bytes::from_static(b"\x01\x02"))
        );
        assert_eq!(
            first_value(b"\x07\x01a").unwrap(),
            Value::Raw(Bytes::from_static(b"a"))
        );
        assert_eq!(
            first_value(b"\x01\x02\x00\x00").unwrap_err().kind(),
            ErrorKind::Malformed
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            first_value(b"\x06\x03\x2b\x06\x01").unwrap().to_string(),
            "1.3.6.1"
        );
        assert_eq!(
            first_value(b"\x03\x02\x04\xa0").unwrap().to_string(),
            "(4 bit) A0"
        );
        assert_eq!(
            first_value(b"\x02\x02\xff\x7f").unwrap().to_string(), "-129"
        );
        assert_eq!(
            first_value(b"\x0c\x04abcd").unwrap().to_string(), "\"abcd\""
        );
    }
}
