//! The identifier octets of a BER encoded value.
//!
//! This is a private module. The relevant items are re-exported by the
//! parent.

use std::{fmt, io};
use crate::decode::{read_opt_u8, DecodeError};


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class. The number is an unsigned integer.
///
/// In BER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed.
///
/// # Limitations
///
/// Only tag numbers up to 30 can be decoded. These are the tag numbers that
/// fit into a single identifier octet. Larger numbers use the multi-octet
/// form which is rejected as unsupported by the decoder.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    /// The class of the tag.
    class: Class,

    /// The number of the tag within its class.
    number: u32,
}

impl Tag {
    /// The largest tag number that fits into a single identifier octet.
    pub const MAX_SINGLE_OCTET: u32 = 0x1e;

    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in class “universal” with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in class “context dependent” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }

    /// Returns whether this is one of the universal string types.
    pub fn is_string(self) -> bool {
        matches!(
            self,
            Tag::UTF8_STRING | Tag::NUMERIC_STRING | Tag::PRINTABLE_STRING
            | Tag::TELETEX_STRING | Tag::VIDEOTEX_STRING | Tag::IA5_STRING
            | Tag::GRAPHIC_STRING | Tag::VISIBLE_STRING
            | Tag::GENERAL_STRING | Tag::UNIVERSAL_STRING | Tag::BMP_STRING
        )
    }

    /// Returns whether this is one of the universal time types.
    pub fn is_time(self) -> bool {
        matches!(self, Tag::UTC_TIME | Tag::GENERALIZED_TIME)
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690.
///
impl Tag {
    /// The tag marking the end-of-contents in an indefinite length value.
    ///
    /// This is UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Self::universal(0);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the ObjectDescriptor type, UNIVERSAL 7.
    pub const OBJECT_DESCRIPTOR: Self = Self::universal(7);

    /// The tag for the EXTERNAL and Instance-of types, UNIVERSAL 8.
    pub const EXTERNAL: Self = Self::universal(8);

    /// The tag for the REAL type, UNIVERSAL 9.
    pub const REAL: Self = Self::universal(9);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Self::universal(10);

    /// The tag for the EMBEDDED PDV type, UNIVERSAL 11.
    pub const EMBEDDED_PDV: Self = Self::universal(11);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the RELATIVE-OID type, UNIVERSAL 13.
    pub const RELATIVE_OID: Self = Self::universal(13);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);

    /// The tag for the NumericString type, UNIVERSAL 18.
    pub const NUMERIC_STRING: Self = Self::universal(18);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Self::universal(19);

    /// The tag for the TeletexString (T61String) type, UNIVERSAL 20.
    pub const TELETEX_STRING: Self = Self::universal(20);

    /// The tag for the VideotexString type, UNIVERSAL 21.
    pub const VIDEOTEX_STRING: Self = Self::universal(21);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Self::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Self::universal(23);

    /// The tag for the GeneralizedType type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Self::universal(24);

    /// The tag for the GraphicString type, UNIVERSAL 25.
    pub const GRAPHIC_STRING: Self = Self::universal(25);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Self::universal(26);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Self::universal(27);

    /// The tag for the UniversalString type, UNIVERSAL 28.
    pub const UNIVERSAL_STRING: Self = Self::universal(28);

    /// The tag for the CHARACTER STRING type, UNIVERSAL 29.
    pub const CHARACTER_STRING: Self = Self::universal(29);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Self::universal(30);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::END_OF_CONTENTS => write!(f, "END-OF-CONTENTS"),
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::OBJECT_DESCRIPTOR => write!(f, "ObjectDescriptor"),
            Tag::EXTERNAL => write!(f, "EXTERNAL"),
            Tag::REAL => write!(f, "REAL"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::EMBEDDED_PDV => write!(f, "EMBEDDED PDV"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::RELATIVE_OID => write!(f, "RELATIVE-OID"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            Tag::NUMERIC_STRING => write!(f, "NumericString"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::TELETEX_STRING => write!(f, "TeletexString"),
            Tag::VIDEOTEX_STRING => write!(f, "VideotexString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::GRAPHIC_STRING => write!(f, "GraphicString"),
            Tag::VISIBLE_STRING => write!(f, "VisibleString"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            Tag::UNIVERSAL_STRING => write!(f, "UniversalString"),
            Tag::CHARACTER_STRING => write!(f, "CHARACTER STRING"),
            Tag::BMP_STRING => write!(f, "BMPString"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of an encoded value.
///
/// This is the tag of the value plus the flag whether the value is
/// constructed, i.e., its content octets are a sequence of encoded values,
/// or primitive.
///
/// # BER Encoding
///
/// The identifier is encoded in a single octet. Bits 8 and 7 specify the
/// class, bit 6 is set for a constructed value, and bits 5 to 1 give the
/// tag number. If bits 5 to 1 are all set, the tag number follows in
/// additional octets. This form is not supported.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Ident {
    /// The tag.
    tag: Tag,

    /// Is the value constructed?
    constructed: bool,
}

impl Ident {
    /// The identifier of the end-of-contents octets.
    pub const END_OF_CONTENTS: Self = Self::new(Tag::END_OF_CONTENTS, false);

    /// The mask for the class bits.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for the constructed bit.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the tag number bits.
    const NUMBER_MASK: u8 = 0x1f;

    /// Creates identifier octets from a tag.
    pub const fn new(tag: Tag, constructed: bool) -> Self {
        Ident { tag, constructed }
    }

    /// Creates the identifier from the first identifier octet.
    ///
    /// Returns an unsupported error if the octet signals the multi-octet
    /// form. The position is only used for that error.
    pub fn from_octet(
        octet: u8, pos: impl Into<crate::decode::Pos>
    ) -> Result<Self, DecodeError> {
        let number = octet & Self::NUMBER_MASK;
        if number == Self::NUMBER_MASK {
            return Err(DecodeError::unsupported(
                "multi-octet tag numbers are not supported", pos
            ))
        }
        Ok(Ident {
            tag: Tag::new(
                Class::from_u8(octet & Self::CLASS_MASK), number.into()
            ),
            constructed: octet & Self::CONSTRUCTED_MASK != 0,
        })
    }

    /// Reads the identifier octets from a reader.
    ///
    /// Returns `Ok(None)` if the reader is already at its end.
    pub fn read_opt(
        reader: &mut impl io::Read, pos: u64
    ) -> Result<Option<Self>, DecodeError> {
        match read_opt_u8(reader, pos)? {
            Some(octet) => Self::from_octet(octet, pos).map(Some),
            None => Ok(None)
        }
    }

    /// Returns the tag for the identifier octets.
    pub const fn tag(self) -> Tag {
        self.tag
    }

    /// Returns the class of the identifier octets.
    pub const fn class(self) -> Class {
        self.tag.class()
    }

    /// Returns whether the value is to be a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.tag.number()
    }

    /// Returns the encoded identifier octet.
    ///
    /// Returns `None` if the tag number doesn’t fit into a single
    /// identifier octet.
    pub fn to_u8(self) -> Option<u8> {
        if self.number() > Tag::MAX_SINGLE_OCTET {
            return None
        }
        let mut res = self.class().into_u8() | (self.number() as u8);
        if self.constructed {
            res |= Self::CONSTRUCTED_MASK
        }
        Some(res)
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "Ident({}, {})", self.tag,
            if self.constructed { "constructed" } else { "primitive" }
        )
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::ErrorKind;
    use super::*;

    #[test]
    fn from_octet() {
        let ident = Ident::from_octet(0x30, 0u64).unwrap();
        assert_eq!(ident.tag(), Tag::SEQUENCE);
        assert!(ident.is_constructed());

        let ident = Ident::from_octet(0x06, 0u64).unwrap();
        assert_eq!(ident.tag(), Tag::OID);
        assert!(!ident.is_constructed());

        let ident = Ident::from_octet(0xa3, 0u64).unwrap();
        assert_eq!(ident.class(), Class::Context);
        assert_eq!(ident.number(), 3);
        assert!(ident.is_constructed());

        let ident = Ident::from_octet(0x5e, 0u64).unwrap();
        assert_eq!(ident.class(), Class::Application);
        assert_eq!(ident.number(), 30);

        let ident = Ident::from_octet(0xc1, 0u64).unwrap();
        assert_eq!(ident.class(), Class::Private);
        assert_eq!(ident.number(), 1);
    }

    #[test]
    fn multi_octet_unsupported() {
        for octet in [0x1f, 0x3f, 0x9f, 0xff] {
            assert_eq!(
                Ident::from_octet(octet, 7u64).unwrap_err().kind(),
                ErrorKind::Unsupported
            );
        }
    }

    #[test]
    fn to_u8() {
        for octet in [0x00, 0x02, 0x30, 0x31, 0x80, 0xa0, 0x5e, 0xde] {
            assert_eq!(
                Ident::from_octet(octet, 0u64).unwrap().to_u8(), Some(octet)
            );
        }
        assert_eq!(Ident::new(Tag::ctx(31), false).to_u8(), None);
        assert_eq!(Ident::new(Tag::universal(300), true).to_u8(), None);
    }

    #[test]
    fn read_opt() {
        let mut data = b"".as_ref();
        assert!(Ident::read_opt(&mut data, 0).unwrap().is_none());
        let mut data = b"\x04\x00".as_ref();
        assert_eq!(
            Ident::read_opt(&mut data, 0).unwrap(),
            Some(Ident::new(Tag::OCTET_STRING, false))
        );
    }

    #[test]
    fn display() {
        assert_eq!(Tag::SEQUENCE.to_string(), "SEQUENCE");
        assert_eq!(Tag::ctx(2).to_string(), "[2]");
        assert_eq!(
            Tag::new(Class::Application, 5).to_string(), "[APPLICATION 5]"
        );
    }
}
