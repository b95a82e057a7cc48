//! Character sets of the restricted character string types.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt, str};
use std::borrow::Cow;
use crate::ident::Tag;


//------------ CharSet -------------------------------------------------------

/// The character set of a restricted character string type.
///
/// The trait ties the natural tag of a string type to the way its content
/// octets are turned into a Rust string.
pub trait CharSet {
    /// The natural tag of the related restricted character string type.
    const TAG: Tag;

    /// Decodes the content octets into a string.
    ///
    /// Returns an error if the octets aren’t correctly encoded or contain
    /// characters not allowed by the character set.
    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError>;
}


//------------ Utf8 Family ---------------------------------------------------

macro_rules! utf8_charset {
    ( $( #[$attr:meta] )* $name:ident, $tag:expr ) => {
        $( #[$attr] )*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl CharSet for $name {
            const TAG: Tag = $tag;

            fn decode_slice(
                slice: &[u8]
            ) -> Result<Cow<'_, str>, CharSetError> {
                str::from_utf8(slice).map(Cow::Borrowed).map_err(|_| {
                    CharSetError("invalid UTF-8")
                })
            }
        }
    }
}

utf8_charset!(
    /// The character set for the UTF8String ASN.1 type.
    Utf8CharSet, Tag::UTF8_STRING
);

utf8_charset!(
    /// The character set for the TeletexString (T61String) ASN.1 type.
    ///
    /// The T.61 repertoire is not translated. The content octets are
    /// interpreted as UTF-8 which is what most encoders produce in practice.
    TeletexCharSet, Tag::TELETEX_STRING
);

utf8_charset!(
    /// The character set for the VideotexString ASN.1 type.
    VideotexCharSet, Tag::VIDEOTEX_STRING
);

utf8_charset!(
    /// The character set for the GraphicString ASN.1 type.
    GraphicCharSet, Tag::GRAPHIC_STRING
);

utf8_charset!(
    /// The character set for the VisibleString ASN.1 type.
    VisibleCharSet, Tag::VISIBLE_STRING
);

utf8_charset!(
    /// The character set for the GeneralString ASN.1 type.
    GeneralCharSet, Tag::GENERAL_STRING
);


//------------ PrintableCharSet ----------------------------------------------

/// The character set for the PrintableString ASN.1 type.
///
/// This character string allows the following characters from the ASCII
/// character set and encodes them with their ASCII value:
///
/// * the letters `A` to `Z` and `a` to `z`,
/// * the digits `0` to `9`,
/// * the space character ` `,
/// * the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`, and `?`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintableCharSet;

impl CharSet for PrintableCharSet {
    const TAG: Tag = Tag::PRINTABLE_STRING;

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        if slice.iter().copied().all(|x| {
            x.is_ascii_alphanumeric() || // A-Z a-z 0-9
            x == b' ' || x == b'\'' || x == b'(' || x == b')' ||
            x == b'+' || x == b',' || x == b'-' || x == b'.' ||
            x == b'/' || x == b':' || x == b'=' || x == b'?'
        }) {
            ascii(slice)
        }
        else {
            Err(CharSetError("invalid PrintableString characters"))
        }
    }
}


//------------ NumericCharSet ------------------------------------------------

/// The character set for the NumericString ASN.1 type.
///
/// This character string allows only decimal digits `0` to `9` and the
/// space character ` `.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericCharSet;

impl CharSet for NumericCharSet {
    const TAG: Tag = Tag::NUMERIC_STRING;

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        if slice.iter().copied().all(|ch| ch == b' ' || ch.is_ascii_digit()) {
            ascii(slice)
        }
        else {
            Err(CharSetError("invalid NumericString characters"))
        }
    }
}


//------------ Ia5CharSet ----------------------------------------------------

/// The character set for the IA5String ASN.1 type.
///
/// IA5 is an alternative name for ASCII.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ia5CharSet;

impl CharSet for Ia5CharSet {
    const TAG: Tag = Tag::IA5_STRING;

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        if slice.is_ascii() {
            ascii(slice)
        }
        else {
            Err(CharSetError("invalid IA5String characters"))
        }
    }
}

/// Converts an already checked ASCII slice.
fn ascii(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
    str::from_utf8(slice).map(Cow::Borrowed).map_err(|_| {
        CharSetError("invalid characters")
    })
}


//------------ BmpCharSet ----------------------------------------------------

/// The character set for the BMPString ASN.1 type.
///
/// The content octets are UTF-16 in big-endian byte order.
#[derive(Clone, Copy, Debug, Default)]
pub struct BmpCharSet;

impl CharSet for BmpCharSet {
    const TAG: Tag = Tag::BMP_STRING;

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        if slice.len() % 2 != 0 {
            return Err(CharSetError("odd length BMPString"))
        }
        let units = slice.chunks_exact(2).map(|unit| {
            u16::from_be_bytes([unit[0], unit[1]])
        });
        char::decode_utf16(units).collect::<Result<String, _>>()
            .map(Cow::Owned)
            .map_err(|_| CharSetError("invalid UTF-16 in BMPString"))
    }
}


//------------ UniversalCharSet ----------------------------------------------

/// The character set for the UniversalString ASN.1 type.
///
/// The content octets are UTF-32 in big-endian byte order.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniversalCharSet;

impl CharSet for UniversalCharSet {
    const TAG: Tag = Tag::UNIVERSAL_STRING;

    fn decode_slice(slice: &[u8]) -> Result<Cow<'_, str>, CharSetError> {
        if slice.len() % 4 != 0 {
            return Err(CharSetError(
                "UniversalString length not a multiple of 4"
            ))
        }
        slice.chunks_exact(4).map(|unit| {
            char::from_u32(
                u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]])
            ).ok_or(CharSetError("invalid code point in UniversalString"))
        }).collect::<Result<String, _>>().map(Cow::Owned)
    }
}


//------------ CharSetError --------------------------------------------------

/// The content octets are not valid for the character set.
#[derive(Clone, Copy, Debug)]
pub struct CharSetError(&'static str);

impl CharSetError {
    /// Returns the error message.
    pub fn message(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl error::Error for CharSetError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn printable() {
        assert_eq!(
            PrintableCharSet::decode_slice(b"Foo Bar (1) '+,-./:=?").unwrap(),
            "Foo Bar (1) '+,-./:=?"
        );
        assert!(PrintableCharSet::decode_slice(b"a*b").is_err());
        assert!(PrintableCharSet::decode_slice(b"a@b").is_err());
    }

    #[test]
    fn numeric() {
        assert_eq!(
            NumericCharSet::decode_slice(b"123 456").unwrap(), "123 456"
        );
        assert!(NumericCharSet::decode_slice(b"12a").is_err());
    }

    #[test]
    fn ia5() {
        assert_eq!(Ia5CharSet::decode_slice(b"a@b.c").unwrap(), "a@b.c");
        assert!(Ia5CharSet::decode_slice(b"\xc3\xa4").is_err());
    }

    #[test]
    fn bmp() {
        assert_eq!(
            BmpCharSet::decode_slice(b"\x00a\x01\x3e\xd8\x3d\xde\x00")
                .unwrap(),
            "aľ\u{1F600}"
        );
        assert!(BmpCharSet::decode_slice(b"\x00a\x00").is_err());
        assert!(BmpCharSet::decode_slice(b"\xd8\x3d").is_err());
    }

    #[test]
    fn universal() {
        assert_eq!(
            UniversalCharSet::decode_slice(b"\x00\x00\x00a\x00\x00\x01\x3e")
                .unwrap(),
            "aľ"
        );
        assert!(UniversalCharSet::decode_slice(b"\x00\x00\x00").is_err());
        assert!(
            UniversalCharSet::decode_slice(b"\x00\x00\xd8\x00").is_err()
        );
    }

    #[test]
    fn utf8() {
        assert_eq!(
            Utf8CharSet::decode_slice("ľšč".as_bytes()).unwrap(), "ľšč"
        );
        assert!(GeneralCharSet::decode_slice(b"\xff").is_err());
    }
}
