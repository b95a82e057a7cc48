//! BER encoding for various strings types.
//!
//! This module provides the [`BitString`] type for a sequence of bits that
//! does not need to be of a length divisible by eight and decoding for the
//! restricted character string types.
//!
//! Each restricted character string type is described by a type
//! implementing the [`CharSet`] trait which provides the natural tag of the
//! type and the decoding of its content octets:
//!
//! * [`Utf8CharSet`] and the legacy [`TeletexCharSet`],
//!   [`VideotexCharSet`], [`GraphicCharSet`], [`VisibleCharSet`], and
//!   [`GeneralCharSet`] interpret the content octets as UTF-8,
//! * [`Ia5CharSet`] allows ASCII characters only (IA5 is an alternative
//!   name for ASCII),
//! * [`NumericCharSet`] allows only decimals digits and spaces,
//! * [`PrintableCharSet`] allows a subset of ASCII characters including
//!   letters, digits, and a few symbols,
//! * [`BmpCharSet`] decodes UTF-16 in big-endian byte order,
//! * [`UniversalCharSet`] decodes UTF-32 in big-endian byte order.

use crate::decode::{DecodeError, Pos};
use crate::ident::Tag;

//--- Re-exports

pub use self::bit::BitString;
pub use self::charset::{
    CharSet, CharSetError,
    BmpCharSet, GeneralCharSet, GraphicCharSet, Ia5CharSet, NumericCharSet,
    PrintableCharSet, TeletexCharSet, UniversalCharSet, Utf8CharSet,
    VideotexCharSet, VisibleCharSet,
};

//--- Private modules

mod bit;
mod charset;


//------------ Decoding Functions --------------------------------------------

/// Decodes the content octets of a string in the given character set.
///
/// The position is the start of the content and only used for errors.
pub fn decode_as<C: CharSet>(
    content: &[u8], pos: impl Into<Pos>
) -> Result<String, DecodeError> {
    C::decode_slice(content).map(|s| s.into_owned()).map_err(|err| {
        DecodeError::malformed(err.message(), pos)
    })
}

/// Decodes the content octets of a string according to its universal tag.
///
/// Returns a type mismatch error if `tag` is not one of the supported
/// string types.
pub fn decode(
    tag: Tag, content: &[u8], pos: impl Into<Pos>
) -> Result<String, DecodeError> {
    match tag {
        Tag::UTF8_STRING => decode_as::<Utf8CharSet>(content, pos),
        Tag::NUMERIC_STRING => decode_as::<NumericCharSet>(content, pos),
        Tag::PRINTABLE_STRING => decode_as::<PrintableCharSet>(content, pos),
        Tag::TELETEX_STRING => decode_as::<TeletexCharSet>(content, pos),
        Tag::VIDEOTEX_STRING => decode_as::<VideotexCharSet>(content, pos),
        Tag::IA5_STRING => decode_as::<Ia5CharSet>(content, pos),
        Tag::GRAPHIC_STRING => decode_as::<GraphicCharSet>(content, pos),
        Tag::VISIBLE_STRING => decode_as::<VisibleCharSet>(content, pos),
        Tag::GENERAL_STRING => decode_as::<GeneralCharSet>(content, pos),
        Tag::UNIVERSAL_STRING => decode_as::<UniversalCharSet>(content, pos),
        Tag::BMP_STRING => decode_as::<BmpCharSet>(content, pos),
        _ => {
            Err(DecodeError::type_mismatch(
                format!("{} is not a string type", tag), pos
            ))
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::ErrorKind;
    use super::*;

    #[test]
    fn decode_by_tag() {
        assert_eq!(
            decode(Tag::PRINTABLE_STRING, b"abcd", 0u64).unwrap(), "abcd"
        );
        assert_eq!(
            decode(Tag::NUMERIC_STRING, b"abcd", 0u64).unwrap_err().kind(),
            ErrorKind::Malformed
        );
        assert_eq!(
            decode(Tag::OCTET_STRING, b"abcd", 0u64).unwrap_err().kind(),
            ErrorKind::TypeMismatch
        );
    }
}
