//! The nodes produced while traversing encoded data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::{DecodeError, Pos};
use crate::ident::{Class, Ident, Tag};
use crate::int::Integer;
use crate::oid::Oid;
use crate::string::{self, BitString, CharSet};
use crate::time::Time;
use crate::real;


//------------ NodeType ------------------------------------------------------

/// The kind of position a [`Node`] describes.
///
/// Besides the nodes for actual encoded values, the traversal produces
/// virtual nodes that mark the beginning and end of the data and the end
/// of a constructed value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeType {
    /// The position before the first value.
    DocumentStart,

    /// A primitive value.
    Primitive,

    /// The start of a constructed value.
    ConstructedStart,

    /// The end of a constructed value.
    ConstructedEnd,

    /// The end of the data. Further steps stay here.
    DocumentEnd,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            NodeType::DocumentStart => "document start",
            NodeType::Primitive => "primitive",
            NodeType::ConstructedStart => "constructed start",
            NodeType::ConstructedEnd => "constructed end",
            NodeType::DocumentEnd => "document end",
        })
    }
}


//------------ Node ----------------------------------------------------------

/// A single encoded value or a virtual boundary marker.
///
/// Nodes are created by the [`BerReader`][crate::BerReader]. Their header
/// information is fixed once created. The content octets are only present
/// after they have been loaded explicitly, e.g., via
/// [`BerReader::load_content`][crate::BerReader::load_content], or by
/// using the [`read_content`][crate::Options::read_content] option.
///
/// The typed accessors such as [`to_bool`][Self::to_bool] interpret the
/// loaded content octets. They all fail with
/// [`ErrorKind::MissingContent`][crate::ErrorKind::MissingContent] if the
/// content has not been loaded and with
/// [`ErrorKind::TypeMismatch`][crate::ErrorKind::TypeMismatch] if the tag
/// of the node doesn’t match the requested type. For implicitly tagged
/// values, use the decoding functions of the type in question on
/// [`raw`][Self::raw] directly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    /// The identifier octets.
    ident: Ident,

    /// The length of the content octets.
    ///
    /// For indefinite length values, this is the resolved length of the
    /// content not including the end-of-contents octets.
    length: u64,

    /// Was the length encoded in the indefinite form?
    indefinite: bool,

    /// The position of the identifier octets.
    start: u64,

    /// The position right after the value.
    end: u64,

    /// The position of the first content octet.
    data_offset: u64,

    /// The kind of node.
    node_type: NodeType,

    /// The content octets if they have been loaded.
    raw: Option<Bytes>,

    /// The child nodes.
    ///
    /// These are only filled when reading the whole data at once.
    children: Vec<Node>,
}

/// # Creation
///
impl Node {
    /// Creates a node for an encoded value.
    pub(crate) fn from_header(
        ident: Ident, length: u64, indefinite: bool,
        start: u64, data_offset: u64,
    ) -> Self {
        let end = data_offset + length + if indefinite { 2 } else { 0 };
        Node {
            ident, length, indefinite, start, end, data_offset,
            node_type: if ident.is_constructed() {
                NodeType::ConstructedStart
            }
            else {
                NodeType::Primitive
            },
            raw: None,
            children: Vec::new(),
        }
    }

    /// Creates a virtual marker node of the given type at `pos`.
    fn marker(ident: Ident, node_type: NodeType, pos: u64) -> Self {
        Node {
            ident,
            length: 0,
            indefinite: false,
            start: pos,
            end: pos,
            data_offset: pos,
            node_type,
            raw: None,
            children: Vec::new(),
        }
    }

    /// Creates the node marking the start of the data.
    pub(crate) fn document_start() -> Self {
        Self::marker(Ident::END_OF_CONTENTS, NodeType::DocumentStart, 0)
    }

    /// Creates the node marking the end of the data.
    pub(crate) fn document_end(pos: u64) -> Self {
        Self::marker(Ident::END_OF_CONTENTS, NodeType::DocumentEnd, pos)
    }

    /// Creates the node marking the end of a constructed value.
    pub(crate) fn constructed_end(ident: Ident, pos: u64) -> Self {
        Self::marker(ident, NodeType::ConstructedEnd, pos)
    }
}

/// # Header Information
///
impl Node {
    /// Returns the identifier of the node.
    ///
    /// The end marker of a constructed value echoes the identifier of the
    /// value. The document markers use the end-of-contents identifier.
    pub fn ident(&self) -> Ident {
        self.ident
    }

    /// Returns the tag of the node.
    pub fn tag(&self) -> Tag {
        self.ident.tag()
    }

    /// Returns the class of the node’s tag.
    pub fn class(&self) -> Class {
        self.ident.class()
    }

    /// Returns whether the identifier marks a constructed value.
    pub fn is_constructed(&self) -> bool {
        self.ident.is_constructed()
    }

    /// Returns the length of the content octets.
    ///
    /// For values encoded with the indefinite length form, this is the
    /// resolved length excluding the end-of-contents octets.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Returns whether the value used the indefinite length form.
    pub fn is_indefinite(&self) -> bool {
        self.indefinite
    }

    /// Returns the position of the first identifier octet.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the position right after the last octet of the value.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Returns the position of the first content octet.
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Returns the number of identifier and length octets.
    pub fn header_len(&self) -> u64 {
        self.data_offset - self.start
    }

    /// Returns the kind of position the node describes.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }
}

/// # Content and Children
///
impl Node {
    /// Returns the content octets if they have been loaded.
    pub fn raw(&self) -> Option<&Bytes> {
        self.raw.as_ref()
    }

    /// Sets the content octets.
    pub(crate) fn set_raw(&mut self, raw: Bytes) {
        debug_assert_eq!(raw.len() as u64, self.length);
        self.raw = Some(raw)
    }

    /// Returns the children of a constructed node.
    ///
    /// This is only filled for nodes produced by
    /// [`BerReader::read_to_end`][crate::BerReader::read_to_end].
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Converts the node into its children.
    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    pub(crate) fn push_child(&mut self, child: Node) {
        self.children.push(child)
    }
}

/// # Typed Access to the Content
///
impl Node {
    /// Returns the position of the content for error reporting.
    fn pos(&self) -> Pos {
        self.data_offset.into()
    }

    /// Returns the loaded content octets.
    fn content(&self) -> Result<&Bytes, DecodeError> {
        self.raw.as_ref().ok_or_else(|| {
            DecodeError::missing_content(self.data_offset)
        })
    }

    /// Returns the loaded content octets if the tag is `tag`.
    fn content_if(&self, tag: Tag) -> Result<&Bytes, DecodeError> {
        let content = self.content()?;
        if self.tag() != tag {
            return Err(self.mismatch(tag))
        }
        Ok(content)
    }

    /// Creates a type mismatch error.
    fn mismatch(&self, expected: impl fmt::Display) -> DecodeError {
        DecodeError::type_mismatch(
            format!("expected {}, found {}", expected, self.tag()),
            self.data_offset
        )
    }

    /// Decodes a BOOLEAN value.
    ///
    /// The content must be exactly one octet. Any value other than zero is
    /// true.
    pub fn to_bool(&self) -> Result<bool, DecodeError> {
        match self.content_if(Tag::BOOLEAN)?.as_ref() {
            [0] => Ok(false),
            [_] => Ok(true),
            _ => Err(DecodeError::malformed("invalid boolean", self.pos()))
        }
    }

    /// Decodes an INTEGER value.
    pub fn to_integer(&self) -> Result<Integer, DecodeError> {
        Integer::from_content(
            self.content_if(Tag::INTEGER)?.clone(), self.pos()
        )
    }

    /// Decodes an ENUMERATED value into a closed enum.
    ///
    /// INTEGER values are accepted, too. If the value doesn’t fit into an
    /// `i64` or the conversion into `T` fails, `default` is returned.
    pub fn to_enumerated<T: TryFrom<i64>>(
        &self, default: T
    ) -> Result<T, DecodeError> {
        let content = self.content()?;
        if self.tag() != Tag::ENUMERATED && self.tag() != Tag::INTEGER {
            return Err(self.mismatch(Tag::ENUMERATED))
        }
        let value = Integer::from_content(content.clone(), self.pos())?;
        Ok(
            value.to_i64().and_then(|x| T::try_from(x).ok()).unwrap_or(default)
        )
    }

    /// Decodes a BIT STRING value.
    pub fn to_bit_string(&self) -> Result<BitString, DecodeError> {
        BitString::from_content(
            self.content_if(Tag::BIT_STRING)?.clone(), self.pos()
        )
    }

    /// Returns the content of a primitive OCTET STRING value.
    pub fn to_octet_string(&self) -> Result<Bytes, DecodeError> {
        self.content_if(Tag::OCTET_STRING).cloned()
    }

    /// Checks a NULL value.
    pub fn to_null(&self) -> Result<(), DecodeError> {
        if self.content_if(Tag::NULL)?.is_empty() {
            Ok(())
        }
        else {
            Err(DecodeError::malformed("NULL with content", self.pos()))
        }
    }

    /// Decodes an OBJECT IDENTIFIER value.
    pub fn to_oid(&self) -> Result<Oid, DecodeError> {
        Oid::from_content(self.content_if(Tag::OID)?.clone(), self.pos())
    }

    /// Decodes a REAL value.
    pub fn to_real(&self) -> Result<f64, DecodeError> {
        real::from_content(self.content_if(Tag::REAL)?, self.pos())
    }

    /// Decodes a UTCTime or GeneralizedTime value.
    pub fn to_time(&self) -> Result<Time, DecodeError> {
        let content = self.content()?;
        match self.tag() {
            Tag::UTC_TIME => Time::from_utc_time(content, self.pos()),
            Tag::GENERALIZED_TIME => {
                Time::from_generalized_time(content, self.pos())
            }
            _ => Err(self.mismatch("UTCTime or GeneralizedTime"))
        }
    }

    /// Decodes a string value of the type given by the character set.
    pub fn to_string_as<C: CharSet>(&self) -> Result<String, DecodeError> {
        string::decode_as::<C>(self.content_if(C::TAG)?, self.pos())
    }

    /// Decodes any of the string types according to the node’s tag.
    pub fn to_text(&self) -> Result<String, DecodeError> {
        let content = self.content()?;
        if !self.tag().is_string() {
            return Err(self.mismatch("string type"))
        }
        string::decode(self.tag(), content, self.pos())
    }

    /// Decodes a UTF8String.
    pub fn to_utf8_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::Utf8CharSet>()
    }

    /// Decodes a PrintableString.
    pub fn to_printable_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::PrintableCharSet>()
    }

    /// Decodes an IA5String, which is limited to ASCII.
    pub fn to_ia5_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::Ia5CharSet>()
    }

    /// Decodes a TeletexString, also known as T61String.
    pub fn to_t61_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::TeletexCharSet>()
    }

    /// Decodes a VideotexString.
    pub fn to_videotex_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::VideotexCharSet>()
    }

    /// Decodes a GraphicString.
    pub fn to_graphic_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::GraphicCharSet>()
    }

    /// Decodes a VisibleString.
    pub fn to_visible_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::VisibleCharSet>()
    }

    /// Decodes a GeneralString.
    pub fn to_general_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::GeneralCharSet>()
    }

    /// Decodes a NumericString.
    pub fn to_numeric_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::NumericCharSet>()
    }

    /// Decodes a BMPString encoded as UTF-16 in big-endian order.
    pub fn to_bmp_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::BmpCharSet>()
    }

    /// Decodes a UniversalString encoded as UTF-32 in big-endian order.
    pub fn to_universal_string(&self) -> Result<String, DecodeError> {
        self.to_string_as::<string::UniversalCharSet>()
    }
}


//============ Tests =========================================================
