//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{error, fmt, io};


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error carries the kind of problem that happened, a human readable
/// message, and, where it is known, the position in the source where the
/// problem was detected.
///
/// Errors of some kinds are fatal to the whole decoding process while others
/// only concern a single accessor call. A [`ErrorKind::TypeMismatch`] from
/// one of the typed accessors of a [`Node`][crate::Node], for instance,
/// leaves the reader in a perfectly usable state.
pub struct DecodeError {
    /// The kind of error.
    kind: ErrorKind,

    /// The error message.
    message: ErrorMessage,

    /// The position in the source where the error happened.
    pos: Option<Pos>,
}

impl DecodeError {
    /// Creates a new error from its parts.
    fn new(
        kind: ErrorKind, message: impl Into<ErrorMessage>, pos: Option<Pos>
    ) -> Self {
        DecodeError { kind, message: message.into(), pos }
    }

    /// Creates a “truncated input” error.
    pub fn truncated(
        message: impl Into<ErrorMessage>, pos: impl Into<Pos>
    ) -> Self {
        Self::new(ErrorKind::Truncated, message, Some(pos.into()))
    }

    /// Creates a “malformed length” error.
    pub fn malformed_length(
        message: impl Into<ErrorMessage>, pos: impl Into<Pos>
    ) -> Self {
        Self::new(ErrorKind::MalformedLength, message, Some(pos.into()))
    }

    /// Creates an error for a correct but unsupported encoding.
    pub fn unsupported(
        message: impl Into<ErrorMessage>, pos: impl Into<Pos>
    ) -> Self {
        Self::new(ErrorKind::Unsupported, message, Some(pos.into()))
    }

    /// Creates an error for a tag not matching the requested type.
    pub fn type_mismatch(
        message: impl Into<ErrorMessage>, pos: impl Into<Pos>
    ) -> Self {
        Self::new(ErrorKind::TypeMismatch, message, Some(pos.into()))
    }

    /// Creates an error for content octets violating the encoding rules.
    pub fn malformed(
        message: impl Into<ErrorMessage>, pos: impl Into<Pos>
    ) -> Self {
        Self::new(ErrorKind::Malformed, message, Some(pos.into()))
    }

    /// Creates an error for a broken nesting structure.
    pub fn structure(message: impl Into<ErrorMessage>) -> Self {
        Self::new(ErrorKind::Structure, message, None)
    }

    /// Creates an error for content that hasn’t been loaded yet.
    pub fn missing_content(pos: impl Into<Pos>) -> Self {
        Self::new(
            ErrorKind::MissingContent, "content octets not loaded",
            Some(pos.into())
        )
    }

    /// Creates an error for an operation not allowed on a node.
    pub fn invalid_operation(
        message: impl Into<ErrorMessage>, pos: impl Into<Pos>
    ) -> Self {
        Self::new(ErrorKind::InvalidOperation, message, Some(pos.into()))
    }

    /// Creates an error from an IO error of the underlying source.
    ///
    /// An unexpected end of file is converted into a truncated input error.
    pub fn from_io(err: io::Error, pos: impl Into<Pos>) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::truncated("unexpected end of data", pos)
        }
        else {
            Self::new(
                ErrorKind::Io, ErrorMessage::Io(err), Some(pos.into())
            )
        }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the position of the error in the source if known.
    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }
}


//--- Display, Debug, and Error

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(pos) = self.pos {
            write!(f, " (at position {})", pos)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DecodeError")
            .field("kind", &self.kind)
            .field("message", &format_args!("{}", self.message))
            .field("pos", &self.pos)
            .finish()
    }
}

impl error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.message {
            ErrorMessage::Io(ref err) => Some(err),
            _ => None
        }
    }
}


//------------ ErrorKind -----------------------------------------------------

/// The category of a decoding error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The source ended before a complete value could be read.
    Truncated,

    /// The length octets are illegal or don’t fit the data.
    MalformedLength,

    /// The data is correctly encoded but the encoding isn’t supported.
    Unsupported,

    /// A typed accessor was used on a value with a different tag.
    TypeMismatch,

    /// The content octets violate the encoding rules of the type.
    Malformed,

    /// Constructed values aren’t properly nested.
    Structure,

    /// The content octets of a node haven’t been loaded.
    MissingContent,

    /// The operation is not possible for this node.
    InvalidOperation,

    /// The underlying source failed.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorKind::Truncated => "truncated input",
            ErrorKind::MalformedLength => "malformed length",
            ErrorKind::Unsupported => "unsupported encoding",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::Malformed => "malformed content",
            ErrorKind::Structure => "broken structure",
            ErrorKind::MissingContent => "missing content",
            ErrorKind::InvalidOperation => "invalid operation",
            ErrorKind::Io => "source error",
        })
    }
}


//------------ ErrorMessage --------------------------------------------------

/// The message of an error.
pub enum ErrorMessage {
    Static(&'static str),
    Boxed(Box<dyn fmt::Display + Send + Sync>),
    Io(io::Error),
}

impl From<&'static str> for ErrorMessage {
    fn from(msg: &'static str) -> Self {
        ErrorMessage::Static(msg)
    }
}

impl From<String> for ErrorMessage {
    fn from(msg: String) -> Self {
        ErrorMessage::Boxed(Box::new(msg))
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorMessage::Static(msg) => f.write_str(msg),
            ErrorMessage::Boxed(ref msg) => fmt::Display::fmt(msg, f),
            ErrorMessage::Io(ref err) => fmt::Display::fmt(err, f),
        }
    }
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a source.
///
/// This is the number of octets from the start of the source.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(u64);

impl Pos {
    /// Returns the position as an octet offset.
    pub fn offset(self) -> u64 {
        self.0
    }
}

impl From<u64> for Pos {
    fn from(pos: u64) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}


//============ Tests =========================================================
