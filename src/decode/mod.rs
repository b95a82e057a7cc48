//! Parsing BER encoded data.
//!
//! This modules provides the means to traverse BER encoded data from any
//! seekable source.
//!
//! The central type is [`BerReader`]. It walks through the data one value
//! at a time, producing a [`Node`][crate::Node] for each, and keeps track
//! of the constructed values it is currently in. Content octets are only
//! read on request. The reader can also assemble all nodes into a tree
//! via [`BerReader::read_to_end`].
//!
//! All problems are reported through [`DecodeError`].

pub use self::error::{DecodeError, ErrorKind, ErrorMessage, Pos};
pub use self::reader::{BerReader, Options};
pub use self::source::Source;

pub(crate) use self::source::{read_opt_u8, read_u8};

mod error;
mod reader;
mod source;

#[cfg(test)]
mod test;
