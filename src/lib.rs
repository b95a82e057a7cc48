//! Streaming traversal of data encoded in Basic Encoding Rules.
//!
//! This crate walks through data encoded in BER, the Basic Encoding Rules
//! defined in ITU recommendation X.690, without knowing anything about the
//! ASN.1 specification the data follows. It reads from any source that
//! implements [`Read`][std::io::Read] and [`Seek`][std::io::Seek] and only
//! reads what it needs: the header of each value while stepping through
//! the data and the content octets when asked for.
//!
//! The [`BerReader`] is the central type. Each call to
//! [`step`][BerReader::step] advances to the next [`Node`] which carries
//! the identifier, length, and position of an encoded value. Virtual nodes
//! mark the start and end of the data and the end of each constructed
//! value. Alternatively, [`read_to_end`][BerReader::read_to_end] assembles
//! all values into a tree.
//!
//! Once the content of a node has been loaded, it can be interpreted via
//! the typed accessors of [`Node`] or all at once via [`Node::value`]. The
//! decoding functions behind these accessors live in the modules [`int`],
//! [`oid`], [`real`], [`string`], and [`time`] and can be used directly for
//! implicitly tagged values.
//!
//! ```
//! use std::io::Cursor;
//! use berstream::{BerReader, NodeType, Options, Tag};
//!
//! let data = b"\x30\x06\x02\x01\x09\x01\x01\xff";
//! let mut reader = BerReader::with_options(
//!     Cursor::new(data.as_ref()), Options::default().read_content(true)
//! );
//! let node = reader.step().unwrap();
//! assert_eq!(node.node_type(), NodeType::ConstructedStart);
//! assert_eq!(node.tag(), Tag::SEQUENCE);
//!
//! let node = reader.step().unwrap();
//! assert_eq!(node.to_integer().unwrap().to_i64(), Some(9));
//! ```
//!
//! Encoding is not supported.

//--- Re-exports

pub use self::decode::{BerReader, DecodeError, ErrorKind, Options};
pub use self::ident::{Class, Ident, Tag};
pub use self::int::Integer;
pub use self::length::Length;
pub use self::node::{Node, NodeType};
pub use self::oid::Oid;
pub use self::string::BitString;
pub use self::time::Time;
pub use self::value::Value;


//--- Public modules

pub mod decode;
pub mod dump;
pub mod int;
pub mod oid;
pub mod real;
pub mod string;
pub mod time;


//--- Private modules

mod ident;
mod length;
mod node;
mod value;
