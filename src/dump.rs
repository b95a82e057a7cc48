//! Textual rendering of node trees.
//!
//! The [`Dump`] type displays a tree of nodes as produced by
//! [`BerReader::read_to_end`][crate::BerReader::read_to_end] with one line
//! per value. Each line shows the tag of the value followed by the position
//! of its first octet and the length of its content in parentheses. If the
//! content of a primitive value has been loaded, the decoded value follows
//! after a colon. Children are indented by two spaces per level.
//!
//! ```text
//! OBJECT IDENTIFIER (0, 9): 1.3.6.1.4.1.311.21.20
//! SET (11, 3)
//!   INTEGER (13, 1): 9
//! ```

use std::fmt;
use crate::ident::Tag;
use crate::node::{Node, NodeType};


//------------ Dump ----------------------------------------------------------

/// A node tree that can be displayed.
///
/// If the node is the document start, only its children are shown.
#[derive(Clone, Copy, Debug)]
pub struct Dump<'a> {
    node: &'a Node,
}

impl<'a> Dump<'a> {
    /// Creates a dump of the given node.
    pub fn new(node: &'a Node) -> Self {
        Dump { node }
    }
}

impl Node {
    /// Returns a value displaying the node and all its children.
    pub fn dump(&self) -> Dump<'_> {
        Dump::new(self)
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack = Vec::new();
        if self.node.node_type() == NodeType::DocumentStart {
            stack.extend(
                self.node.children().iter().rev().map(|child| (child, 0))
            );
        }
        else {
            stack.push((self.node, 0));
        }
        while let Some((node, depth)) = stack.pop() {
            write_line(node, depth, f)?;
            stack.extend(
                node.children().iter().rev().map(|child| (child, depth + 1))
            );
        }
        Ok(())
    }
}

fn write_line(
    node: &Node, depth: usize, f: &mut fmt::Formatter
) -> fmt::Result {
    write!(
        f, "{:indent$}{} ({}, {}",
        "", node.tag(), node.start(), node.length(), indent = depth * 2
    )?;
    if node.is_indefinite() {
        f.write_str(", indefinite")?;
    }
    f.write_str(")")?;
    if node.raw().is_some() && node.tag() != Tag::END_OF_CONTENTS {
        match node.value() {
            Ok(value) => write!(f, ": {}", value)?,
            Err(err) => write!(f, ": <{}>", err)?,
        }
    }
    f.write_str("\n")
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::io::Cursor;
    use crate::decode::{BerReader, Options};

    const OID_AND_SET: &[u8] = b"\
        \x06\x09\x2b\x06\x01\x04\x01\x82\x37\x15\x14\
        \x31\x03\x02\x01\x09\
    ";

    #[test]
    fn dump_with_values() {
        let root = BerReader::with_options(
            Cursor::new(OID_AND_SET), Options::default().read_content(true)
        ).read_to_end().unwrap();
        assert_eq!(
            root.dump().to_string(),
            "OBJECT IDENTIFIER (0, 9): 1.3.6.1.4.1.311.21.20\n\
             SET (11, 3)\n  \
               INTEGER (13, 1): 9\n"
        );
        assert_eq!(
            root.children()[1].dump().to_string(),
            "SET (11, 3)\n  INTEGER (13, 1): 9\n"
        );
    }

    #[test]
    fn dump_indefinite() {
        let root = BerReader::new(
            Cursor::new(b"\x30\x80\x04\x03\x56\x78\x90\x00\x00".as_ref())
        ).read_to_end().unwrap();
        assert_eq!(
            root.dump().to_string(),
            "SEQUENCE (0, 5, indefinite)\n  \
               OCTET STRING (2, 3)\n  \
               END-OF-CONTENTS (7, 0)\n"
        );
    }

    #[test]
    fn dump_invalid_value() {
        let root = BerReader::with_options(
            Cursor::new(b"\x01\x02\x00\x00".as_ref()),
            Options::default().read_content(true)
        ).read_to_end().unwrap();
        assert!(root.dump().to_string().starts_with("BOOLEAN (0, 2): <"));
    }
}
