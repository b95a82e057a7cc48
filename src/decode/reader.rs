//! Step-by-step traversal of encoded data.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::io;
use bytes::Bytes;
use log::{debug, trace};
use smallvec::SmallVec;
use crate::ident::{Class, Ident};
use crate::length::Length;
use crate::node::{Node, NodeType};
use super::error::DecodeError;
use super::source::Source;


//------------ Options -------------------------------------------------------

/// Options for traversing encoded data.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Options {
    /// Load the content of primitive values while stepping.
    read_content: bool,
}

impl Options {
    /// Sets whether the content of primitive values is loaded eagerly.
    ///
    /// If enabled, every primitive node produced by the reader has its
    /// content octets available via [`Node::raw`] and the typed accessors
    /// can be used right away.
    pub fn read_content(mut self, read_content: bool) -> Self {
        self.read_content = read_content;
        self
    }

    /// Returns whether the content of primitive values is loaded eagerly.
    pub fn reads_content(self) -> bool {
        self.read_content
    }
}


//------------ BerReader -----------------------------------------------------

/// A cursor traversing BER encoded data one value at a time.
///
/// The reader walks through the data produced by a seekable source `S`
/// and produces a [`Node`] for every encoded value it encounters plus a
/// few virtual nodes: one before the first value, one after the end of
/// each constructed value, and one after the last value. The type of a
/// node is given by its [`NodeType`].
///
/// Use [`step`][Self::step] to advance by one node or
/// [`read_to_end`][Self::read_to_end] to assemble the remaining data into
/// a tree of nodes. The content of a value is only read when it is asked
/// for, either through [`read_content`][Self::read_content] and friends or
/// by enabling the [`read_content`][Options::read_content] option.
///
/// The source can be passed in by value, in which case the reader owns it
/// and it is dropped together with the reader unless reclaimed through
/// [`into_inner`][Self::into_inner]. Alternatively, a mutable reference
/// can be passed in and the source remains with the caller. The reader does
/// not touch the source before the first operation.
///
/// All positions are relative to the start of the source.
///
/// # Indefinite length values
///
/// When a constructed value with indefinite length is encountered, the
/// reader walks through its content to find the end-of-contents octets
/// belonging to it. The resulting node reports the length of the content
/// excluding the end-of-contents octets. These octets are still part of the
/// constructed value and are produced as a primitive node with the tag
/// `UNIVERSAL 0` and zero length before the node marking the end of the
/// constructed value.
#[derive(Debug)]
pub struct BerReader<S> {
    /// The source of the data.
    source: Source<S>,

    /// The options for traversing.
    options: Options,

    /// The current node.
    current: Node,

    /// The constructed values we are currently in.
    stack: SmallVec<[OpenNode; 8]>,
}

impl<S: io::Read + io::Seek> BerReader<S> {
    /// Creates a new reader using the default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, Options::default())
    }

    /// Creates a new reader using the given options.
    pub fn with_options(source: S, options: Options) -> Self {
        BerReader {
            source: Source::new(source),
            options,
            current: Node::document_start(),
            stack: SmallVec::new(),
        }
    }

    /// Returns the current node.
    pub fn current(&self) -> &Node {
        &self.current
    }

    /// Returns the number of constructed values the reader is currently in.
    ///
    /// A node that starts a constructed value is reported at the depth of
    /// its parent. The node that ends it is reported at the depth of its
    /// children.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the options of the reader.
    pub fn options(&self) -> Options {
        self.options
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        self.source.get_ref()
    }

    /// Converts the reader into the underlying source.
    pub fn into_inner(self) -> S {
        self.source.into_inner()
    }

    /// Advances to the next node and returns it.
    ///
    /// Once the end of the data has been reached, the reader stays at the
    /// node of type [`NodeType::DocumentEnd`].
    ///
    /// Fails if the data is not correctly encoded or if the source fails.
    /// A failed step leaves the reader at its current node.
    pub fn step(&mut self) -> Result<&Node, DecodeError> {
        // The nesting stack is only changed once the step succeeded so that
        // a failed step leaves the reader where it was.
        let (pos, top, change) = match self.current.node_type() {
            NodeType::DocumentStart => {
                (0, self.stack.last().copied(), StackChange::None)
            }
            NodeType::Primitive => {
                (
                    self.current.end(), self.stack.last().copied(),
                    StackChange::None
                )
            }
            NodeType::ConstructedStart => {
                let open = OpenNode {
                    ident: self.current.ident(),
                    end: self.current.end(),
                };
                (
                    self.current.data_offset(), Some(open),
                    StackChange::Push(open)
                )
            }
            NodeType::ConstructedEnd => {
                let parent = self.stack.iter().rev().nth(1).copied();
                (self.current.end(), parent, StackChange::Pop)
            }
            NodeType::DocumentEnd => return Ok(&self.current)
        };
        let mut node = self.read_node(pos, top)?;
        if self.options.read_content
            && node.node_type() == NodeType::Primitive
        {
            let raw = Self::node_content(&mut self.source, &node)?;
            node.set_raw(raw);
        }
        match change {
            StackChange::None => { }
            StackChange::Push(open) => self.stack.push(open),
            StackChange::Pop => { self.stack.pop(); }
        }
        trace!(
            "{} {} at {} (length {}, depth {})",
            node.node_type(), node.tag(), node.start(), node.length(),
            self.stack.len()
        );
        self.current = node;
        Ok(&self.current)
    }

    /// Reads all the remaining nodes and assembles them into a tree.
    ///
    /// Returns the current node with all following nodes attached as its
    /// children. This is intended to be called on a fresh reader, in which
    /// case the returned node is of type [`NodeType::DocumentStart`] and
    /// the top-level values are its children. Nodes marking the end of a
    /// constructed value are not included in the tree.
    ///
    /// Fails with a structure error if the reader was not positioned such
    /// that all constructed values are closed at the end of the data.
    pub fn read_to_end(&mut self) -> Result<Node, DecodeError> {
        let mut stack = vec![self.current.clone()];
        loop {
            let node = self.step()?;
            match node.node_type() {
                NodeType::Primitive => {
                    let node = node.clone();
                    if let Some(parent) = stack.last_mut() {
                        parent.push_child(node)
                    }
                }
                NodeType::ConstructedStart => {
                    stack.push(node.clone())
                }
                NodeType::ConstructedEnd => {
                    let done = match stack.pop() {
                        Some(done) => done,
                        None => {
                            return Err(DecodeError::structure(
                                "end of constructed value without start"
                            ))
                        }
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(done),
                        None => {
                            return Err(DecodeError::structure(
                                "end of constructed value without start"
                            ))
                        }
                    }
                }
                NodeType::DocumentEnd => break,
                NodeType::DocumentStart => {
                    return Err(DecodeError::structure(
                        "unexpected start of document"
                    ))
                }
            }
        }
        let root = match stack.pop() {
            Some(root) if stack.is_empty() => root,
            _ => {
                return Err(DecodeError::structure(format!(
                    "{} constructed values left open", stack.len()
                )))
            }
        };
        if root.node_type() != NodeType::DocumentStart {
            return Err(DecodeError::structure(
                "tree does not start at the document start"
            ))
        }
        debug!(
            "read {} top-level values ending at {}",
            root.children().len(), self.current.end()
        );
        Ok(root)
    }

    /// Reads the content octets of a node.
    ///
    /// This is possible for primitive nodes and for constructed nodes of
    /// the context specific class with a definite length. Everything else
    /// results in an invalid operation error. Content longer than
    /// `i32::MAX` octets is not supported.
    pub fn read_content(&mut self, node: &Node) -> Result<Bytes, DecodeError> {
        Self::node_content(&mut self.source, node)
    }

    /// Reads the content octets of a node into a buffer.
    ///
    /// The buffer must have exactly the length of the content. Otherwise
    /// the same rules as for [`read_content`][Self::read_content] apply.
    pub fn read_content_into(
        &mut self, node: &Node, buf: &mut [u8]
    ) -> Result<(), DecodeError> {
        check_content_access(node)?;
        if buf.len() as u64 != node.length() {
            return Err(DecodeError::invalid_operation(
                format!(
                    "buffer of {} octets for content of {} octets",
                    buf.len(), node.length()
                ),
                node.data_offset()
            ))
        }
        self.source.read_exact_at(node.data_offset(), buf)
    }

    /// Reads the content octets of a node and stores them in the node.
    pub fn load_content(
        &mut self, node: &mut Node
    ) -> Result<(), DecodeError> {
        let raw = Self::node_content(&mut self.source, node)?;
        node.set_raw(raw);
        Ok(())
    }

    /// Loads the content octets of the current node.
    pub fn load_current_content(&mut self) -> Result<&Node, DecodeError> {
        if self.current.raw().is_none() {
            let raw = Self::node_content(&mut self.source, &self.current)?;
            self.current.set_raw(raw);
        }
        Ok(&self.current)
    }

    /// Returns the complete encoding of a node.
    ///
    /// This includes the identifier and length octets and, for values of
    /// indefinite length, the end-of-contents octets. Virtual marker nodes
    /// don’t cover any octets and result in empty data.
    pub fn extract_raw(&mut self, node: &Node) -> Result<Bytes, DecodeError> {
        if node.start() == node.end() {
            return Ok(Bytes::new())
        }
        let len = node.end() - node.start();
        check_supported_len(len, node.start())?;
        self.source.read_at(node.start(), len)
    }

    /// Reads the content of a node from the source.
    fn node_content(
        source: &mut Source<S>, node: &Node
    ) -> Result<Bytes, DecodeError> {
        check_content_access(node)?;
        source.read_at(node.data_offset(), node.length())
    }

    /// Reads the node starting at `pos`.
    ///
    /// The innermost open constructed value is given by `top`. If `pos` is
    /// at its end, returns the node marking its end instead.
    fn read_node(
        &mut self, pos: u64, top: Option<OpenNode>
    ) -> Result<Node, DecodeError> {
        if let Some(top) = top {
            if pos >= top.end {
                return Ok(Node::constructed_end(top.ident, pos))
            }
        }

        self.source.seek_to(pos)?;
        let ident = match Ident::read_opt(&mut self.source, pos)? {
            Some(ident) => ident,
            None => {
                if top.is_some() {
                    return Err(DecodeError::truncated(
                        "unexpected end of data in constructed value", pos
                    ))
                }
                return Ok(Node::document_end(pos))
            }
        };
        let (length, indefinite) = self.read_length(ident, pos)?;
        let data_offset = self.source.pos();
        let node = Node::from_header(
            ident, length, indefinite, pos, data_offset
        );

        if let Some(top) = top {
            if node.end() > top.end {
                return Err(DecodeError::malformed_length(
                    "nested value too long", pos
                ))
            }
        }
        Ok(node)
    }

    /// Reads the length octets of the value starting at `start`.
    ///
    /// Resolves the indefinite form. Returns the content length and
    /// whether it was indefinite. Leaves the source at the first content
    /// octet.
    fn read_length(
        &mut self, ident: Ident, start: u64
    ) -> Result<(u64, bool), DecodeError> {
        let length_pos = self.source.pos();
        match Length::read_from(&mut self.source, length_pos)? {
            Length::Definite(len) => {
                if len > self.source.remaining()? {
                    return Err(DecodeError::malformed_length(
                        format!("length {} exceeds available data", len),
                        start
                    ))
                }
                Ok((len, false))
            }
            Length::Indefinite => {
                if !ident.is_constructed() {
                    return Err(DecodeError::malformed_length(
                        "indefinite length primitive value", start
                    ))
                }
                let data_offset = self.source.pos();
                let len = self.resolve_indefinite(data_offset)?;
                Ok((len, true))
            }
        }
    }

    /// Determines the content length of an indefinite length value.
    ///
    /// Walks the values inside the content starting at `data_offset` until
    /// it finds the end-of-contents octets belonging to the value. Values
    /// of definite length are skipped, nested values of indefinite length
    /// are counted so that their end-of-contents octets are skipped, too.
    /// Restores the source to `data_offset`.
    fn resolve_indefinite(
        &mut self, data_offset: u64
    ) -> Result<u64, DecodeError> {
        let mut pos = data_offset;
        let mut open = 0usize;
        loop {
            let ident = match Ident::read_opt(&mut self.source, pos)? {
                Some(ident) => ident,
                None => {
                    return Err(DecodeError::truncated(
                        "missing end-of-contents octets", pos
                    ))
                }
            };
            let length_pos = self.source.pos();
            let length = Length::read_from(&mut self.source, length_pos)?;
            let content = self.source.pos();

            if ident == Ident::END_OF_CONTENTS
                && length == Length::Definite(0)
            {
                if open == 0 {
                    self.source.seek_to(data_offset)?;
                    debug!(
                        "resolved indefinite length at {}: {} octets",
                        data_offset, pos - data_offset
                    );
                    return Ok(pos - data_offset)
                }
                open -= 1;
                pos = content;
                continue
            }

            match length {
                Length::Definite(len) => {
                    if len > self.source.remaining()? {
                        return Err(DecodeError::malformed_length(
                            format!("length {} exceeds available data", len),
                            pos
                        ))
                    }
                    pos = content + len;
                    self.source.seek_to(pos)?;
                }
                Length::Indefinite => {
                    if !ident.is_constructed() {
                        return Err(DecodeError::malformed_length(
                            "indefinite length primitive value", pos
                        ))
                    }
                    open += 1;
                    pos = content;
                }
            }
        }
    }
}


//------------ OpenNode ------------------------------------------------------

/// A constructed value the reader is currently in.
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    /// The identifier of the value.
    ident: Ident,

    /// The position right after the value.
    end: u64,
}


//------------ StackChange ---------------------------------------------------

/// How a step changes the nesting stack once it succeeded.
#[derive(Clone, Copy, Debug)]
enum StackChange {
    None,
    Push(OpenNode),
    Pop,
}


//------------ Helper Functions ----------------------------------------------

/// Checks that the content of a node can be read.
fn check_content_access(node: &Node) -> Result<(), DecodeError> {
    match node.node_type() {
        NodeType::Primitive => { }
        NodeType::ConstructedStart if node.class() == Class::Context => { }
        node_type => {
            return Err(DecodeError::invalid_operation(
                format!("cannot read content of {} node", node_type),
                node.data_offset()
            ))
        }
    }
    if node.is_indefinite() {
        return Err(DecodeError::invalid_operation(
            "cannot read content of indefinite length value",
            node.data_offset()
        ))
    }
    check_supported_len(node.length(), node.data_offset())
}

/// Checks that a length is within what we are willing to read at once.
fn check_supported_len(len: u64, pos: u64) -> Result<(), DecodeError> {
    if len > i32::MAX as u64 {
        return Err(DecodeError::unsupported(
            "values longer than 2147483647 octets are not supported", pos
        ))
    }
    Ok(())
}
