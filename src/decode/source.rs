//! The underlying source of encoded data.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::io;
use std::io::SeekFrom;
use bytes::Bytes;
use super::error::DecodeError;


//------------ Source --------------------------------------------------------

/// A seekable source of data that keeps track of its position.
///
/// The source never touches the wrapped reader before it is asked to.
/// The length of the underlying data is only determined when first needed.
#[derive(Debug)]
pub struct Source<S> {
    /// The underlying reader.
    inner: S,

    /// The current position relative to the start of the data.
    pos: u64,

    /// The length of the data once we know it.
    len: Option<u64>,
}

impl<S> Source<S> {
    /// Creates a new source atop a reader.
    pub fn new(inner: S) -> Self {
        Source { inner, pos: 0, len: None }
    }

    /// Returns the current position.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Converts the source into the underlying reader.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: io::Read + io::Seek> Source<S> {
    /// Moves the source to the given position.
    pub fn seek_to(&mut self, pos: u64) -> Result<(), DecodeError> {
        self.inner.seek(SeekFrom::Start(pos)).map_err(|err| {
            DecodeError::from_io(err, pos)
        })?;
        self.pos = pos;
        Ok(())
    }

    /// Returns the length of the data.
    ///
    /// This seeks to the end of the data and back to the current position
    /// the first time it is called.
    pub fn len(&mut self) -> Result<u64, DecodeError> {
        if let Some(len) = self.len {
            return Ok(len)
        }
        let pos = self.pos;
        let len = self.inner.seek(SeekFrom::End(0)).map_err(|err| {
            DecodeError::from_io(err, pos)
        })?;
        self.seek_to(pos)?;
        self.len = Some(len);
        Ok(len)
    }

    /// Returns the number of octets left after the current position.
    pub fn remaining(&mut self) -> Result<u64, DecodeError> {
        Ok(self.len()?.saturating_sub(self.pos))
    }

    /// Reads exactly `len` octets starting at `pos`.
    pub fn read_at(
        &mut self, pos: u64, len: u64
    ) -> Result<Bytes, DecodeError> {
        let len = usize::try_from(len).map_err(|_| {
            DecodeError::unsupported("content too large", pos)
        })?;
        let mut res = vec![0u8; len];
        self.read_exact_at(pos, &mut res)?;
        Ok(res.into())
    }

    /// Fills `buf` with the octets starting at `pos`.
    pub fn read_exact_at(
        &mut self, pos: u64, buf: &mut [u8]
    ) -> Result<(), DecodeError> {
        self.seek_to(pos)?;
        io::Read::read_exact(self, buf).map_err(|err| {
            DecodeError::from_io(err, pos)
        })
    }
}

impl<S: io::Read> io::Read for Source<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        let res = self.inner.read(buf)?;
        self.pos += res as u64;
        Ok(res)
    }
}


//------------ Helper Functions ----------------------------------------------

/// Reads a single octet from a reader.
///
/// If there aren’t any more octets available, returns `Ok(None)`. The
/// position is only used for error reporting.
pub fn read_opt_u8(
    reader: &mut impl io::Read, pos: u64
) -> Result<Option<u8>, DecodeError> {
    let mut buf = [0u8];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => { }
            Err(err) => return Err(DecodeError::from_io(err, pos))
        }
    }
}

/// Reads a single octet from a reader.
///
/// If there aren’t any more octets available, returns a truncated input
/// error.
pub fn read_u8(
    reader: &mut impl io::Read, pos: u64
) -> Result<u8, DecodeError> {
    read_opt_u8(reader, pos)?.ok_or_else(|| {
        DecodeError::truncated("unexpected end of data", pos)
    })
}


//============ Tests =========================================================
