//! A little-endian read cursor over an in-memory buffer.

use crate::fix::{Fix, FixVector};
use binrw::{BinRead, Endian, io::Cursor as IoCursor};
use easyerr::Error;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("reading {need} bytes at offset 0x{offset:X} exceeds buffer of length 0x{len:X}")]
    OutOfBounds {
        offset: usize,
        need: usize,
        len: usize,
    },
    #[error("record at offset 0x{offset:X} runs past the end of buffer of length 0x{len:X}")]
    TruncatedRecord { offset: usize, len: usize },
    #[error(transparent)]
    Record { source: binrw::Error },
}

/// A positioned cursor over a byte buffer. Every read advances the position by the width of what
/// was read and fails without moving if it would go past the end of the buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a cursor positioned at `offset` in `data`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Current absolute offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn ensure(&self, need: usize) -> Result<(), CursorError> {
        if self.remaining() < need {
            return Err(CursorError::OutOfBounds {
                offset: self.pos,
                need,
                len: self.data.len(),
            });
        }

        Ok(())
    }

    /// Skips `n` bytes without decoding them.
    pub fn skip(&mut self, n: usize) -> Result<(), CursorError> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Borrows the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..][..n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        self.read_array().map(u8::from_le_bytes)
    }

    pub fn read_i8(&mut self) -> Result<i8, CursorError> {
        self.read_array().map(i8::from_le_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, CursorError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, CursorError> {
        self.read_array().map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, CursorError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, CursorError> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_fix(&mut self) -> Result<Fix, CursorError> {
        self.read_i32().map(Fix)
    }

    pub fn read_vector(&mut self) -> Result<FixVector, CursorError> {
        Ok(FixVector::new(
            self.read_fix()?,
            self.read_fix()?,
            self.read_fix()?,
        ))
    }

    /// Decodes a fixed-layout record, returning it along with the amount of bytes it spans.
    pub fn read_record<T>(&mut self) -> Result<(T, usize), CursorError>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        let offset = self.pos;
        let len = self.data.len();
        let mut reader = IoCursor::new(self.data.get(offset..).unwrap_or_default());
        let record = T::read_options(&mut reader, Endian::Little, ()).map_err(|source| {
            if source.is_eof() {
                CursorError::TruncatedRecord { offset, len }
            } else {
                CursorError::Record { source }
            }
        })?;

        let span = reader.position() as usize;
        self.pos += span;

        Ok((record, span))
    }
}
