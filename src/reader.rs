// reader.rs
//
// Copyright (c) 2026  giframe developers
//
//! Bounds-checked cursors over the input buffer
use crate::error::{Error, Result};

/// Sequential byte cursor over an immutable buffer.
///
/// Every read either advances the cursor past the bytes it returns or
/// fails with [Error::UnexpectedEof] and leaves the cursor untouched.
pub(crate) struct ByteReader<'a> {
    /// Input buffer
    buf: &'a [u8],
    /// Cursor position
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new byte reader
    pub fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, pos: 0 }
    }

    /// Get the current cursor offset
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Check whether all bytes have been consumed
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Make an EOF error at the current offset
    fn eof(&self) -> Error {
        Error::UnexpectedEof {
            offset: self.pos,
            frames_complete: 0,
        }
    }

    /// Peek at the next byte without advancing
    pub fn peek(&self) -> Result<u8> {
        self.buf.get(self.pos).copied().ok_or_else(|| self.eof())
    }

    /// Read a slice of `len` bytes
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        match self.buf.get(self.pos..self.pos + len) {
            Some(slice) => {
                self.pos += len;
                Ok(slice)
            }
            None => Err(self.eof()),
        }
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self.read_slice(1)?;
        Ok(b[0])
    }

    /// Read a 16-bit little-endian integer
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.read_slice(2)?;
        Ok(u16::from(b[0]) | u16::from(b[1]) << 8)
    }

    /// Skip `len` bytes
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_slice(len)?;
        Ok(())
    }
}

/// Bit-level cursor for LZW codes.
///
/// GIF packs codes LSB-first: the first code occupies the low bits of the
/// first byte, spilling into following bytes as needed.
pub(crate) struct BitReader<'a> {
    /// Input buffer
    buf: &'a [u8],
    /// Cursor position
    pos: usize,
    /// Pending bits, low bits first
    bits: u32,
    /// Number of pending bits
    n_bits: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader
    pub fn new(buf: &'a [u8]) -> Self {
        BitReader {
            buf,
            pos: 0,
            bits: 0,
            n_bits: 0,
        }
    }

    /// Read a code of `width` bits (1..=12), or `None` when the buffer
    /// has too few bits left.
    pub fn read_bits(&mut self, width: u8) -> Option<u16> {
        debug_assert!((1..=12).contains(&width));
        while self.n_bits < width {
            let byte = *self.buf.get(self.pos)?;
            self.bits |= u32::from(byte) << self.n_bits;
            self.n_bits += 8;
            self.pos += 1;
        }
        let code = (self.bits & ((1 << width) - 1)) as u16;
        self.bits >>= width;
        self.n_bits -= width;
        Some(code)
    }
}
