// lzw.rs
//
// Copyright (c) 2026  giframe developers
//
//! Lempel-Ziv-Welch decompression for GIF
use crate::error::{Error, Result};
use crate::reader::BitReader;
use std::cmp::Ordering;
use std::ops::AddAssign;

/// Code bits
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bits(u8);

impl From<u8> for Bits {
    fn from(bits: u8) -> Self {
        Bits(bits.min(Self::MAX.0))
    }
}

impl From<Bits> for u8 {
    fn from(bits: Bits) -> Self {
        bits.0
    }
}

impl AddAssign<u8> for Bits {
    fn add_assign(&mut self, rhs: u8) {
        self.0 = (self.0 + rhs).min(Self::MAX.0)
    }
}

impl Bits {
    /// Maximum code bits allowed for GIF
    const MAX: Self = Bits(12);

    /// Get the number of entries
    fn entries(self) -> u16 {
        1 << (self.0 as u16)
    }
}

/// Code type
type Code = u16;

/// Node for the code dictionary
#[derive(Clone, Copy, Debug)]
struct Node {
    /// Next node code
    next: Option<Code>,
    /// Byte value
    byte: u8,
}

/// Code dictionary trie.
///
/// Preallocated for the full 12-bit code space; codes index the table
/// directly and entries chain back through `next` links.
#[derive(Debug)]
struct Trie {
    /// Table of codes
    table: Vec<Node>,
    /// Minimum code bits
    min_code_bits: u8,
}

impl Trie {
    /// Create a new code dictionary
    fn new(min_code_bits: u8) -> Self {
        let mut trie = Trie {
            table: Vec::with_capacity(Bits::MAX.entries().into()),
            min_code_bits,
        };
        trie.reset();
        trie
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    /// Get the end-of-information code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset the dictionary to single-index entries
    fn reset(&mut self) {
        self.table.clear();
        for byte in 0..self.clear_code() {
            self.push_node(None, byte as u8);
        }
        self.push_node(None, 0); // clear code
        self.push_node(None, 0); // end code
    }

    /// Push a node into the dictionary
    fn push_node(&mut self, next: Option<Code>, byte: u8) {
        self.table.push(Node { next, byte })
    }

    /// Look up the first byte of a code's sequence
    fn first_byte(&self, code: Code) -> u8 {
        debug_assert!(code < self.next_code());
        let mut node = self.table[code as usize];
        while let Some(code) = node.next {
            node = self.table[code as usize];
        }
        node.byte
    }

    /// Expand a code's sequence into a buffer (reversed)
    fn expand_reversed(&self, code: Code, buffer: &mut Vec<u8>) {
        debug_assert!(code < self.next_code());
        let mut node = self.table[code as usize];
        while let Some(code) = node.next {
            buffer.push(node.byte);
            node = self.table[code as usize];
        }
        buffer.push(node.byte);
    }
}

/// LZW decompressor state for one image
#[derive(Debug)]
struct Decompressor {
    /// Code dictionary
    trie: Trie,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: Bits,
    /// Last code
    last: Option<Code>,
}

impl Decompressor {
    /// Create a new decompressor
    fn new(min_code_bits: u8) -> Self {
        Decompressor {
            trie: Trie::new(min_code_bits),
            min_code_bits,
            code_bits: Bits::from(min_code_bits + 1),
            last: None,
        }
    }

    /// Reset state after a clear code
    fn reset(&mut self) {
        self.trie.reset();
        self.code_bits = Bits::from(self.min_code_bits + 1);
        self.last = None;
    }

    /// Decompress one data code into the buffer
    fn decompress_code(&mut self, code: Code, buffer: &mut Vec<u8>) -> Result<()> {
        let start = buffer.len();
        let next_code = self.trie.next_code();
        match (self.last, code.cmp(&next_code)) {
            (_, Ordering::Greater) => {
                return Err(Error::CorruptLzwStream { code });
            }
            (None, _) => {
                // first code after a clear must be a single index
                if code >= self.trie.clear_code() {
                    return Err(Error::CorruptLzwStream { code });
                }
                buffer.push(code as u8);
            }
            (Some(last), Ordering::Less) => {
                self.trie.expand_reversed(code, buffer);
                // sequence is reversed, so its first index is last here
                let byte = buffer.last().copied().unwrap();
                if next_code < Bits::MAX.entries() {
                    self.trie.push_node(Some(last), byte);
                }
            }
            (Some(last), Ordering::Equal) => {
                // not-yet-assigned code: previous sequence + its own
                // first index
                if next_code >= Bits::MAX.entries() {
                    return Err(Error::CorruptLzwStream { code });
                }
                self.trie.push_node(Some(last), self.trie.first_byte(last));
                self.trie.expand_reversed(code, buffer);
            }
        }
        buffer[start..].reverse();
        self.last = Some(code);
        // per GIF convention the width bump happens one code early
        if self.trie.next_code() == self.code_bits.entries() {
            self.code_bits += 1;
        }
        Ok(())
    }
}

/// Decompress one image's concatenated sub-block data into a stream of
/// color table indices.
///
/// Stops at the end-of-information code or once `pixel_count` indices
/// have been produced, whichever comes first; overshoot from the final
/// code is truncated.
pub(crate) fn decompress(
    data: &[u8],
    min_code_bits: u8,
    pixel_count: usize,
) -> Result<Vec<u8>> {
    let mut dec = Decompressor::new(min_code_bits);
    let mut bits = BitReader::new(data);
    let mut buffer = Vec::with_capacity(pixel_count);
    while buffer.len() < pixel_count {
        let code = bits.read_bits(dec.code_bits.into()).ok_or(
            Error::TruncatedImageData {
                missing: pixel_count - buffer.len(),
            },
        )?;
        if code == dec.trie.clear_code() {
            dec.reset();
        } else if code == dec.trie.end_code() {
            return Err(Error::TruncatedImageData {
                missing: pixel_count - buffer.len(),
            });
        } else {
            dec.decompress_code(code, &mut buffer)?;
        }
    }
    buffer.truncate(pixel_count);
    Ok(buffer)
}
