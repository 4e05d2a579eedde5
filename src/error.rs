// error.rs
//
// Copyright (c) 2026  giframe developers
//
use std::fmt;

/// Errors encountered while decoding a GIF
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// First six bytes are not `GIF87a` or `GIF89a`.
    BadSignature,
    /// Input buffer exhausted in the middle of a structure.
    UnexpectedEof {
        /// Byte offset where the read was attempted
        offset: usize,
        /// Number of complete frames parsed before the failure
        frames_complete: usize,
    },
    /// Unrecognized block introducer or invalid packed-field combination.
    MalformedBlock {
        /// Byte offset of the offending byte
        offset: usize,
        /// The offending byte value
        found: u8,
    },
    /// Invalid code encountered in the compressed image data.
    CorruptLzwStream {
        /// The out-of-range code
        code: u16,
    },
    /// Compressed image data ended before the declared pixel count.
    TruncatedImageData {
        /// Number of pixels still missing
        missing: usize,
    },
    /// Pixel index beyond the bounds of the active color table.
    ColorIndexOutOfBounds {
        /// The out-of-range index
        index: u8,
        /// Number of entries in the table
        entries: usize,
    },
    /// A GIF feature deliberately not implemented.
    UnsupportedFeature(&'static str),
}

/// Giframe result type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Record the number of complete frames parsed before an EOF error.
    pub(crate) fn with_frames_complete(self, frames: usize) -> Self {
        match self {
            Error::UnexpectedEof { offset, .. } => Error::UnexpectedEof {
                offset,
                frames_complete: frames,
            },
            e => e,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BadSignature => write!(fmt, "not a GIF file"),
            Error::UnexpectedEof {
                offset,
                frames_complete,
            } => write!(
                fmt,
                "unexpected end of data at offset {offset} \
                 ({frames_complete} complete frames)"
            ),
            Error::MalformedBlock { offset, found } => {
                write!(fmt, "malformed block at offset {offset}: {found:#04x}")
            }
            Error::CorruptLzwStream { code } => {
                write!(fmt, "corrupt LZW stream: invalid code {code}")
            }
            Error::TruncatedImageData { missing } => {
                write!(fmt, "image data truncated: {missing} pixels missing")
            }
            Error::ColorIndexOutOfBounds { index, entries } => {
                write!(
                    fmt,
                    "color index {index} out of bounds ({entries} entries)"
                )
            }
            Error::UnsupportedFeature(feature) => {
                write!(fmt, "unsupported feature: {feature}")
            }
        }
    }
}

impl std::error::Error for Error {}
