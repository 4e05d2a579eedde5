// lib.rs      giframe crate.
//
// Copyright (c) 2026  giframe developers
//
//! Decode GIF animations into full-canvas RGBA frames.
//!
//! The whole file is decoded in one call; each [Frame] carries the
//! complete canvas with interlacing, transparency and frame disposal
//! already applied.
//!
//! ## Example
//! ```
//! # fn main() -> Result<(), giframe::Error> {
//! // bytes of a complete GIF file
//! # let bytes: Vec<u8> = vec![
//! #     0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x02, 0x00,
//! #     0x80, 0x01, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x2C,
//! #     0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00, 0x02,
//! #     0x03, 0x0C, 0x10, 0x05, 0x00, 0x3B,
//! # ];
//! let gif = giframe::decode(&bytes)?;
//! for frame in gif.frames() {
//!     println!(
//!         "{}x{} pixels, {} cs",
//!         gif.width(),
//!         gif.height(),
//!         frame.delay_time_cs()
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [Frame]: struct.Frame.html
#![forbid(unsafe_code)]

pub mod block;
mod compose;
mod error;
mod lzw;
mod parse;
mod private;
mod reader;

pub use crate::error::{Error, Result};
pub use crate::private::{decode, Frame, Gif};
