// private.rs
//
// Copyright (c) 2026  giframe developers
//
//! Private module for top-level items
use crate::block::ImageDesc;
use crate::compose::Compositor;
use crate::error::Result;
use crate::{lzw, parse};
use pix::rgb::SRgba8;
use pix::Raster;

/// One frame of a decoded animation.
///
/// The raster always covers the full canvas, with earlier frames
/// composited underneath according to their disposal methods.  The
/// sub-rectangle accessors report where this frame's own image block
/// was placed.
pub struct Frame {
    /// Left edge of the image block
    left: u16,
    /// Top edge of the image block
    top: u16,
    /// Width of the image block
    width: u16,
    /// Height of the image block
    height: u16,
    /// Delay before the next frame, in centiseconds
    delay_time_cs: u16,
    /// Full-canvas RGBA raster
    raster: Raster<SRgba8>,
}

impl Frame {
    /// Create a frame
    pub(crate) fn new(
        desc: &ImageDesc,
        delay_time_cs: u16,
        raster: Raster<SRgba8>,
    ) -> Self {
        Frame {
            left: desc.left(),
            top: desc.top(),
            width: desc.width(),
            height: desc.height(),
            delay_time_cs,
            raster,
        }
    }

    /// Get the left edge of the frame's image block
    pub fn left(&self) -> u16 {
        self.left
    }

    /// Get the top edge of the frame's image block
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Get the width of the frame's image block
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the frame's image block
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the delay before the next frame, in centiseconds.
    ///
    /// Zero means the file specified no delay; players typically
    /// substitute a minimum of their own.
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }

    /// Get the full-canvas raster
    pub fn raster(&self) -> &Raster<SRgba8> {
        &self.raster
    }

    /// Take the full-canvas raster
    pub fn into_raster(self) -> Raster<SRgba8> {
        self.raster
    }

    /// Get the raster pixels as packed RGBA bytes, row-major
    pub fn image_data(&self) -> &[u8] {
        self.raster.as_u8_slice()
    }
}

/// A fully decoded GIF animation.
///
/// ```
/// // 2x2 black-and-white checker
/// let gif: &[u8] = &[
///     0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x02, 0x00,
///     0x80, 0x01, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x2C,
///     0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x02, 0x00, 0x00, 0x02,
///     0x03, 0x0C, 0x10, 0x05, 0x00, 0x3B,
/// ];
/// let gif = giframe::decode(gif)?;
/// assert_eq!((gif.width(), gif.height()), (2, 2));
/// assert_eq!(gif.num_frames(), 1);
/// assert_eq!(gif.frames()[0].image_data().len(), 16);
/// # Ok::<(), giframe::Error>(())
/// ```
pub struct Gif {
    /// Canvas width in pixels
    width: u16,
    /// Canvas height in pixels
    height: u16,
    /// Loop count from the NETSCAPE2.0 extension
    loop_count: Option<u16>,
    /// Background color as `#rrggbb`
    background: Option<String>,
    /// Decoded frames in file order
    frames: Vec<Frame>,
}

impl Gif {
    /// Get the canvas width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the canvas height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the animation loop count.
    ///
    /// `None` means the file carried no looping extension (play once);
    /// `Some(0)` means loop forever; any other value is the number of
    /// times to repeat.
    pub fn loop_count(&self) -> Option<u16> {
        self.loop_count
    }

    /// Get the background color as a `#rrggbb` string.
    ///
    /// `None` when the file has no global color table.
    pub fn background_color(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Get the decoded frames
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Get the number of frames
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Take the decoded frames
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

/// Decode a complete GIF file from a byte buffer.
///
/// Pure function of its input; all frames are decompressed and
/// composited before it returns.
pub fn decode(bytes: &[u8]) -> Result<Gif> {
    let raw = parse::parse(bytes)?;
    let mut compositor =
        Compositor::new(raw.screen.width(), raw.screen.height());
    let mut frames = Vec::with_capacity(raw.images.len());
    for image in &raw.images {
        let indices = lzw::decompress(
            &image.data,
            image.min_code_bits,
            image.desc.image_sz(),
        )?;
        let frame =
            compositor.step(image, raw.global_color_table.as_ref(), &indices)?;
        frames.push(frame);
    }
    let background = raw.global_color_table.as_ref().map(|table| {
        table
            .hex(raw.screen.background_color_idx().into())
            .unwrap_or_else(|| String::from("#000000"))
    });
    Ok(Gif {
        width: raw.screen.width(),
        height: raw.screen.height(),
        loop_count: raw.loop_count,
        background,
        frames,
    })
}
