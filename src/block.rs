// block.rs
//
// Copyright (c) 2026  giframe developers
//
//! Data model for the GIF container format
const CHANNELS: usize = 3;

/// Method for disposing of a frame before the next one is drawn
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum DisposalMethod {
    /// No disposal specified
    #[default]
    NoAction,
    /// Leave the frame in place
    Keep,
    /// Restore the frame area to the background
    Background,
    /// Restore the frame area to the previous frame
    Previous,
    /// Reserved for future use
    Reserved(u8),
}

impl From<u8> for DisposalMethod {
    fn from(n: u8) -> Self {
        use self::DisposalMethod::*;
        match n & 0b0111 {
            0 => NoAction,
            1 => Keep,
            2 => Background,
            3 => Previous,
            _ => Reserved(n),
        }
    }
}

/// Extension block label
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtensionLabel {
    /// Plain text extension (0x01)
    PlainText,
    /// Graphic control extension (0xF9)
    GraphicControl,
    /// Comment extension (0xFE)
    Comment,
    /// Application extension (0xFF)
    Application,
    /// Any other label
    Unknown(u8),
}

impl From<u8> for ExtensionLabel {
    fn from(n: u8) -> Self {
        use self::ExtensionLabel::*;
        match n {
            0x01 => PlainText,
            0xF9 => GraphicControl,
            0xFE => Comment,
            0xFF => Application,
            _ => Unknown(n),
        }
    }
}

/// Color table of up to 256 RGB entries.
///
/// Owned by the GIF (global) or by a single frame (local); immutable
/// once parsed.
#[derive(Debug, Clone)]
pub struct ColorTable {
    /// Packed RGB triples
    colors: Vec<u8>,
}

impl ColorTable {
    /// Create a color table from packed RGB triples
    pub fn with_colors(colors: &[u8]) -> Self {
        assert_eq!(colors.len() % CHANNELS, 0);
        ColorTable {
            colors: colors.to_vec(),
        }
    }

    /// Create an opaque all-black table with the given number of entries
    pub(crate) fn black(entries: usize) -> Self {
        ColorTable {
            colors: vec![0; entries * CHANNELS],
        }
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.colors.len() / CHANNELS
    }

    /// Check if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get one entry as an RGB triple
    pub fn rgb(&self, idx: usize) -> Option<[u8; 3]> {
        let i = idx * CHANNELS;
        self.colors
            .get(i..i + CHANNELS)
            .map(|c| [c[0], c[1], c[2]])
    }

    /// Get one entry as a `#rrggbb` string
    pub fn hex(&self, idx: usize) -> Option<String> {
        self.rgb(idx)
            .map(|[r, g, b]| format!("#{r:02x}{g:02x}{b:02x}"))
    }
}

/// Logical screen descriptor: the canvas shared by all frames
#[derive(Debug, Default, Clone, Copy)]
pub struct LogicalScreenDesc {
    /// Canvas width in pixels
    width: u16,
    /// Canvas height in pixels
    height: u16,
    /// Packed fields
    flags: u8,
    /// Index into the global color table
    background_color_idx: u8,
    /// Pixel aspect ratio (decoded but unused downstream)
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_RESOLUTION: u8 = 0b0111_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Create a logical screen descriptor
    pub(crate) fn new(
        width: u16,
        height: u16,
        flags: u8,
        background_color_idx: u8,
        pixel_aspect_ratio: u8,
    ) -> Self {
        LogicalScreenDesc {
            width,
            height,
            flags,
            background_color_idx,
            pixel_aspect_ratio,
        }
    }

    /// Get the canvas width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the canvas height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Check whether a global color table follows the descriptor
    pub fn has_color_table(&self) -> bool {
        self.flags & Self::COLOR_TABLE_PRESENT != 0
    }

    /// Get the number of global color table entries
    pub fn color_table_len(&self) -> usize {
        if self.has_color_table() {
            2 << (self.flags & Self::COLOR_TABLE_SIZE)
        } else {
            0
        }
    }

    /// Get the color resolution
    pub fn color_resolution(&self) -> u16 {
        2 << ((self.flags & Self::COLOR_RESOLUTION) >> 4)
    }

    /// Get the background color index
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }

    /// Get the pixel aspect ratio
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// Graphic control extension.
///
/// Applies to the single image that immediately follows it; when a frame
/// carries none, the defaults apply (no disposal, no transparency, zero
/// delay).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicControl {
    /// Packed fields
    flags: u8,
    /// Delay in centiseconds (hundredths of a second)
    delay_time_cs: u16,
    /// Index of the transparent color, when flagged
    transparent_color_idx: u8,
}

impl GraphicControl {
    const DISPOSAL_METHOD: u8 = 0b0001_1100;
    const USER_INPUT: u8 = 0b0000_0010;
    const TRANSPARENT_COLOR: u8 = 0b0000_0001;

    /// Create a graphic control extension
    pub(crate) fn new(
        flags: u8,
        delay_time_cs: u16,
        transparent_color_idx: u8,
    ) -> Self {
        GraphicControl {
            flags,
            delay_time_cs,
            transparent_color_idx,
        }
    }

    /// Get the disposal method
    pub fn disposal_method(&self) -> DisposalMethod {
        ((self.flags & Self::DISPOSAL_METHOD) >> 2).into()
    }

    /// Get the user input flag
    pub fn user_input(&self) -> bool {
        self.flags & Self::USER_INPUT != 0
    }

    /// Get the transparent color index, if transparency is flagged
    pub fn transparent_color(&self) -> Option<u8> {
        if self.flags & Self::TRANSPARENT_COLOR != 0 {
            Some(self.transparent_color_idx)
        } else {
            None
        }
    }

    /// Get the delay time in centiseconds
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
}

/// Image descriptor: one frame's sub-rectangle within the canvas
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDesc {
    /// Left edge within the canvas
    left: u16,
    /// Top edge within the canvas
    top: u16,
    /// Sub-rectangle width
    width: u16,
    /// Sub-rectangle height
    height: u16,
    /// Packed fields
    flags: u8,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const INTERLACED: u8 = 0b0100_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    /// Create an image descriptor
    pub(crate) fn new(
        left: u16,
        top: u16,
        width: u16,
        height: u16,
        flags: u8,
    ) -> Self {
        ImageDesc {
            left,
            top,
            width,
            height,
            flags,
        }
    }

    /// Get the left edge
    pub fn left(&self) -> u16 {
        self.left
    }

    /// Get the top edge
    pub fn top(&self) -> u16 {
        self.top
    }

    /// Get the sub-rectangle width
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the sub-rectangle height
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Check the interlace flag
    pub fn interlaced(&self) -> bool {
        self.flags & Self::INTERLACED != 0
    }

    /// Check whether a local color table follows the descriptor
    pub fn has_color_table(&self) -> bool {
        self.flags & Self::COLOR_TABLE_PRESENT != 0
    }

    /// Get the number of local color table entries
    pub fn color_table_len(&self) -> usize {
        if self.has_color_table() {
            2 << (self.flags & Self::COLOR_TABLE_SIZE)
        } else {
            0
        }
    }

    /// Get the number of pixels in the sub-rectangle
    pub fn image_sz(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}
