// parse.rs
//
// Copyright (c) 2026  giframe developers
//
//! Block-level parser for the GIF container format
use crate::block::{
    ColorTable, ExtensionLabel, GraphicControl, ImageDesc, LogicalScreenDesc,
};
use crate::error::{Error, Result};
use crate::reader::ByteReader;
use log::debug;

/// Image separator (0x2C)
const IMAGE_SEPARATOR: u8 = b',';
/// Extension introducer (0x21)
const EXTENSION_INTRODUCER: u8 = b'!';
/// GIF trailer (0x3B)
const TRAILER: u8 = b';';

/// One image block with its attached metadata
#[derive(Debug)]
pub(crate) struct Image {
    /// Image descriptor
    pub desc: ImageDesc,
    /// Local color table, if present
    pub local_color_table: Option<ColorTable>,
    /// Graphic control extension preceding the image, if any
    pub control: Option<GraphicControl>,
    /// LZW minimum code size
    pub min_code_bits: u8,
    /// Concatenated image data sub-blocks
    pub data: Vec<u8>,
}

impl Image {
    /// Get the graphic control, or defaults when absent
    pub fn control(&self) -> GraphicControl {
        self.control.unwrap_or_default()
    }
}

/// Parsed container contents, before decompression and compositing
#[derive(Debug)]
pub(crate) struct RawGif {
    /// Logical screen descriptor
    pub screen: LogicalScreenDesc,
    /// Global color table, if present
    pub global_color_table: Option<ColorTable>,
    /// Loop count from the NETSCAPE2.0 extension, if present
    pub loop_count: Option<u16>,
    /// Image blocks in file order
    pub images: Vec<Image>,
}

/// Parse a complete GIF byte buffer into its raw blocks.
pub(crate) fn parse(bytes: &[u8]) -> Result<RawGif> {
    let mut parser = Parser::new(bytes);
    match parser.run() {
        Ok(()) => Ok(RawGif {
            screen: parser.screen,
            global_color_table: parser.global_color_table,
            loop_count: parser.loop_count,
            images: parser.images,
        }),
        Err(e) => Err(e.with_frames_complete(parser.images.len())),
    }
}

/// Block parser state
struct Parser<'a> {
    /// Cursor over the input
    rdr: ByteReader<'a>,
    /// Logical screen descriptor
    screen: LogicalScreenDesc,
    /// Global color table
    global_color_table: Option<ColorTable>,
    /// Loop count from the NETSCAPE2.0 extension
    loop_count: Option<u16>,
    /// Graphic control waiting for its image
    control: Option<GraphicControl>,
    /// Parsed image blocks
    images: Vec<Image>,
}

impl<'a> Parser<'a> {
    /// Create a new parser
    fn new(bytes: &'a [u8]) -> Self {
        Parser {
            rdr: ByteReader::new(bytes),
            screen: LogicalScreenDesc::default(),
            global_color_table: None,
            loop_count: None,
            control: None,
            images: Vec::new(),
        }
    }

    /// Parse all blocks
    fn run(&mut self) -> Result<()> {
        self.parse_signature()?;
        self.parse_screen_desc()?;
        loop {
            // a missing trailer is tolerated at a block boundary
            if self.rdr.is_empty() {
                return Ok(());
            }
            let offset = self.rdr.pos();
            let introducer = self.rdr.read_u8()?;
            match introducer {
                EXTENSION_INTRODUCER => self.parse_extension()?,
                IMAGE_SEPARATOR => self.parse_image()?,
                TRAILER => return Ok(()),
                found => {
                    return Err(Error::MalformedBlock { offset, found });
                }
            }
        }
    }

    /// Validate the 6-byte signature and version
    fn parse_signature(&mut self) -> Result<()> {
        let sig = self.rdr.read_slice(6).map_err(|_| Error::BadSignature)?;
        match sig {
            b"GIF87a" | b"GIF89a" => Ok(()),
            _ => Err(Error::BadSignature),
        }
    }

    /// Parse the logical screen descriptor and global color table
    fn parse_screen_desc(&mut self) -> Result<()> {
        let width = self.rdr.read_u16_le()?;
        let height = self.rdr.read_u16_le()?;
        let flags = self.rdr.read_u8()?;
        let background_color_idx = self.rdr.read_u8()?;
        let pixel_aspect_ratio = self.rdr.read_u8()?;
        self.screen = LogicalScreenDesc::new(
            width,
            height,
            flags,
            background_color_idx,
            pixel_aspect_ratio,
        );
        debug!("logical screen: {:?}", self.screen);
        let len = self.screen.color_table_len();
        if len > 0 {
            let colors = self.rdr.read_slice(len * 3)?;
            self.global_color_table = Some(ColorTable::with_colors(colors));
        }
        Ok(())
    }

    /// Parse one extension block
    fn parse_extension(&mut self) -> Result<()> {
        let label = ExtensionLabel::from(self.rdr.read_u8()?);
        debug!("extension: {label:?}");
        match label {
            ExtensionLabel::GraphicControl => self.parse_graphic_control(),
            ExtensionLabel::Application => self.parse_application(),
            // comment, plain text and unrecognized extensions are
            // consumed and discarded
            _ => self.skip_sub_blocks(),
        }
    }

    /// Parse a graphic control extension
    fn parse_graphic_control(&mut self) -> Result<()> {
        let block = self.read_sub_blocks()?;
        if block.len() < 4 {
            // invalid block, skip it
            return Ok(());
        }
        let delay = u16::from(block[1]) | u16::from(block[2]) << 8;
        let control = GraphicControl::new(block[0], delay, block[3]);
        debug!("graphic control: {control:?}");
        self.control = Some(control);
        Ok(())
    }

    /// Check an application identifier for looping extensions
    fn is_looping(app_id: &[u8]) -> bool {
        app_id == b"NETSCAPE2.0" || app_id == b"ANIMEXTS1.0"
    }

    /// Parse an application extension, recognizing the looping variants
    fn parse_application(&mut self) -> Result<()> {
        let blocks = self.read_sub_block_list()?;
        let looping = blocks.len() >= 2
            && Self::is_looping(&blocks[0])
            && blocks[1].len() >= 3
            && blocks[1][0] == 1; // sub-block ID
        if looping {
            // number of times to loop the animation (zero means forever)
            let count = u16::from(blocks[1][1]) | u16::from(blocks[1][2]) << 8;
            debug!("loop count: {count}");
            self.loop_count = Some(count);
        }
        Ok(())
    }

    /// Parse an image descriptor and its data
    fn parse_image(&mut self) -> Result<()> {
        let left = self.rdr.read_u16_le()?;
        let top = self.rdr.read_u16_le()?;
        let width = self.rdr.read_u16_le()?;
        let height = self.rdr.read_u16_le()?;
        let flags = self.rdr.read_u8()?;
        let desc = ImageDesc::new(left, top, width, height, flags);
        debug!("image: {desc:?}");
        let local_color_table = if desc.has_color_table() {
            let colors = self.rdr.read_slice(desc.color_table_len() * 3)?;
            Some(ColorTable::with_colors(colors))
        } else {
            None
        };
        let offset = self.rdr.pos();
        let min_code_bits = self.rdr.peek()?;
        if !(2..=8).contains(&min_code_bits) {
            return Err(Error::MalformedBlock {
                offset,
                found: min_code_bits,
            });
        }
        self.rdr.skip(1)?;
        let data = self.read_sub_blocks()?;
        let control = self.control.take();
        self.images.push(Image {
            desc,
            local_color_table,
            control,
            min_code_bits,
            data,
        });
        Ok(())
    }

    /// Read a sequence of sub-blocks, concatenated
    fn read_sub_blocks(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        loop {
            let len = usize::from(self.rdr.read_u8()?);
            if len == 0 {
                return Ok(data);
            }
            data.extend_from_slice(self.rdr.read_slice(len)?);
        }
    }

    /// Read a sequence of sub-blocks, kept separate
    fn read_sub_block_list(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut blocks = Vec::new();
        loop {
            let len = usize::from(self.rdr.read_u8()?);
            if len == 0 {
                return Ok(blocks);
            }
            blocks.push(self.rdr.read_slice(len)?.to_vec());
        }
    }

    /// Consume and discard a sequence of sub-blocks
    fn skip_sub_blocks(&mut self) -> Result<()> {
        loop {
            let len = usize::from(self.rdr.read_u8()?);
            if len == 0 {
                return Ok(());
            }
            self.rdr.skip(len)?;
        }
    }
}
