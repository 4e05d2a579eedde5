// common/mod.rs
//
// Copyright (c) 2026  giframe developers
//
//! Test support: build GIF byte buffers from pixel indices.
//!
//! The compressor only ever emits literal codes, so it stays small while
//! still exercising the real variable-width code stream.

/// Accumulate LZW codes, low bits first
#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    bits: u32,
    n_bits: u8,
}

impl BitWriter {
    fn write(&mut self, code: u16, width: u8) {
        self.bits |= u32::from(code) << self.n_bits;
        self.n_bits += width;
        while self.n_bits >= 8 {
            self.bytes.push(self.bits as u8);
            self.bits >>= 8;
            self.n_bits -= 8;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.n_bits > 0 {
            self.bytes.push(self.bits as u8);
        }
        self.bytes
    }
}

/// Compress indices using only literal codes.
///
/// The code width still has to grow exactly when a real compressor's
/// would, since the decoder tracks dictionary growth on its own.
fn compress(indices: &[u8], min_code_bits: u8) -> Vec<u8> {
    let clear = 1u16 << min_code_bits;
    let end = clear + 1;
    let mut next_code = clear + 2;
    let mut width = min_code_bits + 1;
    let mut out = BitWriter::default();
    out.write(clear, width);
    let mut first = true;
    for &idx in indices {
        out.write(u16::from(idx), width);
        if first {
            // the first code after a clear adds no dictionary entry
            first = false;
        } else if next_code < 0x1000 {
            next_code += 1;
            if next_code == 1 << width && width < 12 {
                width += 1;
            }
        }
    }
    out.write(end, width);
    out.finish()
}

/// One frame to be encoded
pub struct FrameSpec {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub interlace: bool,
    pub local_table: Option<Vec<u8>>,
    pub delay_cs: u16,
    /// Disposal method bits (0 none, 1 keep, 2 background, 3 previous)
    pub disposal: u8,
    pub transparent: Option<u8>,
    /// Pixel indices in row-major order
    pub indices: Vec<u8>,
}

impl FrameSpec {
    /// Create a full-canvas frame with defaults
    pub fn new(width: u16, height: u16, indices: &[u8]) -> Self {
        FrameSpec {
            left: 0,
            top: 0,
            width,
            height,
            interlace: false,
            local_table: None,
            delay_cs: 0,
            disposal: 0,
            transparent: None,
            indices: indices.to_vec(),
        }
    }
}

/// Builder for GIF byte buffers
pub struct GifBuilder {
    width: u16,
    height: u16,
    global_table: Option<Vec<u8>>,
    background: u8,
    loop_count: Option<u16>,
    frames: Vec<FrameSpec>,
}

/// Size field for a color table with `entries` entries (a power of two)
fn table_size_bits(entries: usize) -> u8 {
    assert!(entries.is_power_of_two() && (2..=256).contains(&entries));
    entries.trailing_zeros() as u8 - 1
}

/// Minimum LZW code size for a color table
fn min_code_bits(entries: usize) -> u8 {
    (entries.trailing_zeros() as u8).max(2)
}

impl GifBuilder {
    /// Create a builder for the given canvas size
    pub fn new(width: u16, height: u16) -> Self {
        GifBuilder {
            width,
            height,
            global_table: None,
            background: 0,
            loop_count: None,
            frames: Vec::new(),
        }
    }

    /// Set the global color table from packed RGB triples
    pub fn global_table(mut self, colors: &[u8]) -> Self {
        self.global_table = Some(colors.to_vec());
        self
    }

    /// Set the background color index
    pub fn background(mut self, idx: u8) -> Self {
        self.background = idx;
        self
    }

    /// Add a NETSCAPE2.0 looping extension
    pub fn loop_count(mut self, count: u16) -> Self {
        self.loop_count = Some(count);
        self
    }

    /// Add one frame
    pub fn frame(mut self, frame: FrameSpec) -> Self {
        self.frames.push(frame);
        self
    }

    /// Encode the complete file
    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"GIF89a");
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        match &self.global_table {
            Some(table) => {
                let entries = table.len() / 3;
                out.push(0x80 | table_size_bits(entries));
                out.push(self.background);
                out.push(0);
                out.extend_from_slice(table);
            }
            None => {
                out.push(0);
                out.push(self.background);
                out.push(0);
            }
        }
        if let Some(count) = self.loop_count {
            out.extend_from_slice(&[0x21, 0xFF, 0x0B]);
            out.extend_from_slice(b"NETSCAPE2.0");
            out.extend_from_slice(&[0x03, 0x01]);
            out.extend_from_slice(&count.to_le_bytes());
            out.push(0);
        }
        for frame in &self.frames {
            Self::encode_frame(&mut out, frame, self.global_table.as_deref());
        }
        out.push(0x3B);
        out
    }

    /// Encode one frame with its graphic control extension
    fn encode_frame(out: &mut Vec<u8>, frame: &FrameSpec, global: Option<&[u8]>) {
        let mut flags = frame.disposal << 2;
        let mut transparent_idx = 0;
        if let Some(idx) = frame.transparent {
            flags |= 0x01;
            transparent_idx = idx;
        }
        out.extend_from_slice(&[0x21, 0xF9, 0x04, flags]);
        out.extend_from_slice(&frame.delay_cs.to_le_bytes());
        out.push(transparent_idx);
        out.push(0);
        out.push(0x2C);
        out.extend_from_slice(&frame.left.to_le_bytes());
        out.extend_from_slice(&frame.top.to_le_bytes());
        out.extend_from_slice(&frame.width.to_le_bytes());
        out.extend_from_slice(&frame.height.to_le_bytes());
        let mut desc_flags = 0;
        if frame.interlace {
            desc_flags |= 0x40;
        }
        if let Some(table) = &frame.local_table {
            desc_flags |= 0x80 | table_size_bits(table.len() / 3);
        }
        out.push(desc_flags);
        if let Some(table) = &frame.local_table {
            out.extend_from_slice(table);
        }
        let table = frame.local_table.as_deref().or(global);
        let mcs = min_code_bits(table.map_or(8, |t| t.len() / 3));
        out.push(mcs);
        let indices = if frame.interlace {
            interlace_rows(&frame.indices, frame.width, frame.height)
        } else {
            frame.indices.clone()
        };
        let data = compress(&indices, mcs);
        for chunk in data.chunks(255) {
            out.push(chunk.len() as u8);
            out.extend_from_slice(chunk);
        }
        out.push(0);
    }
}

/// Reorder row-major indices into four-pass interlaced stream order
fn interlace_rows(indices: &[u8], width: u16, height: u16) -> Vec<u8> {
    let width = usize::from(width);
    let height = usize::from(height);
    let mut out = Vec::with_capacity(indices.len());
    let passes = [(0, 8), (4, 8), (2, 4), (1, 2)];
    for (start, step) in passes {
        for row in (start..height).step_by(step) {
            out.extend_from_slice(&indices[row * width..(row + 1) * width]);
        }
    }
    out
}
