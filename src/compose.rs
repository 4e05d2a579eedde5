// compose.rs
//
// Copyright (c) 2026  giframe developers
//
//! Frame compositing: interlacing, transparency and disposal
use crate::block::{ColorTable, DisposalMethod, ImageDesc};
use crate::error::{Error, Result};
use crate::parse::Image;
use crate::private::Frame;
use log::warn;
use pix::rgb::SRgba8;
use pix::Raster;

/// Canvas accumulator threaded from frame to frame.
///
/// The canvas starts fully transparent and accumulates each frame's
/// disposal effects; it never outlives the decode call that owns it.
pub(crate) struct Compositor {
    /// Current canvas state
    canvas: Raster<SRgba8>,
}

/// Iterate target rows of a sub-rectangle in image-data order.
///
/// Interlaced images store rows in four passes (every 8th row from 0,
/// every 8th from 4, every 4th from 2, every 2nd from 1).
fn frame_rows(height: usize, interlaced: bool) -> Box<dyn Iterator<Item = usize>> {
    if interlaced {
        Box::new(
            (0..height)
                .step_by(8)
                .chain((4..height.max(4)).step_by(8))
                .chain((2..height.max(2)).step_by(4))
                .chain((1..height.max(1)).step_by(2)),
        )
    } else {
        Box::new(0..height)
    }
}

impl Compositor {
    /// Create a compositor for the given canvas size
    pub fn new(width: u16, height: u16) -> Self {
        Compositor {
            canvas: Raster::with_clear(width.into(), height.into()),
        }
    }

    /// Composite one image block into a full-canvas frame.
    ///
    /// The painted canvas (or a restored version of it, depending on the
    /// disposal method) becomes the base for the following frame.
    pub fn step(
        &mut self,
        image: &Image,
        global_color_table: Option<&ColorTable>,
        indices: &[u8],
    ) -> Result<Frame> {
        let desc = &image.desc;
        let control = image.control();
        let fallback;
        let palette = match image.local_color_table.as_ref().or(global_color_table)
        {
            Some(table) => table,
            None => {
                // nothing to look colors up in; display something anyway
                warn!("no color table for frame; substituting black");
                fallback = ColorTable::black(256);
                &fallback
            }
        };
        let saved = match control.disposal_method() {
            DisposalMethod::Previous => Some(Raster::with_raster(&self.canvas)),
            _ => None,
        };
        self.paint(desc, palette, control.transparent_color(), indices)?;
        let raster = Raster::with_raster(&self.canvas);
        match control.disposal_method() {
            DisposalMethod::Background => self.clear_rect(desc),
            DisposalMethod::Previous => {
                if let Some(saved) = saved {
                    self.canvas = saved;
                }
            }
            // no disposal specified, or keep: painted result persists
            _ => {}
        }
        Ok(Frame::new(desc, control.delay_time_cs(), raster))
    }

    /// Paint a sub-rectangle of indices onto the canvas.
    ///
    /// Transparent pixels leave the underlying canvas untouched; the
    /// sub-rectangle is clipped to the canvas edges.
    fn paint(
        &mut self,
        desc: &ImageDesc,
        palette: &ColorTable,
        transparent: Option<u8>,
        indices: &[u8],
    ) -> Result<()> {
        let canvas_width = self.canvas.width() as usize;
        let canvas_height = self.canvas.height() as usize;
        let left = usize::from(desc.left());
        let top = usize::from(desc.top());
        let width = usize::from(desc.width());
        if left >= canvas_width || width == 0 {
            return Ok(());
        }
        let copy_width = width.min(canvas_width - left);
        let pixels = self.canvas.as_u8_slice_mut();
        let rows = frame_rows(usize::from(desc.height()), desc.interlaced());
        for (src_row, dst_row) in rows.enumerate() {
            if top + dst_row >= canvas_height {
                continue;
            }
            let src = &indices[src_row * width..src_row * width + copy_width];
            let dst = ((top + dst_row) * canvas_width + left) * 4;
            for (x, &idx) in src.iter().enumerate() {
                if transparent == Some(idx) {
                    continue;
                }
                let [r, g, b] = palette.rgb(idx.into()).ok_or(
                    Error::ColorIndexOutOfBounds {
                        index: idx,
                        entries: palette.len(),
                    },
                )?;
                let p = &mut pixels[dst + x * 4..dst + x * 4 + 4];
                p[0] = r;
                p[1] = g;
                p[2] = b;
                p[3] = 0xFF;
            }
        }
        Ok(())
    }

    /// Clear a sub-rectangle of the canvas to transparency.
    ///
    /// The GIF specification says restore-to-background should use the
    /// background color, but clearing to transparency is the de facto
    /// standard among modern viewers.
    fn clear_rect(&mut self, desc: &ImageDesc) {
        let canvas_width = self.canvas.width() as usize;
        let canvas_height = self.canvas.height() as usize;
        let left = usize::from(desc.left());
        let top = usize::from(desc.top());
        let width = usize::from(desc.width());
        if left >= canvas_width || width == 0 {
            return;
        }
        let copy_width = width.min(canvas_width - left);
        let bottom = canvas_height.min(top + usize::from(desc.height()));
        let pixels = self.canvas.as_u8_slice_mut();
        for row in top..bottom {
            let dst = (row * canvas_width + left) * 4;
            pixels[dst..dst + copy_width * 4].fill(0);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::block::GraphicControl;

    fn collect_rows(height: usize, interlaced: bool) -> Vec<usize> {
        frame_rows(height, interlaced).collect()
    }

    #[test]
    fn interlace_row_order() {
        assert_eq!(collect_rows(4, false), &[0, 1, 2, 3]);
        assert_eq!(collect_rows(8, true), &[0, 4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(
            collect_rows(10, true),
            &[0, 8, 4, 2, 6, 1, 3, 5, 7, 9]
        );
        assert_eq!(collect_rows(3, true), &[0, 2, 1]);
        assert_eq!(collect_rows(1, true), &[0]);
        assert_eq!(collect_rows(0, true), &[] as &[usize]);
    }

    fn control(disposal: u8, transparent: Option<u8>) -> GraphicControl {
        let mut flags = disposal << 2;
        let mut idx = 0;
        if let Some(t) = transparent {
            flags |= 0b0000_0001;
            idx = t;
        }
        GraphicControl::new(flags, 0, idx)
    }

    fn image(
        desc: ImageDesc,
        control: Option<GraphicControl>,
    ) -> Image {
        Image {
            desc,
            local_color_table: None,
            control,
            min_code_bits: 2,
            data: Vec::new(),
        }
    }

    const RED_BLUE: &[u8] = &[0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF];

    #[test]
    fn paint_and_keep() {
        let table = ColorTable::with_colors(RED_BLUE);
        let mut comp = Compositor::new(2, 1);
        let img = image(ImageDesc::new(0, 0, 2, 1, 0), None);
        let frame = comp.step(&img, Some(&table), &[0, 1]).unwrap();
        assert_eq!(
            frame.raster().as_u8_slice(),
            &[0xFF, 0, 0, 0xFF, 0, 0, 0xFF, 0xFF]
        );
    }

    #[test]
    fn restore_to_background() {
        let table = ColorTable::with_colors(RED_BLUE);
        let mut comp = Compositor::new(2, 1);
        let img = image(
            ImageDesc::new(0, 0, 2, 1, 0),
            Some(control(2, None)),
        );
        comp.step(&img, Some(&table), &[0, 1]).unwrap();
        // next frame paints one pixel; the rest was cleared
        let img = image(ImageDesc::new(0, 0, 1, 1, 0), None);
        let frame = comp.step(&img, Some(&table), &[1]).unwrap();
        assert_eq!(
            frame.raster().as_u8_slice(),
            &[0, 0, 0xFF, 0xFF, 0, 0, 0, 0]
        );
    }

    #[test]
    fn restore_to_previous() {
        let table = ColorTable::with_colors(RED_BLUE);
        let mut comp = Compositor::new(2, 1);
        let img = image(ImageDesc::new(0, 0, 2, 1, 0), None);
        comp.step(&img, Some(&table), &[0, 1]).unwrap();
        // paint over everything, then restore
        let img = image(
            ImageDesc::new(0, 0, 2, 1, 0),
            Some(control(3, None)),
        );
        let frame = comp.step(&img, Some(&table), &[1, 1]).unwrap();
        assert_eq!(
            frame.raster().as_u8_slice(),
            &[0, 0, 0xFF, 0xFF, 0, 0, 0xFF, 0xFF]
        );
        // fully transparent frame shows the restored canvas
        let img = image(
            ImageDesc::new(0, 0, 2, 1, 0),
            Some(control(0, Some(0))),
        );
        let frame = comp.step(&img, Some(&table), &[0, 0]).unwrap();
        assert_eq!(
            frame.raster().as_u8_slice(),
            &[0xFF, 0, 0, 0xFF, 0, 0, 0xFF, 0xFF]
        );
    }

    #[test]
    fn transparency_shows_canvas() {
        let table = ColorTable::with_colors(RED_BLUE);
        let mut comp = Compositor::new(2, 1);
        // transparent pixels over a blank canvas stay transparent
        let img = image(
            ImageDesc::new(0, 0, 2, 1, 0),
            Some(control(0, Some(1))),
        );
        let frame = comp.step(&img, Some(&table), &[0, 1]).unwrap();
        assert_eq!(
            frame.raster().as_u8_slice(),
            &[0xFF, 0, 0, 0xFF, 0, 0, 0, 0]
        );
    }

    #[test]
    fn subrect_clipped() {
        let table = ColorTable::with_colors(RED_BLUE);
        let mut comp = Compositor::new(2, 2);
        // 2x2 image placed at (1, 1) paints only one pixel
        let img = image(ImageDesc::new(1, 1, 2, 2, 0), None);
        let frame = comp.step(&img, Some(&table), &[1, 1, 1, 1]).unwrap();
        let data = frame.raster().as_u8_slice();
        assert_eq!(&data[12..16], &[0, 0, 0xFF, 0xFF]);
        assert_eq!(&data[0..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn out_of_table_index_rejected() {
        let table = ColorTable::with_colors(RED_BLUE);
        let mut comp = Compositor::new(1, 1);
        let img = image(ImageDesc::new(0, 0, 1, 1, 0), None);
        match comp.step(&img, Some(&table), &[2]) {
            Err(e) => assert_eq!(
                e,
                Error::ColorIndexOutOfBounds {
                    index: 2,
                    entries: 2,
                }
            ),
            Ok(_) => panic!("composited an out-of-table index"),
        }
    }

    #[test]
    fn missing_table_paints_black() {
        let mut comp = Compositor::new(1, 1);
        let img = image(ImageDesc::new(0, 0, 1, 1, 0), None);
        let frame = comp.step(&img, None, &[3]).unwrap();
        assert_eq!(frame.raster().as_u8_slice(), &[0, 0, 0, 0xFF]);
    }
}
