// Shared fixtures for unit tests.

use std::path::Path;

use crate::media::item::Presentation;
use crate::surface::{Caption, Rect, Rgba, Rotation, Surface, TextLayout, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Image { dest: Rect, rotation: Rotation },
    Fill { rect: Rect, color: Rgba },
    Caption { dest: Rect, rotation: Rotation, alpha: u8 },
}

pub struct RecordingSurface {
    pub viewport: Viewport,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ops: Vec::new(),
        }
    }

    pub fn images(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { dest, .. } => Some(*dest),
                _ => None,
            })
            .collect()
    }

    pub fn captions(&self) -> Vec<(Rect, u8)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Caption { dest, alpha, .. } => Some((*dest, *alpha)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_image(&mut self, _image: &Presentation, dest: Rect, rotation: Rotation) {
        self.ops.push(DrawOp::Image { dest, rotation });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn draw_caption(&mut self, _caption: &Caption, dest: Rect, rotation: Rotation, alpha: u8) {
        self.ops.push(DrawOp::Caption { dest, rotation, alpha });
    }
}

/// 10 pixels per character, 20 pixels per line, no wrapping.
pub struct FixedLayout;

impl TextLayout for FixedLayout {
    fn layout(&self, text: &str, _wrap_width: Option<u32>) -> Caption {
        let width = text.chars().count() as u32 * 10;
        Caption {
            width,
            height: 20,
            coverage: vec![0; (width * 20) as usize],
            color: [255, 255, 255, 255],
        }
    }
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]))
        .save(path)
        .unwrap();
}
