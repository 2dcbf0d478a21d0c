// ---------------------------------------------------------------------------
// Display Surface collaborator
//
// The engine never touches pixels directly; everything it draws goes through
// these traits so it can run against a real framebuffer or a test recorder.
// ---------------------------------------------------------------------------

use crate::media::item::Presentation;

/// Fixed size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn short_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// Destination rectangle, before rotation is applied around its center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Clockwise rotation applied around the destination rectangle's center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn is_quarter_turn(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// The panel is mounted on its side; every image and caption is drawn with this.
pub const DISPLAY_ROTATION: Rotation = Rotation::Deg270;

/// Straight (non-premultiplied) RGBA color.
pub type Rgba = [u8; 4];

/// A rendered text bitmap: one coverage byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
    pub color: Rgba,
}

pub trait Surface {
    fn viewport(&self) -> Viewport;

    fn clear(&mut self);

    fn draw_image(&mut self, image: &Presentation, dest: Rect, rotation: Rotation);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    fn draw_caption(&mut self, caption: &Caption, dest: Rect, rotation: Rotation, alpha: u8);
}

pub trait TextLayout {
    /// Render `text` as a single line, or wrapped at `wrap_width` pixels.
    fn layout(&self, text: &str, wrap_width: Option<u32>) -> Caption;
}
