use crate::media::item::Presentation;
use crate::surface::{Caption, Rect, Rgba, Rotation, Surface, Viewport};

pub const BG_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Unpack softbuffer u32 into (r, g, b).
fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Blend `(r, g, b)` over `dst` with coverage `a` (0..=255).
fn blend(dst: u32, r: u8, g: u8, b: u8, a: u32) -> u32 {
    if a >= 255 {
        return rgb(r, g, b);
    }
    let inv = 255 - a;
    let (dr, dg, db) = unpack_rgb(dst);
    rgb(
        ((r as u32 * a + dr as u32 * inv) / 255) as u8,
        ((g as u32 * a + dg as u32 * inv) / 255) as u8,
        ((b as u32 * a + db as u32 * inv) / 255) as u8,
    )
}

/// Fill a rectangle with a color (with alpha blending).
pub fn fill_rect(buf: &mut [u32], stride: u32, buf_h: u32, rect: Rect, color: Rgba) {
    let a = color[3] as u32;
    if a == 0 {
        return;
    }
    for row in 0..rect.h {
        let y = rect.y + row as i32;
        if y < 0 || y as u32 >= buf_h {
            continue;
        }
        for col in 0..rect.w {
            let x = rect.x + col as i32;
            if x < 0 || x as u32 >= stride {
                continue;
            }
            let off = (y as u32 * stride + x as u32) as usize;
            buf[off] = blend(buf[off], color[0], color[1], color[2], a);
        }
    }
}

/// Where a `dest` rectangle lands once rotated about its center:
/// (x0, y0, width, height).
pub fn rotated_footprint(dest: Rect, rotation: Rotation) -> (i32, i32, u32, u32) {
    if rotation.is_quarter_turn() {
        let (w, h) = (dest.w as i32, dest.h as i32);
        (dest.x + (w - h) / 2, dest.y + (h - w) / 2, dest.h, dest.w)
    } else {
        (dest.x, dest.y, dest.w, dest.h)
    }
}

/// Map a pixel of the rotated footprint back to source coordinates.
/// Rotations are clockwise.
fn source_coords(vx: u32, vy: u32, src_w: u32, src_h: u32, rotation: Rotation) -> (u32, u32) {
    match rotation {
        Rotation::Deg0 => (vx, vy),
        Rotation::Deg90 => (vy, src_h - 1 - vx),
        Rotation::Deg180 => (src_w - 1 - vx, src_h - 1 - vy),
        Rotation::Deg270 => (src_w - 1 - vy, vx),
    }
}

/// Walk every visible framebuffer pixel covered by `dest` after rotation,
/// handing the caller the framebuffer offset and the source index.
fn for_each_rotated(
    stride: u32,
    buf_h: u32,
    src_w: u32,
    src_h: u32,
    dest: Rect,
    rotation: Rotation,
    mut f: impl FnMut(usize, usize),
) {
    if src_w == 0 || src_h == 0 {
        return;
    }
    let (x0, y0, draw_w, draw_h) = rotated_footprint(dest, rotation);

    let dx_start = x0.max(0);
    let dy_start = y0.max(0);
    let dx_end = (x0 + draw_w as i32).min(stride as i32);
    let dy_end = (y0 + draw_h as i32).min(buf_h as i32);

    for dy in dy_start..dy_end {
        let vy = (dy - y0) as u32;
        for dx in dx_start..dx_end {
            let vx = (dx - x0) as u32;
            let (sx, sy) = source_coords(vx, vy, src_w, src_h, rotation);
            if sx >= src_w || sy >= src_h {
                continue;
            }
            let si = sy as usize * src_w as usize + sx as usize;
            let di = dy as usize * stride as usize + dx as usize;
            f(di, si);
        }
    }
}

/// Draw 0xAARRGGBB pixels into the framebuffer, rotated about `dest`'s center.
pub fn blit_rotated(dst: &mut [u32], dst_w: u32, dst_h: u32, src: &Presentation, dest: Rect, rotation: Rotation) {
    for_each_rotated(dst_w, dst_h, src.width, src.height, dest, rotation, |di, si| {
        let px = src.pixels[si];
        let sa = px >> 24;
        if sa > 0 {
            let (r, g, b) = unpack_rgb(px);
            dst[di] = blend(dst[di], r, g, b, sa);
        }
    });
}

/// Draw a coverage mask in the caption's color, scaled by `alpha`.
pub fn blit_caption(dst: &mut [u32], dst_w: u32, dst_h: u32, caption: &Caption, dest: Rect, rotation: Rotation, alpha: u8) {
    if alpha == 0 {
        return;
    }
    let [r, g, b, a] = caption.color;
    let strength = a as u32 * alpha as u32 / 255;
    for_each_rotated(dst_w, dst_h, caption.width, caption.height, dest, rotation, |di, si| {
        let coverage = caption.coverage[si] as u32 * strength / 255;
        if coverage > 0 {
            dst[di] = blend(dst[di], r, g, b, coverage);
        }
    });
}

// ---------------------------------------------------------------------------
// Framebuffer-backed Display Surface
// ---------------------------------------------------------------------------

pub struct SoftSurface<'a> {
    frame: &'a mut [u32],
    fb_w: u32,
    fb_h: u32,
    viewport: Viewport,
}

impl<'a> SoftSurface<'a> {
    /// `frame` is `fb_w * fb_h` pixels; the engine draws in viewport
    /// coordinates anchored at the top-left corner.
    pub fn new(frame: &'a mut [u32], fb_w: u32, fb_h: u32, viewport: Viewport) -> Self {
        Self {
            frame,
            fb_w,
            fb_h,
            viewport,
        }
    }
}

impl Surface for SoftSurface<'_> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.frame.fill(rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]));
    }

    fn draw_image(&mut self, image: &Presentation, dest: Rect, rotation: Rotation) {
        blit_rotated(self.frame, self.fb_w, self.fb_h, image, dest, rotation);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        fill_rect(self.frame, self.fb_w, self.fb_h, rect, color);
    }

    fn draw_caption(&mut self, caption: &Caption, dest: Rect, rotation: Rotation, alpha: u8) {
        blit_caption(self.frame, self.fb_w, self.fb_h, caption, dest, rotation, alpha);
    }
}
