use image::GenericImageView;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{CarouselError, Result};
use crate::files::short_file_name;
use crate::surface::{DISPLAY_ROTATION, Rect, Surface, Viewport};

// ---------------------------------------------------------------------------
// Decoded image data (CPU side, fitted to the viewport)
// ---------------------------------------------------------------------------

pub struct FittedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Framebuffer-ready pixels, packed as 0xAARRGGBB.
pub struct Presentation {
    pub pixels: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

impl Presentation {
    fn from_fitted(img: &FittedImage) -> Self {
        let pixels = img
            .rgba_bytes
            .chunks_exact(4)
            .map(|p| (p[3] as u32) << 24 | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32)
            .collect();
        Self {
            pixels,
            width: img.width,
            height: img.height,
        }
    }
}

/// Largest size with the natural aspect ratio that fits inside `fit_w` x `fit_h`.
/// Ties resolve to width-constrained.
pub fn fit_dimensions(natural_w: u32, natural_h: u32, fit_w: u32, fit_h: u32) -> (u32, u32) {
    let aspect_ratio = natural_w as f64 / natural_h as f64;
    let (w, h) = if fit_w as u64 * natural_h as u64 <= fit_h as u64 * natural_w as u64 {
        (fit_w, (fit_w as f64 / aspect_ratio) as u32)
    } else {
        ((fit_h as f64 * aspect_ratio) as u32, fit_h)
    };
    (w.max(1), h.max(1))
}

/// Decode `path` and scale it to fit within `fit_w` x `fit_h`.
pub fn decode_and_fit(path: &Path, fit_w: u32, fit_h: u32) -> Result<FittedImage> {
    let img = image::open(path).map_err(|e| CarouselError::ResourceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let (natural_w, natural_h) = img.dimensions();
    if natural_w == 0 || natural_h == 0 {
        return Err(CarouselError::ResourceLoad {
            path: path.to_path_buf(),
            reason: "image has no pixels".to_string(),
        });
    }

    let (target_w, target_h) = fit_dimensions(natural_w, natural_h, fit_w, fit_h);
    let fitted = img.resize_exact(target_w, target_h, FilterType::Triangle);
    let rgba = fitted.to_rgba8();

    Ok(FittedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba_bytes: rgba.into_raw(),
    })
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LoadState {
    Unloaded = 0,
    Loading = 1,
    Ready = 2,
    Failed = 3,
}

impl LoadState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => LoadState::Unloaded,
            1 => LoadState::Loading,
            2 => LoadState::Ready,
            _ => LoadState::Failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Media item
// ---------------------------------------------------------------------------

/// One image of the carousel.
///
/// Shared between the render thread and the prefetch worker. The worker is
/// the only writer: it claims the item with a compare-exchange on `state`,
/// publishes the decoded image through `decoded`, and only then stores the
/// final state with release ordering. A reader that observes `Ready` is
/// therefore guaranteed to see the image.
pub struct MediaItem {
    index: usize,
    source: PathBuf,
    description: String,
    state: AtomicU8,
    decoded: OnceLock<FittedImage>,
    presentation: OnceLock<Presentation>,
}

impl MediaItem {
    pub fn new(index: usize, source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let description = short_file_name(&source);
        Self {
            index,
            source,
            description,
            state: AtomicU8::new(LoadState::Unloaded as u8),
            decoded: OnceLock::new(),
            presentation: OnceLock::new(),
        }
    }

    /// 1-based position in the input list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, text: impl Into<String>) {
        self.description = text.into();
    }

    pub fn state(&self) -> LoadState {
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.state() == LoadState::Ready
    }

    pub fn decoded(&self) -> Option<&FittedImage> {
        if self.is_ready() { self.decoded.get() } else { None }
    }

    /// Decode and fit the image to the viewport. The image is laid out on its
    /// side, so the viewport height bounds the image width.
    pub fn request_load(&self, viewport: Viewport) {
        self.request_load_with(viewport, decode_and_fit);
    }

    pub fn request_load_with<F>(&self, viewport: Viewport, decode: F)
    where
        F: FnOnce(&Path, u32, u32) -> Result<FittedImage>,
    {
        if self
            .state
            .compare_exchange(
                LoadState::Unloaded as u8,
                LoadState::Loading as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }

        match decode(self.source.as_path(), viewport.height, viewport.width) {
            Ok(img) => {
                log::debug!(
                    "[load] #{} {} -> {}x{}",
                    self.index,
                    self.source.display(),
                    img.width,
                    img.height
                );
                // We won the claim above, so nobody else can have set this.
                let _ = self.decoded.set(img);
                self.state.store(LoadState::Ready as u8, Ordering::Release);
            }
            Err(e) => {
                log::warn!("{}", e);
                self.state.store(LoadState::Failed as u8, Ordering::Release);
            }
        }
    }

    /// Build the framebuffer-ready form on first use. `None` until `Ready`.
    pub fn ensure_presentation(&self) -> Option<&Presentation> {
        let decoded = self.decoded()?;
        Some(self.presentation.get_or_init(|| Presentation::from_fitted(decoded)))
    }

    /// Draw centered on the viewport, shifted by the given pixel offsets.
    pub fn render_at(&self, surface: &mut dyn Surface, x: i32, y: i32) {
        let Some(presentation) = self.ensure_presentation() else {
            return;
        };
        let vp = surface.viewport();
        let dest = Rect::new(
            (vp.width as i32 - presentation.width as i32) / 2 - 1 + x,
            (vp.height as i32 - presentation.height as i32) / 2 + y,
            presentation.width,
            presentation.height,
        );
        surface.draw_image(presentation, dest, DISPLAY_ROTATION);
    }

    /// Offsets are fractions of the viewport size, roughly in [-1, 1].
    pub fn render_at_fraction(&self, surface: &mut dyn Surface, frac_x: f64, frac_y: f64) {
        if !self.is_ready() {
            return;
        }
        let vp = surface.viewport();
        let x = (frac_x * vp.width as f64) as i32;
        let y = (frac_y * vp.height as f64) as i32;
        self.render_at(surface, x, y);
    }
}
