use crate::cli::Cli;
use crate::error::{CarouselError, Result};
use crate::surface::Viewport;

pub const DEFAULT_TRANSITION_FRAMES: u32 = 20;
pub const DEFAULT_SCROLL_SPEED: u32 = 4;
pub const DEFAULT_FONT_SIZE: u32 = 28;

/// Options recognised by the carousel engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselConfig {
    pub transition_frames: u32,
    pub swap_navigation: bool,
    pub multi_line_caption: bool,
    pub caption_visible: bool,
    pub scroll_speed: u32,
    pub font_size: u32,
    pub viewport: Viewport,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            transition_frames: DEFAULT_TRANSITION_FRAMES,
            swap_navigation: false,
            multi_line_caption: false,
            caption_visible: true,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            font_size: DEFAULT_FONT_SIZE,
            viewport: Viewport::new(640, 480),
        }
    }
}

fn positive(name: &str, value: i64) -> Result<u32> {
    if value <= 0 || value > u32::MAX as i64 {
        return Err(CarouselError::Configuration(format!(
            "{}: invalid value {}, expects a positive number",
            name, value
        )));
    }
    Ok(value as u32)
}

impl CarouselConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Self {
            transition_frames: positive("--frames", cli.transition_frames)?,
            swap_navigation: cli.swap,
            multi_line_caption: cli.multi_line.is_on(),
            caption_visible: cli.caption.is_on(),
            scroll_speed: positive("--scroll-speed", cli.scroll_speed)?,
            font_size: positive("--font-size", cli.font_size)?,
            viewport: Viewport::new(positive("--width", cli.width)?, positive("--height", cli.height)?),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.transition_frames == 0 {
            return Err(CarouselError::Configuration(
                "transition frame count must be greater than 0".into(),
            ));
        }
        if self.scroll_speed == 0 {
            return Err(CarouselError::Configuration(
                "caption scroll speed must be greater than 0".into(),
            ));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(CarouselError::Configuration("viewport must not be empty".into()));
        }
        if self.font_size == 0 || self.font_size > self.viewport.short_side() {
            return Err(CarouselError::Configuration(format!(
                "font size must be between 1 and {}",
                self.viewport.short_side()
            )));
        }
        Ok(())
    }

    /// Wrap width for captions, `None` for a single line.
    pub fn caption_wrap_width(&self) -> Option<u32> {
        self.multi_line_caption
            .then(|| self.viewport.height.saturating_sub(20).max(1))
    }

    /// Width of the translucent caption strip in single-line mode.
    pub fn overlay_thickness(&self) -> u32 {
        self.font_size + self.font_size / 2
    }
}
