// ---------------------------------------------------------------------------
// Caption scrolling
// ---------------------------------------------------------------------------

/// Gap appended after the caption before it repeats.
pub const SCROLL_MARGIN: u32 = 40;
/// Idle frames spent at rest before each scroll pass.
pub const PAUSE_FRAMES: u32 = 10;

/// Cycles an over-long caption through pause -> scroll -> wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleScroller {
    active: bool,
    speed: u32,
    offset: u32,
    scrolling_length: u32,
    pause_countdown: u32,
}

impl TitleScroller {
    pub fn new(speed: u32) -> Self {
        Self {
            active: false,
            speed: speed.max(1),
            offset: 0,
            scrolling_length: 0,
            pause_countdown: PAUSE_FRAMES,
        }
    }

    /// Recompute for a newly rendered caption. Scrolling only applies to
    /// single-line captions wider than the viewport's short side.
    pub fn reset(&mut self, text_width: u32, short_side: u32, multi_line: bool) {
        self.active = !multi_line && text_width > short_side;
        self.scrolling_length = if self.active {
            (text_width + SCROLL_MARGIN) / 4 * 4
        } else {
            0
        };
        self.offset = 0;
        self.pause_countdown = PAUSE_FRAMES;
    }

    /// Advance one idle frame.
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        if self.pause_countdown > 0 {
            self.pause_countdown -= 1;
            return;
        }
        self.offset += self.speed;
        if self.offset >= self.scrolling_length {
            self.offset = 0;
            self.pause_countdown = PAUSE_FRAMES;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn scrolling_length(&self) -> u32 {
        self.scrolling_length
    }

    pub fn pause_countdown(&self) -> u32 {
        self.pause_countdown
    }

    /// A trailing copy is needed once less than one viewport of text is left.
    pub fn needs_wrap_copy(&self, short_side: u32) -> bool {
        self.active && self.offset > 0 && self.scrolling_length - self.offset < short_side
    }
}
