/// Quartic ease-in-out: slow start, fast middle, slow end.
pub fn ease_in_out_quart(t: f64) -> f64 {
    if t < 0.5 {
        8.0 * t * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the predecessor.
    Backward,
    /// Toward the successor.
    Forward,
}

/// What to draw for one frame of a transition. Offsets are fractions of the
/// viewport height along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionFrame {
    Step {
        outgoing: f64,
        incoming: f64,
        caption_alpha: u8,
    },
    /// Final frame: incoming item at rest, caption fully opaque.
    Resting,
}

/// One navigation's slide animation between two collection positions.
///
/// Produces `frames` stepping frames followed by a single resting frame,
/// one per call to `next_frame`.
#[derive(Debug, Clone)]
pub struct Transition {
    from: usize,
    to: usize,
    direction: Direction,
    frames: u32,
    step: u32,
}

impl Transition {
    pub fn new(from: usize, to: usize, direction: Direction, frames: u32) -> Self {
        Self {
            from,
            to,
            direction,
            frames: frames.max(1),
            step: 0,
        }
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn is_done(&self) -> bool {
        self.step > self.frames
    }

    /// Linear progress at step `i`: runs 0 -> 1 going backward, 1 -> 0 going forward.
    fn progress(&self, i: u32) -> f64 {
        let fraction = i as f64 / self.frames as f64;
        match self.direction {
            Direction::Backward => fraction,
            Direction::Forward => 1.0 - fraction,
        }
    }

    pub fn next_frame(&mut self) -> Option<TransitionFrame> {
        if self.is_done() {
            return None;
        }
        let i = self.step;
        self.step += 1;

        if i == self.frames {
            return Some(TransitionFrame::Resting);
        }

        let eased = ease_in_out_quart(self.progress(i));
        let (outgoing, incoming) = match self.direction {
            Direction::Backward => (eased, eased - 1.0),
            Direction::Forward => (eased - 1.0, eased),
        };
        let caption_alpha = (i as f64 * 255.0 / self.frames as f64) as u8;

        Some(TransitionFrame::Step {
            outgoing,
            incoming,
            caption_alpha,
        })
    }
}
