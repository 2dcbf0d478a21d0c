use std::path::Path;

use crate::animation::scroller::{SCROLL_MARGIN, TitleScroller};
use crate::animation::transition::{Direction, Transition, TransitionFrame};
use crate::config::CarouselConfig;
use crate::error::Result;
use crate::loader::{PrefetchHandle, spawn_prefetcher};
use crate::media::{MediaCollection, MediaItem};
use crate::surface::{Caption, DISPLAY_ROTATION, Rect, Rgba, Surface, TextLayout, Viewport};

const OVERLAY_COLOR: Rgba = [0, 0, 0, 128];

// ---------------------------------------------------------------------------
// Carousel engine
// ---------------------------------------------------------------------------

/// Owns everything the render loop needs: the collection and its cursor,
/// the rendered caption, the scroller and any in-flight transition.
///
/// Navigation is rejected while a transition is running; input that arrives
/// during the animation is never queued against a stale cursor.
pub struct Carousel {
    config: CarouselConfig,
    collection: MediaCollection,
    text: Box<dyn TextLayout>,
    caption: Caption,
    scroller: TitleScroller,
    transition: Option<Transition>,
    caption_visible: bool,
}

impl Carousel {
    /// Build the collection, apply titles in order and load the initially
    /// shown item (the last one) synchronously.
    pub fn initialize<P, S>(
        sources: &[P],
        descriptions: &[S],
        config: CarouselConfig,
        text: Box<dyn TextLayout>,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        config.validate()?;

        let mut items: Vec<MediaItem> = sources
            .iter()
            .enumerate()
            .map(|(i, p)| MediaItem::new(i + 1, p.as_ref()))
            .collect();
        for (item, description) in items.iter_mut().zip(descriptions) {
            item.set_description(description.as_ref());
        }

        let mut collection = MediaCollection::from_items(items)?;
        collection.set_current(collection.len() - 1);
        collection.current().request_load(config.viewport);
        log::info!(
            "Loaded {} items, starting at #{}",
            collection.len(),
            collection.current().index()
        );

        let mut carousel = Self {
            scroller: TitleScroller::new(config.scroll_speed),
            caption_visible: config.caption_visible,
            caption: Caption {
                width: 0,
                height: 0,
                coverage: Vec::new(),
                color: [0; 4],
            },
            config,
            collection,
            text,
            transition: None,
        };
        carousel.update_caption(carousel.collection.current_position());
        Ok(carousel)
    }

    /// Start loading the remaining items in the background, nearest first.
    pub fn start_prefetch(&self) -> PrefetchHandle {
        spawn_prefetcher(
            self.collection.snapshot(),
            self.collection.current_position(),
            self.config.viewport,
        )
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn collection(&self) -> &MediaCollection {
        &self.collection
    }

    /// 1-based index of the current item.
    pub fn current_index(&self) -> usize {
        self.collection.current().index()
    }

    /// 1-based index of the item that is shown once any running transition
    /// settles. This is what a confirmation selects.
    pub fn target_index(&self) -> usize {
        let pos = self
            .transition
            .as_ref()
            .map_or(self.collection.current_position(), |t| t.to());
        self.collection
            .get(pos)
            .map_or_else(|| self.current_index(), |item| item.index())
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn caption_visible(&self) -> bool {
        self.caption_visible
    }

    pub fn step_left(&mut self) -> bool {
        let direction = if self.config.swap_navigation {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.navigate(direction)
    }

    pub fn step_right(&mut self) -> bool {
        let direction = if self.config.swap_navigation {
            Direction::Backward
        } else {
            Direction::Forward
        };
        self.navigate(direction)
    }

    pub fn toggle_caption_visible(&mut self) {
        self.caption_visible = !self.caption_visible;
    }

    fn navigate(&mut self, direction: Direction) -> bool {
        if self.transition.is_some() {
            log::debug!("[nav] ignored {:?}, transition in progress", direction);
            return false;
        }
        let from = self.collection.current_position();
        let to = match direction {
            Direction::Backward => self.collection.predecessor_of(from),
            Direction::Forward => self.collection.successor_of(from),
        };
        log::debug!("[nav] {:?} {} -> {}", direction, from, to);

        self.update_caption(to);
        self.transition = Some(Transition::new(from, to, direction, self.config.transition_frames));
        true
    }

    fn update_caption(&mut self, pos: usize) {
        let Some(item) = self.collection.get(pos) else {
            return;
        };
        self.caption = self.text.layout(item.description(), self.config.caption_wrap_width());
        self.scroller.reset(
            self.caption.width,
            self.config.viewport.short_side(),
            self.config.multi_line_caption,
        );
    }

    /// Draw one frame. Advances the in-flight transition if there is one,
    /// otherwise the caption scroller.
    pub fn render_frame(&mut self, surface: &mut dyn Surface) {
        if let Some(mut transition) = self.transition.take() {
            surface.clear();
            match transition.next_frame() {
                Some(TransitionFrame::Step {
                    outgoing,
                    incoming,
                    caption_alpha,
                }) => {
                    self.draw_item(surface, transition.from(), outgoing);
                    self.draw_item(surface, transition.to(), incoming);
                    self.draw_caption(surface, caption_alpha);
                }
                Some(TransitionFrame::Resting) | None => {
                    self.draw_item(surface, transition.to(), 0.0);
                    self.draw_caption(surface, 255);
                }
            }

            if transition.is_done() {
                self.collection.set_current(transition.to());
            } else {
                self.transition = Some(transition);
            }
            return;
        }

        self.scroller.tick();
        surface.clear();
        self.draw_item(surface, self.collection.current_position(), 0.0);
        self.draw_caption(surface, 255);
    }

    fn draw_item(&self, surface: &mut dyn Surface, pos: usize, offset: f64) {
        if let Some(item) = self.collection.get(pos) {
            item.render_at_fraction(surface, 0.0, offset);
        }
    }

    fn backdrop_rect(&self) -> Rect {
        let vp = self.config.viewport;
        let thickness = if self.config.multi_line_caption {
            self.caption.height
        } else {
            self.config.overlay_thickness()
        };
        Rect::new(vp.width as i32 - thickness as i32, 0, thickness, vp.height)
    }

    /// Pre-rotation rectangle of the caption at rest. The text reads bottom to
    /// top along the right edge; a scrolling caption starts near the bottom.
    pub fn caption_rest_rect(&self) -> Rect {
        let vp = self.config.viewport;
        let (w, h) = (self.caption.width as i32, self.caption.height as i32);
        let x = (vp.width as i32 - w) + (w - h) / 2;
        let y = if self.scroller.is_active() {
            vp.height as i32 - (SCROLL_MARGIN / 2) as i32 - (w + h) / 2
        } else {
            (vp.height as i32 - h) / 2
        };
        Rect::new(x, y, self.caption.width, self.caption.height)
    }

    fn draw_caption(&self, surface: &mut dyn Surface, alpha: u8) {
        if !self.caption_visible {
            return;
        }
        surface.fill_rect(self.backdrop_rect(), OVERLAY_COLOR);

        let mut dest = self.caption_rest_rect();
        dest.y += self.scroller.offset() as i32;
        surface.draw_caption(&self.caption, dest, DISPLAY_ROTATION, alpha);

        if self.scroller.needs_wrap_copy(self.config.viewport.short_side()) {
            dest.y -= self.scroller.scrolling_length() as i32;
            surface.draw_caption(&self.caption, dest, DISPLAY_ROTATION, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::scroller::PAUSE_FRAMES;
    use crate::error::CarouselError;
    use crate::media::LoadState;
    use crate::test_support::{DrawOp, FixedLayout, RecordingSurface, write_png};
    use std::path::PathBuf;

    const VP: Viewport = Viewport {
        width: 64,
        height: 48,
    };

    fn config(frames: u32) -> CarouselConfig {
        CarouselConfig {
            transition_frames: frames,
            viewport: VP,
            font_size: 14,
            ..CarouselConfig::default()
        }
    }

    // Fitted into 48 wide by 64 tall: 48x24, 48x48 and 32x64.
    fn fixtures(dir: &Path) -> Vec<PathBuf> {
        [(20, 10), (10, 10), (10, 20)]
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let p = dir.join(format!("img{}.png", i + 1));
                write_png(&p, w, h);
                p
            })
            .collect()
    }

    fn carousel(dir: &Path, titles: &[&str], config: CarouselConfig) -> Carousel {
        Carousel::initialize(&fixtures(dir), titles, config, Box::new(FixedLayout)).unwrap()
    }

    #[test]
    fn empty_input_is_an_error() {
        let sources: [&str; 0] = [];
        let err = Carousel::initialize(&sources, &sources, config(4), Box::new(FixedLayout)).err().unwrap();
        assert!(matches!(err, CarouselError::EmptyCollection));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let err = Carousel::initialize(&["a.png"], &["a"], config(0), Box::new(FixedLayout)).err().unwrap();
        assert!(matches!(err, CarouselError::Configuration(_)));
    }

    #[test]
    fn starts_on_last_item_loaded_synchronously() {
        let dir = tempfile::tempdir().unwrap();
        let c = carousel(dir.path(), &["First", "Second"], config(4));

        assert_eq!(c.current_index(), 3);
        assert_eq!(c.collection().current().state(), LoadState::Ready);
        assert_eq!(c.collection().get(0).unwrap().state(), LoadState::Unloaded);

        let titles: Vec<&str> = c.collection().iter().map(|i| i.description()).collect();
        assert_eq!(titles, vec!["First", "Second", "img3"]);
    }

    #[test]
    fn extra_titles_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let c = carousel(dir.path(), &["a", "b", "c", "d", "e"], config(4));
        assert_eq!(c.collection().len(), 3);
        assert_eq!(c.collection().current().description(), "c");
    }

    #[test]
    fn unreadable_items_do_not_stop_startup() {
        let mut c = Carousel::initialize(&["/missing/a.png"], &["A"], config(4), Box::new(FixedLayout)).unwrap();
        assert_eq!(c.collection().current().state(), LoadState::Failed);

        let report = c.start_prefetch().join().unwrap();
        assert_eq!((report.ready, report.failed), (0, 1));
        let mut surface = RecordingSurface::new(64, 48);
        c.render_frame(&mut surface);
        assert!(surface.images().is_empty());
        assert_eq!(surface.captions().len(), 1);
    }

    #[test]
    fn idle_frame_draws_current_item_and_caption() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = carousel(dir.path(), &["a", "b", "Link"], config(4));
        let mut surface = RecordingSurface::new(64, 48);
        c.render_frame(&mut surface);

        assert_eq!(surface.ops[0], DrawOp::Clear);
        // 32x64 image centered in 64x48
        assert_eq!(surface.images(), vec![Rect::new(15, -8, 32, 64)]);
        assert_eq!(
            surface.ops[2],
            DrawOp::Fill {
                rect: Rect::new(64 - 21, 0, 21, 48),
                color: OVERLAY_COLOR,
            }
        );
        // "Link" is 40x20: x = 24 + 10, y = 14
        assert_eq!(surface.captions(), vec![(Rect::new(34, 14, 40, 20), 255)]);
    }

    #[test]
    fn step_right_animates_then_moves_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = carousel(dir.path(), &[], config(4));
        c.start_prefetch().join().unwrap();
        let mut surface = RecordingSurface::new(64, 48);

        assert!(c.step_right());
        assert!(c.is_transitioning());
        assert!(!c.step_right());
        assert!(!c.step_left());

        // First frame: outgoing (32x64) in place, incoming (48x24) one viewport down.
        c.render_frame(&mut surface);
        assert_eq!(
            surface.images(),
            vec![Rect::new(15, -8, 32, 64), Rect::new(7, 12 + 48, 48, 24)]
        );
        assert_eq!(surface.captions()[0].1, 0);
        assert_eq!(c.current_index(), 3);

        let mut alphas = Vec::new();
        for _ in 1..4 {
            surface.ops.clear();
            c.render_frame(&mut surface);
            alphas.push(surface.captions()[0].1);
        }
        assert_eq!(alphas, vec![63, 127, 191]);
        assert!(c.is_transitioning());
        assert_eq!(c.current_index(), 3);

        // Resting frame: only the incoming item, at offset zero, caption opaque.
        surface.ops.clear();
        c.render_frame(&mut surface);
        assert_eq!(surface.images(), vec![Rect::new(7, 12, 48, 24)]);
        assert_eq!(surface.captions()[0].1, 255);
        assert!(!c.is_transitioning());
        assert_eq!(c.current_index(), 1);
        assert!(c.step_left());
    }

    #[test]
    fn step_left_goes_to_predecessor() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = carousel(dir.path(), &[], config(2));
        let mut surface = RecordingSurface::new(64, 48);
        assert!(c.step_left());
        for _ in 0..3 {
            c.render_frame(&mut surface);
        }
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn swap_reverses_directions() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CarouselConfig {
            swap_navigation: true,
            ..config(1)
        };
        let mut c = carousel(dir.path(), &[], cfg);
        let mut surface = RecordingSurface::new(64, 48);
        c.step_left();
        c.render_frame(&mut surface);
        c.render_frame(&mut surface);
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn right_then_left_returns_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = carousel(dir.path(), &[], config(1));
        let mut surface = RecordingSurface::new(64, 48);
        for n in 1..5 {
            for _ in 0..n {
                assert!(c.step_right());
                c.render_frame(&mut surface);
                c.render_frame(&mut surface);
            }
            for _ in 0..n {
                assert!(c.step_left());
                c.render_frame(&mut surface);
                c.render_frame(&mut surface);
            }
            assert_eq!(c.current_index(), 3);
        }
    }

    #[test]
    fn hidden_caption_draws_no_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = carousel(dir.path(), &[], config(4));
        c.toggle_caption_visible();
        assert!(!c.caption_visible());
        let mut surface = RecordingSurface::new(64, 48);
        c.render_frame(&mut surface);
        assert!(surface.captions().is_empty());
        assert!(!surface.ops.iter().any(|op| matches!(op, DrawOp::Fill { .. })));
    }

    #[test]
    fn long_caption_scrolls_when_idle() {
        let dir = tempfile::tempdir().unwrap();
        // 100 px wide, short side is 48
        let mut c = carousel(dir.path(), &["a", "b", "0123456789"], config(4));
        let rest = c.caption_rest_rect();
        assert_eq!(rest.y, 48 - 20 - 60);

        let mut surface = RecordingSurface::new(64, 48);
        for _ in 0..PAUSE_FRAMES {
            c.render_frame(&mut surface);
        }
        surface.ops.clear();
        c.render_frame(&mut surface);
        assert_eq!(surface.captions(), vec![(Rect::new(rest.x, rest.y + 4, 100, 20), 255)]);
    }

    #[test]
    fn scrolling_caption_wraps_with_a_second_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = carousel(dir.path(), &["a", "b", "0123456789"], config(4));
        let rest = c.caption_rest_rect();
        let mut surface = RecordingSurface::new(64, 48);
        // length 140; wrap copy appears once fewer than 48 px remain (offset > 92)
        for _ in 0..PAUSE_FRAMES + 24 {
            c.render_frame(&mut surface);
        }
        surface.ops.clear();
        c.render_frame(&mut surface);
        let captions = surface.captions();
        assert_eq!(captions.len(), 2);
        assert_eq!(captions[0].0.y, rest.y + 100);
        assert_eq!(captions[1].0.y, rest.y + 100 - 140);
    }

    #[test]
    fn caption_is_not_scrolled_during_transition() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = carousel(dir.path(), &["0123456789abcdef", "b", "c"], config(30));
        let mut surface = RecordingSurface::new(64, 48);
        c.step_right();
        for _ in 0..20 {
            surface.ops.clear();
            c.render_frame(&mut surface);
            assert_eq!(surface.captions()[0].0, c.caption_rest_rect());
        }
    }
}
