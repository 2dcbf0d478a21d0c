use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{Key, KeyLocation, NamedKey};
use winit::window::{Window, WindowId};

use crate::carousel::Carousel;
use crate::error::CarouselError;
use crate::loader::PrefetchHandle;
use crate::ui::render::SoftSurface;

pub mod render;
pub mod text;

/// Roughly 30 frames per second.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(30);

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Left,
    Right,
    Confirm,
    Cancel,
    ToggleCaption,
}

pub fn command_for_key(key: &Key, location: KeyLocation) -> Option<Command> {
    match key {
        Key::Named(NamedKey::ArrowLeft) => Some(Command::Left),
        Key::Named(NamedKey::ArrowRight) => Some(Command::Right),
        Key::Named(NamedKey::Space) | Key::Named(NamedKey::Enter) => Some(Command::Confirm),
        Key::Named(NamedKey::Escape) => Some(Command::Cancel),
        Key::Named(NamedKey::Control) if location == KeyLocation::Left => Some(Command::Cancel),
        Key::Character(s) if s.eq_ignore_ascii_case("t") => Some(Command::ToggleCaption),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum Outcome {
    /// 1-based index of the confirmed item.
    Selected(usize),
    Cancelled,
    Failed(CarouselError),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Selected(index) => *index as i32,
            Outcome::Cancelled | Outcome::Failed(_) => 0,
        }
    }
}

/// Apply one queued command. Navigation while a transition is running is
/// dropped by the carousel itself; a confirmation selects the incoming item.
pub fn apply_command(carousel: &mut Carousel, command: Command) -> Option<Outcome> {
    match command {
        Command::Left => {
            carousel.step_left();
        }
        Command::Right => {
            carousel.step_right();
        }
        Command::ToggleCaption => carousel.toggle_caption_visible(),
        Command::Confirm => return Some(Outcome::Selected(carousel.target_index())),
        Command::Cancel => return Some(Outcome::Cancelled),
    }
    None
}

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

pub struct App {
    pub carousel: Carousel,
    pub prefetch: Option<PrefetchHandle>,
    pub window: Option<Arc<Window>>,
    pub context: Option<softbuffer::Context<Arc<Window>>>,
    pub surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    pub pending: VecDeque<Command>,
    pub next_frame: Instant,
    pub outcome: Option<Outcome>,
}

impl App {
    pub fn new(carousel: Carousel, prefetch: PrefetchHandle) -> Self {
        Self {
            carousel,
            prefetch: Some(prefetch),
            window: None,
            context: None,
            surface: None,
            pending: VecDeque::new(),
            next_frame: Instant::now(),
            outcome: None,
        }
    }

    fn finish(&mut self, event_loop: &ActiveEventLoop, outcome: Outcome) {
        log::info!("Finishing with {:?}", outcome);
        self.outcome = Some(outcome);
        event_loop.exit();
    }

    /// Collect the sweep result once the worker is done. A sweep that leaves
    /// nothing displayable is fatal.
    fn poll_prefetch(&mut self) -> Option<Outcome> {
        if !self.prefetch.as_ref().is_some_and(|h| h.is_finished()) {
            return None;
        }
        let report = self.prefetch.take()?.join()?;
        (report.ready == 0).then_some(Outcome::Failed(CarouselError::EmptyCollection))
    }

    /// Observe the prefetch worker before exit. An unfinished sweep is
    /// abandoned; nothing it writes outlives the process.
    pub fn shutdown(&mut self) -> Outcome {
        if let Some(handle) = self.prefetch.take() {
            if handle.is_finished() {
                handle.join();
            } else {
                log::info!("Abandoning background image loading");
            }
        }
        self.outcome.take().unwrap_or(Outcome::Cancelled)
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), CarouselError> {
        let vp = self.carousel.viewport();
        let attrs = Window::default_attributes()
            .with_title("switcher")
            .with_inner_size(PhysicalSize::new(vp.width, vp.height))
            .with_resizable(false);
        let display = |e: &dyn std::fmt::Display| CarouselError::Display(e.to_string());

        let window = Arc::new(event_loop.create_window(attrs).map_err(|e| display(&e))?);
        window.set_cursor_visible(false);
        let context = softbuffer::Context::new(Arc::clone(&window)).map_err(|e| display(&e))?;
        let mut surface = softbuffer::Surface::new(&context, Arc::clone(&window)).map_err(|e| display(&e))?;

        let size = window.inner_size();
        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            surface.resize(w, h).map_err(|e| display(&e))?;
        }

        window.request_redraw();
        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(outcome) = self.poll_prefetch() {
            self.finish(event_loop, outcome);
            return;
        }

        // Input queued since the last frame is handled once per frame.
        while let Some(command) = self.pending.pop_front() {
            if let Some(outcome) = apply_command(&mut self.carousel, command) {
                self.finish(event_loop, outcome);
                return;
            }
        }

        let Some(window) = self.window.as_ref() else {
            return;
        };
        let size = window.inner_size();
        let fb_w = size.width.max(1);
        let fb_h = size.height.max(1);
        let viewport = self.carousel.viewport();

        if let Some(ref mut surface) = self.surface {
            match surface.buffer_mut() {
                Ok(mut buffer) => {
                    let mut target = SoftSurface::new(&mut buffer, fb_w, fb_h, viewport);
                    self.carousel.render_frame(&mut target);
                    if let Err(e) = buffer.present() {
                        log::warn!("present failed: {}", e);
                    }
                }
                Err(e) => log::warn!("framebuffer unavailable: {}", e),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.finish(event_loop, Outcome::Failed(e));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.finish(event_loop, Outcome::Cancelled);
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let (Some(surface), Some(w), Some(h)) =
                    (self.surface.as_mut(), NonZeroU32::new(width), NonZeroU32::new(height))
                {
                    if let Err(e) = surface.resize(w, h) {
                        log::warn!("resize failed: {}", e);
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let Some(command) = command_for_key(&event.logical_key, event.location) {
                        self.pending.push_back(command);
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            self.next_frame = now + FRAME_INTERVAL;
            if let Some(ref window) = self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CarouselConfig;
    use crate::surface::Viewport;
    use crate::test_support::{FixedLayout, RecordingSurface};
    use winit::keyboard::SmolStr;

    fn carousel() -> Carousel {
        let config = CarouselConfig {
            transition_frames: 2,
            viewport: Viewport::new(64, 48),
            ..CarouselConfig::default()
        };
        Carousel::initialize(&["1.png", "2.png", "3.png"], &["a", "b", "c"], config, Box::new(FixedLayout)).unwrap()
    }

    #[test]
    fn key_bindings() {
        let loc = KeyLocation::Standard;
        assert_eq!(command_for_key(&Key::Named(NamedKey::ArrowLeft), loc), Some(Command::Left));
        assert_eq!(command_for_key(&Key::Named(NamedKey::ArrowRight), loc), Some(Command::Right));
        assert_eq!(command_for_key(&Key::Named(NamedKey::Space), loc), Some(Command::Confirm));
        assert_eq!(command_for_key(&Key::Named(NamedKey::Escape), loc), Some(Command::Cancel));
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::Control), KeyLocation::Left),
            Some(Command::Cancel)
        );
        assert_eq!(command_for_key(&Key::Named(NamedKey::Control), KeyLocation::Right), None);
        assert_eq!(
            command_for_key(&Key::Character(SmolStr::new("T")), loc),
            Some(Command::ToggleCaption)
        );
        assert_eq!(command_for_key(&Key::Character(SmolStr::new("x")), loc), None);
    }

    #[test]
    fn confirm_returns_current_index_and_cancel_returns_zero() {
        let mut c = carousel();
        let selected = apply_command(&mut c, Command::Confirm).unwrap();
        assert_eq!(selected.exit_code(), 3);
        assert_eq!(apply_command(&mut c, Command::Cancel).unwrap().exit_code(), 0);
        assert_eq!(Outcome::Failed(CarouselError::EmptyCollection).exit_code(), 0);
    }

    #[test]
    fn queued_navigation_during_transition_is_dropped() {
        let mut c = carousel();
        let mut surface = RecordingSurface::new(64, 48);
        for cmd in [Command::Right, Command::Right, Command::Right] {
            assert!(apply_command(&mut c, cmd).is_none());
        }
        for _ in 0..3 {
            c.render_frame(&mut surface);
        }
        assert!(!c.is_transitioning());
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn confirm_during_transition_selects_incoming_item() {
        let config = CarouselConfig {
            transition_frames: 20,
            viewport: Viewport::new(64, 48),
            ..CarouselConfig::default()
        };
        let mut c =
            Carousel::initialize(&["1.png", "2.png", "3.png"], &["a", "b", "c"], config, Box::new(FixedLayout)).unwrap();
        let mut surface = RecordingSurface::new(64, 48);

        assert!(apply_command(&mut c, Command::Right).is_none());
        for _ in 0..19 {
            c.render_frame(&mut surface);
        }
        assert!(c.is_transitioning());
        assert_eq!(c.current_index(), 3);

        let outcome = apply_command(&mut c, Command::Confirm).unwrap();
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn toggle_caption_command() {
        let mut c = carousel();
        assert!(c.caption_visible());
        apply_command(&mut c, Command::ToggleCaption);
        assert!(!c.caption_visible());
    }
}
