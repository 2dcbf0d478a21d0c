mod animation;
mod carousel;
mod cli;
mod config;
mod error;
mod files;
mod loader;
mod media;
mod surface;
mod ui;

#[cfg(test)]
mod test_support;

use clap::Parser;
use winit::event_loop::EventLoop;

use crate::carousel::Carousel;
use crate::cli::Cli;
use crate::config::CarouselConfig;
use crate::error::{CarouselError, Result};
use crate::files::read_list;
use crate::ui::text::BitmapFont;
use crate::ui::{App, Outcome};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn run(cli: &Cli) -> Result<Outcome> {
    let config = CarouselConfig::from_cli(cli)?;

    let sources = read_list(&cli.image_list)?;
    let titles = read_list(&cli.title_list)?;
    if titles.len() > sources.len() {
        log::debug!("Ignoring {} extra titles", titles.len() - sources.len());
    }

    let font = BitmapFont::new(config.font_size);
    let carousel = Carousel::initialize(&sources, &titles, config, Box::new(font))?;
    let prefetch = carousel.start_prefetch();

    let event_loop = EventLoop::new().map_err(|e| CarouselError::Display(e.to_string()))?;
    let mut app = App::new(carousel, prefetch);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop stopped: {}", e);
    }

    match app.shutdown() {
        Outcome::Failed(e) => Err(e),
        outcome => Ok(outcome),
    }
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(0);
        }
    };

    match run(&cli) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("switcher: {}", e);
            std::process::exit(0);
        }
    }
}
