use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const HELP_KEYS: &str = "\
Key Bindings:
  Left / Right      : Previous / next image
  Space / Enter     : Select current image (exit code = its 1-based index)
  Esc / Left Ctrl   : Cancel (exit code 0)
  t                 : Toggle title overlay
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Parser, Debug)]
#[command(name = "switcher", about = "Pick an image from a list with a sliding carousel", after_help = HELP_KEYS)]
pub struct Cli {
    /// Text file listing image paths, one per line
    pub image_list: PathBuf,

    /// Text file listing titles, one per line, in the same order as the images
    pub title_list: PathBuf,

    /// Frames used for each slide animation; larger is slower
    #[arg(short = 's', long = "frames", default_value = "20")]
    pub transition_frames: i64,

    /// Display the title on multiple lines
    #[arg(short = 'm', long = "multi-line", value_enum, default_value = "off")]
    pub multi_line: Toggle,

    /// Show the title overlay at startup
    #[arg(short = 'c', long = "caption", value_enum, default_value = "on")]
    pub caption: Toggle,

    /// Swap the meaning of the left and right keys
    #[arg(long)]
    pub swap: bool,

    /// Pixels per frame for scrolling over-long titles
    #[arg(long, default_value = "4")]
    pub scroll_speed: i64,

    /// Display width in pixels
    #[arg(long, default_value = "640")]
    pub width: i64,

    /// Display height in pixels
    #[arg(long, default_value = "480")]
    pub height: i64,

    /// Title font size in pixels
    #[arg(long, default_value = "28")]
    pub font_size: i64,
}
