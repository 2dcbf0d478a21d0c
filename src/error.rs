use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarouselError {
    /// An image or title list could not be read.
    #[error("cannot open file: {}", path.display())]
    ListFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A command-line or engine option was out of range.
    #[error("{0}")]
    Configuration(String),

    /// No items to show.
    #[error("cannot load image list")]
    EmptyCollection,

    /// A single image could not be decoded. Never fatal.
    #[error("failed to load {}: {reason}", path.display())]
    ResourceLoad { path: PathBuf, reason: String },

    /// Window or framebuffer creation failed.
    #[error("display error: {0}")]
    Display(String),
}

pub type Result<T> = std::result::Result<T, CarouselError>;
