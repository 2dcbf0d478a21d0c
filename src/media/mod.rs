pub mod collection;
pub mod item;

pub use collection::MediaCollection;
pub use item::{LoadState, MediaItem};
