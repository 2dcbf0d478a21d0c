use std::sync::Arc;

use crate::error::{CarouselError, Result};
use crate::media::item::MediaItem;

/// Ordered ring of media items with a single "current" cursor.
///
/// Items live in a contiguous vector; neighbors are computed with modular
/// arithmetic, so the last item's successor is the first and vice versa.
pub struct MediaCollection {
    items: Vec<Arc<MediaItem>>,
    cursor: usize,
}

impl MediaCollection {
    /// Fails with `EmptyCollection` when `items` yields nothing. The cursor
    /// starts on the first item.
    pub fn from_items(items: impl IntoIterator<Item = MediaItem>) -> Result<Self> {
        let items: Vec<_> = items.into_iter().map(Arc::new).collect();
        if items.is_empty() {
            return Err(CarouselError::EmptyCollection);
        }
        Ok(Self { items, cursor: 0 })
    }

    /// Add to the end. Only meaningful before the prefetch sweep is started,
    /// since the sweep works on a snapshot of the items.
    pub fn append(&mut self, item: MediaItem) {
        self.items.push(Arc::new(item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, pos: usize) -> Option<&Arc<MediaItem>> {
        self.items.get(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MediaItem>> {
        self.items.iter()
    }

    /// Handles for the prefetch worker.
    pub fn snapshot(&self) -> Vec<Arc<MediaItem>> {
        self.items.clone()
    }

    pub fn current(&self) -> &Arc<MediaItem> {
        &self.items[self.cursor]
    }

    pub fn current_position(&self) -> usize {
        self.cursor
    }

    /// Out-of-range positions wrap around.
    pub fn set_current(&mut self, pos: usize) {
        self.cursor = pos % self.items.len();
    }

    pub fn predecessor_of(&self, pos: usize) -> usize {
        let len = self.items.len();
        (pos % len + len - 1) % len
    }

    pub fn successor_of(&self, pos: usize) -> usize {
        (pos + 1) % self.items.len()
    }

    pub fn step_left(&mut self) {
        self.cursor = self.predecessor_of(self.cursor);
    }

    pub fn step_right(&mut self) {
        self.cursor = self.successor_of(self.cursor);
    }
}
