use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::media::{LoadState, MediaItem};
use crate::surface::Viewport;

// ---------------------------------------------------------------------------
// Sweep ordering
// ---------------------------------------------------------------------------

/// Positions in the order the prefetch sweep requests them.
///
/// Each round requests one position from a forward walker, which starts just
/// after `start` and wraps until it has covered the whole ring, then one from
/// a backward walker, which starts at `start` and parks at position 0.
/// Positions can repeat; loading is idempotent.
pub fn sweep_order(len: usize, start: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let start = start % len;
    let mut order = Vec::with_capacity(len * 2);
    for round in 0..len {
        order.push((start + 1 + round) % len);
        order.push(start.saturating_sub(round));
    }
    order
}

// ---------------------------------------------------------------------------
// Background sweep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub ready: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Load every item, nearest to `start` first. Blocks until done.
pub fn run_sweep(items: &[Arc<MediaItem>], start: usize, viewport: Viewport) -> SweepReport {
    let start_time = Instant::now();
    log::info!("Starting background load of {} images...", items.len());

    for pos in sweep_order(items.len(), start) {
        items[pos].request_load(viewport);
    }

    let ready = items.iter().filter(|i| i.state() == LoadState::Ready).count();
    let failed = items.iter().filter(|i| i.state() == LoadState::Failed).count();
    let report = SweepReport {
        ready,
        failed,
        elapsed: start_time.elapsed(),
    };
    log::info!(
        "Load complete in {:.2}s. {} ready, {} failed.",
        report.elapsed.as_secs_f64(),
        report.ready,
        report.failed
    );
    report
}

/// Handle to the single prefetch worker. There is no cancellation: the
/// sweep either finishes or is abandoned when the process exits.
pub struct PrefetchHandle {
    handle: JoinHandle<SweepReport>,
}

impl PrefetchHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the sweep. `None` if the worker panicked.
    pub fn join(self) -> Option<SweepReport> {
        match self.handle.join() {
            Ok(report) => Some(report),
            Err(_) => {
                log::error!("Image loader thread panicked");
                None
            }
        }
    }
}

pub fn spawn_prefetcher(items: Vec<Arc<MediaItem>>, start: usize, viewport: Viewport) -> PrefetchHandle {
    let handle = thread::spawn(move || run_sweep(&items, start, viewport));
    PrefetchHandle { handle }
}
