// src/engine/debounce.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Buffer of changed paths released at most once per window.
///
/// Semantics:
/// - The first batch after startup is released immediately.
/// - Later changes are held until more than `window` has passed since the
///   previous release. Whoever observes that first (a new change or a
///   timer tick) gets the whole buffer.
/// - Paths are deduplicated within a batch.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: BTreeSet<PathBuf>,
    last_flush: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: BTreeSet::new(),
            last_flush: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn record<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.pending.extend(paths);
    }

    /// Release the buffered batch if the window has passed.
    pub fn take_ready(&mut self, now: Instant) -> Option<Vec<PathBuf>> {
        if self.pending.is_empty() || !self.window_passed(now) {
            return None;
        }
        self.last_flush = Some(now);
        Some(std::mem::take(&mut self.pending).into_iter().collect())
    }

    /// Forget what is buffered and start a new window at `now`.
    ///
    /// Used after a forced restart so edits saved during it do not trigger
    /// a second one straight away.
    pub fn reset(&mut self, now: Instant) {
        self.pending.clear();
        self.last_flush = Some(now);
    }

    fn window_passed(&self, now: Instant) -> bool {
        match self.last_flush {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.window,
        }
    }
}
