//! Render progress shared between bucket workers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::info;

/// Number of progress lines logged over a full render.
const REPORT_STEPS: usize = 10;

/// Counts finished pixels and logs a line every 10%.
#[derive(Debug)]
pub struct Progress {
    total: usize,
    done: AtomicUsize,
    start: Instant,
}

impl Progress {
    /// Start tracking a render of `total` pixels.
    pub fn start(total: usize) -> Self {
        info!("Rendering {} pixels...", total);
        Self {
            total,
            done: AtomicUsize::new(0),
            start: Instant::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Pixels finished so far, never more than the total.
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed).min(self.total)
    }

    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.done() as f32 / self.total as f32
        }
    }

    /// Record `count` more finished pixels.
    pub fn advance(&self, count: usize) {
        let before = self.done.fetch_add(count, Ordering::Relaxed);
        let after = (before + count).min(self.total);
        let before = before.min(self.total);

        if self.total == 0 {
            return;
        }
        let step_before = before * REPORT_STEPS / self.total;
        let step_after = after * REPORT_STEPS / self.total;
        if step_after > step_before {
            info!("  {}%", step_after * 100 / REPORT_STEPS);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Log the total render time.
    pub fn finish(&self) -> Duration {
        let elapsed = self.elapsed();
        info!("Total render time: {:.3}s", elapsed.as_secs_f64());
        elapsed
    }
}
