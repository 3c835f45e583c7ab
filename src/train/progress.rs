//! Per-pass batch progress drawn on stderr
//!
//! The bar shows `done/total`, elapsed and remaining time, and the batch rate.
//! Seconds per batch are smoothed with an exponential moving average so the
//! remaining-time estimate does not jump with every slow batch.

use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

/// Exponentially smoothed seconds per batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchRate {
    alpha: f64,
    secs_per_batch: Option<f64>,
}

impl Default for BatchRate {
    fn default() -> Self {
        Self::new(0.3)
    }
}

impl BatchRate {
    /// Smoother giving weight `alpha` to the newest measurement
    pub fn new(alpha: f64) -> Self {
        Self { alpha: alpha.clamp(0.0, 1.0), secs_per_batch: None }
    }

    /// Fold in `batches` completed in `secs`
    pub fn observe(&mut self, secs: f64, batches: usize) {
        if batches == 0 {
            return;
        }
        let sample = secs / batches as f64;
        self.secs_per_batch = Some(match self.secs_per_batch {
            None => sample,
            Some(prev) => prev + self.alpha * (sample - prev),
        });
    }

    /// Smoothed seconds per batch, once anything was observed
    pub fn secs_per_batch(&self) -> Option<f64> {
        self.secs_per_batch
    }

    /// Batches per second
    pub fn per_sec(&self) -> Option<f64> {
        self.secs_per_batch.filter(|s| *s > 0.0).map(|s| 1.0 / s)
    }

    /// Seconds left for `remaining` batches
    pub fn remaining_secs(&self, remaining: usize) -> Option<f64> {
        self.secs_per_batch.map(|s| s * remaining as f64)
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Which pass of an epoch is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Training on the poisoned set
    Train,
    /// Clean validation
    Val,
    /// Backdoor validation
    Back,
}

impl Phase {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pad so the three descriptions line up
        write!(f, "{:<5}", self.name())
    }
}

/// Pass description, e.g. `train - epoch:   3, acc: 0.912`
pub fn describe(phase: Phase, epoch: usize, acc: Option<f32>) -> String {
    format!("{phase} - epoch: {epoch:3}, acc: {:.3}", acc.unwrap_or(0.0))
}

/// Text bar for a fixed number of batches
#[derive(Debug, Clone)]
pub struct ProgressBar {
    total: usize,
    done: usize,
    width: usize,
    rate: BatchRate,
    started: Instant,
    last_tick: Instant,
}

impl ProgressBar {
    /// Bar for `total` batches drawn `width` cells wide
    pub fn new(total: usize, width: usize) -> Self {
        let now = Instant::now();
        Self { total, done: 0, width, rate: BatchRate::default(), started: now, last_tick: now }
    }

    /// Move to `done` completed batches
    pub fn update(&mut self, done: usize) {
        let now = Instant::now();
        let advanced = done.saturating_sub(self.done);
        self.rate.observe(now.duration_since(self.last_tick).as_secs_f64(), advanced);
        self.done = done.min(self.total);
        self.last_tick = now;
    }

    /// Completed fraction in `[0, 1]`; an empty pass counts as complete
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    /// Render `[####....] done/total [elapsed<remaining, rate]`
    pub fn render(&self) -> String {
        let filled = (self.fraction() * self.width as f64).round() as usize;
        let empty = self.width.saturating_sub(filled);
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(empty));
        let elapsed = format_clock(self.started.elapsed().as_secs_f64());
        let remaining = self
            .rate
            .remaining_secs(self.total - self.done)
            .map_or_else(|| "?".to_string(), format_clock);
        let rate = self.rate.per_sec().map_or_else(|| "?".to_string(), |r| format!("{r:.2}"));
        format!("[{bar}] {}/{} [{elapsed}<{remaining}, {rate}it/s]", self.done, self.total)
    }
}

/// Progress reporting for one pass, drawn on stderr
///
/// A hidden reporter does nothing; the epoch summary is printed instead.
#[derive(Debug)]
pub struct PassProgress {
    phase: Phase,
    epoch: usize,
    bar: Option<ProgressBar>,
}

impl PassProgress {
    /// Reporter for `total` batches; `visible == false` suppresses all output
    pub fn new(phase: Phase, epoch: usize, total: usize, visible: bool) -> Self {
        Self { phase, epoch, bar: visible.then(|| ProgressBar::new(total, 30)) }
    }

    /// Whether anything is drawn
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Record `done` batches with the running accuracy
    pub fn update(&mut self, done: usize, acc: Option<f32>) {
        if let Some(bar) = self.bar.as_mut() {
            bar.update(done);
            let line = format!("\r{} {}", describe(self.phase, self.epoch, acc), bar.render());
            let mut stderr = io::stderr().lock();
            // Progress output is best-effort
            let _ = stderr.write_all(line.as_bytes());
            let _ = stderr.flush();
        }
    }

    /// End the line
    pub fn finish(&mut self) {
        if self.bar.is_some() {
            eprintln!();
        }
    }
}
