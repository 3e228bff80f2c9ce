//! Progress indicators for long-running operations
//!
//! Uses `linya`, which draws to stderr and leaves stdout clean for
//! `--format json` / `names` consumers.

use linya::{Bar, Progress};

/// Progress bar for the cross-reference scan, one tick per non-source file
pub struct ScanProgress {
  progress: Progress,
  bar: Bar,
}

impl ScanProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
