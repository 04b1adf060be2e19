//! # Statistics Module
//!
//! Thread-safe counters for a compression run.
//!
//! Every finished job lands in exactly one of `success`, `failure` or `skip`,
//! so `success + failure + skip` is always the number of completed jobs.
//! Successful jobs also add their sizes to the byte totals.
//!
//! ## Example:
//! ```rust
//! use video_compress::stats::StatsCounter;
//!
//! let stats = StatsCounter::new();
//! stats.add_success(1000, 400);
//! stats.inc_skip();
//! assert_eq!(stats.to_string(), "success: 1, failed: 0, skipped: 1");
//! ```

use crate::file_manager::FileManager;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// Point-in-time copy of the counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub success: usize,
    pub failure: usize,
    pub skip: usize,
    /// Input bytes of successfully compressed files
    pub bytes_in: u64,
    /// Output bytes of successfully compressed files
    pub bytes_out: u64,
}

impl StatsSnapshot {
    /// Number of completed jobs
    pub fn total(&self) -> usize {
        self.success + self.failure + self.skip
    }

    pub fn bytes_saved(&self) -> u64 {
        self.bytes_in.saturating_sub(self.bytes_out)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "{} | Total saved: {} ({:.2}%)",
            self,
            FileManager::format_size(self.bytes_saved()),
            FileManager::calculate_reduction(self.bytes_in, self.bytes_out)
        )
    }
}

impl std::fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "success: {}, failed: {}, skipped: {}",
            self.success, self.failure, self.skip
        )
    }
}

/// Mutex-guarded counters shared by all workers
#[derive(Debug, Default)]
pub struct StatsCounter {
    counts: Mutex<StatsSnapshot>,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, f: impl FnOnce(&mut StatsSnapshot)) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut counts);
    }

    /// Count a success together with its sizes
    pub fn add_success(&self, original_size: u64, new_size: u64) {
        self.update(|c| {
            c.success += 1;
            c.bytes_in += original_size;
            c.bytes_out += new_size;
        });
    }

    pub fn inc_failure(&self) {
        self.update(|c| c.failure += 1);
    }

    pub fn inc_skip(&self) {
        self.update(|c| c.skip += 1);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        *self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Display for StatsCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.snapshot(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counts_and_format() {
        let stats = StatsCounter::new();
        stats.add_success(10, 5);
        stats.inc_failure();
        stats.inc_failure();
        stats.inc_skip();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total(), 4);
        assert_eq!(format!("{}", stats), "success: 1, failed: 2, skipped: 1");
    }

    #[test]
    fn test_bytes_saved() {
        let stats = StatsCounter::new();
        stats.add_success(2048, 1024);
        stats.add_success(1024, 0);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.success, 2);
        assert_eq!(snapshot.bytes_saved(), 2048);
        assert_eq!(
            snapshot.format_summary(),
            "success: 2, failed: 0, skipped: 0 | Total saved: 2.00 KB (66.67%)"
        );
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let stats = Arc::new(StatsCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let stats = stats.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        match i % 3 {
                            0 => stats.add_success(2, 1),
                            1 => stats.inc_failure(),
                            _ => stats.inc_skip(),
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total(), 8000);
        assert_eq!(snapshot.success, 3000);
        assert_eq!(snapshot.failure, 3000);
        assert_eq!(snapshot.skip, 2000);
        assert_eq!(snapshot.bytes_saved(), 3000);
    }
}
